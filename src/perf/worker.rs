//! Background worker for the compute call
//!
//! Requests are processed one at a time in submission order. Every result
//! carries the [`RequestId`] of the request that produced it so the caller can
//! tell whether it is still wanted.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::data::{BuildRequest, BuildResponse, SeriesBackend};
use crate::error::{PowerStatsError, Result};

/// Identifier of one submission; later submissions get larger ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

/// Requests that can be sent to the background worker
pub enum WorkerRequest {
    /// Run the backend
    Build { id: RequestId, request: BuildRequest },
    /// Shutdown the worker
    Shutdown,
}

/// Results returned from the background worker
#[derive(Debug)]
pub enum WorkerResult {
    Built { id: RequestId, response: BuildResponse },
    Failed { id: RequestId, error: PowerStatsError },
}

impl WorkerResult {
    pub fn id(&self) -> RequestId {
        match self {
            WorkerResult::Built { id, .. } | WorkerResult::Failed { id, .. } => *id,
        }
    }
}

/// Background worker that processes requests off the main thread
pub struct BackgroundWorker {
    tx: Sender<WorkerRequest>,
    rx: Receiver<WorkerResult>,
    handle: Option<JoinHandle<()>>,
}

impl BackgroundWorker {
    /// Spawn a new background worker thread owning `backend`
    pub fn spawn(backend: Arc<dyn SeriesBackend>) -> Self {
        let (req_tx, req_rx) = channel::<WorkerRequest>();
        let (res_tx, res_rx) = channel::<WorkerResult>();

        let handle = thread::spawn(move || {
            Self::worker_loop(backend.as_ref(), req_rx, res_tx);
        });

        Self {
            tx: req_tx,
            rx: res_rx,
            handle: Some(handle),
        }
    }

    fn worker_loop(
        backend: &dyn SeriesBackend,
        rx: Receiver<WorkerRequest>,
        tx: Sender<WorkerResult>,
    ) {
        while let Ok(request) = rx.recv() {
            let result = match request {
                WorkerRequest::Build { id, request } => {
                    profiling::scope!("worker_build");
                    match backend.build_series(&request) {
                        Ok(response) => WorkerResult::Built { id, response },
                        Err(error) => WorkerResult::Failed { id, error },
                    }
                }
                WorkerRequest::Shutdown => break,
            };

            if tx.send(result).is_err() {
                break;
            }
        }
    }

    /// Send a request to the worker (non-blocking)
    pub fn request(&self, req: WorkerRequest) -> Result<()> {
        self.tx
            .send(req)
            .map_err(|_| PowerStatsError::WorkerUnavailable)
    }

    /// Poll for completed work (non-blocking)
    pub fn poll(&self) -> Option<WorkerResult> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Block up to `timeout` for the next result
    pub fn wait(&self, timeout: Duration) -> Option<WorkerResult> {
        self.rx.recv_timeout(timeout).ok()
    }
}

impl Drop for BackgroundWorker {
    fn drop(&mut self) {
        let _ = self.tx.send(WorkerRequest::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{PowerRecords, Series};
    use std::path::PathBuf;

    struct EchoBackend;

    impl SeriesBackend for EchoBackend {
        fn build_series(&self, request: &BuildRequest) -> Result<BuildResponse> {
            if request.filepath.as_os_str().is_empty() {
                return Err(PowerStatsError::Compute("no file".to_string()));
            }
            Ok(BuildResponse {
                p: PowerRecords {
                    eo: Series::from_points([("2023-01-05 01:00:00", request.rated_capacity)]),
                    ..Default::default()
                },
                ..Default::default()
            })
        }
    }

    fn request(rated: f64, path: &str) -> BuildRequest {
        BuildRequest {
            rated_capacity: rated,
            is_primary_load: false,
            factor: None,
            filepath: PathBuf::from(path),
        }
    }

    #[test]
    fn test_worker_build() {
        let worker = BackgroundWorker::spawn(Arc::new(EchoBackend));
        worker
            .request(WorkerRequest::Build {
                id: RequestId(7),
                request: request(42.0, "data.csv"),
            })
            .unwrap();

        match worker.wait(Duration::from_secs(5)) {
            Some(WorkerResult::Built { id, response }) => {
                assert_eq!(id, RequestId(7));
                assert_eq!(response.p.eo.values(), &[42.0]);
            }
            other => panic!("Expected Built result, got {:?}", other),
        }
    }

    #[test]
    fn test_worker_failure_and_order() {
        let worker = BackgroundWorker::spawn(Arc::new(EchoBackend));
        worker
            .request(WorkerRequest::Build { id: RequestId(1), request: request(1.0, "") })
            .unwrap();
        worker
            .request(WorkerRequest::Build { id: RequestId(2), request: request(2.0, "a.csv") })
            .unwrap();

        let first = worker.wait(Duration::from_secs(5)).unwrap();
        let second = worker.wait(Duration::from_secs(5)).unwrap();
        assert!(matches!(first, WorkerResult::Failed { id: RequestId(1), .. }));
        assert_eq!(second.id(), RequestId(2));
    }

    #[test]
    fn test_poll_when_idle() {
        let worker = BackgroundWorker::spawn(Arc::new(EchoBackend));
        assert!(worker.poll().is_none());
    }
}
