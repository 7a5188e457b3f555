//! Request orchestration: form submission through to committed records
//!
//! ```text
//! Idle --submit(valid)--> Loading{id} --Built{id}--> Idle (dataset replaced)
//!                                     --Failed{id}-> Idle (one notification)
//! ```
//! Results for any id other than the awaited one are dropped.

use std::sync::Arc;
#[cfg(test)]
use std::time::Duration;

use crate::data::{BuildRequest, SeriesBackend};
use crate::error::SubmitError;
use crate::perf::{BackgroundWorker, RequestId, WorkerRequest, WorkerResult};
use crate::state::{AppState, LoadState};

pub struct RequestOrchestrator {
    worker: BackgroundWorker,
    last_id: u64,
}

impl RequestOrchestrator {
    pub fn new(backend: Arc<dyn SeriesBackend>) -> Self {
        Self {
            worker: BackgroundWorker::spawn(backend),
            last_id: 0,
        }
    }

    fn next_id(&mut self) -> RequestId {
        self.last_id += 1;
        RequestId(self.last_id)
    }

    /// Validate the form and, when it passes, start a computation.
    ///
    /// An invalid form leaves the dataset and load state untouched and
    /// records the field errors instead. A request the worker cannot accept
    /// returns the state to idle with one notification.
    pub fn submit(&mut self, state: &mut AppState) -> Result<RequestId, SubmitError> {
        let form = match state.form.validate() {
            Ok(form) => form,
            Err(errors) => {
                tracing::debug!("Submission blocked by {} field error(s)", errors.len());
                state.ui.set_field_errors(errors.clone());
                return Err(SubmitError::Invalid(errors));
            }
        };
        state.ui.clear_field_errors();

        let id = self.next_id();
        let request = BuildRequest::from(form);
        tracing::info!(
            "Submitting request {} for {}",
            id.0,
            request.filepath.display()
        );

        state.dataset.clear();
        state.load = LoadState::Loading { id };

        if let Err(e) = self.worker.request(WorkerRequest::Build { id, request }) {
            tracing::warn!("Request {} could not be queued: {}", id.0, e);
            state.load = LoadState::Idle;
            state.ui.notify_error(&e);
            return Err(e.into());
        }

        Ok(id)
    }

    /// Apply every finished result; returns whether the state changed
    pub fn poll(&mut self, state: &mut AppState) -> bool {
        let mut changed = false;
        while let Some(result) = self.worker.poll() {
            changed |= Self::apply(result, state);
        }
        changed
    }

    fn apply(result: WorkerResult, state: &mut AppState) -> bool {
        let id = result.id();
        if !state.load.awaits(id) {
            tracing::debug!("Discarding stale response for request {}", id.0);
            return false;
        }

        match result {
            WorkerResult::Built { response, .. } => {
                tracing::info!(
                    "Request {} committed: {} power points, {} energy points",
                    id.0,
                    response.p.point_count(),
                    response.w.point_count()
                );
                state.dataset.replace(response);
            }
            WorkerResult::Failed { error, .. } => {
                tracing::warn!("Request {} failed: {}", id.0, error);
                state.ui.notify_error(&error);
            }
        }
        state.load = LoadState::Idle;
        true
    }

    /// Block until the awaited result has been applied or `timeout` passes
    #[cfg(test)]
    fn wait_idle(&mut self, state: &mut AppState, timeout: Duration) {
        let deadline = std::time::Instant::now() + timeout;
        while state.is_loading() {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            if remaining.is_zero() {
                break;
            }
            if let Some(result) = self.worker.wait(remaining) {
                Self::apply(result, state);
            }
        }
    }
}
