//! Off-thread computation and memoised chart assembly
//!
//! - [`BackgroundWorker`] runs the compute backend on its own thread so the UI
//!   never blocks on file loading or an external process.
//! - [`ChartCache`] keeps the last assembled [`crate::chart::Charts`] and only
//!   rebuilds them when the dataset version or month filter changes.

mod cache;
mod worker;

pub use cache::{CacheKey, ChartCache};
pub use worker::{BackgroundWorker, RequestId, WorkerRequest, WorkerResult};
