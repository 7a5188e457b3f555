//! Load state of the request pipeline

use crate::perf::RequestId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    /// Waiting for the response to request `id`
    Loading { id: RequestId },
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading { .. })
    }

    /// Is `id` the request whose response is awaited
    pub fn awaits(&self, id: RequestId) -> bool {
        *self == LoadState::Loading { id }
    }
}
