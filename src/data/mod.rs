pub mod compute;
pub mod filter;
pub mod series;
pub mod source;
pub mod stats;
pub mod tariff;

// Re-export key types for convenience
pub use compute::{BuildRequest, BuildResponse, LocalBackend, ProcessBackend, SeriesBackend};
pub use filter::{MonthFilter, filter_by_month};
pub use series::{PowerRecords, PowerSlot, Series, WorkRecords, WorkSlot};
pub use stats::Stats;
