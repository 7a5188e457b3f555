//! Reusable UI widgets for power-stats

mod month_selector;

pub use month_selector::MonthSelector;
