//! Month filter store

use crate::data::MonthFilter;

/// The single global month selector
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    month: MonthFilter,
}

impl FilterState {
    pub fn new(month: MonthFilter) -> Self {
        Self { month }
    }

    pub fn month(&self) -> MonthFilter {
        self.month
    }

    /// Set the month; returns whether the value changed
    pub fn set_month(&mut self, month: MonthFilter) -> bool {
        if self.month == month {
            return false;
        }
        tracing::debug!("Month filter {} -> {}", self.month, month);
        self.month = month;
        true
    }
}
