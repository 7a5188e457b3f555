//! Transient UI state shared by the renderers

use super::view::ChartTab;
use crate::constants::layout::MAX_NOTIFICATIONS;
use crate::data::Stats;
use crate::error::{FieldError, FormField, PowerStatsError};
use crate::perf::CacheKey;

/// Stats are per chart group, so the tab is part of the key
pub type StatsKey = (CacheKey, ChartTab);

/// A dismissable toast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct UiState {
    notifications: Vec<Notification>,
    field_errors: Vec<FieldError>,
    stats_cache: Option<(StatsKey, Vec<Stats>)>,
}

impl UiState {
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Queue a toast; the oldest is dropped past the cap
    pub fn notify(&mut self, title: impl Into<String>, message: impl Into<String>) {
        if self.notifications.len() >= MAX_NOTIFICATIONS {
            self.notifications.remove(0);
        }
        self.notifications.push(Notification {
            title: title.into(),
            message: message.into(),
        });
    }

    pub fn notify_error(&mut self, error: &PowerStatsError) {
        self.notify(error.title(), error.user_message());
    }

    pub fn dismiss(&mut self, index: usize) {
        if index < self.notifications.len() {
            self.notifications.remove(index);
        }
    }

    pub fn set_field_errors(&mut self, errors: Vec<FieldError>) {
        self.field_errors = errors;
    }

    pub fn clear_field_errors(&mut self) {
        self.field_errors.clear();
    }

    /// Cached per-trace stats, or None when computed for another key
    pub fn cached_stats(&self, key: StatsKey) -> Option<&[Stats]> {
        match &self.stats_cache {
            Some((k, stats)) if *k == key => Some(stats.as_slice()),
            _ => None,
        }
    }

    pub fn cache_stats(&mut self, key: StatsKey, stats: Vec<Stats>) {
        self.stats_cache = Some((key, stats));
    }

    /// Message to show under `field`, if any
    pub fn field_error(&self, field: FormField) -> Option<&'static str> {
        self.field_errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }
}
