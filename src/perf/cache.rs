//! Chart cache keyed on dataset version and month filter

use crate::chart::Charts;
use crate::data::MonthFilter;

/// Cache key: (dataset_version, month_filter)
pub type CacheKey = (u64, MonthFilter);

/// Holds the charts for exactly one key
#[derive(Default)]
pub struct ChartCache {
    entry: Option<(CacheKey, Charts)>,
    recomputes: u64,
}

impl ChartCache {
    /// Get cached charts or compute them.
    ///
    /// A stored entry for a different key is dropped before `compute` runs, so
    /// superseded charts never outlive the recomputation.
    pub fn get_or_compute<F>(&mut self, key: CacheKey, compute: F) -> &Charts
    where
        F: FnOnce() -> Charts,
    {
        if self.entry.as_ref().is_some_and(|(k, _)| *k != key) {
            self.entry = None;
        }

        let recomputes = &mut self.recomputes;
        &self
            .entry
            .get_or_insert_with(|| {
                *recomputes += 1;
                tracing::debug!(
                    "Rebuilding charts for dataset v{} with filter {} (rebuild #{})",
                    key.0,
                    key.1,
                    recomputes
                );
                (key, compute())
            })
            .1
    }

    /// Check if charts for this key are cached
    #[cfg(test)]
    pub fn is_cached(&self, key: CacheKey) -> bool {
        self.entry.as_ref().is_some_and(|(k, _)| *k == key)
    }

    /// Number of rebuilds since creation
    #[cfg(test)]
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{PowerRecords, Series, WorkRecords};

    fn charts(value: f64) -> Charts {
        let power = PowerRecords {
            eo: Series::from_points([("2023-01-05 01:00:00", value)]),
            ..Default::default()
        };
        Charts::build(&power, &WorkRecords::default(), MonthFilter::All)
    }

    #[test]
    fn test_cache_hit() {
        let mut cache = ChartCache::default();

        let mut computed = false;
        cache.get_or_compute((1, MonthFilter::All), || {
            computed = true;
            charts(1.0)
        });
        assert!(computed);

        computed = false;
        let cached = cache.get_or_compute((1, MonthFilter::All), || {
            computed = true;
            charts(2.0)
        });
        assert!(!computed, "Should have hit cache");
        assert_eq!(&*cached.power.traces[0].y, &[1.0]);
        assert_eq!(cache.recompute_count(), 1);
    }

    #[test]
    fn test_filter_change_recomputes() {
        let mut cache = ChartCache::default();
        cache.get_or_compute((1, MonthFilter::All), || charts(1.0));

        let rebuilt = cache.get_or_compute((1, MonthFilter::Month(3)), || charts(2.0));
        assert_eq!(&*rebuilt.power.traces[0].y, &[2.0]);
        assert!(cache.is_cached((1, MonthFilter::Month(3))));
        assert!(!cache.is_cached((1, MonthFilter::All)));
    }

    #[test]
    fn test_dataset_version_change_recomputes() {
        let mut cache = ChartCache::default();
        cache.get_or_compute((1, MonthFilter::All), || charts(1.0));
        cache.get_or_compute((2, MonthFilter::All), || charts(5.0));
        assert_eq!(cache.recompute_count(), 2);
    }
}
