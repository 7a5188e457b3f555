use polars::prelude::*;

/// Statistics results
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub count: usize,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            mean: 0.0,
            median: 0.0,
            min: 0.0,
            max: 0.0,
            sum: 0.0,
            count: 0,
        }
    }
}

/// Summary statistics of one trace's values using polars
pub fn calculate_stats(values: &[f64]) -> Stats {
    let count = values.len();

    if count == 0 {
        return Stats::default();
    }

    let series = Series::new("values".into(), values);
    let chunked = match series.f64() {
        Ok(c) => c,
        Err(_) => return Stats::default(),
    };

    Stats {
        mean: chunked.mean().unwrap_or(0.0),
        median: chunked.median().unwrap_or(0.0),
        min: chunked.min().unwrap_or(0.0),
        max: chunked.max().unwrap_or(0.0),
        sum: chunked.sum().unwrap_or(0.0),
        count,
    }
}
