//! Named time series and the two fixed-shape record groups

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{PowerStatsError, Result};

/// Parallel timestamp/value sequences for one measured quantity
///
/// Storage is shared, so cloning a `Series` never copies its points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSeries")]
pub struct Series {
    #[serde(rename = "x")]
    timestamps: Arc<[String]>,
    #[serde(rename = "y")]
    values: Arc<[f64]>,
}

/// Unchecked wire shape of a series
#[derive(Deserialize)]
struct RawSeries {
    x: Vec<String>,
    y: Vec<f64>,
}

impl TryFrom<RawSeries> for Series {
    type Error = PowerStatsError;

    fn try_from(raw: RawSeries) -> Result<Self> {
        Series::new(raw.x, raw.y)
    }
}

impl Default for Series {
    fn default() -> Self {
        Self::empty()
    }
}

impl Series {
    /// Build a series, rejecting sequences of different length
    pub fn new(timestamps: Vec<String>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(PowerStatsError::SeriesLengthMismatch {
                timestamps: timestamps.len(),
                values: values.len(),
            });
        }
        Ok(Self {
            timestamps: timestamps.into(),
            values: values.into(),
        })
    }

    pub fn empty() -> Self {
        Self {
            timestamps: Arc::from(Vec::<String>::new()),
            values: Arc::from(Vec::<f64>::new()),
        }
    }

    /// Build from `(timestamp, value)` pairs; lengths agree by construction
    pub fn from_points<I, S>(points: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let (timestamps, values): (Vec<String>, Vec<f64>) = points
            .into_iter()
            .map(|(ts, v)| (ts.into(), v))
            .unzip();
        Self {
            timestamps: timestamps.into(),
            values: values.into(),
        }
    }

    pub fn timestamps(&self) -> &[String] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Shared handle to the timestamps
    pub fn timestamps_shared(&self) -> Arc<[String]> {
        Arc::clone(&self.timestamps)
    }

    /// Shared handle to the values
    pub fn values_shared(&self) -> Arc<[f64]> {
        Arc::clone(&self.values)
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.timestamps
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// True when both handles point at the same storage as `other`
    pub fn shares_storage_with(&self, other: &Series) -> bool {
        Arc::ptr_eq(&self.timestamps, &other.timestamps)
            && Arc::ptr_eq(&self.values, &other.values)
    }
}

/// The six instantaneous power categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerSlot {
    /// Evening valley instantaneous power
    EveningValley,
    /// Morning peak instantaneous power
    MorningPeak,
    /// Midday valley instantaneous power
    MiddayValley,
    /// Midday peak instantaneous power
    MiddayPeak,
    /// Evening valley margin
    EveningMargin,
    /// Midday valley margin
    MiddayMargin,
}

impl PowerSlot {
    /// Chart order
    pub const ALL: [PowerSlot; 6] = [
        PowerSlot::EveningValley,
        PowerSlot::MorningPeak,
        PowerSlot::MiddayValley,
        PowerSlot::MiddayPeak,
        PowerSlot::EveningMargin,
        PowerSlot::MiddayMargin,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            PowerSlot::EveningValley => "Evening valley power",
            PowerSlot::MorningPeak => "Morning peak power",
            PowerSlot::MiddayValley => "Midday valley power",
            PowerSlot::MiddayPeak => "Midday peak power",
            PowerSlot::EveningMargin => "Evening valley margin",
            PowerSlot::MiddayMargin => "Midday valley margin",
        }
    }
}

/// The two aggregated energy categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkSlot {
    /// Morning peak energy
    MorningPeak,
    /// Midday peak energy
    MiddayPeak,
}

impl WorkSlot {
    pub const ALL: [WorkSlot; 2] = [WorkSlot::MorningPeak, WorkSlot::MiddayPeak];

    pub fn display_name(self) -> &'static str {
        match self {
            WorkSlot::MorningPeak => "Morning peak energy",
            WorkSlot::MiddayPeak => "Midday peak energy",
        }
    }
}

/// Power and margin series per tariff period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerRecords {
    pub eo: Series,
    pub mp: Series,
    pub no: Series,
    pub np: Series,
    pub er: Series,
    pub nr: Series,
}

impl PowerRecords {
    pub fn get(&self, slot: PowerSlot) -> &Series {
        match slot {
            PowerSlot::EveningValley => &self.eo,
            PowerSlot::MorningPeak => &self.mp,
            PowerSlot::MiddayValley => &self.no,
            PowerSlot::MiddayPeak => &self.np,
            PowerSlot::EveningMargin => &self.er,
            PowerSlot::MiddayMargin => &self.nr,
        }
    }

    /// Total points across all slots
    pub fn point_count(&self) -> usize {
        PowerSlot::ALL.iter().map(|&s| self.get(s).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        PowerSlot::ALL.iter().all(|&s| self.get(s).is_empty())
    }
}

/// Energy series per peak period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkRecords {
    pub m: Series,
    pub n: Series,
}

impl WorkRecords {
    pub fn get(&self, slot: WorkSlot) -> &Series {
        match slot {
            WorkSlot::MorningPeak => &self.m,
            WorkSlot::MiddayPeak => &self.n,
        }
    }

    pub fn point_count(&self) -> usize {
        WorkSlot::ALL.iter().map(|&s| self.get(s).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        WorkSlot::ALL.iter().all(|&s| self.get(s).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_rejected() {
        let err = Series::new(vec!["2023-01-01".into()], vec![]).unwrap_err();
        assert!(matches!(
            err,
            PowerStatsError::SeriesLengthMismatch {
                timestamps: 1,
                values: 0
            }
        ));
    }

    #[test]
    fn test_deserialize_validates_lengths() {
        let ok: Series = serde_json::from_str(r#"{"x": ["2023-01-05"], "y": [1.5]}"#).unwrap();
        assert_eq!(ok.len(), 1);
        assert_eq!(ok.values(), &[1.5]);

        let bad = serde_json::from_str::<Series>(r#"{"x": ["a", "b"], "y": [1.0]}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_serializes_as_x_y() {
        let s = Series::from_points([("2023-01-05", 2.0)]);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json, serde_json::json!({"x": ["2023-01-05"], "y": [2.0]}));
    }

    #[test]
    fn test_clone_shares_storage() {
        let s = Series::from_points([("2023-01-05", 2.0), ("2023-01-06", 3.0)]);
        let c = s.clone();
        assert!(c.shares_storage_with(&s));
        assert!(!Series::from_points([("2023-01-05", 2.0), ("2023-01-06", 3.0)]).shares_storage_with(&s));
    }

    #[test]
    fn test_default_records_are_empty() {
        assert!(PowerRecords::default().is_empty());
        assert!(WorkRecords::default().is_empty());
        assert_eq!(PowerRecords::default().point_count(), 0);
    }

    #[test]
    fn test_slot_lookup() {
        let records = PowerRecords {
            nr: Series::from_points([("2023-03-01 11:00:00", 7.0)]),
            ..Default::default()
        };
        assert_eq!(records.get(PowerSlot::MiddayMargin).len(), 1);
        assert!(records.get(PowerSlot::EveningMargin).is_empty());
        assert_eq!(records.point_count(), 1);
    }
}
