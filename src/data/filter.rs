//! Month selector and the series filter engine
//!
//! Timestamps follow a strict `YYYY-MM-DD...` contract: the month is the two
//! ASCII digits at the fixed month offset, whatever the separators are.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::series::{PowerRecords, Series, WorkRecords};
use crate::constants::months::{ALL_CODE, MONTH_OFFSET, MONTH_WIDTH};
use crate::error::PowerStatsError;

/// The globally selected month, or no filtering at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MonthFilter {
    #[default]
    All,
    /// Calendar month, 1..=12
    Month(u8),
}

impl MonthFilter {
    /// The thirteen selector options in display order
    pub fn options() -> impl Iterator<Item = MonthFilter> {
        std::iter::once(MonthFilter::All).chain((1..=12).map(MonthFilter::Month))
    }

    /// Wire code: `"all"` or `"01".."12"`
    pub fn code(self) -> String {
        match self {
            MonthFilter::All => ALL_CODE.to_string(),
            MonthFilter::Month(m) => format!("{:02}", m),
        }
    }

    /// Selector label
    pub fn label(self) -> String {
        match self {
            MonthFilter::All => "All".to_string(),
            MonthFilter::Month(m) => m.to_string(),
        }
    }

    pub fn is_all(self) -> bool {
        self == MonthFilter::All
    }

    /// Does a timestamp pass this filter
    pub fn matches(self, timestamp: &str) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Month(m) => timestamp_month(timestamp) == Some(u32::from(m)),
        }
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

impl FromStr for MonthFilter {
    type Err = PowerStatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL_CODE {
            return Ok(MonthFilter::All);
        }
        if s.len() != MONTH_WIDTH || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PowerStatsError::InvalidMonth(s.to_string()));
        }
        match s.parse::<u8>() {
            Ok(m @ 1..=12) => Ok(MonthFilter::Month(m)),
            _ => Err(PowerStatsError::InvalidMonth(s.to_string())),
        }
    }
}

impl TryFrom<String> for MonthFilter {
    type Error = PowerStatsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthFilter> for String {
    fn from(filter: MonthFilter) -> Self {
        filter.code()
    }
}

/// Month component of a timestamp, if it carries one
///
/// Padded fields such as `" 1"` carry no month even where a date parser would
/// accept them.
pub fn timestamp_month(timestamp: &str) -> Option<u32> {
    let field = timestamp.get(MONTH_OFFSET..MONTH_OFFSET + MONTH_WIDTH)?;
    if !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Narrow a series to the entries of the selected month
///
/// `All` hands back the same storage; any other filter builds a new series.
pub fn filter_by_month(series: &Series, filter: MonthFilter) -> Series {
    if filter.is_all() {
        return series.clone();
    }

    Series::from_points(
        series
            .iter()
            .filter(|(ts, _)| filter.matches(ts))
            .map(|(ts, v)| (ts.to_string(), v)),
    )
}

impl PowerRecords {
    /// Filter every slot independently
    pub fn filtered(&self, filter: MonthFilter) -> PowerRecords {
        PowerRecords {
            eo: filter_by_month(&self.eo, filter),
            mp: filter_by_month(&self.mp, filter),
            no: filter_by_month(&self.no, filter),
            np: filter_by_month(&self.np, filter),
            er: filter_by_month(&self.er, filter),
            nr: filter_by_month(&self.nr, filter),
        }
    }
}

impl WorkRecords {
    /// Filter every slot independently
    pub fn filtered(&self, filter: MonthFilter) -> WorkRecords {
        WorkRecords {
            m: filter_by_month(&self.m, filter),
            n: filter_by_month(&self.n, filter),
        }
    }
}
