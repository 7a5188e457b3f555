//! Chart data assembly: filtered series into renderable traces
//!
//! Assembly is pure. The same records and filter always produce equal
//! [`Charts`]; caching lives in [`crate::perf::ChartCache`].

use chrono::NaiveDate;
use std::fmt::Write as _;
use std::sync::Arc;

use crate::constants::datetime::{DATE_FORMAT, DATETIME_FORMAT};
use crate::data::source::parse_timestamp;
use crate::data::{MonthFilter, PowerRecords, PowerSlot, Series, WorkRecords, WorkSlot};

/// How a trace is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceKind {
    #[default]
    LinesMarkers,
}

/// Tick label format of a chart group's time axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisFormat {
    DateTime,
    Date,
}

impl AxisFormat {
    pub fn pattern(self) -> &'static str {
        match self {
            AxisFormat::DateTime => DATETIME_FORMAT,
            AxisFormat::Date => DATE_FORMAT,
        }
    }
}

/// One renderable trace
#[derive(Debug, Clone, PartialEq)]
pub struct TraceDescriptor {
    pub name: String,
    pub x: Arc<[String]>,
    pub y: Arc<[f64]>,
    pub kind: TraceKind,
    /// `[unix seconds, value]`; entries with an unreadable timestamp are left out
    points: Vec<[f64; 2]>,
}

impl TraceDescriptor {
    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Turn one (already filtered) series into a trace
pub fn assemble(series: &Series, display_name: &str) -> TraceDescriptor {
    let points = series
        .iter()
        .filter_map(|(ts, v)| timestamp_seconds(ts).map(|x| [x, v]))
        .collect();

    TraceDescriptor {
        name: display_name.to_string(),
        x: series.timestamps_shared(),
        y: series.values_shared(),
        kind: TraceKind::LinesMarkers,
        points,
    }
}

/// Unix seconds of a `YYYY-MM-DD[ HH:MM:SS]` timestamp
pub fn timestamp_seconds(ts: &str) -> Option<f64> {
    let dt = parse_timestamp(ts).or_else(|| {
        NaiveDate::parse_from_str(ts.trim(), DATE_FORMAT)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    })?;
    Some(dt.and_utc().timestamp() as f64)
}

/// The traces of one chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartGroup {
    pub traces: Vec<TraceDescriptor>,
    pub axis: AxisFormat,
}

impl ChartGroup {
    /// Six power traces in slot order, date+time axis
    pub fn power(records: &PowerRecords) -> Self {
        Self {
            traces: PowerSlot::ALL
                .iter()
                .map(|&slot| assemble(records.get(slot), slot.display_name()))
                .collect(),
            axis: AxisFormat::DateTime,
        }
    }

    /// Two energy traces, date-only axis
    pub fn work(records: &WorkRecords) -> Self {
        Self {
            traces: WorkSlot::ALL
                .iter()
                .map(|&slot| assemble(records.get(slot), slot.display_name()))
                .collect(),
            axis: AxisFormat::Date,
        }
    }

    pub fn point_count(&self) -> usize {
        self.traces.iter().map(TraceDescriptor::len).sum()
    }

    /// `trace,timestamp,value` rows for the clipboard
    pub fn to_csv(&self) -> String {
        let mut out = String::from("trace,timestamp,value\n");
        for trace in &self.traces {
            for (ts, v) in trace.x.iter().zip(trace.y.iter()) {
                let _ = writeln!(out, "{},{},{}", trace.name, ts, v);
            }
        }
        out
    }
}

/// Both chart groups for one (dataset, filter) pair
#[derive(Debug, Clone, PartialEq)]
pub struct Charts {
    pub power: ChartGroup,
    pub work: ChartGroup,
}

impl Charts {
    pub fn build(power: &PowerRecords, work: &WorkRecords, filter: MonthFilter) -> Self {
        profiling::scope!("assemble_charts");

        Self {
            power: ChartGroup::power(&power.filtered(filter)),
            work: ChartGroup::work(&work.filtered(filter)),
        }
    }
}
