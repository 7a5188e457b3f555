//! Tariff period classification of metering timestamps

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::constants::tariff::*;

/// Chart periods the reference backend groups samples into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    EveningValley,
    MorningPeak,
    MiddayValley,
    MiddayPeak,
}

impl Period {
    pub fn of(dt: &NaiveDateTime) -> Option<Period> {
        let hour = dt.hour();
        let within = |(start, end): (u32, u32)| start <= hour && hour < end;

        if hour < EVENING_VALLEY_END {
            Some(Period::EveningValley)
        } else if within(MORNING_PEAK) {
            Some(Period::MorningPeak)
        } else if within(MIDDAY_VALLEY) {
            Some(Period::MiddayValley)
        } else if within(MIDDAY_PEAK) {
            Some(Period::MiddayPeak)
        } else {
            None
        }
    }
}

/// Billing category of a timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodCategory {
    Peak,
    OffPeak,
    Sharp,
    Other,
}

impl PeriodCategory {
    pub fn of(dt: &NaiveDateTime) -> PeriodCategory {
        let hour = dt.hour();
        let within = |(start, end): (u32, u32)| start <= hour && hour < end;

        if hour < EVENING_VALLEY_END || within(MIDDAY_VALLEY) {
            return PeriodCategory::OffPeak;
        }

        if SHARP_MONTHS.contains(&dt.month()) {
            if SHARP_WINDOWS.iter().any(|&w| within(w)) {
                return PeriodCategory::Sharp;
            }
        } else if within(MORNING_PEAK) || within(MIDDAY_PEAK) {
            return PeriodCategory::Peak;
        }

        PeriodCategory::Other
    }
}
