use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use encoding_rs::{Encoding, GB18030, UTF_8};
use polars::prelude::*;
use std::borrow::Cow;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::constants::source::{INFER_SCHEMA_ROWS, POWER_COLUMNS, TIME_COLUMNS};
use crate::error::{PowerStatsError, Result};

/// Days from 0001-01-01 to 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// String timestamp layouts accepted when polars leaves the time column as text
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f", // 2024-01-15 14:30:00.123
    "%Y-%m-%d %H:%M:%S",    // 2024-01-15 14:30:00
    "%Y-%m-%dT%H:%M:%S%.f", // 2024-01-15T14:30:00.123
    "%Y-%m-%dT%H:%M:%S",    // 2024-01-15T14:30:00
    "%Y-%m-%d %H:%M",       // 2024-01-15 14:30
    "%Y/%m/%d %H:%M:%S",    // 2024/01/15 14:30:00
    "%Y/%m/%d %H:%M",       // 2024/01/15 14:30
];

/// One metering sample: timestamp and instantaneous active power
pub type Sample = (NaiveDateTime, f64);

/// DataSource wraps the source file's materialized DataFrame
pub struct DataSource {
    materialized: DataFrame,
    file_path: PathBuf,
}

impl DataSource {
    /// Load data from a file (CSV or Parquet)
    pub fn load(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| PowerStatsError::UnsupportedFormat {
                extension: String::new(),
            })?;

        let materialized = match extension.to_lowercase().as_str() {
            "parquet" => LazyFrame::scan_parquet(path, Default::default())?.collect()?,
            "csv" => {
                let bytes = std::fs::read(path)?;
                let (text, encoding) = decode_text(&bytes)?;
                if encoding != UTF_8 {
                    tracing::debug!("Decoded {} as {}", path.display(), encoding.name());
                }
                CsvReadOptions::default()
                    .with_has_header(true)
                    .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
                    .map_parse_options(|options| options.with_try_parse_dates(true))
                    .into_reader_with_file_handle(Cursor::new(text.into_owned().into_bytes()))
                    .finish()?
            }
            ext => {
                return Err(PowerStatsError::UnsupportedFormat {
                    extension: ext.to_string(),
                });
            }
        };

        Ok(Self {
            materialized,
            file_path: path.to_path_buf(),
        })
    }

    pub fn height(&self) -> usize {
        self.materialized.height()
    }

    /// Get all column names
    pub fn column_names(&self) -> Vec<String> {
        self.materialized
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// First column whose (trimmed) name is one of `aliases`
    fn find_column(&self, aliases: &[&str]) -> Result<&polars::prelude::Series> {
        let names = self.column_names();
        let name = aliases
            .iter()
            .find_map(|alias| names.iter().find(|n| n.trim() == *alias))
            .ok_or_else(|| PowerStatsError::ColumnNotFound {
                column: aliases.join(" / "),
            })?;
        Ok(self.materialized.column(name)?.as_materialized_series())
    }

    /// Time/power pairs; rows with an unreadable timestamp or missing power are skipped
    pub fn samples(&self) -> Result<Vec<Sample>> {
        profiling::scope!("extract_samples");

        let times = column_as_datetime(self.find_column(TIME_COLUMNS)?)?;
        let power_series = self.find_column(POWER_COLUMNS)?.cast(&DataType::Float64)?;
        let power = power_series.f64()?;

        let samples: Vec<Sample> = times
            .into_iter()
            .zip(power.into_iter())
            .filter_map(|(t, p)| Some((t?, p?)))
            .collect();

        let skipped = self.height() - samples.len();
        if skipped > 0 {
            tracing::debug!(
                "Skipped {} of {} rows in {}",
                skipped,
                self.height(),
                self.file_path.display()
            );
        }

        Ok(samples)
    }
}

/// Interpret a column as timestamps, whatever type polars inferred for it
fn column_as_datetime(series: &polars::prelude::Series) -> Result<Vec<Option<NaiveDateTime>>> {
    let values = match series.dtype() {
        DataType::Datetime(unit, _) => {
            let unit = *unit;
            series
                .datetime()?
                .into_iter()
                .map(|opt| opt.and_then(|ts| from_epoch(ts, unit)))
                .collect()
        }
        DataType::Date => series
            .date()?
            .into_iter()
            .map(|opt| {
                opt.and_then(|days| NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE))
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
            .collect(),
        _ => {
            let text = series.cast(&DataType::String)?;
            text.str()?
                .into_iter()
                .map(|opt| opt.and_then(parse_timestamp))
                .collect()
        }
    };
    Ok(values)
}

/// Decode raw file bytes to text
///
/// A byte order mark decides the encoding. Without one, valid UTF-8 is kept
/// and anything else is read as GB18030, the superset of GBK that Chinese
/// metering exports use.
fn decode_text(bytes: &[u8]) -> Result<(Cow<'_, str>, &'static Encoding)> {
    let encoding = match Encoding::for_bom(bytes) {
        Some((encoding, _)) => encoding,
        None if std::str::from_utf8(bytes).is_ok() => UTF_8,
        None => GB18030,
    };

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(PowerStatsError::Encoding(used.name().to_string()));
    }
    Ok((text, used))
}

fn from_epoch(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let dt = match unit {
        TimeUnit::Nanoseconds => Some(DateTime::<Utc>::from_timestamp_nanos(value)),
        TimeUnit::Microseconds => DateTime::<Utc>::from_timestamp_micros(value),
        TimeUnit::Milliseconds => DateTime::<Utc>::from_timestamp_millis(value),
    };
    dt.map(|d| d.naive_utc())
}

/// Parse a textual timestamp in any of the accepted layouts
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{}", contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_english_headers() {
        let file = csv("time,active_power\n2023-01-05 10:00:00,1.5\n2023-01-05 10:15:00,2.5\n");
        let ds = DataSource::load(file.path()).unwrap();
        assert_eq!(ds.height(), 2);

        let samples = ds.samples().unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].0, parse_timestamp("2023-01-05 10:00:00").unwrap());
        assert_eq!(samples[1].1, 2.5);
    }

    #[test]
    fn test_load_localized_headers() {
        let file = csv("日期,瞬时有功\n2023/03/01 08:00,4\n2023/03/01 08:15,5\n");
        let ds = DataSource::load(file.path()).unwrap();
        let samples = ds.samples().unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].0, parse_timestamp("2023-03-01 08:15:00").unwrap());
        assert_eq!(samples[0].1, 4.0);
    }

    #[test]
    fn test_load_gbk_encoded_csv() {
        let (bytes, _, unmappable) = encoding_rs::GBK.encode("日期,瞬时有功\n2023-01-05 10:00:00,1.5\n");
        assert!(!unmappable);
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(&bytes).unwrap();
        file.flush().unwrap();

        let samples = DataSource::load(file.path()).unwrap().samples().unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].0, parse_timestamp("2023-01-05 10:00:00").unwrap());
        assert_eq!(samples[0].1, 1.5);
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let file = csv("\u{feff}日期,瞬时有功\n2023-01-05 10:00:00,2\n");
        let samples = DataSource::load(file.path()).unwrap().samples().unwrap();
        assert_eq!(samples[0].1, 2.0);
    }

    #[test]
    fn test_decode_text_keeps_utf8() {
        let (text, encoding) = decode_text("时间,有功功率".as_bytes()).unwrap();
        assert_eq!(encoding, UTF_8);
        assert_eq!(text, "时间,有功功率");
    }

    #[test]
    fn test_rows_with_missing_power_are_skipped() {
        let file = csv("time,active_power\n2023-01-05 10:00:00,1.5\n2023-01-05 10:15:00,\n");
        let ds = DataSource::load(file.path()).unwrap();
        assert_eq!(ds.samples().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_column() {
        let file = csv("time,reactive\n2023-01-05 10:00:00,1.5\n");
        let ds = DataSource::load(file.path()).unwrap();
        let err = ds.samples().unwrap_err();
        assert!(matches!(err, PowerStatsError::ColumnNotFound { .. }));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = Builder::new().suffix(".xlsx").tempfile().unwrap();
        let err = DataSource::load(file.path()).err().unwrap();
        assert!(matches!(
            err,
            PowerStatsError::UnsupportedFormat { ref extension } if extension == "xlsx"
        ));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2024-01-15 14:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-15T14:30:00"), Some(expected));
        assert_eq!(parse_timestamp(" 2024/01/15 14:30 "), Some(expected));
        assert_eq!(parse_timestamp("15.01.2024"), None);
    }

    #[test]
    fn test_epoch_units() {
        let expected = parse_timestamp("2024-01-15 14:30:00").unwrap();
        let secs = expected.and_utc().timestamp();
        assert_eq!(from_epoch(secs * 1_000, TimeUnit::Milliseconds), Some(expected));
        assert_eq!(from_epoch(secs * 1_000_000, TimeUnit::Microseconds), Some(expected));
        assert_eq!(from_epoch(secs * 1_000_000_000, TimeUnit::Nanoseconds), Some(expected));
    }
}
