//! The compute call: form parameters in, power and energy records out
//!
//! [`SeriesBackend`] is the seam the request pipeline talks to. Two backends
//! ship with the application: [`LocalBackend`] computes in-process from the
//! source file, [`ProcessBackend`] delegates to an external program over JSON.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

use super::series::{PowerRecords, Series, WorkRecords};
use super::source::{DataSource, Sample};
use super::tariff::{Period, PeriodCategory};
use crate::constants::datetime::{DATE_FORMAT, DATETIME_FORMAT};
use crate::constants::source::SAMPLE_MINUTES;
use crate::error::{PowerStatsError, Result};

/// Input of the compute call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRequest {
    pub rated_capacity: f64,
    pub is_primary_load: bool,
    pub factor: Option<f64>,
    pub filepath: PathBuf,
}

/// Output of a successful compute call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildResponse {
    pub p: PowerRecords,
    pub w: WorkRecords,
}

impl BuildResponse {
    /// Decode and validate a JSON response
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| PowerStatsError::Decode(e.to_string()))
    }
}

/// Anything that can turn a request into records
pub trait SeriesBackend: Send + Sync {
    fn build_series(&self, request: &BuildRequest) -> Result<BuildResponse>;
}

/// Computes the records in-process from a CSV or Parquet metering file
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalBackend;

impl SeriesBackend for LocalBackend {
    fn build_series(&self, request: &BuildRequest) -> Result<BuildResponse> {
        profiling::scope!("local_build_series");

        let factor = if request.is_primary_load {
            request.factor.ok_or_else(|| {
                PowerStatsError::Validation("factor is required for primary load".to_string())
            })?
        } else {
            1.0
        };

        let source = DataSource::load(&request.filepath)?;
        let samples = source.samples()?;
        let grid = resample(&samples, factor).ok_or(PowerStatsError::EmptyDataset)?;
        log_category_summary(&grid);

        Ok(BuildResponse {
            p: build_power_records(&grid, request.rated_capacity),
            w: build_work_records(&grid),
        })
    }
}

/// Delegates to an external program: request JSON on stdin, response JSON on stdout
#[derive(Debug, Clone)]
pub struct ProcessBackend {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl SeriesBackend for ProcessBackend {
    fn build_series(&self, request: &BuildRequest) -> Result<BuildResponse> {
        let payload = serde_json::to_vec(request)?;
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(&payload) {
                drop(stdin);
                self.reap(&mut child);
                return Err(e.into());
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PowerStatsError::Compute(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        BuildResponse::decode(&output.stdout)
    }
}

impl ProcessBackend {
    /// Stop and wait on a child whose exchange was abandoned
    fn reap(&self, child: &mut Child) {
        if let Err(e) = child.kill() {
            tracing::debug!("Killing {} failed: {}", self.program.display(), e);
        }
        match child.wait() {
            Ok(status) => tracing::debug!("{} stopped early with {}", self.program.display(), status),
            Err(e) => tracing::warn!("Waiting on {} failed: {}", self.program.display(), e),
        }
    }
}

/// Place samples on the fixed sampling grid starting at the earliest timestamp.
/// Empty slots read 0.0; every value is scaled by `factor`.
pub fn resample(samples: &[Sample], factor: f64) -> Option<Vec<Sample>> {
    let start = samples.iter().map(|(t, _)| *t).min()?;
    let end = samples.iter().map(|(t, _)| *t).max()?;
    let step = Duration::minutes(SAMPLE_MINUTES);

    let slots = ((end - start).num_minutes() / SAMPLE_MINUTES) as usize + 1;
    let mut power = vec![0.0; slots];
    for (t, v) in samples {
        let idx = ((*t - start).num_minutes() / SAMPLE_MINUTES) as usize;
        power[idx] = v * factor;
    }

    Some(
        power
            .into_iter()
            .enumerate()
            .map(|(i, v)| (start + step * i as i32, v))
            .collect(),
    )
}

/// Instantaneous power per period plus the valley margins against `rated_capacity`
pub fn build_power_records(grid: &[Sample], rated_capacity: f64) -> PowerRecords {
    let mut eo = Vec::new();
    let mut mp = Vec::new();
    let mut no = Vec::new();
    let mut np = Vec::new();
    let mut er = Vec::new();
    let mut nr = Vec::new();

    for (t, p) in grid {
        let ts = t.format(DATETIME_FORMAT).to_string();
        match Period::of(t) {
            Some(Period::EveningValley) => {
                er.push((ts.clone(), rated_capacity - p));
                eo.push((ts, *p));
            }
            Some(Period::MorningPeak) => mp.push((ts, *p)),
            Some(Period::MiddayValley) => {
                nr.push((ts.clone(), rated_capacity - p));
                no.push((ts, *p));
            }
            Some(Period::MiddayPeak) => np.push((ts, *p)),
            None => {}
        }
    }

    PowerRecords {
        eo: Series::from_points(eo),
        mp: Series::from_points(mp),
        no: Series::from_points(no),
        np: Series::from_points(np),
        er: Series::from_points(er),
        nr: Series::from_points(nr),
    }
}

/// Daily energy over the two peak periods
pub fn build_work_records(grid: &[Sample]) -> WorkRecords {
    let hours_per_sample = SAMPLE_MINUTES as f64 / 60.0;
    let mut morning: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut midday: BTreeMap<NaiveDate, f64> = BTreeMap::new();

    for (t, p) in grid {
        let bucket = match Period::of(t) {
            Some(Period::MorningPeak) => &mut morning,
            Some(Period::MiddayPeak) => &mut midday,
            _ => continue,
        };
        *bucket.entry(t.date()).or_insert(0.0) += p * hours_per_sample;
    }

    let daily = |days: BTreeMap<NaiveDate, f64>| {
        Series::from_points(
            days.into_iter()
                .map(|(d, e)| (d.format(DATE_FORMAT).to_string(), e)),
        )
    };

    WorkRecords {
        m: daily(morning),
        n: daily(midday),
    }
}

fn log_category_summary(grid: &[(NaiveDateTime, f64)]) {
    let mut counts: HashMap<PeriodCategory, usize> = HashMap::new();
    for (t, _) in grid {
        *counts.entry(PeriodCategory::of(t)).or_insert(0) += 1;
    }
    tracing::debug!(
        "Resampled {} points: peak={} off_peak={} sharp={} other={}",
        grid.len(),
        counts.get(&PeriodCategory::Peak).copied().unwrap_or(0),
        counts.get(&PeriodCategory::OffPeak).copied().unwrap_or(0),
        counts.get(&PeriodCategory::Sharp).copied().unwrap_or(0),
        counts.get(&PeriodCategory::Other).copied().unwrap_or(0),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::source::parse_timestamp;
    use std::io::Write;
    use tempfile::Builder;

    fn t(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    #[test]
    fn test_resample_fills_gaps_and_scales() {
        let samples = vec![
            (t("2023-01-05 00:30:00"), 2.0),
            (t("2023-01-05 00:00:00"), 1.0),
        ];
        let grid = resample(&samples, 10.0).unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0], (t("2023-01-05 00:00:00"), 10.0));
        assert_eq!(grid[1], (t("2023-01-05 00:15:00"), 0.0));
        assert_eq!(grid[2], (t("2023-01-05 00:30:00"), 20.0));

        assert!(resample(&[], 1.0).is_none());
    }

    #[test]
    fn test_power_records_by_period() {
        let grid = vec![
            (t("2023-01-05 07:45:00"), 3.0),
            (t("2023-01-05 09:00:00"), 5.0),
            (t("2023-01-05 12:00:00"), 4.0),
            (t("2023-01-05 14:00:00"), 6.0),
            (t("2023-01-05 20:00:00"), 9.0),
        ];
        let p = build_power_records(&grid, 10.0);

        assert_eq!(p.eo.timestamps(), &["2023-01-05 07:45:00".to_string()]);
        assert_eq!(p.eo.values(), &[3.0]);
        assert_eq!(p.er.values(), &[7.0]);
        assert_eq!(p.mp.values(), &[5.0]);
        assert_eq!(p.no.values(), &[4.0]);
        assert_eq!(p.nr.values(), &[6.0]);
        assert_eq!(p.np.values(), &[6.0]);
        assert_eq!(p.point_count(), 6);
    }

    #[test]
    fn test_work_records_are_daily_energy() {
        let grid = vec![
            (t("2023-01-05 08:00:00"), 4.0),
            (t("2023-01-05 08:15:00"), 8.0),
            (t("2023-01-05 13:00:00"), 2.0),
            (t("2023-01-06 09:00:00"), 4.0),
        ];
        let w = build_work_records(&grid);

        assert_eq!(
            w.m.timestamps(),
            &["2023-01-05".to_string(), "2023-01-06".to_string()]
        );
        assert_eq!(w.m.values(), &[3.0, 1.0]);
        assert_eq!(w.n.timestamps(), &["2023-01-05".to_string()]);
        assert_eq!(w.n.values(), &[0.5]);
    }

    #[test]
    fn test_local_backend_end_to_end() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "time,active_power").unwrap();
        writeln!(file, "2023-01-05 07:45:00,1").unwrap();
        writeln!(file, "2023-01-05 08:00:00,2").unwrap();
        writeln!(file, "2023-02-05 08:00:00,3").unwrap();
        file.flush().unwrap();

        let request = BuildRequest {
            rated_capacity: 100.0,
            is_primary_load: true,
            factor: Some(2.0),
            filepath: file.path().to_path_buf(),
        };
        let response = LocalBackend.build_series(&request).unwrap();

        assert_eq!(response.p.eo.timestamps()[0], "2023-01-05 07:45:00");
        assert_eq!(response.p.eo.values()[0], 2.0);
        assert_eq!(response.p.er.values()[0], 98.0);
        // every day between the first and last sample carries a (possibly zero) total
        assert_eq!(response.w.m.len(), 32);
        assert_eq!(response.w.m.values()[0], 1.0);
        assert_eq!(response.w.m.values()[31], 1.5);
        assert_eq!(response.w.m.values()[1], 0.0);
    }

    #[test]
    fn test_local_backend_requires_factor_for_primary_load() {
        let request = BuildRequest {
            rated_capacity: 100.0,
            is_primary_load: true,
            factor: None,
            filepath: PathBuf::from("unused.csv"),
        };
        let err = LocalBackend.build_series(&request).unwrap_err();
        assert!(matches!(err, PowerStatsError::Validation(_)));
    }

    #[test]
    fn test_local_backend_empty_file() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "time,active_power").unwrap();
        file.flush().unwrap();

        let request = BuildRequest {
            rated_capacity: 1.0,
            is_primary_load: false,
            factor: None,
            filepath: file.path().to_path_buf(),
        };
        assert!(LocalBackend.build_series(&request).is_err());
    }

    #[test]
    fn test_request_wire_format() {
        let request = BuildRequest {
            rated_capacity: 630.0,
            is_primary_load: false,
            factor: None,
            filepath: PathBuf::from("/data/meter.csv"),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "ratedCapacity": 630.0,
                "isPrimaryLoad": false,
                "factor": null,
                "filepath": "/data/meter.csv",
            })
        );
    }

    #[test]
    fn test_decode_rejects_misaligned_series() {
        let body = br#"{"p": {"eo": {"x": ["a"], "y": []}, "mp": {"x": [], "y": []},
            "no": {"x": [], "y": []}, "np": {"x": [], "y": []}, "er": {"x": [], "y": []},
            "nr": {"x": [], "y": []}}, "w": {"m": {"x": [], "y": []}, "n": {"x": [], "y": []}}}"#;
        assert!(matches!(
            BuildResponse::decode(body),
            Err(PowerStatsError::Decode(_))
        ));

        assert!(matches!(
            BuildResponse::decode(b"{\"p\": {}}"),
            Err(PowerStatsError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_accepts_valid_response() {
        let body = serde_json::to_vec(&BuildResponse::default()).unwrap();
        assert_eq!(BuildResponse::decode(&body).unwrap(), BuildResponse::default());
    }

    #[cfg(unix)]
    #[test]
    fn test_process_backend() {
        let reply = serde_json::to_string(&BuildResponse::default()).unwrap();
        let backend = ProcessBackend {
            program: PathBuf::from("sh"),
            args: vec![
                "-c".to_string(),
                format!("cat > /dev/null; printf '%s' '{}'", reply),
            ],
        };
        let request = BuildRequest {
            rated_capacity: 1.0,
            is_primary_load: false,
            factor: None,
            filepath: PathBuf::from("meter.csv"),
        };
        assert_eq!(backend.build_series(&request).unwrap(), BuildResponse::default());

        let failing = ProcessBackend {
            program: PathBuf::from("sh"),
            args: vec!["-c".to_string(), "cat > /dev/null; echo bad file >&2; exit 3".to_string()],
        };
        let err = failing.build_series(&request).unwrap_err();
        assert!(matches!(err, PowerStatsError::Compute(ref msg) if msg.contains("bad file")));
    }

    #[cfg(unix)]
    #[test]
    fn test_process_backend_that_ignores_stdin() {
        // larger than any pipe buffer, so the write outlives the child
        let request = BuildRequest {
            rated_capacity: 1.0,
            is_primary_load: false,
            factor: None,
            filepath: PathBuf::from("m".repeat(8 * 1024 * 1024)),
        };
        let backend = ProcessBackend {
            program: PathBuf::from("sh"),
            args: vec!["-c".to_string(), "exit 0".to_string()],
        };
        let err = backend.build_series(&request).unwrap_err();
        assert!(matches!(
            err,
            PowerStatsError::FileIo(ref e) if e.kind() == std::io::ErrorKind::BrokenPipe
        ));
    }
}
