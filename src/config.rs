//! Application configuration persisted as JSON

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::constants::config::DEFAULT_LOG_FILTER;
use crate::constants::form::{DEFAULT_FACTOR, DEFAULT_IS_PRIMARY_LOAD};
use crate::data::{LocalBackend, MonthFilter, ProcessBackend, SeriesBackend};
use crate::error::{PowerStatsError, Result};
use crate::state::FormDraft;

/// Which compute backend the worker runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
    #[default]
    Local,
    Process {
        program: PathBuf,
        #[serde(default)]
        args: Vec<String>,
    },
}

impl BackendConfig {
    pub fn into_backend(self) -> Arc<dyn SeriesBackend> {
        match self {
            BackendConfig::Local => Arc::new(LocalBackend),
            BackendConfig::Process { program, args } => Arc::new(ProcessBackend { program, args }),
        }
    }
}

/// Initial values of the submission form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormDefaults {
    pub rated_capacity: Option<f64>,
    pub is_primary_load: bool,
    pub factor: Option<f64>,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            rated_capacity: None,
            is_primary_load: DEFAULT_IS_PRIMARY_LOAD,
            factor: Some(DEFAULT_FACTOR),
        }
    }
}

impl FormDefaults {
    pub fn draft(&self) -> FormDraft {
        let text = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
        FormDraft {
            rated_capacity: text(self.rated_capacity),
            is_primary_load: Some(self.is_primary_load),
            factor: text(self.factor),
            filepath: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub dark_mode: bool,
    /// Month filter applied at startup
    pub month: MonthFilter,
    /// `tracing` directive used when `RUST_LOG` is unset
    pub log_filter: String,
    pub backend: BackendConfig,
    pub form: FormDefaults,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dark_mode: true,
            month: MonthFilter::All,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            backend: BackendConfig::default(),
            form: FormDefaults::default(),
        }
    }
}

impl AppConfig {
    /// Read a config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| {
            PowerStatsError::Config(format!("{}: {}", path.display(), e))
        })
    }

    /// Read a config file, falling back to defaults when it is absent or broken.
    /// Runs before logging is set up, so problems go to stderr.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Ignoring config: {}", e.user_message());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}
