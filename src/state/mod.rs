//! Application state management
//!
//! Everything the UI reads or mutates lives in [`AppState`], owned by the app
//! and passed down by `&mut` on the UI thread.

mod dataset;
mod filters;
mod form;
mod load;
mod ui;
mod view;

pub use dataset::DatasetHolder;
pub use filters::FilterState;
pub use form::{FilePick, FormDraft};
pub use load::LoadState;
pub use ui::UiState;
pub use view::{ChartTab, ViewState};

use crate::chart::Charts;
use crate::config::AppConfig;
use crate::perf::{CacheKey, ChartCache};

/// Main application state container
#[derive(Default)]
pub struct AppState {
    /// Records of the last successful computation
    pub dataset: DatasetHolder,

    /// Global month filter
    pub filters: FilterState,

    /// Submission form as typed
    pub form: FormDraft,

    /// View and visualization state
    pub view: ViewState,

    /// Notifications and inline errors
    pub ui: UiState,

    pub load: LoadState,

    charts: ChartCache,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            filters: FilterState::new(config.month),
            form: config.form.draft(),
            view: ViewState {
                dark_mode: config.dark_mode,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.load.is_loading()
    }

    /// Key of the charts for the current dataset and filter
    pub fn chart_key(&self) -> CacheKey {
        (self.dataset.version(), self.filters.month())
    }

    /// Charts for the current dataset and filter, rebuilt only when either changed
    pub fn charts(&mut self) -> &Charts {
        self.charts_and_ui().0
    }

    /// [`Self::charts`] together with the UI state, for renderers that report back
    pub fn charts_and_ui(&mut self) -> (&Charts, &mut UiState) {
        let key = self.chart_key();
        let dataset = &self.dataset;
        let charts = self
            .charts
            .get_or_compute(key, || Charts::build(dataset.power(), dataset.work(), key.1));
        (charts, &mut self.ui)
    }
}
