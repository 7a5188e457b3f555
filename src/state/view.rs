//! View and visualization state

use serde::{Deserialize, Serialize};

/// Which chart group is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChartTab {
    #[default]
    Power,
    Energy,
}

impl ChartTab {
    pub const ALL: [ChartTab; 2] = [ChartTab::Power, ChartTab::Energy];

    pub fn label(self) -> &'static str {
        match self {
            ChartTab::Power => "Power",
            ChartTab::Energy => "Energy",
        }
    }
}

/// View state manages display options
#[derive(Debug, Clone)]
pub struct ViewState {
    pub active_tab: ChartTab,

    /// Dark mode theme toggle
    pub dark_mode: bool,

    /// Settings drawer visibility
    pub show_settings: bool,

    /// Grid visibility
    pub show_grid: bool,

    /// Legend visibility
    pub show_legend: bool,

    /// Statistics panel visibility
    pub show_stats_panel: bool,

    /// Reset zoom bounds flag
    pub reset_bounds: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            active_tab: ChartTab::default(),
            dark_mode: true,
            show_settings: false,
            show_grid: true,
            show_legend: true,
            show_stats_panel: false,
            reset_bounds: false,
        }
    }
}

impl ViewState {
    /// Reset plot bounds on next frame
    pub fn reset_plot_bounds(&mut self) {
        self.reset_bounds = true;
    }

    /// Toggle dark mode
    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }

    pub fn select_tab(&mut self, tab: ChartTab) {
        if self.active_tab != tab {
            self.active_tab = tab;
            self.reset_bounds = true;
        }
    }
}
