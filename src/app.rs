use eframe::egui::{self, CentralPanel};
use egui_extras::{Size, StripBuilder};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::AppConfig;
use crate::constants::layout::{FORM_HEIGHT, LOADING_REPAINT_MS, MIN_PLOT_HEIGHT};
use crate::error::Result;
use crate::request::RequestOrchestrator;
use crate::state::AppState;
use crate::ui;

pub struct PowerStats {
    pub state: AppState,
    pub orchestrator: RequestOrchestrator,
    config: AppConfig,
    config_path: PathBuf,
}

impl PowerStats {
    pub fn new(config: AppConfig, config_path: PathBuf) -> Self {
        Self {
            state: AppState::from_config(&config),
            orchestrator: RequestOrchestrator::new(config.backend.clone().into_backend()),
            config,
            config_path,
        }
    }

    /// Trace colors in slot order
    pub fn series_color(index: usize) -> egui::Color32 {
        let colors = [
            egui::Color32::from_rgb(31, 119, 180),  // Blue
            egui::Color32::from_rgb(255, 127, 14),  // Orange
            egui::Color32::from_rgb(44, 160, 44),   // Green
            egui::Color32::from_rgb(214, 39, 40),   // Red
            egui::Color32::from_rgb(148, 103, 189), // Purple
            egui::Color32::from_rgb(140, 86, 75),   // Brown
        ];
        colors[index % colors.len()]
    }

    /// Validate the form and start a computation
    ///
    /// Field errors and worker failures are already shown by the UI state.
    pub fn submit(&mut self) {
        match self.orchestrator.submit(&mut self.state) {
            Ok(id) => tracing::debug!("Awaiting request {}", id.0),
            Err(e) => tracing::debug!("Submission not started: {}", e),
        }
    }

    /// Persist the current theme and month filter
    pub fn save_settings(&mut self) {
        self.config.dark_mode = self.state.view.dark_mode;
        self.config.month = self.state.filters.month();

        match self.config.save(&self.config_path) {
            Ok(()) => {
                tracing::info!("Settings saved to {}", self.config_path.display());
                self.state.ui.notify("Settings", "Saved");
            }
            Err(e) => {
                tracing::warn!("Saving settings failed: {}", e);
                self.state.ui.notify_error(&e);
            }
        }
    }

    /// Put `text` on the system clipboard
    pub fn copy_to_clipboard(&mut self, text: String, what: &str) {
        match set_clipboard(text) {
            Ok(()) => self.state.ui.notify("Copied", format!("{} data copied as CSV", what)),
            Err(e) => {
                tracing::warn!("Clipboard copy failed: {}", e);
                self.state.ui.notify_error(&e);
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        // keys typed into form fields are not shortcuts
        if ctx.wants_keyboard_input() {
            return;
        }

        ctx.input(|i| {
            if i.key_pressed(egui::Key::Escape) {
                self.state.view.show_settings = false;
            }
            if i.key_pressed(egui::Key::T) {
                self.state.view.toggle_dark_mode();
            }
            if i.key_pressed(egui::Key::R) {
                self.state.view.reset_plot_bounds();
            }
        });
    }
}

fn set_clipboard(text: String) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text)?;
    Ok(())
}

impl eframe::App for PowerStats {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        profiling::finish_frame!();

        self.orchestrator.poll(&mut self.state);
        if self.state.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(LOADING_REPAINT_MS));
        }

        // Set theme
        if self.state.view.dark_mode {
            ctx.set_visuals(egui::Visuals::dark());
        } else {
            ctx.set_visuals(egui::Visuals::light());
        }

        self.handle_shortcuts(ctx);

        // Side and bottom panels go before the central panel
        ui::render_settings_drawer(self, ctx);
        ui::render_status_bar(self, ctx);

        CentralPanel::default().show(ctx, |ui| {
            StripBuilder::new(ui)
                .size(Size::initial(FORM_HEIGHT))
                .size(Size::remainder().at_least(MIN_PLOT_HEIGHT))
                .vertical(|mut strip| {
                    strip.cell(|ui| {
                        ui::render_form(self, ctx, ui);
                    });
                    strip.cell(|ui| {
                        ui::render_charts(self, ui);
                    });
                });
        });

        ui::render_notifications(self, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormField;

    #[test]
    fn test_invalid_submit_surfaces_field_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = PowerStats::new(AppConfig::default(), dir.path().join("power-stats.json"));
        app.state.form.filepath.clear();

        app.submit();
        assert!(!app.state.is_loading());
        assert_eq!(app.state.ui.field_error(FormField::Filepath), Some("Choose a source file"));
        assert!(app.state.ui.notifications().is_empty());
    }
}
