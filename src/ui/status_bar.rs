use eframe::egui;

use crate::app::PowerStats;
use crate::constants::layout::STATUS_BAR_HEIGHT;

/// Render the status bar along the bottom edge
pub fn render_status_bar(app: &mut PowerStats, ctx: &egui::Context) {
    let month = app.state.filters.month();
    let loading = app.state.is_loading();
    let version = app.state.dataset.version();
    let (power_points, work_points) = {
        let charts = app.state.charts();
        (charts.power.point_count(), charts.work.point_count())
    };

    egui::TopBottomPanel::bottom("status_bar")
        .exact_height(STATUS_BAR_HEIGHT)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                if loading {
                    ui.spinner();
                    ui.label("Computing…");
                    ui.separator();
                }
                ui.label(format!("Month: {}", month.label()));
                ui.separator();
                ui.label(format!("Power points: {} | Energy points: {}", power_points, work_points));
                if version > 0 {
                    ui.separator();
                    ui.weak(format!("Dataset #{}", version));
                }
            });
        });
}
