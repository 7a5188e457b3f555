use eframe::egui;

use crate::app::PowerStats;
use crate::chart::ChartGroup;
use crate::data::Stats;

/// Render the statistics summary for each trace of a chart group
pub fn render_stats_panel(ui: &mut egui::Ui, group: &ChartGroup, stats: &[Stats]) {
    egui::ScrollArea::horizontal().show(ui, |ui| {
        ui.horizontal_top(|ui| {
            for (series_idx, (trace, stats)) in group.traces.iter().zip(stats).enumerate() {
                let color = PowerStats::series_color(series_idx);

                ui.group(|ui| {
                    ui.set_min_width(180.0);

                    // Header with name and copy button
                    ui.horizontal(|ui| {
                        ui.colored_label(color, format!("● {}", trace.name));
                        if ui.small_button("📋").on_hover_text("Copy stats").clicked() {
                            ui.ctx().copy_text(stats_text(&trace.name, stats));
                        }
                    });

                    if stats.count == 0 {
                        ui.weak("No points");
                        return;
                    }

                    ui.label(format!("n={}", stats.count));
                    ui.horizontal(|ui| {
                        ui.label(format!("Min: {:.2}", stats.min));
                        ui.separator();
                        ui.label(format!("Max: {:.2}", stats.max));
                    });
                    ui.horizontal(|ui| {
                        ui.label(format!("μ={:.2}", stats.mean));
                        ui.separator();
                        ui.label(format!("Med={:.2}", stats.median));
                    });
                    ui.label(format!("Σ={:.2}", stats.sum));
                });
            }
        });
    });
}

fn stats_text(name: &str, stats: &Stats) -> String {
    format!(
        "{}\nCount: {}\nMin: {:.4}\nMax: {:.4}\nMean: {:.4}\nMedian: {:.4}\nSum: {:.4}",
        name, stats.count, stats.min, stats.max, stats.mean, stats.median, stats.sum
    )
}
