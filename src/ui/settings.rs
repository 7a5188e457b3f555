use eframe::egui;

use crate::app::PowerStats;
use crate::constants::layout::DRAWER_WIDTH;
use crate::widgets::MonthSelector;

/// Render the settings drawer on the left edge
pub fn render_settings_drawer(app: &mut PowerStats, ctx: &egui::Context) {
    let open = app.state.view.show_settings;

    egui::SidePanel::left("settings_drawer")
        .resizable(false)
        .exact_width(DRAWER_WIDTH)
        .show_animated(ctx, open, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Options");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("✕").on_hover_text("Esc").clicked() {
                        app.state.view.show_settings = false;
                    }
                });
            });
            ui.separator();

            let mut month = app.state.filters.month();
            if MonthSelector::new(&mut month).show(ui).changed() {
                app.state.filters.set_month(month);
            }

            ui.checkbox(&mut app.state.view.dark_mode, "Dark mode")
                .on_hover_text("T");

            ui.separator();
            if ui.button("Save settings").clicked() {
                app.save_settings();
            }
        });
}
