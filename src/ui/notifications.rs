use eframe::egui;

use crate::app::PowerStats;

/// Render queued notifications as dismissable toasts in the bottom-right corner
pub fn render_notifications(app: &mut PowerStats, ctx: &egui::Context) {
    if app.state.ui.notifications().is_empty() {
        return;
    }

    let mut dismissed = None;
    egui::Area::new(egui::Id::new("notifications"))
        .anchor(egui::Align2::RIGHT_BOTTOM, [-12.0, -32.0])
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            for (idx, note) in app.state.ui.notifications().iter().enumerate() {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_max_width(320.0);
                    ui.horizontal(|ui| {
                        ui.strong(&note.title);
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.small_button("✕").clicked() {
                                dismissed = Some(idx);
                            }
                        });
                    });
                    ui.label(&note.message);
                });
                ui.add_space(4.0);
            }
        });

    if let Some(idx) = dismissed {
        app.state.ui.dismiss(idx);
    }
}
