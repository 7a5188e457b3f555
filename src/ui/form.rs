use eframe::egui;
use std::path::PathBuf;

use crate::app::PowerStats;
use crate::error::FormField;
use crate::state::FilePick;

/// Render the submission form
pub fn render_form(app: &mut PowerStats, ctx: &egui::Context, ui: &mut egui::Ui) {
    let loading = app.state.is_loading();
    let mut confirm = false;

    {
        let form = &mut app.state.form;
        let errors = &app.state.ui;
        let view = &mut app.state.view;
        let factor_enabled = form.factor_enabled();

        egui::Grid::new("submission_form")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                ui.label("Rated capacity (kVA)");
                ui.vertical(|ui| {
                    ui.add_enabled(
                        !loading,
                        egui::TextEdit::singleline(&mut form.rated_capacity).desired_width(160.0),
                    );
                    field_error(ui, errors.field_error(FormField::RatedCapacity));
                });
                ui.end_row();

                ui.label("Primary load");
                ui.vertical(|ui| {
                    ui.add_enabled_ui(!loading, |ui| {
                        ui.horizontal(|ui| {
                            ui.radio_value(&mut form.is_primary_load, Some(true), "Yes");
                            ui.radio_value(&mut form.is_primary_load, Some(false), "No");
                        });
                    });
                    field_error(ui, errors.field_error(FormField::IsPrimaryLoad));
                });
                ui.end_row();

                ui.label("Factor");
                ui.vertical(|ui| {
                    ui.add_enabled(
                        !loading && factor_enabled,
                        egui::TextEdit::singleline(&mut form.factor).desired_width(160.0),
                    )
                    .on_disabled_hover_text("Only used for a primary load");
                    field_error(ui, errors.field_error(FormField::Factor));
                });
                ui.end_row();

                ui.label("Source file");
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.add_enabled(
                            !loading,
                            egui::TextEdit::singleline(&mut form.filepath)
                                .hint_text("CSV or Parquet")
                                .desired_width(320.0),
                        );
                        if ui
                            .add_enabled(!loading, egui::Button::new("…"))
                            .on_hover_text("Browse")
                            .clicked()
                        {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("Data Files", &["csv", "parquet"])
                                .pick_file()
                            {
                                form.apply_pick(FilePick::Single(path));
                            }
                        }
                    });
                    field_error(ui, errors.field_error(FormField::Filepath));
                });
                ui.end_row();
            });

        ui.horizontal(|ui| {
            if ui.button("Options").clicked() {
                view.show_settings = true;
            }
            confirm = ui
                .add_enabled(!loading, egui::Button::new("Confirm"))
                .clicked();
            if loading {
                ui.spinner();
                ui.label("Computing…");
            }
        });
    }

    // Dropped files fill the path field; several at once use the first
    if !loading {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if !dropped.is_empty() {
            app.state.form.apply_pick(FilePick::Many(dropped));
        }
    }

    if confirm {
        app.submit();
    }
}

fn field_error(ui: &mut egui::Ui, message: Option<&str>) {
    if let Some(message) = message {
        ui.colored_label(ui.visuals().error_fg_color, message);
    }
}
