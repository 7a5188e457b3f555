use chrono::{DateTime, Utc};
use eframe::egui;
use egui_extras::{Size, StripBuilder};
use egui_plot::{Corner, Legend, Line, Plot, Points};

use super::stats_panel::render_stats_panel;
use crate::app::PowerStats;
use crate::chart::{AxisFormat, ChartGroup, TraceKind};
use crate::constants::layout::{MARKER_RADIUS, MIN_PLOT_HEIGHT, STATS_PANEL_HEIGHT};
use crate::data::stats::calculate_stats;
use crate::state::ChartTab;

/// Render the tab bar and the active chart group
pub fn render_charts(app: &mut PowerStats, ui: &mut egui::Ui) {
    profiling::scope!("render_charts");

    let copy_clicked = render_tab_bar(app, ui);
    ui.separator();

    if app.state.is_loading() {
        ui.centered_and_justified(|ui| {
            ui.spinner();
        });
        return;
    }

    let tab = app.state.view.active_tab;
    let show_grid = app.state.view.show_grid;
    let show_legend = app.state.view.show_legend;
    let show_stats = app.state.view.show_stats_panel;
    let reset = std::mem::take(&mut app.state.view.reset_bounds);
    let stats_key = (app.state.chart_key(), tab);

    let (charts, ui_state) = app.state.charts_and_ui();
    let group = match tab {
        ChartTab::Power => &charts.power,
        ChartTab::Energy => &charts.work,
    };
    let clipboard_text = copy_clicked.then(|| group.to_csv());

    if show_stats && ui_state.cached_stats(stats_key).is_none() {
        let stats = group.traces.iter().map(|t| calculate_stats(&t.y)).collect();
        ui_state.cache_stats(stats_key, stats);
    }
    let stats = if show_stats {
        ui_state.cached_stats(stats_key)
    } else {
        None
    };

    let mut strip = StripBuilder::new(ui).size(Size::remainder().at_least(MIN_PLOT_HEIGHT));
    if stats.is_some() {
        strip = strip.size(Size::exact(STATS_PANEL_HEIGHT));
    }
    strip.vertical(|mut strip| {
        strip.cell(|ui| {
            render_group(ui, tab, group, show_grid, show_legend, reset);
        });
        if let Some(stats) = stats {
            strip.cell(|ui| {
                render_stats_panel(ui, group, stats);
            });
        }
    });

    if let Some(text) = clipboard_text {
        app.copy_to_clipboard(text, tab.label());
    }
}

/// Returns whether "Copy data" was clicked
fn render_tab_bar(app: &mut PowerStats, ui: &mut egui::Ui) -> bool {
    let view = &mut app.state.view;
    let loading = app.state.load.is_loading();

    ui.horizontal(|ui| {
        for tab in ChartTab::ALL {
            if ui
                .selectable_label(view.active_tab == tab, tab.label())
                .clicked()
            {
                view.select_tab(tab);
            }
        }

        ui.separator();
        ui.checkbox(&mut view.show_legend, "Legend");
        ui.checkbox(&mut view.show_grid, "Grid");
        ui.checkbox(&mut view.show_stats_panel, "Stats");

        if ui.button("Reset view").on_hover_text("R").clicked() {
            view.reset_plot_bounds();
        }

        ui.add_enabled(!loading, egui::Button::new("Copy data"))
            .on_hover_text("Copy the visible chart as CSV")
            .clicked()
    })
    .inner
}

fn render_group(
    ui: &mut egui::Ui,
    tab: ChartTab,
    group: &ChartGroup,
    show_grid: bool,
    show_legend: bool,
    reset: bool,
) {
    let axis = group.axis;

    let mut plot = Plot::new(("chart", tab))
        .show_grid(show_grid)
        .height(ui.available_height().max(MIN_PLOT_HEIGHT));

    if reset {
        plot = plot.reset();
    }

    if show_legend {
        plot = plot.legend(Legend::default().position(Corner::RightTop));
    }

    plot = plot
        .x_axis_formatter(move |mark, _range| {
            format_axis_time(mark.value, axis).unwrap_or_else(|| format!("{:.0}", mark.value))
        })
        .label_formatter(move |name, value| match format_axis_time(value.x, axis) {
            Some(time) if name.is_empty() => format!("{}\n{:.2}", time, value.y),
            Some(time) => format!("{}\n{}\n{:.2}", name, time, value.y),
            None => format!("x: {:.3}\ny: {:.2}", value.x, value.y),
        });

    plot.show(ui, |plot_ui| {
        for (idx, trace) in group.traces.iter().enumerate() {
            let color = PowerStats::series_color(idx);
            match trace.kind {
                TraceKind::LinesMarkers => {
                    plot_ui.line(Line::new(trace.name.as_str(), trace.points().to_vec()).color(color));
                    plot_ui.points(
                        Points::new(trace.name.as_str(), trace.points().to_vec())
                            .radius(MARKER_RADIUS)
                            .color(color),
                    );
                }
            }
        }
    });
}

/// Unix seconds as an axis label in the group's format
fn format_axis_time(seconds: f64, axis: AxisFormat) -> Option<String> {
    let dt = DateTime::<Utc>::from_timestamp(seconds.floor() as i64, 0)?;
    Some(dt.format(axis.pattern()).to_string())
}
