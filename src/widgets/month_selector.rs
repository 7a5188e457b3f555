//! Month filter selector widget

use crate::data::MonthFilter;
use egui::{ComboBox, Response, Ui};

/// Drop-down with the thirteen month options
pub struct MonthSelector<'a> {
    selected: &'a mut MonthFilter,
}

impl<'a> MonthSelector<'a> {
    pub fn new(selected: &'a mut MonthFilter) -> Self {
        Self { selected }
    }

    /// Show the selector; the response is marked changed on a new pick
    pub fn show(self, ui: &mut Ui) -> Response {
        let before = *self.selected;
        let mut response = ComboBox::from_label("Month")
            .selected_text(self.selected.label())
            .show_ui(ui, |ui| {
                for option in MonthFilter::options() {
                    ui.selectable_value(self.selected, option, option.label());
                }
            })
            .response;

        if *self.selected != before {
            response.mark_changed();
        }
        response
    }
}
