mod charts;
mod form;
mod notifications;
mod settings;
mod stats_panel;
mod status_bar;

pub use charts::render_charts;
pub use form::render_form;
pub use notifications::render_notifications;
pub use settings::render_settings_drawer;
pub use status_bar::render_status_bar;
