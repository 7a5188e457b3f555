//! Application-wide constants and default values
//!
//! This module centralizes all magic numbers and default values used throughout
//! the application, making them easier to maintain and configure.

/// Month selector options
pub mod months {
    /// Sentinel code meaning "no month filtering"
    pub const ALL_CODE: &str = "all";

    /// Byte offset of the month inside a `YYYY-MM-DD...` timestamp
    pub const MONTH_OFFSET: usize = 5;

    /// Width of the month field in characters
    pub const MONTH_WIDTH: usize = 2;
}

/// Source data layout consumed by the reference backend
pub mod source {
    /// Accepted names for the timestamp column
    pub const TIME_COLUMNS: &[&str] = &["time", "日期"];

    /// Accepted names for the instantaneous active power column
    pub const POWER_COLUMNS: &[&str] = &["active_power", "瞬时有功"];

    /// Sampling interval of the metering data, in minutes
    pub const SAMPLE_MINUTES: i64 = 15;

    /// Rows scanned by polars to infer column types
    pub const INFER_SCHEMA_ROWS: usize = 100;
}

/// Tariff period boundaries (hour of day, half-open ranges)
pub mod tariff {
    /// Evening valley ends at 08:00
    pub const EVENING_VALLEY_END: u32 = 8;

    /// Morning peak spans 08:00..11:00
    pub const MORNING_PEAK: (u32, u32) = (8, 11);

    /// Midday valley spans 11:00..13:00
    pub const MIDDAY_VALLEY: (u32, u32) = (11, 13);

    /// Midday peak spans 13:00..17:00
    pub const MIDDAY_PEAK: (u32, u32) = (13, 17);

    /// Months in which the peak windows carry the sharp tariff
    pub const SHARP_MONTHS: [u32; 4] = [1, 7, 8, 11];

    /// Sharp windows inside the peak periods during sharp months
    pub const SHARP_WINDOWS: [(u32, u32); 2] = [(9, 11), (15, 17)];
}

/// Timestamp formats
pub mod datetime {
    /// Format of instantaneous samples
    pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Format of daily aggregates
    pub const DATE_FORMAT: &str = "%Y-%m-%d";
}

/// Form defaults
pub mod form {
    /// Initial primary-load flag
    pub const DEFAULT_IS_PRIMARY_LOAD: bool = true;

    /// Initial factor
    pub const DEFAULT_FACTOR: f64 = 1.0;
}

/// UI layout defaults
pub mod layout {
    /// Settings drawer default width
    pub const DRAWER_WIDTH: f32 = 220.0;

    /// Form area height
    pub const FORM_HEIGHT: f32 = 170.0;

    /// Status bar height
    pub const STATUS_BAR_HEIGHT: f32 = 20.0;

    /// Minimum chart height
    pub const MIN_PLOT_HEIGHT: f32 = 200.0;

    /// Marker radius for line+marker traces
    pub const MARKER_RADIUS: f32 = 2.0;

    /// Statistics panel height
    pub const STATS_PANEL_HEIGHT: f32 = 150.0;

    /// Maximum number of toasts kept on screen
    pub const MAX_NOTIFICATIONS: usize = 5;

    /// Repaint interval while a computation is running, in milliseconds
    pub const LOADING_REPAINT_MS: u64 = 100;
}

/// Configuration file paths
pub mod config {
    /// Configuration file name
    pub const CONFIG_FILE: &str = "power-stats.json";

    /// Default tracing directive
    pub const DEFAULT_LOG_FILTER: &str = "info";
}
