//! Compile-time settings. There is no runtime configuration besides
//! `RUST_LOG`, which `env_logger` reads.

pub const APP_TITLE: &str = "DataVue - Auto EDA";

pub const WINDOW_SIZE: [f32; 2] = [1280.0, 900.0];
pub const MIN_WINDOW_SIZE: [f32; 2] = [720.0, 480.0];

/// Rows shown in the preview table.
pub const PREVIEW_ROWS: usize = 5;

/// Fixed bin count of the distribution histogram.
pub const HISTOGRAM_BINS: usize = 30;

/// String columns with at most this many distinct values (and at most half
/// as many distinct values as filled cells) are categorical.
pub const CATEGORICAL_MAX_UNIQUE: usize = 20;

pub const EXPORT_FILE_NAME: &str = "datavue_data.csv";
pub const EXPORT_MIME: &str = "text/csv";

/// Upload extensions offered by the file dialog.
pub const UPLOAD_EXTENSIONS: [&str; 2] = ["csv", "xlsx"];
