pub mod format;
pub mod progress;

pub use format::{format_age, format_bytes, format_duration};
pub use progress::{copy_progress_bar, status_spinner};
