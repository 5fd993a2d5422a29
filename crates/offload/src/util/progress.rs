use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TICK_INTERVAL: Duration = Duration::from_millis(120);

/// Bar for the copy pass, e.g. `Copying file 3 of 10 [###>---] 00:00:04`.
pub fn copy_progress_bar(total: u64) -> ProgressBar {
    let style = ProgressStyle::with_template(
        "Copying file {pos} of {len} [{wide_bar:.cyan/blue}] {elapsed_precise}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-");

    ProgressBar::new(total).with_style(style)
}

/// Self-ticking status line used while counting and verifying.
pub fn status_spinner(message: String) -> ProgressBar {
    let style = ProgressStyle::with_template("{spinner:.green} {wide_msg} [{elapsed}]")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("|/-\\ ");

    let spinner = ProgressBar::new_spinner()
        .with_style(style)
        .with_message(message);
    spinner.enable_steady_tick(TICK_INTERVAL);
    spinner
}
