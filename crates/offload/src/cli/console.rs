use console::style;
use indicatif::ProgressBar;
use offload_lib::util::{copy_progress_bar, format_age, status_spinner};
use offload_lib::{Event, StatusSink, VerifyOutcome};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Error,
    Skip,
}

/// `<label> ... [ OK ]`, with the marker coloured when colours are enabled.
pub fn status_line(label: &str, status: Status) -> String {
    let marker = match status {
        Status::Ok => style("OK").green(),
        Status::Error => style("ERROR").red(),
        Status::Skip => style("SKIP").yellow(),
    };
    format!("{} ... [ {} ]", label, marker)
}

/// Renders pipeline events as in-place progress plus one status line per
/// phase and per verified file.
pub struct ConsoleReporter {
    quiet: bool,
    active: Option<ProgressBar>,
}

impl ConsoleReporter {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            active: None,
        }
    }

    fn print(&self, line: String) {
        match &self.active {
            Some(pb) => pb.suspend(|| println!("{}", line)),
            None => println!("{}", line),
        }
    }

    fn print_info(&self, line: String) {
        if !self.quiet {
            self.print(line);
        }
    }

    /// Clears any progress line still on screen.
    pub fn finish_active(&mut self) {
        if let Some(pb) = self.active.take() {
            pb.finish_and_clear();
        }
    }

    fn spinner(&mut self, message: String) {
        if self.quiet {
            return;
        }
        match &self.active {
            Some(pb) => pb.set_message(message),
            None => self.active = Some(status_spinner(message)),
        }
    }
}

impl Drop for ConsoleReporter {
    fn drop(&mut self) {
        self.finish_active();
    }
}

impl StatusSink for ConsoleReporter {
    fn emit(&mut self, event: Event) {
        match event {
            Event::CountProgress { found } => {
                self.spinner(format!("{} files found ...", found));
            }
            Event::CountFinished { total } => {
                self.finish_active();
                self.print_info(status_line(&format!("{} files found", total), Status::Ok));
            }
            Event::CopyProgress { index, total, .. } => {
                if self.quiet {
                    return;
                }
                if self.active.is_none() {
                    self.active = Some(copy_progress_bar(total));
                }
                if let Some(pb) = &self.active {
                    pb.set_position(index);
                }
            }
            Event::CopyFailed { relative, message } => {
                self.print(format!(
                    "{}\n    {}",
                    status_line(&format!("Copying {}", display(&relative)), Status::Error),
                    style(message).dim()
                ));
            }
            Event::CopyFinished { copied, total } => {
                self.finish_active();
                let status = if copied == total { Status::Ok } else { Status::Error };
                let line = status_line(&format!("Copied {} of {} files", copied, total), status);
                if status == Status::Ok {
                    self.print_info(line);
                } else {
                    self.print(line);
                }
            }
            Event::VerifyStarted { relative } => {
                self.spinner(format!("Verifying integrity {} ...", display(&relative)));
            }
            Event::Verified { relative, outcome } => {
                let label = format!("Verifying integrity {}", display(&relative));
                match outcome {
                    VerifyOutcome::Match => self.print_info(status_line(&label, Status::Ok)),
                    VerifyOutcome::MissingDestination => {
                        self.print_info(status_line(&label, Status::Skip))
                    }
                    VerifyOutcome::Mismatch { .. } => self.print(status_line(&label, Status::Error)),
                }
            }
            Event::VerifyFailed { relative, message } => {
                self.print(format!(
                    "{}\n    {}",
                    status_line(&format!("Verifying integrity {}", display(&relative)), Status::Error),
                    style(message).dim()
                ));
            }
            Event::Pruned {
                relative,
                age,
                dry_run,
            } => {
                let action = if dry_run {
                    "Would remove old file"
                } else {
                    "Removing old file"
                };
                self.print_info(format!(
                    "{}: {} ({})",
                    action,
                    style(display(&relative)).red(),
                    format_age(age)
                ));
            }
            Event::PruneFailed { relative, message } => {
                self.print(format!(
                    "{}\n    {}",
                    status_line(&format!("Removing {}", display(&relative)), Status::Error),
                    style(message).dim()
                ));
            }
        }
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
