//! Structured status events emitted by the pipeline.
//!
//! The pipeline never writes to the terminal. It reports progress and
//! per-file outcomes to a [`StatusSink`]; the binary renders them to the
//! console and tests collect them into a `Vec<Event>`.

use std::path::PathBuf;

/// Outcome of comparing one source file against its mirrored copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Digests are identical.
    Match,
    /// Both files exist but their digests differ.
    Mismatch { source: String, destination: String },
    /// No file exists at the mirrored destination path.
    MissingDestination,
}

impl VerifyOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, VerifyOutcome::Match)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Running count of regular files found so far.
    CountProgress { found: u64 },
    CountFinished { total: u64 },
    CopyProgress { index: u64, total: u64, relative: PathBuf },
    CopyFailed { relative: PathBuf, message: String },
    CopyFinished { copied: u64, total: u64 },
    VerifyStarted { relative: PathBuf },
    Verified { relative: PathBuf, outcome: VerifyOutcome },
    VerifyFailed { relative: PathBuf, message: String },
    Pruned { relative: PathBuf, age: chrono::Duration, dry_run: bool },
    PruneFailed { relative: PathBuf, message: String },
}

pub trait StatusSink {
    fn emit(&mut self, event: Event);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl StatusSink for NullSink {
    fn emit(&mut self, _event: Event) {}
}

impl StatusSink for Vec<Event> {
    fn emit(&mut self, event: Event) {
        self.push(event);
    }
}
