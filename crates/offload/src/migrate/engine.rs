use crate::config::Config;
use crate::error::Result;
use crate::index::{count_files, FsWalker, TreeWalker};
use crate::migrate::replicate::{ensure_no_overlap, ensure_source_dir, replicate_tree};
use crate::migrate::retention::verify_and_prune;
use crate::report::StatusSink;
use chrono::Utc;
use std::path::Path;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_found: u64,
    pub files_copied: u64,
    pub bytes_copied: u64,
    pub verified_ok: u64,
    pub verified_mismatch: u64,
    pub missing_destination: u64,
    pub pruned: u64,
    pub bytes_pruned: u64,
    pub failed: u64,
    pub dry_run: bool,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn has_integrity_errors(&self) -> bool {
        self.verified_mismatch > 0 || self.failed > 0
    }
}

/// Runs the full offload sequence: count, replicate, then verify and prune
/// file by file.
///
/// Nothing is copied or deleted unless the source is an existing directory
/// that does not overlap the destination.
pub struct Pipeline {
    config: Config,
    walker: Box<dyn TreeWalker>,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            walker: Box::new(FsWalker::default()),
        }
    }

    pub fn with_walker(mut self, walker: Box<dyn TreeWalker>) -> Self {
        self.walker = walker;
        self
    }

    pub fn run(&self, source: &Path, destination: &Path, sink: &mut dyn StatusSink) -> Result<RunSummary> {
        let started = Instant::now();

        self.config.validate()?;
        ensure_source_dir(source)?;
        ensure_no_overlap(source, destination)?;

        if self.config.dry_run {
            log::info!("DRY RUN: no files will be copied or removed");
        }

        let files_found = count_files(self.walker.as_ref(), source, self.config.on_error, sink)?;

        let replicated = replicate_tree(
            self.walker.as_ref(),
            source,
            destination,
            files_found,
            &self.config,
            sink,
        )?;

        let pruned = verify_and_prune(
            self.walker.as_ref(),
            source,
            destination,
            &self.config,
            Utc::now(),
            sink,
        )?;

        let summary = RunSummary {
            files_found,
            files_copied: replicated.files_copied,
            bytes_copied: replicated.bytes_copied,
            verified_ok: pruned.verified_ok,
            verified_mismatch: pruned.mismatched,
            missing_destination: pruned.missing_destination,
            pruned: pruned.pruned,
            bytes_pruned: pruned.bytes_pruned,
            failed: replicated.failed + pruned.failed,
            dry_run: self.config.dry_run,
            elapsed: started.elapsed(),
        };

        log::info!(
            "Finished: {} copied, {} verified, {} mismatched, {} pruned, {} failed",
            summary.files_copied,
            summary.verified_ok,
            summary.verified_mismatch,
            summary.pruned,
            summary.failed
        );

        Ok(summary)
    }
}
