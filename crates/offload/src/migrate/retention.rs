use crate::config::Config;
use crate::error::{OffloadError, Result};
use crate::index::{hash_file, FileRecord, TreeWalker};
use crate::report::{Event, StatusSink, VerifyOutcome};
use chrono::{DateTime, Duration, Utc};
use std::fs;
use std::path::Path;

/// Minimum age a verified source file must exceed before it is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    pub max_age: Duration,
}

impl RetentionPolicy {
    pub fn new(max_age: Duration) -> Self {
        Self { max_age }
    }

    pub fn from_days(days: i64) -> Result<Self> {
        Duration::try_days(days)
            .map(Self::new)
            .ok_or_else(|| OffloadError::Config(format!("retention out of range: {} days", days)))
    }

    /// `true` when `now - modified_at` is strictly greater than the threshold.
    pub fn is_expired(&self, modified_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(modified_at) > self.max_age
    }
}

impl TryFrom<&Config> for RetentionPolicy {
    type Error = OffloadError;

    fn try_from(config: &Config) -> Result<Self> {
        config.retention().map(Self::new)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneStats {
    pub verified_ok: u64,
    pub mismatched: u64,
    pub missing_destination: u64,
    /// Source files deleted, or that would be deleted in a dry run.
    pub pruned: u64,
    pub bytes_pruned: u64,
    pub failed: u64,
}

/// Compares a source file with its mirrored copy by content digest.
///
/// A missing destination is not an error; it means the file has not been
/// safely copied yet.
pub fn verify_pair(source_file: &Path, destination_file: &Path, config: &Config) -> Result<VerifyOutcome> {
    if !destination_file.exists() {
        return Ok(VerifyOutcome::MissingDestination);
    }

    let source_hash = hash_file(source_file, config.algorithm, config.block_size)?;
    let destination_hash = hash_file(destination_file, config.algorithm, config.block_size)?;

    if source_hash == destination_hash {
        Ok(VerifyOutcome::Match)
    } else {
        Ok(VerifyOutcome::Mismatch {
            source: source_hash,
            destination: destination_hash,
        })
    }
}

/// Verifies every source file against the destination tree and deletes the
/// source copies that match and are older than the retention threshold.
///
/// Ages are measured against `now`, taken once by the caller for the whole
/// pass. Files that are missing at the destination or fail verification are
/// never deleted.
pub fn verify_and_prune(
    walker: &dyn TreeWalker,
    source: &Path,
    destination: &Path,
    config: &Config,
    now: DateTime<Utc>,
    sink: &mut dyn StatusSink,
) -> Result<PruneStats> {
    let policy = RetentionPolicy::try_from(config)?;
    let mut stats = PruneStats::default();

    log::info!(
        "Verifying {} against {} with {} (retention {} days)",
        source.display(),
        destination.display(),
        config.algorithm,
        policy.max_age.num_days()
    );

    for record in walker.walk(source) {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                config.on_error.handle(e)?;
                stats.failed += 1;
                continue;
            }
        };

        sink.emit(Event::VerifyStarted {
            relative: record.relative.clone(),
        });

        let destination_file = destination.join(&record.relative);
        let outcome = match verify_pair(&record.abs_path, &destination_file, config) {
            Ok(outcome) => outcome,
            Err(e) => {
                let message = config.on_error.handle(e)?;
                stats.failed += 1;
                sink.emit(Event::VerifyFailed {
                    relative: record.relative.clone(),
                    message,
                });
                continue;
            }
        };

        match &outcome {
            VerifyOutcome::Match => stats.verified_ok += 1,
            VerifyOutcome::Mismatch {
                source: expected,
                destination: actual,
            } => {
                log::warn!(
                    "Integrity mismatch for {}: {} != {}",
                    record.relative.display(),
                    expected,
                    actual
                );
                stats.mismatched += 1;
            }
            VerifyOutcome::MissingDestination => {
                log::debug!("No copy yet for {}", record.relative.display());
                stats.missing_destination += 1;
            }
        }

        let eligible = outcome.is_match() && policy.is_expired(record.modified_at, now);

        sink.emit(Event::Verified {
            relative: record.relative.clone(),
            outcome,
        });

        if !eligible {
            continue;
        }

        match prune_file(&record, now, config.dry_run) {
            Ok(age) => {
                stats.pruned += 1;
                stats.bytes_pruned += record.size_bytes;
                sink.emit(Event::Pruned {
                    relative: record.relative.clone(),
                    age,
                    dry_run: config.dry_run,
                });
            }
            Err(e) => {
                let message = config.on_error.handle(e)?;
                stats.failed += 1;
                sink.emit(Event::PruneFailed {
                    relative: record.relative.clone(),
                    message,
                });
            }
        }
    }

    Ok(stats)
}

fn prune_file(record: &FileRecord, now: DateTime<Utc>, dry_run: bool) -> Result<Duration> {
    let age = now.signed_duration_since(record.modified_at);

    if dry_run {
        log::info!("DRY RUN: Would remove {}", record.abs_path.display());
        return Ok(age);
    }

    fs::remove_file(&record.abs_path).map_err(|e| OffloadError::Delete {
        path: record.abs_path.clone(),
        message: e.to_string(),
    })?;
    log::info!(
        "Removed {} ({} days old)",
        record.abs_path.display(),
        age.num_days()
    );

    Ok(age)
}
