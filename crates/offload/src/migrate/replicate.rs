use crate::config::Config;
use crate::error::{OffloadError, Result};
use crate::index::{FileRecord, TreeWalker};
use crate::report::{Event, StatusSink};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplicateStats {
    /// Files copied, or that would be copied in a dry run.
    pub files_copied: u64,
    pub bytes_copied: u64,
    pub failed: u64,
}

pub fn ensure_source_dir(source: &Path) -> Result<()> {
    if !source.is_dir() {
        log::error!("Source directory does not exist: {}", source.display());
        return Err(OffloadError::SourceNotDirectory(source.to_path_buf()));
    }
    Ok(())
}

/// Rejects a destination equal to, inside, or containing the source tree.
pub fn ensure_no_overlap(source: &Path, destination: &Path) -> Result<()> {
    let source_resolved = resolve(source)?;
    let destination_resolved = resolve(destination)?;

    if destination_resolved.starts_with(&source_resolved)
        || source_resolved.starts_with(&destination_resolved)
    {
        return Err(OffloadError::SourceDestinationOverlap {
            source_root: source.to_path_buf(),
            destination: destination.to_path_buf(),
        });
    }
    Ok(())
}

/// Canonicalises the longest existing ancestor of `path` and re-appends the
/// components that do not exist yet.
fn resolve(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut existing = absolute.as_path();
    let mut missing = Vec::new();
    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return Ok(absolute),
        }
    }

    let mut resolved = fs::canonicalize(existing)?;
    resolved.extend(missing.iter().rev());
    Ok(resolved)
}

/// Mirrors `file` (under `source_root`) to the same relative path under
/// `destination_root`.
pub fn destination_for(source_root: &Path, destination_root: &Path, file: &Path) -> Result<PathBuf> {
    let relative = file.strip_prefix(source_root).map_err(|_| {
        OffloadError::Config(format!(
            "{} is not under {}",
            file.display(),
            source_root.display()
        ))
    })?;
    Ok(destination_root.join(relative))
}

/// Copies one file's content and permissions, creating parent directories
/// and replacing whatever is already at `destination`.
pub fn copy_file(source: &Path, destination: &Path) -> Result<u64> {
    let copy_error = |e: std::io::Error| OffloadError::Copy {
        path: source.to_path_buf(),
        destination: destination.to_path_buf(),
        message: e.to_string(),
    };

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(copy_error)?;
    }

    fs::copy(source, destination).map_err(copy_error)
}

/// Copies every regular file under `source` to the mirrored path under
/// `destination`.
///
/// `total` is only used for progress events.
pub fn replicate_tree(
    walker: &dyn TreeWalker,
    source: &Path,
    destination: &Path,
    total: u64,
    config: &Config,
    sink: &mut dyn StatusSink,
) -> Result<ReplicateStats> {
    ensure_source_dir(source)?;

    let mut stats = ReplicateStats::default();
    let mut index = 0u64;

    log::info!(
        "Replicating {} -> {} ({} files)",
        source.display(),
        destination.display(),
        total
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

        index += 1;
        sink.emit(Event::CopyProgress {
            index,
            total,
            relative: record.relative.clone(),
        });

        match replicate_file(&record, destination, config.dry_run) {
            Ok(bytes) => {
                stats.files_copied += 1;
                stats.bytes_copied += bytes;
            }
            Err(e) => {
                let message = config.on_error.handle(e)?;
                stats.failed += 1;
                sink.emit(Event::CopyFailed {
                    relative: record.relative.clone(),
                    message,
                });
            }
        }
    }

    sink.emit(Event::CopyFinished {
        copied: stats.files_copied,
        total,
    });

    Ok(stats)
}

fn replicate_file(record: &FileRecord, destination_root: &Path, dry_run: bool) -> Result<u64> {
    let destination = destination_root.join(&record.relative);

    if dry_run {
        log::info!(
            "DRY RUN: Would copy {} -> {}",
            record.abs_path.display(),
            destination.display()
        );
        return Ok(record.size_bytes);
    }

    log::debug!(
        "Copying {} -> {}",
        record.abs_path.display(),
        destination.display()
    );
    copy_file(&record.abs_path, &destination)
}
