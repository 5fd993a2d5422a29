use crate::config::FailurePolicy;
use crate::error::{OffloadError, Result};
use crate::report::{Event, StatusSink};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A regular file found under a tree root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub abs_path: PathBuf,
    /// Path relative to the walked root.
    pub relative: PathBuf,
    pub size_bytes: u64,
    pub modified_at: DateTime<Utc>,
}

pub type FileRecords<'a> = Box<dyn Iterator<Item = Result<FileRecord>> + 'a>;

/// Produces the regular files under a root, recursively and lazily.
///
/// Directories, symlinks and other special entries are never yielded.
pub trait TreeWalker {
    fn walk<'a>(&'a self, root: &'a Path) -> FileRecords<'a>;
}

/// Walks the local filesystem without following symlinks.
///
/// Entries are yielded in file-name order within each directory so that
/// repeated passes over an unchanged tree see the same sequence.
#[derive(Debug, Clone, Default)]
pub struct FsWalker {
    pub max_depth: Option<usize>,
}

impl TreeWalker for FsWalker {
    fn walk<'a>(&'a self, root: &'a Path) -> FileRecords<'a> {
        let mut walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name();

        if let Some(max_depth) = self.max_depth {
            walker = walker.max_depth(max_depth);
        }

        Box::new(walker.into_iter().filter_map(move |entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => return Some(Err(OffloadError::Walk(e))),
            };

            if !entry.file_type().is_file() {
                return None;
            }

            Some(file_record(root, entry.path(), entry.metadata()))
        }))
    }
}

fn file_record(
    root: &Path,
    path: &Path,
    metadata: std::result::Result<std::fs::Metadata, walkdir::Error>,
) -> Result<FileRecord> {
    let metadata = metadata?;
    let relative = path
        .strip_prefix(root)
        .map_err(|_| {
            OffloadError::Config(format!(
                "{} is not under {}",
                path.display(),
                root.display()
            ))
        })?
        .to_path_buf();

    Ok(FileRecord {
        abs_path: path.to_path_buf(),
        relative,
        size_bytes: metadata.len(),
        modified_at: DateTime::<Utc>::from(metadata.modified()?),
    })
}

/// Counts regular files under `root`, reporting a running total.
///
/// Entries the walk cannot read are handled by `policy`; skipped entries are
/// not counted.
pub fn count_files(
    walker: &dyn TreeWalker,
    root: &Path,
    policy: FailurePolicy,
    sink: &mut dyn StatusSink,
) -> Result<u64> {
    let mut total = 0u64;

    for record in walker.walk(root) {
        if let Err(e) = record {
            policy.handle(e)?;
            continue;
        }
        total += 1;
        sink.emit(Event::CountProgress { found: total });
    }

    log::info!("Found {} files under {}", total, root.display());
    sink.emit(Event::CountFinished { total });
    Ok(total)
}

/// Test walker that yields one unreadable entry ahead of the real tree.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct UnreadableEntryWalker {
    inner: FsWalker,
}

#[cfg(test)]
impl TreeWalker for UnreadableEntryWalker {
    fn walk<'a>(&'a self, root: &'a Path) -> FileRecords<'a> {
        let unreadable: Result<FileRecord> = Err(OffloadError::Config("unreadable entry".to_string()));
        Box::new(std::iter::once(unreadable).chain(self.inner.walk(root)))
    }
}
