#![allow(dead_code)]

use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

const DAY: u64 = 24 * 60 * 60;

/// A source tree and an (initially absent) destination tree in one temp dir.
pub struct TreeFixture {
    pub temp_dir: TempDir,
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl TreeFixture {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("source");
        let destination = temp_dir.path().join("destination");
        fs::create_dir_all(&source).unwrap();

        Self {
            temp_dir,
            source,
            destination,
        }
    }

    pub fn write_source(&self, relative: &str, content: &[u8]) -> PathBuf {
        write_file(&self.source, relative, content)
    }

    pub fn write_destination(&self, relative: &str, content: &[u8]) -> PathBuf {
        write_file(&self.destination, relative, content)
    }

    /// Sets the source file's mtime to `days` days in the past.
    pub fn age_source(&self, relative: &str, days: u64) {
        let mtime = SystemTime::now() - Duration::from_secs(days * DAY);
        filetime::set_file_mtime(self.source.join(relative), FileTime::from_system_time(mtime))
            .unwrap();
    }

    pub fn source_exists(&self, relative: &str) -> bool {
        self.source.join(relative).exists()
    }

    pub fn read_destination(&self, relative: &str) -> Vec<u8> {
        fs::read(self.destination.join(relative)).unwrap()
    }
}

fn write_file(root: &Path, relative: &str, content: &[u8]) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}
