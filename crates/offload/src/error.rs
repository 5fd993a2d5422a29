use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OffloadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Source directory does not exist: {0}")]
    SourceNotDirectory(PathBuf),

    #[error("Destination {destination} overlaps source {source_root}")]
    SourceDestinationOverlap {
        source_root: PathBuf,
        destination: PathBuf,
    },

    #[error("Failed to copy {path} -> {destination}: {message}")]
    Copy {
        path: PathBuf,
        destination: PathBuf,
        message: String,
    },

    #[error("Failed to hash {path}: {message}")]
    Hash { path: PathBuf, message: String },

    #[error("Failed to delete {path}: {message}")]
    Delete { path: PathBuf, message: String },

    #[error("Invalid hash algorithm: {0} (valid: md5, blake3)")]
    InvalidAlgorithm(String),
}

pub type Result<T> = std::result::Result<T, OffloadError>;
