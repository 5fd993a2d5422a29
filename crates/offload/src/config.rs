use crate::error::{OffloadError, Result};
use crate::index::HashAlgorithm;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use xdg::BaseDirectories;

pub const DEFAULT_RETENTION_DAYS: i64 = 2;
pub const DEFAULT_BLOCK_SIZE: usize = 4096;
/// Largest retention that still fits a `chrono::Duration` in milliseconds.
pub const MAX_RETENTION_DAYS: i64 = i64::MAX / 86_400_000;

/// What to do when a single file cannot be copied, hashed or deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the run and return the error.
    #[default]
    Abort,
    /// Report the file as failed and continue with the next one.
    Skip,
}

impl FailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailurePolicy::Abort => "abort",
            FailurePolicy::Skip => "skip",
        }
    }

    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "skip" => Ok(FailurePolicy::Skip),
            _ => Err(OffloadError::Config(format!(
                "Invalid failure policy: {} (valid: abort, skip)",
                s
            ))),
        }
    }

    /// `Abort` propagates the error. `Skip` logs it and hands back the
    /// message for reporting.
    pub fn handle(self, error: OffloadError) -> Result<String> {
        match self {
            FailurePolicy::Abort => {
                log::error!("Aborting: {}", error);
                Err(error)
            }
            FailurePolicy::Skip => {
                log::warn!("Skipping: {}", error);
                Ok(error.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Minimum age in days before a verified source file is deleted.
    pub retention_days: i64,
    pub algorithm: HashAlgorithm,
    /// Read size used when streaming file contents through the digester.
    pub block_size: usize,
    pub on_error: FailurePolicy,
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            retention_days: DEFAULT_RETENTION_DAYS,
            algorithm: HashAlgorithm::default(),
            block_size: DEFAULT_BLOCK_SIZE,
            on_error: FailurePolicy::default(),
            dry_run: false,
        }
    }
}

impl Config {
    /// Loads configuration from an explicit file, `$OFFLOAD_CONFIG`, or
    /// `offload.toml` in the XDG config directory, falling back to defaults.
    ///
    /// Only an explicitly requested file is required to exist.
    pub fn load(path_override: Option<PathBuf>) -> Result<Self> {
        let explicit = path_override.or_else(|| std::env::var_os("OFFLOAD_CONFIG").map(PathBuf::from));

        let config = match explicit {
            Some(path) => Self::load_from_file(&path)?,
            None => match Self::discover() {
                Some(path) => {
                    log::debug!("Using config file {}", path.display());
                    Self::load_from_file(&path)?
                }
                None => Self::default(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn discover() -> Option<PathBuf> {
        BaseDirectories::with_prefix("offload")
            .ok()
            .and_then(|xdg| xdg.find_config_file("offload.toml"))
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            OffloadError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| OffloadError::Config(format!("Failed to parse config TOML: {}", e)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.retention_days < 0 {
            return Err(OffloadError::Config(format!(
                "retention_days cannot be negative: {}",
                self.retention_days
            )));
        }
        if self.retention_days > MAX_RETENTION_DAYS {
            return Err(OffloadError::Config(format!(
                "retention_days is too large: {} (max {})",
                self.retention_days, MAX_RETENTION_DAYS
            )));
        }
        if self.block_size == 0 {
            return Err(OffloadError::Config("block_size must be greater than zero".to_string()));
        }
        Ok(())
    }

    pub fn retention(&self) -> Result<chrono::Duration> {
        chrono::Duration::try_days(self.retention_days).ok_or_else(|| {
            OffloadError::Config(format!(
                "retention_days out of range: {}",
                self.retention_days
            ))
        })
    }
}
