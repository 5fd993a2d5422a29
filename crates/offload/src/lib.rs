pub mod config;
pub mod error;
pub mod index;
pub mod migrate;
pub mod report;
pub mod util;

pub use config::{Config, FailurePolicy};
pub use error::{OffloadError, Result};
pub use index::{count_files, hash_file, FileRecord, FsWalker, HashAlgorithm, TreeWalker};
pub use migrate::{
    destination_for, replicate_tree, verify_and_prune, verify_pair, Pipeline, PruneStats,
    ReplicateStats, RetentionPolicy, RunSummary,
};
pub use report::{Event, NullSink, StatusSink, VerifyOutcome};
