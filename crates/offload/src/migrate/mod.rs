pub mod engine;
pub mod replicate;
pub mod retention;

pub use engine::{Pipeline, RunSummary};
pub use replicate::{copy_file, destination_for, replicate_tree, ReplicateStats};
pub use retention::{verify_and_prune, verify_pair, PruneStats, RetentionPolicy};
