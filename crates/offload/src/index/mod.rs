pub mod hasher;
pub mod walker;

pub use hasher::{hash_file, hash_reader, Digester, HashAlgorithm};
pub use walker::{count_files, FileRecord, FileRecords, FsWalker, TreeWalker};

#[cfg(test)]
pub(crate) use walker::UnreadableEntryWalker;
