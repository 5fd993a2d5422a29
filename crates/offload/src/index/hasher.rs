use crate::error::{OffloadError, Result};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Streaming content digester.
///
/// Implementations accumulate bytes through `update` and produce a lowercase
/// hex digest from `finalize_hex`.
pub trait Digester {
    fn update(&mut self, bytes: &[u8]);
    fn finalize_hex(self: Box<Self>) -> String;
}

struct Md5Digester(Md5);

impl Digester for Md5Digester {
    fn update(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }

    fn finalize_hex(self: Box<Self>) -> String {
        format!("{:x}", self.0.finalize())
    }
}

struct Blake3Digester(blake3::Hasher);

impl Digester for Blake3Digester {
    fn update(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }

    fn finalize_hex(self: Box<Self>) -> String {
        self.0.finalize().to_hex().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Md5,
    Blake3,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Blake3 => "blake3",
        }
    }

    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "md5" => Ok(HashAlgorithm::Md5),
            "blake3" => Ok(HashAlgorithm::Blake3),
            _ => Err(OffloadError::InvalidAlgorithm(s.to_string())),
        }
    }

    pub fn digester(&self) -> Box<dyn Digester> {
        match self {
            HashAlgorithm::Md5 => Box::new(Md5Digester(Md5::new())),
            HashAlgorithm::Blake3 => Box::new(Blake3Digester(blake3::Hasher::new())),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feeds `reader` through `digester` in `block_size` chunks.
pub fn hash_reader<R: Read>(
    mut reader: R,
    mut digester: Box<dyn Digester>,
    block_size: usize,
) -> std::io::Result<String> {
    let mut buffer = vec![0u8; block_size.max(1)];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        digester.update(&buffer[..bytes_read]);
    }

    Ok(digester.finalize_hex())
}

/// Computes the digest of a file without loading it into memory.
pub fn hash_file<P: AsRef<Path>>(
    path: P,
    algorithm: HashAlgorithm,
    block_size: usize,
) -> Result<String> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        log::error!("Failed to open file for hashing: {}: {}", path.display(), e);
        OffloadError::Hash {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    hash_reader(file, algorithm.digester(), block_size).map_err(|e| OffloadError::Hash {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
