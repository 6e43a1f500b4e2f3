//! Checksums of generated artifacts

use sha2::{Digest, Sha256};
use std::fmt;

/// SHA256 checksum of artifact content
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Checksum(String);

impl Checksum {
    /// Compute checksum from raw bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{:x}", hash))
    }

    /// Compute checksum from a string
    pub fn from_str(content: &str) -> Self {
        Self::from_bytes(content.as_bytes())
    }

    /// First 12 hex digits, for log lines
    pub fn short(&self) -> &str {
        &self.0[..12]
    }

    /// Verify that content matches this checksum
    pub fn verify(&self, content: &[u8]) -> bool {
        Self::from_bytes(content) == *self
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
