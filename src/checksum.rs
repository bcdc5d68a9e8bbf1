//! # Checksum Module
//!
//! Content digest used to build canonical media file names.
//! CRC-32C is what PhotoPrism itself uses, so it is the default; SHA-256 is
//! available for libraries that prefer a collision resistant name.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Digest algorithm applied to the primary file of a stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Crc32c,
    Sha256,
}

impl HashAlgorithm {
    /// Digest `bytes` and render it as uppercase hexadecimal.
    ///
    /// CRC-32C is rendered without zero padding, the width is whatever the
    /// value naturally needs.
    pub fn checksum(&self, bytes: &[u8]) -> String {
        match self {
            Self::Crc32c => format!("{:X}", crc32c::crc32c(bytes)),
            Self::Sha256 => {
                let mut hasher = Sha256::new();
                hasher.update(bytes);
                hex::encode_upper(hasher.finalize())
            }
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Crc32c => write!(f, "crc32c"),
            Self::Sha256 => write!(f, "sha256"),
        }
    }
}
