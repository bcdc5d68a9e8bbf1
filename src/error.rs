//! # Error Types Module
//!
//! All the failure modes of the reconciliation engine.
//!
//! ## Categories:
//! - `InvalidPath`: a path does not start with the root it must live under
//! - `Decode`: a sidecar record is not valid YAML for the expected shape
//! - `Read`: a sidecar or media file could not be read
//! - `UnhandledSelection`: a prompt answered with something outside the gate
//! - `Prompt`: the interactive terminal itself failed
//! - `Io`: any other filesystem failure (mkdir, rename, listing)
//!
//! The walker is the only place that swallows errors (per subtree, logged).
//! Everything else propagates with `?`.
//!
//! ## Example:
//! ```rust,ignore
//! if !path.starts_with(&root) {
//!     return Err(ReconcileError::InvalidPath {
//!         path: path.to_path_buf(),
//!         expected_prefix: root.to_path_buf(),
//!     });
//! }
//! ```

use std::path::PathBuf;

/// Custom error types for media reconciliation
#[derive(thiserror::Error, Debug)]
pub enum ReconcileError {
    #[error("Path {path} does not start with {expected_prefix}")]
    InvalidPath {
        path: PathBuf,
        expected_prefix: PathBuf,
    },

    #[error("Failed to decode sidecar {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unhandled selection: {0}")]
    UnhandledSelection(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = ReconcileError> = std::result::Result<T, E>;
