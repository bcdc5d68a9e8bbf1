//! # Path Translation Module
//!
//! Maps between the sidecar tree and the originals tree. Both trees share
//! the same relative structure:
//!
//! ```text
//! Sidecar:   <sidecar_root>/2022/06/IMG_1.yml
//! Media dir: <originals_root>/2022/06/
//! ```
//!
//! Pure path algebra, no I/O.

use crate::error::{ReconcileError, Result};
use std::path::{Path, PathBuf};

/// Translates paths between the originals root and the sidecar root
#[derive(Debug, Clone)]
pub struct PathTranslator {
    originals_root: PathBuf,
    sidecar_root: PathBuf,
}

impl PathTranslator {
    pub fn new(originals_root: impl Into<PathBuf>, sidecar_root: impl Into<PathBuf>) -> Self {
        Self {
            originals_root: originals_root.into(),
            sidecar_root: sidecar_root.into(),
        }
    }

    pub fn originals_root(&self) -> &Path {
        &self.originals_root
    }

    pub fn sidecar_root(&self) -> &Path {
        &self.sidecar_root
    }

    /// Directory of the media files belonging to `sidecar_path`.
    ///
    /// Only the directory is known: the media may differ from the sidecar in
    /// extension, so the file itself is found by the matcher.
    pub fn sidecar_to_media_dir(&self, sidecar_path: &Path) -> Result<PathBuf> {
        let relative = strip_root(sidecar_path, &self.sidecar_root)?;
        Ok(parent_or_root(&self.originals_root.join(relative), &self.originals_root))
    }

    /// Directory where the sidecar of `media_path` lives
    pub fn media_to_sidecar_dir(&self, media_path: &Path) -> Result<PathBuf> {
        let relative = strip_root(media_path, &self.originals_root)?;
        Ok(parent_or_root(&self.sidecar_root.join(relative), &self.sidecar_root))
    }

    /// Directory of `sidecar_path` relative to the sidecar root, e.g. `2022/06`
    pub fn relative_sidecar_dir(&self, sidecar_path: &Path) -> Result<PathBuf> {
        let relative = strip_root(sidecar_path, &self.sidecar_root)?;
        Ok(relative.parent().map(Path::to_path_buf).unwrap_or_default())
    }
}

fn strip_root<'a>(path: &'a Path, root: &Path) -> Result<&'a Path> {
    path.strip_prefix(root).map_err(|_| ReconcileError::InvalidPath {
        path: path.to_path_buf(),
        expected_prefix: root.to_path_buf(),
    })
}

fn parent_or_root(path: &Path, root: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf())
}
