//! # Organizer Module
//!
//! Finds normal media whose folder does not match the capture date.
//! The canonical folder of a record is `{year}/{MM}` relative to both roots.

use crate::{
    error::Result,
    reconciler::path_translator::PathTranslator,
    sidecar,
};
use chrono::{DateTime, Datelike, Utc};
use std::path::{Path, PathBuf};
use tracing::debug;

/// `{year}/{MM}` for a capture time
pub fn canonical_folder(taken_at: &DateTime<Utc>) -> PathBuf {
    PathBuf::from(taken_at.year().to_string()).join(format!("{:02}", taken_at.month()))
}

pub struct Organizer<'a> {
    translator: &'a PathTranslator,
}

impl<'a> Organizer<'a> {
    pub fn new(translator: &'a PathTranslator) -> Self {
        Self { translator }
    }

    /// Canonical relative folder of `sidecar_path` when it lives elsewhere.
    ///
    /// Private, archived and undated records are never misplaced.
    pub async fn is_misplaced(&self, sidecar_path: &Path) -> Result<Option<PathBuf>> {
        let record = sidecar::read_record(sidecar_path).await?;
        if record.is_private() || record.is_archived() {
            return Ok(None);
        }
        let Some(taken_at) = record.taken_at.known() else {
            debug!("No capture time in {}, leaving it where it is", sidecar_path.display());
            return Ok(None);
        };

        let canonical = canonical_folder(&taken_at);
        let current = self.translator.relative_sidecar_dir(sidecar_path)?;
        if current == canonical {
            Ok(None)
        } else {
            debug!("{} belongs in {}", sidecar_path.display(), canonical.display());
            Ok(Some(canonical))
        }
    }

    /// `(sidecar, canonical folder)` for every misplaced sidecar, in input order
    pub async fn find_misplaced(&self, sidecar_paths: &[PathBuf]) -> Result<Vec<(PathBuf, PathBuf)>> {
        let mut misplaced = Vec::new();
        for sidecar_path in sidecar_paths {
            if let Some(folder) = self.is_misplaced(sidecar_path).await? {
                misplaced.push((sidecar_path.clone(), folder));
            }
        }
        Ok(misplaced)
    }
}
