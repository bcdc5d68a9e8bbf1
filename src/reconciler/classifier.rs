//! # Classifier Module
//!
//! Decides which sidecars a task cares about by decoding each record and
//! applying a `Classification`. Decoding is done per path on every call; a
//! record that cannot be decoded aborts the whole selection.

use crate::{
    error::Result,
    progress::ProgressManager,
    sidecar::{self, SidecarRecord},
};
use std::path::PathBuf;
use tracing::info;

/// Supported sidecar selections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Records flagged private
    Private,
    /// Records with a deletion timestamp
    Archived,
    /// Every record
    All,
}

impl Classification {
    pub fn matches(&self, record: &SidecarRecord) -> bool {
        match self {
            Self::Private => record.is_private(),
            Self::Archived => record.is_archived(),
            Self::All => true,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Archived => "archived",
            Self::All => "all",
        }
    }
}

/// Keep the sidecars whose record matches `classification`
pub async fn select_relevant(
    sidecar_paths: &[PathBuf],
    classification: Classification,
    hide_progress: bool,
) -> Result<Vec<PathBuf>> {
    let progress = ProgressManager::new(sidecar_paths.len() as u64, hide_progress);
    let mut relevant = Vec::new();

    for sidecar_path in sidecar_paths {
        let record = sidecar::read_record(sidecar_path).await?;
        if classification.matches(&record) {
            relevant.push(sidecar_path.clone());
        }
        progress.update(&sidecar_path.file_name().unwrap_or_default().to_string_lossy());
    }

    progress.finish(&format!("{} {} sidecars", relevant.len(), classification.description()));
    info!("Found {} {} sidecar files", relevant.len(), classification.description());

    Ok(relevant)
}
