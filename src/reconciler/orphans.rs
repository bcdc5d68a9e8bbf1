//! # Orphan Finder
//!
//! A sidecar is an orphan when no file anywhere under the originals root
//! shares its stack key. The check is global: media moved to another
//! folder still rescue their sidecar.

use crate::{file_manager::FileManager, progress::ProgressManager};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Sidecars in `sidecar_paths` with no media under `originals_root`
pub async fn find_orphans(originals_root: &Path, sidecar_paths: &[PathBuf], hide_progress: bool) -> Vec<PathBuf> {
    let spinner = ProgressManager::spinner("Scanning originals...", hide_progress);
    let media = FileManager::walk(originals_root, None).await;
    spinner.finish_and_clear();

    let keys: HashSet<String> = media.iter().filter_map(|path| FileManager::stack_key(path)).collect();
    info!("Indexed {} media files ({} stack keys)", media.len(), keys.len());

    let orphans: Vec<PathBuf> = sidecar_paths
        .iter()
        .filter(|sidecar| match FileManager::stack_key(sidecar) {
            Some(key) => !keys.contains(&key),
            None => true,
        })
        .cloned()
        .collect();

    for orphan in &orphans {
        warn!("Orphan sidecar: {}", orphan.display());
    }
    info!("Found {} orphan sidecar files", orphans.len());

    orphans
}
