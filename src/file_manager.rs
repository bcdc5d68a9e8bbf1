//! # File Management Module
//!
//! Filesystem discovery and the small path helpers every other module uses.
//!
//! ## Responsibilities:
//! - Recursive directory walk with `walkdir`, off the async runtime
//! - Optional extension filter (`.yml`, with the leading dot)
//! - Listing the immediate files of one directory
//! - Base-name helpers (`remove_extension`, `base_name`, `stack_key`)
//!
//! ## Failure policy:
//! The walk is best-effort. A directory that cannot be listed, or an entry
//! that cannot be stat'ed, is logged with `warn!` and skipped; the rest of
//! the tree is still scanned.
//!
//! ## Example:
//! ```rust,ignore
//! let sidecars = FileManager::walk(&sidecar_root, Some(&[".yml".to_string()])).await;
//! for sidecar in sidecars {
//!     let name = FileManager::base_name(&sidecar);
//! }
//! ```

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Manages file operations and discovery
pub struct FileManager;

impl FileManager {
    /// Recursively list every file under `root`.
    ///
    /// Directories are always descended; the filter only applies to files.
    /// Entries of one directory come out sorted by name. Linked files count,
    /// linked directories are not followed.
    pub async fn walk(root: &Path, extension_filter: Option<&[String]>) -> Vec<PathBuf> {
        let root = root.to_path_buf();
        let extension_filter = extension_filter.map(|extensions| extensions.to_vec());

        match tokio::task::spawn_blocking(move || Self::walk_blocking(&root, extension_filter.as_deref())).await {
            Ok(files) => files,
            Err(e) => {
                warn!("Directory walk did not complete: {}", e);
                Vec::new()
            }
        }
    }

    fn walk_blocking(root: &Path, extension_filter: Option<&[String]>) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping {}", e);
                    continue;
                }
            };

            let path = entry.path();
            let file_type = entry.file_type();
            if file_type.is_file() {
                if Self::passes_filter(path, extension_filter) {
                    files.push(path.to_path_buf());
                }
            } else if file_type.is_symlink() {
                match std::fs::metadata(path) {
                    Ok(target) if target.is_file() => {
                        if Self::passes_filter(path, extension_filter) {
                            files.push(path.to_path_buf());
                        }
                    }
                    Ok(_) => debug!("Not following directory link {}", path.display()),
                    Err(e) => warn!("Skipping dangling link {}: {}", path.display(), e),
                }
            }
        }

        files
    }

    /// List the regular files directly inside `dir`, sorted by name.
    ///
    /// Subdirectories are ignored. Errors (including a missing directory)
    /// are returned to the caller, which decides what they mean.
    pub async fn list_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in Self::read_dir_sorted(dir).await? {
            match fs::metadata(&entry).await {
                Ok(metadata) if metadata.is_file() => files.push(entry),
                Ok(_) => {}
                Err(e) => warn!("Skipping {}: {}", entry.display(), e),
            }
        }
        Ok(files)
    }

    async fn read_dir_sorted(dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut reader = fs::read_dir(dir).await?;
        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            entries.push(entry.path());
        }
        entries.sort();
        Ok(entries)
    }

    /// Check whether a file's extension (with leading dot) is in the filter
    pub fn passes_filter(path: &Path, extension_filter: Option<&[String]>) -> bool {
        match extension_filter {
            None => true,
            Some(extensions) => match Self::dotted_extension(path) {
                Some(ext) => extensions.iter().any(|allowed| *allowed == ext),
                None => false,
            },
        }
    }

    /// Final extension including the dot, e.g. `.jpg`
    pub fn dotted_extension(path: &Path) -> Option<String> {
        path.extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
    }

    /// Strip only the final extension, keeping any directory prefix.
    /// A path without an extension is returned unchanged.
    pub fn remove_extension(path: &Path) -> PathBuf {
        if path.extension().is_some() {
            path.with_extension("")
        } else {
            path.to_path_buf()
        }
    }

    /// File name without its final extension
    pub fn base_name(path: &Path) -> Option<String> {
        Self::remove_extension(path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }

    /// File name up to its first dot.
    ///
    /// Burst members such as `IMG_1.00002.jpg` share the key of their
    /// sidecar `IMG_1.yml`.
    pub fn stack_key(path: &Path) -> Option<String> {
        let name = path.file_name()?.to_string_lossy();
        let key = name.split('.').next().unwrap_or_default();
        if key.is_empty() {
            None
        } else {
            Some(key.to_string())
        }
    }

    /// Move a file, falling back to copy + delete across filesystems
    pub async fn move_file(from: &Path, to: &Path) -> io::Result<()> {
        match fs::rename(from, to).await {
            Ok(()) => Ok(()),
            // EXDEV on Linux and macOS
            Err(e) if e.raw_os_error() == Some(18) => {
                debug!("Cross-device move, copying {} to {}", from.display(), to.display());
                fs::copy(from, to).await?;
                fs::remove_file(from).await
            }
            Err(e) => Err(e),
        }
    }

    /// Create a directory (and parents) if it does not exist yet.
    /// Returns `true` when something was created.
    pub async fn ensure_dir(dir: &Path) -> io::Result<bool> {
        if fs::metadata(dir).await.map(|m| m.is_dir()).unwrap_or(false) {
            return Ok(false);
        }
        fs::create_dir_all(dir).await?;
        Ok(true)
    }
}
