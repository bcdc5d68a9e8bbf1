//! # Configuration Management Module
//!
//! Everything the reconciler needs to know about the library layout.
//!
//! ## Responsibilities:
//! - Defines the `Config` struct with the three roots and the run options
//! - Layers defaults, a JSON config file, the environment (`.env` included)
//!   and finally the CLI flags
//! - Validates the roots before any batch starts
//!
//! ## Parameters:
//! - `originals_path`: root of the media tree (PhotoPrism "originals")
//! - `sidecar_path`: root of the YAML sidecar tree (`storage/sidecar`)
//! - `lost_and_found_path`: where orphan sidecars are moved
//! - `sidecar_extensions`: sidecar file extensions, with dot (default: `.yml`)
//! - `hash_algorithm`: digest for canonical names (default: crc32c)
//! - `private_folder` / `archived_folder`: target folders under originals
//! - `dry_run`: log every operation, mutate nothing
//! - `auto_confirm`: start every batch in auto mode
//! - `json_output`: emit JSON events on stdout
//!
//! ## Environment:
//! - `ORIGINALS_PATH`
//! - `STORAGE_PATH` (the sidecar root becomes `STORAGE_PATH/sidecar`)
//! - `SIDECAR_PATH` (wins over `STORAGE_PATH`)
//! - `SIDECAR_LOST_AND_FOUND_PATH`
//!
//! ## Example:
//! ```rust,ignore
//! let config = Config::load(None).await?;
//! config.validate()?;
//! ```

use crate::checksum::HashAlgorithm;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_ORIGINALS_PATH: &str = "ORIGINALS_PATH";
pub const ENV_STORAGE_PATH: &str = "STORAGE_PATH";
pub const ENV_SIDECAR_PATH: &str = "SIDECAR_PATH";
pub const ENV_LOST_AND_FOUND_PATH: &str = "SIDECAR_LOST_AND_FOUND_PATH";

/// Configuration for media reconciliation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the media files
    pub originals_path: PathBuf,
    /// Root of the sidecar records
    pub sidecar_path: PathBuf,
    /// Destination root for orphan sidecars
    pub lost_and_found_path: PathBuf,
    /// Sidecar extensions including the leading dot
    pub sidecar_extensions: Vec<String>,
    /// Digest used for canonical file names
    pub hash_algorithm: HashAlgorithm,
    /// Folder under originals for private media
    pub private_folder: String,
    /// Folder under originals for archived media
    pub archived_folder: String,
    /// Dry run - don't actually move or rename files
    pub dry_run: bool,
    /// Skip confirmations from the first item on
    pub auto_confirm: bool,
    /// Output events as JSON for programmatic use
    pub json_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            originals_path: PathBuf::from("./data/originals"),
            sidecar_path: PathBuf::from("./data/storage/sidecar"),
            lost_and_found_path: PathBuf::from("./data/sidecar-lost-and-found"),
            sidecar_extensions: vec![".yml".to_string()],
            hash_algorithm: HashAlgorithm::Crc32c,
            private_folder: "private".to_string(),
            archived_folder: "archived".to_string(),
            dry_run: false,
            auto_confirm: false,
            json_output: false,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        for (name, path) in [
            ("Originals", &self.originals_path),
            ("Sidecar", &self.sidecar_path),
        ] {
            if !path.exists() {
                return Err(anyhow::anyhow!("{} path does not exist: {}", name, path.display()));
            }
            if !path.is_dir() {
                return Err(anyhow::anyhow!("{} path is not a directory: {}", name, path.display()));
            }
        }

        if self.originals_path == self.sidecar_path {
            return Err(anyhow::anyhow!(
                "Originals and sidecar paths must differ: {}",
                self.originals_path.display()
            ));
        }

        if self.lost_and_found_path.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("Lost and found path must not be empty"));
        }

        if self.sidecar_extensions.is_empty() {
            return Err(anyhow::anyhow!("At least one sidecar extension is required"));
        }
        if let Some(ext) = self.sidecar_extensions.iter().find(|ext| !ext.starts_with('.') || ext.len() < 2) {
            return Err(anyhow::anyhow!("Sidecar extension must start with a dot: {}", ext));
        }

        for folder in [&self.private_folder, &self.archived_folder] {
            if folder.is_empty() || folder.contains(std::path::MAIN_SEPARATOR) {
                return Err(anyhow::anyhow!("Invalid target folder name: {:?}", folder));
            }
        }

        Ok(())
    }

    /// Default location of the config file
    pub fn default_file() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("media-reconcile").join("config.json"))
    }

    /// Load configuration from file
    pub async fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    /// Defaults, then the config file, then `.env` and the process environment
    pub async fn load(file: Option<&Path>) -> Result<Self> {
        let file = file.map(Path::to_path_buf).or_else(Self::default_file);
        let mut config = match file {
            Some(ref path) => {
                debug!("Loading config from {}", path.display());
                Self::from_file(path).await?
            }
            None => Self::default(),
        };

        if let Ok(env_file) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", env_file.display());
        }
        config.apply_env(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Override the roots from environment-style lookups
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(originals) = lookup(ENV_ORIGINALS_PATH) {
            self.originals_path = PathBuf::from(originals);
        }
        if let Some(storage) = lookup(ENV_STORAGE_PATH) {
            self.sidecar_path = PathBuf::from(storage).join("sidecar");
        }
        if let Some(sidecar) = lookup(ENV_SIDECAR_PATH) {
            self.sidecar_path = PathBuf::from(sidecar);
        }
        if let Some(lost_and_found) = lookup(ENV_LOST_AND_FOUND_PATH) {
            self.lost_and_found_path = PathBuf::from(lost_and_found);
        }
    }

    pub fn private_dir(&self) -> PathBuf {
        self.originals_path.join(&self.private_folder)
    }

    pub fn archived_dir(&self) -> PathBuf {
        self.originals_path.join(&self.archived_folder)
    }
}
