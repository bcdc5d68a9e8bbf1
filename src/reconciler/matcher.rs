//! # Matcher Module
//!
//! Resolves a sidecar to its stack of media files.
//!
//! A stack is every file in the translated directory whose name minus the
//! final extension equals the sidecar's; `IMG_1.jpg` and `IMG_1.raw` both
//! belong to `IMG_1.yml`. A missing media directory is the ordinary orphan
//! case and yields an empty stack.

use crate::{
    error::Result,
    file_manager::FileManager,
    reconciler::path_translator::PathTranslator,
};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct Matcher<'a> {
    translator: &'a PathTranslator,
}

impl<'a> Matcher<'a> {
    pub fn new(translator: &'a PathTranslator) -> Self {
        Self { translator }
    }

    /// Media files belonging to `sidecar_path`, possibly none
    pub async fn find_matches(&self, sidecar_path: &Path) -> Result<Vec<PathBuf>> {
        let media_dir = self.translator.sidecar_to_media_dir(sidecar_path)?;
        let Some(base_name) = FileManager::base_name(sidecar_path) else {
            return Ok(Vec::new());
        };

        let candidates = match FileManager::list_files(&media_dir).await {
            Ok(files) => files,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No media folder {} for {}", media_dir.display(), sidecar_path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let stack: Vec<PathBuf> = candidates
            .into_iter()
            .filter(|candidate| FileManager::base_name(candidate).as_deref() == Some(base_name.as_str()))
            .collect();

        if stack.is_empty() {
            debug!("No media found for {}", sidecar_path.display());
        }

        Ok(stack)
    }

    /// All stacks of `sidecar_paths`, flattened in input order
    pub async fn find_all(&self, sidecar_paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut media = Vec::new();
        for sidecar_path in sidecar_paths {
            media.extend(self.find_matches(sidecar_path).await?);
        }
        Ok(media)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReconcileError;
    use tempfile::TempDir;

    struct Library {
        _temp_dir: TempDir,
        originals: PathBuf,
        sidecar: PathBuf,
    }

    impl Library {
        fn new() -> Self {
            let temp_dir = TempDir::new().unwrap();
            let originals = temp_dir.path().join("originals");
            let sidecar = temp_dir.path().join("sidecar");
            std::fs::create_dir_all(&originals).unwrap();
            std::fs::create_dir_all(&sidecar).unwrap();
            Self { _temp_dir: temp_dir, originals, sidecar }
        }

        fn media(&self, relative: &str) -> PathBuf {
            let path = self.originals.join(relative);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, b"media").unwrap();
            path
        }

        fn translator(&self) -> PathTranslator {
            PathTranslator::new(&self.originals, &self.sidecar)
        }
    }

    #[tokio::test]
    async fn test_single_match() {
        let library = Library::new();
        let jpg = library.media("2022/06/img.jpg");
        library.media("2022/06/other.jpg");

        let translator = library.translator();
        let stack = Matcher::new(&translator)
            .find_matches(&library.sidecar.join("2022/06/img.yml"))
            .await
            .unwrap();

        assert_eq!(stack, vec![jpg]);
    }

    #[tokio::test]
    async fn test_stack_of_formats() {
        let library = Library::new();
        library.media("2022/06/img.jpg");
        library.media("2022/06/img.raw");
        library.media("2022/06/img.mp4");
        library.media("2022/06/img.00002.jpg");
        std::fs::create_dir_all(library.originals.join("2022/06/img.dir")).unwrap();

        let translator = library.translator();
        let stack = Matcher::new(&translator)
            .find_matches(&library.sidecar.join("2022/06/img.yml"))
            .await
            .unwrap();

        assert_eq!(stack.len(), 3);
    }

    #[tokio::test]
    async fn test_missing_directory_is_empty() {
        let library = Library::new();
        let translator = library.translator();
        let stack = Matcher::new(&translator)
            .find_matches(&library.sidecar.join("1999/01/gone.yml"))
            .await
            .unwrap();

        assert!(stack.is_empty());
    }

    #[tokio::test]
    async fn test_foreign_path_is_rejected() {
        let library = Library::new();
        let translator = library.translator();
        let err = Matcher::new(&translator)
            .find_matches(Path::new("/somewhere/else.yml"))
            .await
            .unwrap_err();

        assert!(matches!(err, ReconcileError::InvalidPath { .. }));
    }

    #[tokio::test]
    async fn test_find_all_preserves_order() {
        let library = Library::new();
        let b = library.media("b/b.jpg");
        let a = library.media("a/a.jpg");

        let translator = library.translator();
        let media = Matcher::new(&translator)
            .find_all(&[
                library.sidecar.join("b/b.yml"),
                library.sidecar.join("missing/x.yml"),
                library.sidecar.join("a/a.yml"),
            ])
            .await
            .unwrap();

        assert_eq!(media, vec![b, a]);
    }
}
