//! # Renamer Module
//!
//! Plans canonical names for media stacks.
//!
//! The canonical base name is the capture time as `yyyyMMdd_HHmmss_` (UTC)
//! followed by the checksum of the stack's primary file, for example
//! `20030711_140833_F7C9F04`. Every file of the stack gets the same base
//! name and keeps its own extension.

use crate::{
    checksum::HashAlgorithm,
    error::{ReconcileError, Result},
    file_manager::FileManager,
    reconciler::{matcher::Matcher, primary::select_primary},
    sidecar,
};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One file to rename within its directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameProposal {
    pub path: PathBuf,
    pub new_base_name: String,
}

impl RenameProposal {
    /// Same directory, new base name, same final extension
    pub fn new_path(&self) -> PathBuf {
        let file_name = match self.path.extension() {
            Some(ext) => format!("{}.{}", self.new_base_name, ext.to_string_lossy()),
            None => self.new_base_name.clone(),
        };
        self.path.with_file_name(file_name)
    }
}

/// What planning found for one sidecar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanOutcome {
    /// Proposals for the stack members not yet named canonically (may be empty)
    Proposals(Vec<RenameProposal>),
    /// No media for this sidecar
    Orphaned,
    /// Media exist, but none of them is a format that can name the stack
    NoPrimary,
    /// The record has no capture time to build a name from
    UnknownCaptureTime,
}

/// Proposals for a whole batch
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenamePlan {
    pub proposals: Vec<RenameProposal>,
    /// The orphan sidecar that stopped planning, if any
    pub halted_at: Option<PathBuf>,
    /// Sidecars skipped for lack of a capture time
    pub undated: Vec<PathBuf>,
    /// Sidecars skipped because no stack member has a known media format
    pub no_primary: Vec<PathBuf>,
}

/// `yyyyMMdd_HHmmss_` prefix of a canonical name
pub fn date_prefix(taken_at: &DateTime<Utc>) -> String {
    taken_at.format("%Y%m%d_%H%M%S_").to_string()
}

pub struct Renamer<'a> {
    matcher: Matcher<'a>,
    hash_algorithm: HashAlgorithm,
}

impl<'a> Renamer<'a> {
    pub fn new(matcher: Matcher<'a>, hash_algorithm: HashAlgorithm) -> Self {
        Self { matcher, hash_algorithm }
    }

    /// Plan the renames of the stack belonging to `sidecar_path`
    pub async fn plan_rename(&self, sidecar_path: &Path) -> Result<PlanOutcome> {
        let stack = self.matcher.find_matches(sidecar_path).await?;
        if stack.is_empty() {
            return Ok(PlanOutcome::Orphaned);
        }
        let Some(primary) = select_primary(&stack) else {
            return Ok(PlanOutcome::NoPrimary);
        };

        let record = sidecar::read_record(sidecar_path).await?;
        let Some(taken_at) = record.taken_at.known() else {
            return Ok(PlanOutcome::UnknownCaptureTime);
        };

        let bytes = tokio::fs::read(primary).await.map_err(|source| ReconcileError::Read {
            path: primary.to_path_buf(),
            source,
        })?;
        let target = format!("{}{}", date_prefix(&taken_at), self.hash_algorithm.checksum(&bytes));
        debug!("Canonical name for {}: {} (from {})", sidecar_path.display(), target, primary.display());

        let proposals = stack
            .iter()
            .filter(|path| FileManager::base_name(path).as_deref() != Some(target.as_str()))
            .map(|path| RenameProposal {
                path: path.clone(),
                new_base_name: target.clone(),
            })
            .collect();

        Ok(PlanOutcome::Proposals(proposals))
    }

    /// Plan every sidecar in order; the first orphan halts planning
    pub async fn plan_renames(&self, sidecar_paths: &[PathBuf]) -> Result<RenamePlan> {
        let mut plan = RenamePlan::default();

        for sidecar_path in sidecar_paths {
            match self.plan_rename(sidecar_path).await? {
                PlanOutcome::Proposals(proposals) => plan.proposals.extend(proposals),
                PlanOutcome::UnknownCaptureTime => {
                    warn!("No capture time in {}, not renaming its media", sidecar_path.display());
                    plan.undated.push(sidecar_path.clone());
                }
                PlanOutcome::NoPrimary => {
                    warn!(
                        "No known media format among the files of {}, not renaming them",
                        sidecar_path.display()
                    );
                    plan.no_primary.push(sidecar_path.clone());
                }
                PlanOutcome::Orphaned => {
                    warn!("No media found for {}, stopping the rename batch", sidecar_path.display());
                    plan.halted_at = Some(sidecar_path.clone());
                    break;
                }
            }
        }

        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconciler::path_translator::PathTranslator;
    use chrono::TimeZone;
    use tempfile::TempDir;

    const DATED: &str = "TakenAt: 2003-07-11T14:08:33Z\n";

    struct Library {
        _temp_dir: TempDir,
        translator: PathTranslator,
    }

    impl Library {
        fn new() -> Self {
            let temp_dir = TempDir::new().unwrap();
            let translator = PathTranslator::new(temp_dir.path().join("originals"), temp_dir.path().join("sidecar"));
            Self { _temp_dir: temp_dir, translator }
        }

        fn write(&self, root: &Path, relative: &str, content: &[u8]) -> PathBuf {
            let path = root.join(relative);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, content).unwrap();
            path
        }

        fn media(&self, relative: &str, content: &[u8]) -> PathBuf {
            self.write(self.translator.originals_root(), relative, content)
        }

        fn sidecar(&self, relative: &str, content: &str) -> PathBuf {
            self.write(self.translator.sidecar_root(), relative, content.as_bytes())
        }

        fn renamer(&self) -> Renamer<'_> {
            Renamer::new(Matcher::new(&self.translator), HashAlgorithm::Crc32c)
        }
    }

    #[test]
    fn test_date_prefix_is_zero_padded() {
        let at = Utc.with_ymd_and_hms(2003, 7, 1, 4, 8, 3).unwrap();
        assert_eq!(date_prefix(&at), "20030701_040803_");
    }

    #[test]
    fn test_new_path_keeps_extension() {
        let proposal = RenameProposal {
            path: PathBuf::from("/o/2022/IMG_1.JPG"),
            new_base_name: "20220101_000000_ABC".to_string(),
        };
        assert_eq!(proposal.new_path(), PathBuf::from("/o/2022/20220101_000000_ABC.JPG"));
    }

    #[tokio::test]
    async fn test_stack_named_from_primary() {
        let library = Library::new();
        library.media("2003/07/IMG_1.jpg", b"jpeg bytes");
        library.media("2003/07/IMG_1.raw", b"123456789");
        let sidecar = library.sidecar("2003/07/IMG_1.yml", DATED);

        let outcome = library.renamer().plan_rename(&sidecar).await.unwrap();
        let PlanOutcome::Proposals(proposals) = outcome else {
            panic!("expected proposals, got {outcome:?}");
        };

        // The RAW is primary: crc32c("123456789") = E3069283
        assert_eq!(proposals.len(), 2);
        assert!(proposals.iter().all(|p| p.new_base_name == "20030711_140833_E3069283"));
    }

    #[tokio::test]
    async fn test_already_canonical_is_not_proposed() {
        let library = Library::new();
        library.media("2003/07/20030711_140833_E3069283.jpg", b"123456789");
        let sidecar = library.sidecar("2003/07/20030711_140833_E3069283.yml", DATED);

        let outcome = library.renamer().plan_rename(&sidecar).await.unwrap();
        assert_eq!(outcome, PlanOutcome::Proposals(Vec::new()));
    }

    #[tokio::test]
    async fn test_unknown_capture_time() {
        let library = Library::new();
        library.media("x/IMG_2.jpg", b"data");
        let sidecar = library.sidecar("x/IMG_2.yml", "Title: no date\n");

        let outcome = library.renamer().plan_rename(&sidecar).await.unwrap();
        assert_eq!(outcome, PlanOutcome::UnknownCaptureTime);
    }

    #[tokio::test]
    async fn test_orphan_halts_the_batch() {
        let library = Library::new();
        library.media("a/A.jpg", b"a");
        library.media("c/C.jpg", b"c");
        let a = library.sidecar("a/A.yml", DATED);
        let b = library.sidecar("b/B.yml", DATED);
        let c = library.sidecar("c/C.yml", DATED);

        let plan = library.renamer().plan_renames(&[a.clone(), b.clone(), c]).await.unwrap();

        assert_eq!(plan.halted_at, Some(b));
        assert_eq!(plan.proposals.len(), 1);
        assert_eq!(plan.proposals[0].path, library.translator.originals_root().join("a/A.jpg"));
    }

    #[tokio::test]
    async fn test_undated_sidecars_are_collected() {
        let library = Library::new();
        library.media("a/A.jpg", b"a");
        library.media("b/B.jpg", b"b");
        let a = library.sidecar("a/A.yml", "Private: false\n");
        let b = library.sidecar("b/B.yml", DATED);

        let plan = library.renamer().plan_renames(&[a.clone(), b]).await.unwrap();

        assert_eq!(plan.undated, vec![a]);
        assert_eq!(plan.proposals.len(), 1);
        assert!(plan.halted_at.is_none());
    }

    #[tokio::test]
    async fn test_unrecognised_stack_does_not_halt() {
        let library = Library::new();
        library.media("a/CLIP.xyz", b"clip");
        library.media("b/B.jpg", b"b");
        let clip = library.sidecar("a/CLIP.yml", DATED);
        let b = library.sidecar("b/B.yml", DATED);

        let renamer = library.renamer();
        assert_eq!(renamer.plan_rename(&clip).await.unwrap(), PlanOutcome::NoPrimary);

        let plan = renamer.plan_renames(&[clip.clone(), b]).await.unwrap();
        assert!(plan.halted_at.is_none());
        assert_eq!(plan.no_primary, vec![clip]);
        assert_eq!(plan.proposals.len(), 1);
        assert_eq!(plan.proposals[0].path, library.translator.originals_root().join("b/B.jpg"));
    }

    #[tokio::test]
    async fn test_3gp_clip_is_renamed() {
        let library = Library::new();
        library.media("a/CLIP.3gp", b"123456789");
        let clip = library.sidecar("a/CLIP.yml", DATED);

        let outcome = library.renamer().plan_rename(&clip).await.unwrap();
        let PlanOutcome::Proposals(proposals) = outcome else {
            panic!("expected proposals, got {outcome:?}");
        };
        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].new_base_name, "20030711_140833_E3069283");
    }
}
