//! # Move / Rename Executors
//!
//! Apply filesystem moves and renames one at a time, each behind the
//! confirmation gate.
//!
//! ## Flow of a move batch:
//! 1. Create the target directory if needed
//! 2. Compute every destination (flattened, or restructured under the
//!    target after stripping a prefix)
//! 3. Drop items already in place, so re-running a batch is a no-op
//! 4. For each remaining item: log from/to, refuse to overwrite, ask, apply
//! 5. Log the batch summary and hand the gate state back to the caller
//!
//! There is no rollback. An error stops the batch; what was applied stays.

use crate::{
    error::{ReconcileError, Result},
    file_manager::FileManager,
    json_output::{Action, JsonMessage},
    progress::BatchStats,
    prompt::{ConfirmState, Decision, GateLabels, Prompter, MOVE_LABELS, RENAME_LABELS},
    reconciler::renamer::RenameProposal,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Switches shared by both executors
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutorOptions {
    pub dry_run: bool,
    pub json_output: bool,
}

/// Result of one batch: the gate state to thread into the next batch, and counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    pub state: ConfirmState,
    pub stats: BatchStats,
}

/// Compute where `source` goes.
///
/// With `strip_prefix` the directory structure below the prefix is kept
/// under `target_dir`; without it the file lands directly in `target_dir`.
pub fn destination_for(source: &Path, target_dir: &Path, strip_prefix: Option<&Path>) -> Result<PathBuf> {
    let file_name = source.file_name().ok_or_else(|| {
        ReconcileError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("not a file path: {}", source.display()),
        ))
    })?;

    match strip_prefix {
        Some(prefix) => {
            let relative = source.strip_prefix(prefix).map_err(|_| ReconcileError::InvalidPath {
                path: source.to_path_buf(),
                expected_prefix: prefix.to_path_buf(),
            })?;
            let subdir = relative.parent().unwrap_or_else(|| Path::new(""));
            Ok(target_dir.join(subdir).join(file_name))
        }
        None => Ok(target_dir.join(file_name)),
    }
}

/// Ask about (or auto-apply) one operation and perform it
struct Step<'a> {
    action: Action,
    labels: &'a GateLabels,
    index: usize,
    total: usize,
    from: &'a Path,
    to: &'a Path,
}

async fn run_step(
    step: Step<'_>,
    state: ConfirmState,
    prompter: &mut dyn Prompter,
    options: ExecutorOptions,
    stats: &mut BatchStats,
) -> Result<ConfirmState> {
    let (verb, gerund) = match step.action {
        Action::Move => ("Move", "moving"),
        Action::Rename => ("Rename", "renaming"),
    };

    info!("---");
    info!("{}/{}", step.index, step.total);
    info!("{} file", verb);
    info!("| from {}", step.from.display());
    info!("| to   {}", step.to.display());

    if options.json_output {
        JsonMessage::Proposal {
            action: step.action,
            index: step.index,
            total: step.total,
            from: step.from.to_path_buf(),
            to: step.to.to_path_buf(),
        }
        .emit();
    }

    if tokio::fs::symlink_metadata(step.to).await.is_ok() {
        warn!("Destination already exists, not touching {}", step.to.display());
        stats.conflicts += 1;
        if options.json_output {
            JsonMessage::Skipped {
                action: step.action,
                from: step.from.to_path_buf(),
                to: step.to.to_path_buf(),
                reason: "destination exists".to_string(),
            }
            .emit();
        }
        return Ok(state);
    }

    let (decision, next_state) = state.resolve(prompter, step.labels)?;
    if next_state == ConfirmState::Auto && state == ConfirmState::Prompt {
        info!("Auto mode: the rest of the batch goes through without asking");
    }

    match decision {
        Decision::Proceed => {
            if options.dry_run {
                info!("Dry run: would {} {}", verb.to_lowercase(), step.from.display());
            } else {
                if let Some(parent) = step.to.parent() {
                    FileManager::ensure_dir(parent).await?;
                }
                FileManager::move_file(step.from, step.to).await?;
            }
            stats.applied += 1;
            if options.json_output {
                JsonMessage::Applied {
                    action: step.action,
                    from: step.from.to_path_buf(),
                    to: step.to.to_path_buf(),
                    dry_run: options.dry_run,
                }
                .emit();
            }
        }
        Decision::Skip => {
            info!("NOT {} file from {} to {}", gerund, step.from.display(), step.to.display());
            stats.skipped += 1;
            if options.json_output {
                JsonMessage::Skipped {
                    action: step.action,
                    from: step.from.to_path_buf(),
                    to: step.to.to_path_buf(),
                    reason: "skipped by user".to_string(),
                }
                .emit();
            }
        }
    }

    Ok(next_state)
}

/// Moves files into a target directory
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveExecutor {
    options: ExecutorOptions,
}

impl MoveExecutor {
    pub fn new(options: ExecutorOptions) -> Self {
        Self { options }
    }

    /// Move `paths` into `target_dir`, one confirmation per file
    pub async fn move_files(
        &self,
        paths: &[PathBuf],
        target_dir: &Path,
        strip_prefix: Option<&Path>,
        state: ConfirmState,
        prompter: &mut dyn Prompter,
    ) -> Result<BatchOutcome> {
        let mut stats = BatchStats {
            total: paths.len(),
            ..Default::default()
        };

        if self.options.dry_run {
            if !target_dir.is_dir() {
                info!("Dry run: would create target folder {}", target_dir.display());
            }
        } else if FileManager::ensure_dir(target_dir).await? {
            info!("Target folder does not exist, creating {}", target_dir.display());
        }

        let mut moves = Vec::new();
        for source in paths {
            if source.parent() == Some(target_dir) {
                debug!("Already in {}: {}", target_dir.display(), source.display());
                stats.already_in_place += 1;
                continue;
            }
            let destination = destination_for(source, target_dir, strip_prefix)?;
            if destination == *source {
                debug!("Already in place: {}", source.display());
                stats.already_in_place += 1;
                continue;
            }
            moves.push((source, destination));
        }

        if stats.already_in_place > 0 {
            info!("{} files are already in place", stats.already_in_place);
        }
        info!("Found {} files that need moving", moves.len());

        let total = moves.len();
        let mut state = state;
        for (index, (source, destination)) in moves.iter().enumerate() {
            let step = Step {
                action: Action::Move,
                labels: &MOVE_LABELS,
                index: index + 1,
                total,
                from: source,
                to: destination,
            };
            state = run_step(step, state, prompter, self.options, &mut stats).await?;
        }

        info!("---");
        info!("Finished moving files: {}", stats.format_summary("Moved"));
        info!("---");

        Ok(BatchOutcome { state, stats })
    }
}

/// Renames files in place
#[derive(Debug, Clone, Copy, Default)]
pub struct RenameExecutor {
    options: ExecutorOptions,
}

impl RenameExecutor {
    pub fn new(options: ExecutorOptions) -> Self {
        Self { options }
    }

    /// Rename every proposal, one confirmation per file
    pub async fn rename_files(
        &self,
        proposals: &[RenameProposal],
        state: ConfirmState,
        prompter: &mut dyn Prompter,
    ) -> Result<BatchOutcome> {
        let mut stats = BatchStats {
            total: proposals.len(),
            ..Default::default()
        };
        let total = proposals.len();
        info!("Found {} files that need renaming", total);

        let mut state = state;
        for (index, proposal) in proposals.iter().enumerate() {
            let destination = proposal.new_path();
            let step = Step {
                action: Action::Rename,
                labels: &RENAME_LABELS,
                index: index + 1,
                total,
                from: &proposal.path,
                to: &destination,
            };
            state = run_step(step, state, prompter, self.options, &mut stats).await?;
        }

        info!("---");
        info!("Finished renaming files: {}", stats.format_summary("Renamed"));
        info!("---");

        Ok(BatchOutcome { state, stats })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompter;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, path.to_string_lossy().as_bytes()).unwrap();
    }

    #[test]
    fn test_destination_flattened() {
        let dest = destination_for(Path::new("/o/2022/06/img.jpg"), Path::new("/o/private"), None).unwrap();
        assert_eq!(dest, PathBuf::from("/o/private/img.jpg"));
    }

    #[test]
    fn test_destination_restructured() {
        let dest = destination_for(
            Path::new("/s/sidecar/example/IMG_1.yml"),
            Path::new("/lost"),
            Some(Path::new("/s/sidecar")),
        )
        .unwrap();
        assert_eq!(dest, PathBuf::from("/lost/example/IMG_1.yml"));
    }

    #[test]
    fn test_destination_outside_prefix() {
        let err = destination_for(Path::new("/x/a.yml"), Path::new("/lost"), Some(Path::new("/s"))).unwrap_err();
        assert!(matches!(err, ReconcileError::InvalidPath { .. }));
    }

    #[tokio::test]
    async fn test_move_files_with_confirmations() {
        let temp_dir = TempDir::new().unwrap();
        let originals = temp_dir.path().join("originals");
        let a = originals.join("2022/06/a.jpg");
        let b = originals.join("2022/06/b.jpg");
        touch(&a);
        touch(&b);
        let target = originals.join("private");

        // Move the first, skip the second
        let mut prompter = ScriptedPrompter::new([0, 1]);
        let outcome = MoveExecutor::default()
            .move_files(&[a.clone(), b.clone()], &target, None, ConfirmState::Prompt, &mut prompter)
            .await
            .unwrap();

        assert_eq!(outcome.state, ConfirmState::Prompt);
        assert_eq!(outcome.stats.applied, 1);
        assert_eq!(outcome.stats.skipped, 1);
        assert!(target.join("a.jpg").exists());
        assert!(!a.exists());
        assert!(b.exists());
    }

    #[tokio::test]
    async fn test_move_all_switches_to_auto() {
        let temp_dir = TempDir::new().unwrap();
        let sources: Vec<PathBuf> = (0..3).map(|i| temp_dir.path().join(format!("in/{i}.jpg"))).collect();
        sources.iter().for_each(|p| touch(p));
        let target = temp_dir.path().join("out");

        let mut prompter = ScriptedPrompter::new([2]);
        let outcome = MoveExecutor::default()
            .move_files(&sources, &target, None, ConfirmState::Prompt, &mut prompter)
            .await
            .unwrap();

        assert_eq!(outcome.state, ConfirmState::Auto);
        assert_eq!(outcome.stats.applied, 3);
        assert_eq!(prompter.asked, 1);
    }

    #[tokio::test]
    async fn test_move_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("in/a.jpg");
        touch(&source);
        let target = temp_dir.path().join("out");
        let executor = MoveExecutor::default();

        let first = executor
            .move_files(&[source.clone()], &target, None, ConfirmState::Auto, &mut ScriptedPrompter::default())
            .await
            .unwrap();
        assert_eq!(first.stats.applied, 1);

        // Second run over the moved set
        let moved = vec![target.join("a.jpg")];
        let second = executor
            .move_files(&moved, &target, None, ConfirmState::Prompt, &mut ScriptedPrompter::default())
            .await
            .unwrap();
        assert_eq!(second.stats.applied, 0);
        assert_eq!(second.stats.already_in_place, 1);
        assert_eq!(second.stats.pending(), 0);
    }

    #[tokio::test]
    async fn test_move_restructured_creates_subdirs() {
        let temp_dir = TempDir::new().unwrap();
        let sidecar_root = temp_dir.path().join("sidecar");
        let orphan = sidecar_root.join("example/deep/IMG_1.yml");
        touch(&orphan);
        let lost = temp_dir.path().join("lost");

        let outcome = MoveExecutor::default()
            .move_files(&[orphan.clone()], &lost, Some(sidecar_root.as_path()), ConfirmState::Auto, &mut ScriptedPrompter::default())
            .await
            .unwrap();

        assert_eq!(outcome.stats.applied, 1);
        assert!(lost.join("example/deep/IMG_1.yml").exists());
    }

    #[tokio::test]
    async fn test_move_never_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("in/a.jpg");
        let existing = temp_dir.path().join("out/a.jpg");
        touch(&source);
        touch(&existing);

        let outcome = MoveExecutor::default()
            .move_files(&[source.clone()], &temp_dir.path().join("out"), None, ConfirmState::Auto, &mut ScriptedPrompter::default())
            .await
            .unwrap();

        assert_eq!(outcome.stats.conflicts, 1);
        assert!(source.exists());
        assert_eq!(std::fs::read(&existing).unwrap(), existing.to_string_lossy().as_bytes());
    }

    #[tokio::test]
    async fn test_dry_run_mutates_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("in/a.jpg");
        touch(&source);
        let target = temp_dir.path().join("out");
        let executor = MoveExecutor::new(ExecutorOptions { dry_run: true, json_output: false });

        let outcome = executor
            .move_files(&[source.clone()], &target, None, ConfirmState::Auto, &mut ScriptedPrompter::default())
            .await
            .unwrap();

        assert_eq!(outcome.stats.applied, 1);
        assert!(source.exists());
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn test_rename_files() {
        let temp_dir = TempDir::new().unwrap();
        let jpg = temp_dir.path().join("IMG_1.jpg");
        let raw = temp_dir.path().join("IMG_1.raw");
        touch(&jpg);
        touch(&raw);

        let proposals = vec![
            RenameProposal { path: jpg.clone(), new_base_name: "20220601_101010_ABC".to_string() },
            RenameProposal { path: raw.clone(), new_base_name: "20220601_101010_ABC".to_string() },
        ];

        let mut prompter = ScriptedPrompter::new([1, 0]);
        let outcome = RenameExecutor::default()
            .rename_files(&proposals, ConfirmState::Prompt, &mut prompter)
            .await
            .unwrap();

        assert_eq!(outcome.stats.skipped, 1);
        assert_eq!(outcome.stats.applied, 1);
        assert!(jpg.exists());
        assert!(temp_dir.path().join("20220601_101010_ABC.raw").exists());
    }

    #[tokio::test]
    async fn test_prompt_failure_stops_batch() {
        let temp_dir = TempDir::new().unwrap();
        let sources = vec![temp_dir.path().join("in/a.jpg"), temp_dir.path().join("in/b.jpg")];
        sources.iter().for_each(|p| touch(p));

        // One answer for two files: the second prompt fails
        let mut prompter = ScriptedPrompter::new([0]);
        let result = MoveExecutor::default()
            .move_files(&sources, &temp_dir.path().join("out"), None, ConfirmState::Prompt, &mut prompter)
            .await;

        assert!(result.is_err());
        // No rollback of what was already applied
        assert!(temp_dir.path().join("out/a.jpg").exists());
        assert!(sources[1].exists());
    }
}
