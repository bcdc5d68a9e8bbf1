//! # Media Reconciler Main Orchestrator
//!
//! Runs one task end to end: walk the sidecar tree, select what the task
//! cares about, resolve the media and hand the batch to an executor.
//!
//! ## Tasks:
//! - `MovePrivate` / `MoveArchived`: media of flagged records into
//!   `originals/private` or `originals/archived`
//! - `Orphans`: sidecars without media into the lost-and-found root,
//!   keeping their sub-structure
//! - `Organise`: normal media into `originals/{year}/{MM}`
//! - `Rename`: every stack to its canonical name
//!
//! Everything runs sequentially. The confirmation state starts from
//! `auto_confirm` and is threaded through every batch of the task.

use crate::{
    config::Config,
    error::Result,
    executor::{ExecutorOptions, MoveExecutor, RenameExecutor},
    file_manager::FileManager,
    json_output::JsonMessage,
    progress::BatchStats,
    prompt::{ConfirmState, Prompter},
    reconciler::{
        classifier::{self, Classification},
        matcher::Matcher,
        organizer::Organizer,
        orphans,
        path_translator::PathTranslator,
        renamer::Renamer,
    },
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Something the user can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    MovePrivate,
    MoveArchived,
    Orphans,
    Organise,
    Rename,
}

impl Task {
    pub const ALL: [Task; 5] = [
        Task::MovePrivate,
        Task::MoveArchived,
        Task::Orphans,
        Task::Organise,
        Task::Rename,
    ];

    /// Menu entry
    pub fn label(&self) -> &'static str {
        match self {
            Self::MovePrivate => "Move private media to originals/private",
            Self::MoveArchived => "Move archived media to originals/archived",
            Self::Orphans => "Move orphan sidecars to lost and found",
            Self::Organise => "Organise media into year/month folders",
            Self::Rename => "Rename media to canonical names",
        }
    }

    /// Short name used in JSON events
    pub fn name(&self) -> &'static str {
        match self {
            Self::MovePrivate => "private",
            Self::MoveArchived => "archived",
            Self::Orphans => "orphans",
            Self::Organise => "organise",
            Self::Rename => "rename",
        }
    }
}

pub struct Reconciler {
    config: Config,
    translator: PathTranslator,
}

impl Reconciler {
    pub fn new(config: Config) -> Self {
        let translator = PathTranslator::new(&config.originals_path, &config.sidecar_path);
        Self { config, translator }
    }

    fn executor_options(&self) -> ExecutorOptions {
        ExecutorOptions {
            dry_run: self.config.dry_run,
            json_output: self.config.json_output,
        }
    }

    /// Run `task` and return the counters of everything it did
    pub async fn run(&self, task: Task, prompter: &mut dyn Prompter) -> Result<BatchStats> {
        let sidecars = FileManager::walk(
            self.translator.sidecar_root(),
            Some(self.config.sidecar_extensions.as_slice()),
        )
        .await;

        self.emit_start_message(task, &sidecars);
        self.log_configuration();

        let state = ConfirmState::from_auto(self.config.auto_confirm);
        let stats = match task {
            Task::MovePrivate => {
                let media = self.find_media(&sidecars, Classification::Private).await?;
                self.move_batch(&media, &self.config.private_dir(), None, state, prompter).await?
            }
            Task::MoveArchived => {
                let media = self.find_media(&sidecars, Classification::Archived).await?;
                self.move_batch(&media, &self.config.archived_dir(), None, state, prompter).await?
            }
            Task::Orphans => self.move_orphans(&sidecars, state, prompter).await?,
            Task::Organise => self.organise(&sidecars, state, prompter).await?,
            Task::Rename => self.rename(&sidecars, state, prompter).await?,
        };

        if stats.applied > 0 && !self.config.dry_run {
            info!("💡 Re-index the library in PhotoPrism so the sidecars follow the media");
        }

        if self.config.json_output {
            JsonMessage::complete(task.name(), &stats).emit();
        }

        Ok(stats)
    }

    fn emit_start_message(&self, task: Task, sidecars: &[PathBuf]) {
        if self.config.json_output {
            JsonMessage::Start {
                task: task.name().to_string(),
                sidecars: sidecars.len(),
                dry_run: self.config.dry_run,
            }
            .emit();
        } else {
            info!("Starting task: {}", task.label());
        }
        info!("Found {} sidecar files", sidecars.len());
    }

    fn log_configuration(&self) {
        if self.config.json_output {
            return;
        }

        info!("📁 Originals: {}", self.config.originals_path.display());
        info!("📄 Sidecars: {}", self.config.sidecar_path.display());
        info!("Lost and found: {}", self.config.lost_and_found_path.display());
        info!("Checksum: {}", self.config.hash_algorithm);

        if self.config.dry_run {
            info!("Dry run mode: No files will be modified");
        }
        if self.config.auto_confirm {
            info!("Auto mode: No confirmation will be asked");
        }
    }

    /// Media stacks of the sidecars matching `classification`
    async fn find_media(&self, sidecars: &[PathBuf], classification: Classification) -> Result<Vec<PathBuf>> {
        let relevant = classifier::select_relevant(sidecars, classification, self.config.json_output).await?;
        let media = Matcher::new(&self.translator).find_all(&relevant).await?;

        info!("Found {} sidecars / {} media files", relevant.len(), media.len());
        if media.len() < relevant.len() {
            warn!(
                "Fewer media files than sidecars ({} < {}), some sidecars are orphaned",
                media.len(),
                relevant.len()
            );
        }

        Ok(media)
    }

    async fn move_batch(
        &self,
        paths: &[PathBuf],
        target_dir: &Path,
        strip_prefix: Option<&Path>,
        state: ConfirmState,
        prompter: &mut dyn Prompter,
    ) -> Result<BatchStats> {
        let outcome = MoveExecutor::new(self.executor_options())
            .move_files(paths, target_dir, strip_prefix, state, prompter)
            .await?;
        Ok(outcome.stats)
    }

    async fn move_orphans(
        &self,
        sidecars: &[PathBuf],
        state: ConfirmState,
        prompter: &mut dyn Prompter,
    ) -> Result<BatchStats> {
        let orphans = orphans::find_orphans(self.translator.originals_root(), sidecars, self.config.json_output).await;

        if self.config.json_output {
            for orphan in &orphans {
                JsonMessage::Orphan { sidecar: orphan.clone() }.emit();
            }
        }

        self.move_batch(
            &orphans,
            &self.config.lost_and_found_path,
            Some(self.translator.sidecar_root()),
            state,
            prompter,
        )
        .await
    }

    /// One move batch per canonical folder, sharing the confirmation state
    async fn organise(
        &self,
        sidecars: &[PathBuf],
        state: ConfirmState,
        prompter: &mut dyn Prompter,
    ) -> Result<BatchStats> {
        let misplaced = Organizer::new(&self.translator).find_misplaced(sidecars).await?;
        let matcher = Matcher::new(&self.translator);

        let mut by_folder: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
        let mut media_count = 0;
        for (sidecar_path, folder) in &misplaced {
            let stack = matcher.find_matches(sidecar_path).await?;
            media_count += stack.len();
            by_folder.entry(folder.clone()).or_default().extend(stack);
        }

        info!("Found {} misplaced sidecars / {} media files", misplaced.len(), media_count);
        if media_count < misplaced.len() {
            warn!(
                "Fewer media files than sidecars ({} < {}), some sidecars are orphaned",
                media_count,
                misplaced.len()
            );
        }

        let executor = MoveExecutor::new(self.executor_options());
        let mut stats = BatchStats::new();
        let mut state = state;
        for (folder, media) in &by_folder {
            let target_dir = self.translator.originals_root().join(folder);
            let outcome = executor.move_files(media, &target_dir, None, state, prompter).await?;
            state = outcome.state;
            stats.merge(&outcome.stats);
        }

        Ok(stats)
    }

    async fn rename(
        &self,
        sidecars: &[PathBuf],
        state: ConfirmState,
        prompter: &mut dyn Prompter,
    ) -> Result<BatchStats> {
        let renamer = Renamer::new(Matcher::new(&self.translator), self.config.hash_algorithm);
        let plan = renamer.plan_renames(sidecars).await?;

        if let Some(orphan) = &plan.halted_at {
            if self.config.json_output {
                JsonMessage::Orphan { sidecar: orphan.clone() }.emit();
            }
            warn!("Nothing renamed: {} has no media", orphan.display());
            warn!("Run the orphans task first, then rename again");
            return Ok(BatchStats::new());
        }

        if !plan.undated.is_empty() {
            info!("{} sidecars have no capture time and were left alone", plan.undated.len());
        }
        if !plan.no_primary.is_empty() {
            info!("{} sidecars have no media in a known format and were left alone", plan.no_primary.len());
        }

        let outcome = RenameExecutor::new(self.executor_options())
            .rename_files(&plan.proposals, state, prompter)
            .await?;
        Ok(outcome.stats)
    }
}
