//! # Reconciler Module
//!
//! Splits the reconciliation work into submodules:
//! - `media_reconciler`: main orchestrator, one entry point per task
//! - `path_translator`: sidecar tree <-> originals tree path algebra
//! - `matcher`: sidecar to media stack resolution
//! - `classifier`: private / archived record selection
//! - `primary`: primary file of a stack
//! - `renamer`: canonical name planning
//! - `organizer`: year/month folder placement
//! - `orphans`: sidecars without media

pub mod classifier;
pub mod matcher;
pub mod media_reconciler;
pub mod organizer;
pub mod orphans;
pub mod path_translator;
pub mod primary;
pub mod renamer;

pub use classifier::Classification;
pub use matcher::Matcher;
pub use media_reconciler::{Reconciler, Task};
pub use organizer::Organizer;
pub use path_translator::PathTranslator;
pub use renamer::{RenamePlan, RenameProposal, Renamer};
