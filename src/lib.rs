//! # Media Reconciler Library
//!
//! Keeps a PhotoPrism originals tree consistent with its sidecar tree.
//!
//! ## Module layout:
//! - `config`: configuration layering and validation
//! - `error`: library error type
//! - `sidecar`: YAML sidecar record decoding
//! - `file_manager`: directory walks, listings and moves
//! - `checksum`: content digests for canonical names
//! - `prompt`: the confirm / skip / confirm-all gate
//! - `executor`: move and rename batches
//! - `reconciler`: matching, classification, planning and the task orchestrator
//! - `progress` / `json_output`: progress bars, batch counters and JSON events
//!
//! ## Usage:
//! ```rust,no_run
//! use media_reconciler::{Config, Reconciler, Task, TerminalPrompter};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load(None).await?;
//! config.validate()?;
//! let stats = Reconciler::new(config).run(Task::MovePrivate, &mut TerminalPrompter).await?;
//! println!("{}", stats.format_summary("Moved"));
//! # Ok(())
//! # }
//! ```

pub mod checksum;
pub mod config;
pub mod error;
pub mod executor;
pub mod file_manager;
pub mod json_output;
pub mod progress;
pub mod prompt;
pub mod reconciler;
pub mod sidecar;

pub use checksum::HashAlgorithm;
pub use config::Config;
pub use error::ReconcileError;
pub use progress::BatchStats;
pub use prompt::{ConfirmState, Prompter, TerminalPrompter};
pub use reconciler::{Reconciler, Task};
pub use sidecar::SidecarRecord;
