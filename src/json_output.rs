//! # JSON Output Module
//!
//! Structured events on stdout for callers that drive the tool from a script.
//!
//! ## Message types:
//! - `start`: a task begins, with the number of sidecars found
//! - `proposal`: one move or rename is about to go through the gate
//! - `applied`: it went through (or would have, in dry run)
//! - `skipped`: skipped by the user or because the destination exists
//! - `orphan`: a sidecar without media
//! - `complete`: the task finished, with the batch counters
//! - `error`: the task aborted

use crate::progress::BatchStats;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Kind of filesystem operation behind a proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Move,
    Rename,
}

/// Event emitted in JSON mode
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JsonMessage {
    #[serde(rename = "start")]
    Start {
        task: String,
        sidecars: usize,
        dry_run: bool,
    },

    #[serde(rename = "proposal")]
    Proposal {
        action: Action,
        index: usize,
        total: usize,
        from: PathBuf,
        to: PathBuf,
    },

    #[serde(rename = "applied")]
    Applied {
        action: Action,
        from: PathBuf,
        to: PathBuf,
        dry_run: bool,
    },

    #[serde(rename = "skipped")]
    Skipped {
        action: Action,
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },

    #[serde(rename = "orphan")]
    Orphan { sidecar: PathBuf },

    #[serde(rename = "complete")]
    Complete {
        task: String,
        total: usize,
        applied: usize,
        skipped: usize,
        conflicts: usize,
        already_in_place: usize,
    },

    #[serde(rename = "error")]
    Error { message: String },
}

impl JsonMessage {
    /// Print the message as one JSON line on stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    pub fn complete(task: &str, stats: &BatchStats) -> Self {
        Self::Complete {
            task: task.to_string(),
            total: stats.total,
            applied: stats.applied,
            skipped: stats.skipped,
            conflicts: stats.conflicts,
            already_in_place: stats.already_in_place,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_serialization() {
        let message = JsonMessage::Proposal {
            action: Action::Rename,
            index: 1,
            total: 2,
            from: PathBuf::from("a.jpg"),
            to: PathBuf::from("b.jpg"),
        };
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["type"], "proposal");
        assert_eq!(json["action"], "rename");
        assert_eq!(json["to"], "b.jpg");
    }

    #[test]
    fn test_complete_from_stats() {
        let stats = BatchStats { total: 4, already_in_place: 1, applied: 2, skipped: 1, conflicts: 0 };
        let json = serde_json::to_value(JsonMessage::complete("private", &stats)).unwrap();
        assert_eq!(json["type"], "complete");
        assert_eq!(json["applied"], 2);
        assert_eq!(json["already_in_place"], 1);
    }
}
