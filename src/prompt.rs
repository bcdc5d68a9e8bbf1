//! # Confirmation Gate Module
//!
//! The three-way confirm / skip / confirm-all gate in front of every
//! filesystem mutation.
//!
//! `ConfirmState` is a value: it goes into each step and the next state comes
//! back out. Choosing "all" turns the state into `Auto`, which lasts for the
//! rest of the batch and for any later batch the caller hands it to.

use crate::error::{ReconcileError, Result};
use dialoguer::console::Term;
use dialoguer::Select;

/// Single-select prompt over a fixed list of choices
pub trait Prompter {
    /// Ask `message` and return the index of the selected choice
    fn ask(&mut self, message: &str, choices: &[&str]) -> Result<usize>;
}

/// Terminal prompt on stderr, so stdout stays clean for JSON output
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&mut self, message: &str, choices: &[&str]) -> Result<usize> {
        Select::new()
            .with_prompt(message)
            .items(choices)
            .default(0)
            .interact_on(&Term::stderr())
            .map_err(|e| ReconcileError::Prompt(e.to_string()))
    }
}

/// Labels for one kind of operation, e.g. "Move" / "Don't move" / "Move all (auto)"
#[derive(Debug, Clone, Copy)]
pub struct GateLabels {
    pub question: &'static str,
    pub proceed: &'static str,
    pub skip: &'static str,
    pub proceed_all: &'static str,
}

pub const MOVE_LABELS: GateLabels = GateLabels {
    question: "Move file?",
    proceed: "Move",
    skip: "Don't move",
    proceed_all: "Move all (auto)",
};

pub const RENAME_LABELS: GateLabels = GateLabels {
    question: "Rename file?",
    proceed: "Rename",
    skip: "Don't rename",
    proceed_all: "Rename all (auto)",
};

/// Outcome of the gate for one item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Skip,
}

/// Whether the next item still needs a confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmState {
    #[default]
    Prompt,
    Auto,
}

impl ConfirmState {
    pub fn from_auto(auto: bool) -> Self {
        if auto {
            Self::Auto
        } else {
            Self::Prompt
        }
    }

    /// Run the gate for one item and return the next state
    pub fn resolve(self, prompter: &mut dyn Prompter, labels: &GateLabels) -> Result<(Decision, ConfirmState)> {
        if self == Self::Auto {
            return Ok((Decision::Proceed, Self::Auto));
        }

        let choices = [labels.proceed, labels.skip, labels.proceed_all];
        match prompter.ask(labels.question, &choices)? {
            0 => Ok((Decision::Proceed, Self::Prompt)),
            1 => Ok((Decision::Skip, Self::Prompt)),
            2 => Ok((Decision::Proceed, Self::Auto)),
            other => Err(ReconcileError::UnhandledSelection(format!(
                "choice {} of {:?}",
                other, choices
            ))),
        }
    }
}

/// Replays a fixed list of answers
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: std::collections::VecDeque<usize>,
    pub asked: usize,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = usize>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: 0,
        }
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn ask(&mut self, message: &str, _choices: &[&str]) -> Result<usize> {
        self.asked += 1;
        self.answers
            .pop_front()
            .ok_or_else(|| ReconcileError::Prompt(format!("no scripted answer left for {:?}", message)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proceed_and_skip_keep_prompting() {
        let mut prompter = ScriptedPrompter::new([0, 1]);

        let (decision, state) = ConfirmState::Prompt.resolve(&mut prompter, &MOVE_LABELS).unwrap();
        assert_eq!((decision, state), (Decision::Proceed, ConfirmState::Prompt));

        let (decision, state) = state.resolve(&mut prompter, &MOVE_LABELS).unwrap();
        assert_eq!((decision, state), (Decision::Skip, ConfirmState::Prompt));
    }

    #[test]
    fn test_proceed_all_switches_to_auto() {
        let mut prompter = ScriptedPrompter::new([2]);

        let (decision, state) = ConfirmState::Prompt.resolve(&mut prompter, &RENAME_LABELS).unwrap();
        assert_eq!((decision, state), (Decision::Proceed, ConfirmState::Auto));

        // No more answers scripted: auto mode must not ask again
        let (decision, state) = state.resolve(&mut prompter, &RENAME_LABELS).unwrap();
        assert_eq!((decision, state), (Decision::Proceed, ConfirmState::Auto));
        assert_eq!(prompter.asked, 1);
    }

    #[test]
    fn test_unknown_choice_is_an_error() {
        let mut prompter = ScriptedPrompter::new([7]);
        let err = ConfirmState::Prompt.resolve(&mut prompter, &MOVE_LABELS).unwrap_err();
        assert!(matches!(err, ReconcileError::UnhandledSelection(_)));
    }

    #[test]
    fn test_from_auto() {
        assert_eq!(ConfirmState::from_auto(true), ConfirmState::Auto);
        assert_eq!(ConfirmState::from_auto(false), ConfirmState::Prompt);
    }
}
