//! Operator confirmation.
//!
//! Every batch asks the operator before touching a file. The [`Prompt`] trait
//! is the seam to whatever front-end is asking; [`Confirmation`] tracks the
//! "yes to all" state across one batch.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Answer to a per-file question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Skip this file.
    No,
    /// Apply to this file.
    Yes,
    /// Apply to this file and every following one without asking again.
    YesToAll,
    /// Stop the batch. Work already done is kept.
    Cancel,
}
impl Choice {
    /// Every choice, in the order they're offered.
    pub const ALL: [Choice; 4] = [Choice::No, Choice::Yes, Choice::YesToAll, Choice::Cancel];

    pub fn label(&self) -> &'static str {
        match self {
            Choice::No => "No",
            Choice::Yes => "Yes",
            Choice::YesToAll => "Yes To All",
            Choice::Cancel => "Cancel",
        }
    }
}
impl Display for Choice {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.label())
    }
}

/// Front-end for asking the operator questions.
pub trait Prompt {
    /// Presents `message` and one of [`Choice::ALL`].
    fn choose(&mut self, message: &str) -> Choice;

    /// Binary continue/cancel question. Returns `true` to continue.
    fn confirm(&mut self, message: &str) -> bool;
}

/// Answers "yes to all" without asking. Used for unattended runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoConfirm;
impl Prompt for AutoConfirm {
    fn choose(&mut self, _message: &str) -> Choice {
        Choice::YesToAll
    }

    fn confirm(&mut self, _message: &str) -> bool {
        true
    }
}

/// What to do with the current file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Skip,
    Cancel,
}

/// Per-batch confirmation state.
pub struct Confirmation<'p> {
    prompt: &'p mut dyn Prompt,
    yes_to_all: bool,
}
impl<'p> Confirmation<'p> {
    pub fn new(prompt: &'p mut dyn Prompt) -> Self {
        Self { prompt, yes_to_all: false }
    }

    /// Asks about one file, unless the operator already chose "yes to all".
    pub fn ask(&mut self, message: &str) -> Decision {
        if self.yes_to_all {
            return Decision::Proceed;
        }
        match self.prompt.choose(message) {
            Choice::No => Decision::Skip,
            Choice::Yes => Decision::Proceed,
            Choice::YesToAll => {
                self.yes_to_all = true;
                Decision::Proceed
            },
            Choice::Cancel => Decision::Cancel,
        }
    }
}
