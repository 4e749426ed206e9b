//! Lock states, step status and unlockability verdicts.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Progression state of a task or step.
///
/// Transitions run strictly forward: `Locked → Unlocked → Completed`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum StepState {
    /// Not yet eligible for selection or completion
    Locked,
    /// Eligible for selection and completion
    Unlocked,
    /// Done; never reverts
    Completed,
}

impl StepState {
    /// Derives the state from the pair of flags stored on tasks and steps.
    pub fn from_flags(is_unlocked: bool, is_completed: bool) -> Self {
        match (is_unlocked, is_completed) {
            (_, true) => StepState::Completed,
            (true, false) => StepState::Unlocked,
            (false, false) => StepState::Locked,
        }
    }
}

/// UI-facing status of the selected step.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum StepStatus {
    /// Waiting for the learner
    #[default]
    Idle,
    /// A completion attempt is in flight
    Processing,
    /// The last attempt passed
    Completed,
    /// The last attempt failed
    Failed,
}

/// Why a prerequisite was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrerequisiteSource {
    /// Nearest preceding sibling that is not yet completed
    PrecedingSibling,
    /// Entry in the item's explicit dependency list
    Dependency,
}

/// The item a learner has to finish before a locked one opens up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct Prerequisite {
    /// Identifier of the blocking item
    id: String,
    /// Display name of the blocking item
    name: String,
    /// How the blocker was found
    source: PrerequisiteSource,
}

impl Prerequisite {
    /// Creates a prerequisite.
    pub fn new(id: impl Into<String>, name: impl Into<String>, source: PrerequisiteSource) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            source,
        }
    }
}

/// Kind of item a verdict refers to, used to word block reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ItemKind {
    /// A task
    Task,
    /// A step
    Step,
}

/// Result of an unlockability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unlockability {
    /// The item may be selected
    Unlocked,
    /// The item is locked
    Blocked {
        /// Whether a task or a step is blocked
        item: ItemKind,
        /// What to finish first, when it can be determined
        prerequisite: Option<Prerequisite>,
    },
}

impl Unlockability {
    /// Returns true when the item may be selected.
    pub fn is_unlocked(&self) -> bool {
        matches!(self, Unlockability::Unlocked)
    }

    /// Human-readable reason for a blocked item, `None` when unlocked.
    ///
    /// # Examples
    ///
    /// ```
    /// use skillpilot_core::{ItemKind, Prerequisite, PrerequisiteSource, Unlockability};
    ///
    /// let verdict = Unlockability::Blocked {
    ///     item: ItemKind::Task,
    ///     prerequisite: Some(Prerequisite::new("t1", "Setup", PrerequisiteSource::PrecedingSibling)),
    /// };
    /// assert_eq!(verdict.reason().as_deref(), Some("You need to complete \"Setup\" first"));
    /// ```
    pub fn reason(&self) -> Option<String> {
        match self {
            Unlockability::Unlocked => None,
            Unlockability::Blocked {
                prerequisite: Some(prerequisite),
                ..
            } => Some(format!(
                "You need to complete \"{}\" first",
                prerequisite.name()
            )),
            Unlockability::Blocked {
                item,
                prerequisite: None,
            } => Some(format!("This {} is currently locked", item)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_flag_wins_over_unlocked() {
        assert_eq!(StepState::from_flags(false, true), StepState::Completed);
        assert_eq!(StepState::from_flags(true, true), StepState::Completed);
        assert_eq!(StepState::from_flags(true, false), StepState::Unlocked);
        assert_eq!(StepState::from_flags(false, false), StepState::Locked);
    }

    #[test]
    fn blocked_without_prerequisite_names_the_item() {
        let verdict = Unlockability::Blocked {
            item: ItemKind::Step,
            prerequisite: None,
        };
        assert_eq!(
            verdict.reason().as_deref(),
            Some("This step is currently locked")
        );
        assert!(Unlockability::Unlocked.reason().is_none());
    }
}
