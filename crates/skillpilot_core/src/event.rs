//! Outward events emitted by the session controller.

use crate::{ItemKind, Unlockability};
use serde::{Deserialize, Serialize};

/// Streak milestones.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
pub enum Achievement {
    /// Three successful completions in a row
    #[strum(serialize = "streak-3")]
    Streak3,
    /// Ten successful completions in a row
    #[strum(serialize = "streak-10")]
    Streak10,
}

impl Achievement {
    /// Milestone reached at exactly `streak` consecutive successes, if any.
    pub fn for_streak(streak: u32) -> Option<Self> {
        match streak {
            3 => Some(Achievement::Streak3),
            10 => Some(Achievement::Streak10),
            _ => None,
        }
    }

    /// Message shown when the milestone fires.
    pub fn message(&self) -> &'static str {
        match self {
            Achievement::Streak3 => "Coding Streak: 3 steps completed in a row!",
            Achievement::Streak10 => "Coding Master: 10 steps completed in a row!",
        }
    }
}

/// Why a completion attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum FailureReason {
    /// The learner did not change their working content
    Unchanged,
    /// The completion check rejected the attempt
    Rejected,
}

impl FailureReason {
    /// Message shown to the learner.
    pub fn message(&self) -> &'static str {
        match self {
            FailureReason::Unchanged => {
                "You need to modify the code before completing the mission."
            }
            FailureReason::Rejected => "Mission failed. Try again with the provided hints.",
        }
    }
}

/// Notification consumed by a presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum SessionEvent {
    /// A locked task was requested
    #[display("task-locked: {}", reason)]
    TaskLocked {
        /// Human-readable block reason
        reason: String,
    },
    /// A locked step was requested
    #[display("step-locked: {}", reason)]
    StepLocked {
        /// Human-readable block reason
        reason: String,
    },
    /// A step was completed
    #[display("step-completed: +{} XP", xp_awarded)]
    StepCompleted {
        /// Completed step id
        step_id: String,
        /// XP granted for it
        xp_awarded: u32,
    },
    /// The last step of a task was completed
    #[display("task-completed: {}", task_id)]
    TaskCompleted {
        /// Completed task id
        task_id: String,
    },
    /// A streak milestone was reached
    #[display("achievement: {}", _0)]
    Achievement(Achievement),
    /// A completion attempt failed
    #[display("completion-failed: {}", reason)]
    CompletionFailed {
        /// Why it failed
        reason: FailureReason,
    },
    /// The cursor was restored from a saved pointer
    #[display("resumed: {}/{}", task_id, step_id)]
    Resumed {
        /// Restored task id
        task_id: String,
        /// Restored step id
        step_id: String,
    },
}

impl SessionEvent {
    /// Builds the locked-item event matching a blocked verdict.
    ///
    /// Returns `None` for an unlocked verdict.
    pub fn locked(verdict: &Unlockability) -> Option<Self> {
        let reason = verdict.reason()?;
        match verdict {
            Unlockability::Blocked {
                item: ItemKind::Task,
                ..
            } => Some(SessionEvent::TaskLocked { reason }),
            Unlockability::Blocked {
                item: ItemKind::Step,
                ..
            } => Some(SessionEvent::StepLocked { reason }),
            Unlockability::Unlocked => None,
        }
    }
}
