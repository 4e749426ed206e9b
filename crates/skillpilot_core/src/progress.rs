//! Session pointers and progress tallies.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Last-viewed location inside a project.
///
/// Only used to restore the selection cursor. Unlock state is never read
/// from a pointer; it is always re-derived from the live tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct SessionPointer {
    /// Project the pointer belongs to
    project_id: String,
    /// Last selected task
    task_id: String,
    /// Last selected step
    step_id: String,
}

impl SessionPointer {
    /// Creates a pointer.
    pub fn new(
        project_id: impl Into<String>,
        task_id: impl Into<String>,
        step_id: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            task_id: task_id.into(),
            step_id: step_id.into(),
        }
    }
}

/// Step counts for one project.
///
/// Always recomputed from the tree, never cached across mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct ProgressTally {
    /// Steps across all tasks
    total_steps: usize,
    /// Completed steps across all tasks
    completed_steps: usize,
}

impl ProgressTally {
    /// Creates a tally from raw counts.
    pub fn new(total_steps: usize, completed_steps: usize) -> Self {
        Self {
            total_steps,
            completed_steps,
        }
    }

    /// Completion percentage, `round(100 * completed / total)`.
    ///
    /// Halves round up. An empty tally is 0%.
    ///
    /// # Examples
    ///
    /// ```
    /// use skillpilot_core::ProgressTally;
    ///
    /// assert_eq!(ProgressTally::new(2, 1).percentage(), 50);
    /// assert_eq!(ProgressTally::new(3, 2).percentage(), 67);
    /// assert_eq!(ProgressTally::new(0, 0).percentage(), 0);
    /// ```
    pub fn percentage(&self) -> u8 {
        if self.total_steps == 0 {
            return 0;
        }
        let completed = self.completed_steps.min(self.total_steps);
        let rounded = (200 * completed + self.total_steps) / (2 * self.total_steps);
        // completed <= total keeps this within 0..=100
        rounded as u8
    }

    /// Returns true when every step is completed.
    pub fn is_complete(&self) -> bool {
        self.total_steps > 0 && self.completed_steps >= self.total_steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(ProgressTally::new(8, 1).percentage(), 13); // 12.5
        assert_eq!(ProgressTally::new(3, 1).percentage(), 33);
        assert_eq!(ProgressTally::new(7, 7).percentage(), 100);
    }

    #[test]
    fn empty_tally_is_not_complete() {
        let tally = ProgressTally::new(0, 0);
        assert!(!tally.is_complete());
        assert_eq!(tally.percentage(), 0);
    }
}
