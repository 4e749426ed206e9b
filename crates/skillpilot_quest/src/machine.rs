//! Unlock/completion state machine.
//!
//! The only code that flips lock and completion flags. Steps move
//! `Locked → Unlocked → Completed` and never back; a task completes the
//! moment its last step does. The project percentage is recomputed from raw
//! counts after every completion.

use crate::{Curriculum, Project, Step, Task};
use derive_getters::Getters;
use serde::Serialize;
use skillpilot_core::{
    ItemKind, Prerequisite, PrerequisiteSource, ProgressTally, StepState, Unlockability,
};
use skillpilot_error::{IllegalTransitionError, IllegalTransitionKind, SkillPilotResult};
use tracing::{debug, info, instrument};

/// What a completion unlocked next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Unlocked {
    /// The next step of the same task
    Step {
        /// Newly unlocked step id
        step_id: String,
    },
    /// The next task together with its first step
    Task {
        /// Newly unlocked task id
        task_id: String,
        /// Its first step id
        step_id: String,
    },
}

/// Snapshot returned by a successful `complete_step`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct CompletionOutcome {
    /// Project the step belongs to
    project_id: String,
    /// The task after the completion
    task: Task,
    /// The completed step
    step: Step,
    /// XP added to the project
    xp_awarded: u32,
    /// Project XP after the completion
    project_xp: u32,
    /// Fresh step counts
    tally: ProgressTally,
    /// Whether the task completed with this step
    task_completed: bool,
    /// What opened up, if anything
    unlocked: Option<Unlocked>,
}

impl CompletionOutcome {
    /// Completion percentage after the step.
    pub fn percentage(&self) -> u8 {
        self.tally.percentage()
    }
}

impl Curriculum {
    /// Completes a step addressed by project, task and step id.
    ///
    /// # Errors
    ///
    /// `NotFoundError` when any id fails to resolve and
    /// `IllegalTransitionError` when the step is not currently unlocked.
    pub fn complete_step(
        &mut self,
        project_id: &str,
        task_id: &str,
        step_id: &str,
    ) -> SkillPilotResult<CompletionOutcome> {
        self.resolve_project_mut(project_id)?
            .complete_step(task_id, step_id)
    }
}

impl Project {
    /// Completes an unlocked step and cascades unlocks.
    ///
    /// Completion is not idempotent here: a step that is already completed
    /// is refused with `IllegalTransitionError`, leaving the tree untouched.
    #[instrument(skip(self), fields(project = %self.id()))]
    pub fn complete_step(
        &mut self,
        task_id: &str,
        step_id: &str,
    ) -> SkillPilotResult<CompletionOutcome> {
        let task_index = self.resolve_task(task_id)?;
        let step_index = self.tasks()[task_index].resolve_step(step_id)?;

        match self.tasks()[task_index].steps()[step_index].state() {
            StepState::Locked => {
                return Err(IllegalTransitionError::new(IllegalTransitionKind::StepLocked(
                    step_id.to_string(),
                ))
                .into());
            }
            StepState::Completed => {
                return Err(IllegalTransitionError::new(
                    IllegalTransitionKind::StepAlreadyCompleted(step_id.to_string()),
                )
                .into());
            }
            StepState::Unlocked => {}
        }

        let xp_awarded = {
            let step = &mut self.tasks_mut()[task_index].steps_mut()[step_index];
            step.mark_completed();
            *step.xp_value()
        };
        self.add_xp(xp_awarded);
        self.refresh_percentage();
        info!(task = %task_id, step = %step_id, xp = xp_awarded, "Step completed");

        let task_completed = self.tasks()[task_index]
            .steps()
            .iter()
            .all(Step::is_completed);

        let unlocked = if task_completed {
            self.tasks_mut()[task_index].mark_completed();
            info!(task = %task_id, "Task completed");
            self.unlock_task_after(task_index)
        } else {
            self.unlock_step_after(task_index, step_index)
        };

        let task = self.tasks()[task_index].clone();
        let step = task.steps()[step_index].clone();
        Ok(CompletionOutcome {
            project_id: self.id().clone(),
            task,
            step,
            xp_awarded,
            project_xp: *self.xp_gained(),
            tally: self.tally(),
            task_completed,
            unlocked,
        })
    }

    fn unlock_step_after(&mut self, task_index: usize, step_index: usize) -> Option<Unlocked> {
        let next_index = step_index + 1;
        let task = &self.tasks()[task_index];
        let next = task.steps().get(next_index)?;
        if next.is_unlocked() || !task.step_unlockability_at(next_index).is_unlocked() {
            return None;
        }
        let step_id = next.id().clone();
        self.tasks_mut()[task_index].steps_mut()[next_index].unlock();
        debug!(step = %step_id, "Next step unlocked");
        Some(Unlocked::Step { step_id })
    }

    fn unlock_task_after(&mut self, task_index: usize) -> Option<Unlocked> {
        let next_index = task_index + 1;
        let next = self.tasks().get(next_index)?;
        if next.is_unlocked() || !self.task_unlockability_at(next_index).is_unlocked() {
            return None;
        }
        let task_id = next.id().clone();
        let step_id = next.steps().first()?.id().clone();
        self.tasks_mut()[next_index].unlock();
        info!(task = %task_id, "Next task unlocked");
        Some(Unlocked::Task { task_id, step_id })
    }

    /// Whether a task satisfies the unlock rule: it is first, or its
    /// preceding task is completed, and every listed dependency is completed.
    pub fn is_task_unlockable(&self, task_id: &str) -> SkillPilotResult<bool> {
        Ok(self.task_unlockability(task_id)?.is_unlocked())
    }

    /// Unlock verdict for a task, naming what to finish first when blocked.
    pub fn task_unlockability(&self, task_id: &str) -> SkillPilotResult<Unlockability> {
        let index = self.resolve_task(task_id)?;
        Ok(self.task_unlockability_at(index))
    }

    fn task_unlockability_at(&self, index: usize) -> Unlockability {
        let tasks = self.tasks();
        let task = &tasks[index];
        let siblings: Vec<Sibling<'_>> = tasks
            .iter()
            .map(|t| Sibling {
                id: t.id(),
                name: t.name(),
                completed: t.is_completed(),
            })
            .collect();
        unlockability(ItemKind::Task, index, task.dependencies(), &siblings)
    }
}

impl Task {
    /// Whether a step satisfies the unlock rule: it is first, or its
    /// preceding step is completed, and every listed dependency is completed.
    pub fn is_step_unlockable(&self, step_id: &str) -> SkillPilotResult<bool> {
        Ok(self.step_unlockability(step_id)?.is_unlocked())
    }

    /// Unlock verdict for a step, naming what to finish first when blocked.
    pub fn step_unlockability(&self, step_id: &str) -> SkillPilotResult<Unlockability> {
        let index = self.resolve_step(step_id)?;
        Ok(self.step_unlockability_at(index))
    }

    fn step_unlockability_at(&self, index: usize) -> Unlockability {
        let steps = self.steps();
        let siblings: Vec<Sibling<'_>> = steps
            .iter()
            .map(|s| Sibling {
                id: s.id(),
                name: s.name(),
                completed: s.is_completed(),
            })
            .collect();
        unlockability(ItemKind::Step, index, steps[index].dependencies(), &siblings)
    }
}

struct Sibling<'a> {
    id: &'a str,
    name: &'a str,
    completed: bool,
}

/// Shared unlock rule for tasks and steps.
///
/// Blocked items report the nearest preceding incomplete sibling, falling
/// back to the first unmet listed dependency.
fn unlockability(
    item: ItemKind,
    index: usize,
    dependencies: &[String],
    siblings: &[Sibling<'_>],
) -> Unlockability {
    let order_satisfied = index == 0 || siblings[index - 1].completed;
    let unmet_dependency = dependencies.iter().find_map(|dependency| {
        siblings
            .iter()
            .find(|s| s.id == dependency && !s.completed)
    });

    if order_satisfied && unmet_dependency.is_none() {
        return Unlockability::Unlocked;
    }

    let prerequisite = siblings[..index]
        .iter()
        .rev()
        .find(|s| !s.completed)
        .map(|s| Prerequisite::new(s.id, s.name, PrerequisiteSource::PrecedingSibling))
        .or_else(|| {
            unmet_dependency
                .map(|s| Prerequisite::new(s.id, s.name, PrerequisiteSource::Dependency))
        });

    Unlockability::Blocked { item, prerequisite }
}
