//! The live progression tree.
//!
//! Built once by the curriculum loader. Afterwards only the lock and
//! completion flags plus the project's XP and percentage change, and only
//! through the state machine in this crate.

use derive_getters::Getters;
use serde::Serialize;
use skillpilot_core::{Difficulty, ProgressTally, StepState};
use skillpilot_error::{NotFoundError, NotFoundKind};

/// A single step of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct Step {
    /// Identifier, unique within the task
    id: String,
    /// Display name
    name: String,
    /// Description
    description: String,
    /// Ordered guidelines
    guidelines: Vec<String>,
    #[getter(skip)]
    is_unlocked: bool,
    #[getter(skip)]
    is_completed: bool,
    /// XP granted on completion
    xp_value: u32,
    /// Opaque starter content; never executed by the engine
    starter_code: String,
    /// Output a correct submission is expected to print
    expected_output: Option<String>,
    /// Hints revealed after failed attempts
    hints: Vec<String>,
    /// Sibling steps that must be completed first
    dependencies: Vec<String>,
}

impl Step {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: String,
        name: String,
        description: String,
        guidelines: Vec<String>,
        xp_value: u32,
        starter_code: String,
        expected_output: Option<String>,
        hints: Vec<String>,
        dependencies: Vec<String>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            guidelines,
            is_unlocked: false,
            is_completed: false,
            xp_value,
            starter_code,
            expected_output,
            hints,
            dependencies,
        }
    }

    /// Whether the step may be selected.
    pub fn is_unlocked(&self) -> bool {
        self.is_unlocked
    }

    /// Whether the step is done.
    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    /// Current position in the `Locked → Unlocked → Completed` lifecycle.
    pub fn state(&self) -> StepState {
        StepState::from_flags(self.is_unlocked, self.is_completed)
    }

    pub(crate) fn unlock(&mut self) {
        self.is_unlocked = true;
    }

    pub(crate) fn mark_completed(&mut self) {
        self.is_unlocked = true;
        self.is_completed = true;
    }
}

/// A task: an ordered run of steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct Task {
    /// Identifier, unique within the project
    id: String,
    /// Display name
    name: String,
    /// Description
    description: String,
    /// Steps in definition order
    steps: Vec<Step>,
    #[getter(skip)]
    is_unlocked: bool,
    #[getter(skip)]
    is_completed: bool,
    /// Reward XP advertised for the task
    reward: u32,
    /// Sibling tasks that must be completed first
    dependencies: Vec<String>,
}

impl Task {
    pub(crate) fn new(
        id: String,
        name: String,
        description: String,
        steps: Vec<Step>,
        reward: u32,
        dependencies: Vec<String>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            steps,
            is_unlocked: false,
            is_completed: false,
            reward,
            dependencies,
        }
    }

    /// Whether the task may be selected.
    pub fn is_unlocked(&self) -> bool {
        self.is_unlocked
    }

    /// Whether every step of the task is done.
    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    /// Current lifecycle state.
    pub fn state(&self) -> StepState {
        StepState::from_flags(self.is_unlocked, self.is_completed)
    }

    /// Looks up a step by id.
    pub fn step(&self, step_id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    /// Position of a step within the task.
    pub fn step_index(&self, step_id: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.id == step_id)
    }

    /// First step whose unlocked flag is set.
    pub fn first_unlocked_step(&self) -> Option<&Step> {
        self.steps.iter().find(|s| s.is_unlocked)
    }

    /// Number of completed steps.
    pub fn completed_steps(&self) -> usize {
        self.steps.iter().filter(|s| s.is_completed).count()
    }

    pub(crate) fn resolve_step(&self, step_id: &str) -> Result<usize, NotFoundError> {
        self.step_index(step_id).ok_or_else(|| {
            NotFoundError::new(NotFoundKind::Step {
                task: self.id.clone(),
                step: step_id.to_string(),
            })
        })
    }

    pub(crate) fn steps_mut(&mut self) -> &mut [Step] {
        &mut self.steps
    }

    /// Unlocks the task together with its first step.
    pub(crate) fn unlock(&mut self) {
        self.is_unlocked = true;
        if let Some(first) = self.steps.first_mut() {
            first.unlock();
        }
    }

    pub(crate) fn mark_completed(&mut self) {
        self.is_unlocked = true;
        self.is_completed = true;
    }
}

/// A project: the root of one progression tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct Project {
    /// Identifier
    id: String,
    /// Display name
    name: String,
    /// Description
    description: String,
    /// Difficulty label
    difficulty: Difficulty,
    /// Tasks in definition order
    tasks: Vec<Task>,
    /// XP accumulated from completed steps
    xp_gained: u32,
    /// Completion percentage, recomputed on every completion
    completion_percentage: u8,
}

impl Project {
    pub(crate) fn new(
        id: String,
        name: String,
        description: String,
        difficulty: Difficulty,
        tasks: Vec<Task>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            difficulty,
            tasks,
            xp_gained: 0,
            completion_percentage: 0,
        }
    }

    /// Looks up a task by id.
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Position of a task within the project.
    pub fn task_index(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task_id)
    }

    /// First task whose unlocked flag is set.
    pub fn first_unlocked_task(&self) -> Option<&Task> {
        self.tasks.iter().find(|t| t.is_unlocked)
    }

    /// Fresh step counts across every task.
    pub fn tally(&self) -> ProgressTally {
        let total = self.tasks.iter().map(|t| t.steps.len()).sum();
        let completed = self.tasks.iter().map(Task::completed_steps).sum();
        ProgressTally::new(total, completed)
    }

    /// Returns true when every task is completed.
    pub fn is_completed(&self) -> bool {
        self.tasks.iter().all(|t| t.is_completed)
    }

    pub(crate) fn resolve_task(&self, task_id: &str) -> Result<usize, NotFoundError> {
        self.task_index(task_id).ok_or_else(|| {
            NotFoundError::new(NotFoundKind::Task {
                project: self.id.clone(),
                task: task_id.to_string(),
            })
        })
    }

    pub(crate) fn tasks_mut(&mut self) -> &mut [Task] {
        &mut self.tasks
    }

    pub(crate) fn add_xp(&mut self, amount: u32) {
        self.xp_gained = self.xp_gained.saturating_add(amount);
    }

    pub(crate) fn refresh_percentage(&mut self) {
        self.completion_percentage = self.tally().percentage();
    }
}

/// Every project that loaded successfully, in definition order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Getters)]
pub struct Curriculum {
    /// Loaded projects
    projects: Vec<Project>,
}

impl Curriculum {
    pub(crate) fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    /// Looks up a project by id.
    pub fn project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    /// Removes a project from the curriculum, handing ownership to the caller.
    ///
    /// Used to give a session exclusive ownership of one project tree.
    pub fn take_project(&mut self, project_id: &str) -> Result<Project, NotFoundError> {
        let index = self
            .projects
            .iter()
            .position(|p| p.id == project_id)
            .ok_or_else(|| NotFoundError::new(NotFoundKind::Project(project_id.to_string())))?;
        Ok(self.projects.remove(index))
    }

    /// Returns true when no project loaded.
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub(crate) fn resolve_project_mut(
        &mut self,
        project_id: &str,
    ) -> Result<&mut Project, NotFoundError> {
        self.projects
            .iter_mut()
            .find(|p| p.id == project_id)
            .ok_or_else(|| NotFoundError::new(NotFoundKind::Project(project_id.to_string())))
    }
}
