//! Static curriculum definitions.
//!
//! These types mirror the curriculum JSON document: an ordered list of
//! projects, each with ordered tasks, each with ordered steps. Ordering is
//! significant everywhere and is preserved exactly as written.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// How demanding a project is.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum Difficulty {
    /// Entry-level project
    #[default]
    Beginner,
    /// Assumes prior projects
    Intermediate,
    /// Open-ended project
    Advanced,
}

/// Top-level curriculum document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters)]
pub struct CurriculumDefinition {
    /// Projects in definition order
    #[serde(default)]
    projects: Vec<ProjectDefinition>,
}

impl CurriculumDefinition {
    /// Creates a curriculum from its projects.
    pub fn new(projects: Vec<ProjectDefinition>) -> Self {
        Self { projects }
    }

    /// Consumes the document, yielding its projects.
    pub fn into_projects(self) -> Vec<ProjectDefinition> {
        self.projects
    }
}

/// A project as written in the curriculum.
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct ProjectDefinition {
    /// Unique project identifier
    #[serde(rename = "project_id")]
    id: String,
    /// Display name
    #[serde(rename = "project_name")]
    name: String,
    /// Free-form description
    #[serde(default)]
    #[builder(default)]
    description: String,
    /// Difficulty label
    #[serde(default)]
    #[builder(default)]
    difficulty: Difficulty,
    /// Tasks in definition order
    #[serde(default)]
    #[builder(default)]
    tasks: Vec<TaskDefinition>,
}

/// A task as written in the curriculum.
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct TaskDefinition {
    /// Task identifier, unique within its project
    #[serde(rename = "task_id")]
    id: String,
    /// Display name
    #[serde(rename = "task_name")]
    name: String,
    /// Free-form description
    #[serde(default)]
    #[builder(default)]
    description: String,
    /// Reward XP shown for the task; the loader default applies when absent
    #[serde(default)]
    #[builder(default)]
    reward: Option<u32>,
    /// Ids of sibling tasks that must be completed first
    #[serde(default)]
    #[builder(default)]
    dependencies: Vec<String>,
    /// Steps in definition order
    #[serde(default)]
    #[builder(default)]
    steps: Vec<StepDefinition>,
}

/// A step as written in the curriculum.
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct StepDefinition {
    /// Step identifier, unique within its task
    #[serde(rename = "step_id")]
    id: String,
    /// Display name
    #[serde(rename = "step_name")]
    name: String,
    /// Free-form description
    #[serde(default)]
    #[builder(default)]
    description: String,
    /// Ordered guideline strings
    #[serde(default)]
    #[builder(default)]
    guidelines: Vec<String>,
    /// XP granted on completion; the loader default applies when absent
    #[serde(default)]
    #[builder(default)]
    xp_value: Option<u32>,
    /// Starter content handed to the learner; a template is used when absent
    #[serde(default)]
    #[builder(default)]
    starting_code: Option<String>,
    /// Output a correct submission is expected to print
    #[serde(default)]
    #[builder(default)]
    expected_output: Option<String>,
    /// Hints revealed progressively after failed attempts
    #[serde(default)]
    #[builder(default)]
    hints: Vec<String>,
    /// Ids of sibling steps that must be completed first
    #[serde(default)]
    #[builder(default)]
    dependencies: Vec<String>,
}
