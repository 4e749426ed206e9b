//! Core data types for the SkillPilot quest progression engine.
//!
//! This crate provides the curriculum definitions, progress records and
//! session events shared by the engine and its front ends.

mod definition;
mod event;
mod progress;
mod state;

pub use definition::{
    CurriculumDefinition, Difficulty, ProjectDefinition, ProjectDefinitionBuilder,
    ProjectDefinitionBuilderError, StepDefinition, StepDefinitionBuilder,
    StepDefinitionBuilderError, TaskDefinition, TaskDefinitionBuilder,
    TaskDefinitionBuilderError,
};
pub use event::{Achievement, FailureReason, SessionEvent};
pub use progress::{ProgressTally, SessionPointer};
pub use state::{
    ItemKind, Prerequisite, PrerequisiteSource, StepState, StepStatus, Unlockability,
};
