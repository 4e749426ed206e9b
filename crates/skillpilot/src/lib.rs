//! SkillPilot quest progression engine.
//!
//! This crate re-exports the engine's public surface from its member
//! crates and ships the `skillpilot` command-line front end.
//!
//! # Usage
//!
//! ```no_run
//! use skillpilot::{
//!     CurriculumLoader, FileProgressStore, ProbabilisticPolicy, QuestConfig, SessionController,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = QuestConfig::load(None)?;
//!     let loader = CurriculumLoader::new(&config);
//!     let (mut curriculum, _skipped) = loader.load_file("curriculum.json")?.into_parts();
//!
//!     let project = curriculum.take_project("python-101")?;
//!     let store = FileProgressStore::new(config.progress_dir())?;
//!     let policy = ProbabilisticPolicy::new(*config.success_rate());
//!     let mut session =
//!         SessionController::start(project, Box::new(store), Box::new(policy), config);
//!
//!     let report = session.attempt_completion(true).await?;
//!     println!("passed: {}", report.passed());
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

// Error types
pub use skillpilot_error::{
    ConfigError, CurriculumError, CurriculumErrorKind, IllegalTransitionError,
    IllegalTransitionKind, InvalidAmountError, NotFoundError, NotFoundKind, SessionError,
    SessionErrorKind, SkillPilotError, SkillPilotErrorKind, SkillPilotResult, StorageError,
    StorageErrorKind,
};

// Curriculum definitions and shared records
pub use skillpilot_core::{
    Achievement, CurriculumDefinition, Difficulty, FailureReason, ItemKind, Prerequisite,
    PrerequisiteSource, ProgressTally, ProjectDefinition, ProjectDefinitionBuilder,
    SessionEvent, SessionPointer, StepDefinition, StepDefinitionBuilder, StepState, StepStatus,
    TaskDefinition, TaskDefinitionBuilder, Unlockability,
};

// Progression engine
pub use skillpilot_quest::{
    CompletionOutcome, CompletionPolicy, CompletionReport, CompletionTicket, Curriculum,
    CurriculumLoad, CurriculumLoader, DEFAULT_RUN_OUTPUT, FileProgressStore, FixedOutcomePolicy,
    InMemoryProgressStore, ProbabilisticPolicy, ProgressStore, Project, QuestConfig,
    QuestConfigBuilder, RunPreview, Selection, SessionController, Step, Task, Unlocked,
    XpStreakTracker,
};
