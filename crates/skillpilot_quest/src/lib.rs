//! Quest progression engine for SkillPilot.
//!
//! This crate turns a static curriculum into a live progression tree and
//! drives learners through it one step at a time.
//!
//! # Architecture
//!
//! - **Loader** - builds a fresh tree from curriculum definitions
//! - **State machine** - the only code that unlocks and completes items
//! - **Tracker** - session XP and the consecutive-success streak
//! - **Store** - persists the last active task/step and the streak
//! - **Session** - mediates selections and completion attempts
//!
//! # Usage
//!
//! ```
//! use skillpilot_quest::{CurriculumLoader, QuestConfig};
//!
//! let json = r#"{"projects": [{
//!     "project_id": "p1",
//!     "project_name": "Basics",
//!     "tasks": [{
//!         "task_id": "t1",
//!         "task_name": "Hello",
//!         "steps": [
//!             {"step_id": "s1", "step_name": "Print"},
//!             {"step_id": "s2", "step_name": "Loop"}
//!         ]
//!     }]
//! }]}"#;
//!
//! let loader = CurriculumLoader::new(&QuestConfig::default());
//! let (mut curriculum, skipped) = loader.load_str(json)?.into_parts();
//! assert!(skipped.is_empty());
//!
//! let outcome = curriculum.complete_step("p1", "t1", "s1")?;
//! assert_eq!(outcome.percentage(), 50);
//! # Ok::<(), skillpilot_error::SkillPilotError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod loader;
mod machine;
mod policy;
mod session;
mod store;
mod tracker;
mod tree;

pub use config::{ENV_PREFIX, QuestConfig, QuestConfigBuilder, STEP_NAME_PLACEHOLDER};
pub use loader::{CurriculumLoad, CurriculumLoader};
pub use machine::{CompletionOutcome, Unlocked};
pub use policy::{CompletionPolicy, FixedOutcomePolicy, ProbabilisticPolicy};
pub use session::{
    CompletionReport, CompletionTicket, DEFAULT_RUN_OUTPUT, RunPreview, Selection,
    SessionController,
};
pub use store::{FileProgressStore, InMemoryProgressStore, ProgressStore};
pub use tracker::XpStreakTracker;
pub use tree::{Curriculum, Project, Step, Task};
