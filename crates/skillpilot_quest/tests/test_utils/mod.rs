//! Test utilities for quest engine tests.
//!
//! Curriculum fixtures and a progress store that always fails.

#![allow(dead_code)]

use serde_json::json;
use skillpilot_core::SessionPointer;
use skillpilot_error::{SkillPilotResult, StorageError, StorageErrorKind};
use skillpilot_quest::{CurriculumLoader, Project, ProgressStore, QuestConfig, QuestConfigBuilder};

/// Three tasks over five steps. The second task carries hints and an
/// expected output on its first step; the third depends on the first.
pub fn sample_curriculum_json() -> String {
    json!({
        "projects": [
            {
                "project_id": "py-101",
                "project_name": "Python Basics",
                "description": "First steps in Python",
                "difficulty": "Beginner",
                "tasks": [
                    {
                        "task_id": "t1",
                        "task_name": "Hello",
                        "reward": 100,
                        "steps": [
                            {
                                "step_id": "s1",
                                "step_name": "Print a greeting",
                                "guidelines": ["1. Call print", "2. Pass a string"],
                                "xp_value": 15
                            },
                            { "step_id": "s2", "step_name": "Read a name" }
                        ]
                    },
                    {
                        "task_id": "t2",
                        "task_name": "Loops",
                        "steps": [
                            {
                                "step_id": "s3",
                                "step_name": "Count to ten",
                                "expected_output": "1\n2\n3",
                                "hints": ["Use range", "range(1, 11)", "Print inside the loop", "Done"]
                            },
                            { "step_id": "s4", "step_name": "Sum a list" }
                        ]
                    },
                    {
                        "task_id": "t3",
                        "task_name": "Functions",
                        "dependencies": ["t1"],
                        "steps": [
                            { "step_id": "s5", "step_name": "Define a function" }
                        ]
                    }
                ]
            },
            {
                "project_id": "tiny",
                "project_name": "Tiny",
                "tasks": [
                    {
                        "task_id": "only",
                        "task_name": "Only task",
                        "steps": [
                            { "step_id": "a", "step_name": "First" },
                            { "step_id": "b", "step_name": "Second" }
                        ]
                    }
                ]
            }
        ]
    })
    .to_string()
}

/// Config with no grading delay so async tests finish immediately.
pub fn instant_config() -> QuestConfig {
    QuestConfigBuilder::default()
        .completion_delay_ms(0u64)
        .progress_dir(std::env::temp_dir().join("skillpilot-test-unused"))
        .build()
        .expect("Failed to build test config")
}

/// Loads one project from the sample curriculum.
pub fn load_sample_project(project_id: &str) -> Project {
    let loader = CurriculumLoader::new(&instant_config());
    let (mut curriculum, skipped) = loader
        .load_str(&sample_curriculum_json())
        .expect("Sample curriculum should load")
        .into_parts();
    assert!(skipped.is_empty(), "Sample curriculum skipped projects: {:?}", skipped);
    curriculum
        .take_project(project_id)
        .expect("Sample project should exist")
}

/// Progress store whose every operation fails.
#[derive(Debug, Default)]
pub struct UnavailableStore;

impl UnavailableStore {
    fn fail<T>() -> SkillPilotResult<T> {
        Err(StorageError::new(StorageErrorKind::Unavailable("disk offline".to_string())).into())
    }
}

impl ProgressStore for UnavailableStore {
    fn load_pointer(&self, _project_id: &str) -> SkillPilotResult<Option<SessionPointer>> {
        Self::fail()
    }

    fn save_pointer(&mut self, _pointer: &SessionPointer) -> SkillPilotResult<()> {
        Self::fail()
    }

    fn clear_pointer(&mut self, _project_id: &str) -> SkillPilotResult<()> {
        Self::fail()
    }

    fn load_streak(&self) -> SkillPilotResult<u32> {
        Self::fail()
    }

    fn save_streak(&mut self, _streak: u32) -> SkillPilotResult<()> {
        Self::fail()
    }
}
