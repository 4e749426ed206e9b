//! Tests for building progression trees from curriculum definitions.

mod test_utils;

use serde_json::json;
use skillpilot_core::{Difficulty, StepState};
use skillpilot_error::CurriculumErrorKind;
use skillpilot_quest::{CurriculumLoader, QuestConfig};
use test_utils::{instant_config, load_sample_project, sample_curriculum_json};

#[test]
fn test_loader_unlocks_only_first_task_and_step() {
    let project = load_sample_project("py-101");

    assert_eq!(*project.xp_gained(), 0);
    assert_eq!(*project.completion_percentage(), 0);
    assert_eq!(*project.difficulty(), Difficulty::Beginner);

    let tasks = project.tasks();
    assert_eq!(tasks.len(), 3);
    assert!(tasks[0].is_unlocked());
    assert!(!tasks[1].is_unlocked());
    assert!(!tasks[2].is_unlocked());
    assert!(tasks.iter().all(|t| !t.is_completed()));

    assert_eq!(tasks[0].steps()[0].state(), StepState::Unlocked);
    assert_eq!(tasks[0].steps()[1].state(), StepState::Locked);
    for task in &tasks[1..] {
        assert!(task.steps().iter().all(|s| s.state() == StepState::Locked));
    }
}

#[test]
fn test_loader_preserves_definition_order() {
    let project = load_sample_project("py-101");
    let task_ids: Vec<&str> = project.tasks().iter().map(|t| t.id().as_str()).collect();
    assert_eq!(task_ids, vec!["t1", "t2", "t3"]);

    let step_ids: Vec<&str> = project.tasks()[1]
        .steps()
        .iter()
        .map(|s| s.id().as_str())
        .collect();
    assert_eq!(step_ids, vec!["s3", "s4"]);
}

#[test]
fn test_loader_applies_defaults() {
    let config = QuestConfig::default();
    let project = load_sample_project("py-101");
    let t1 = project.task("t1").unwrap();
    let t2 = project.task("t2").unwrap();

    assert_eq!(*t1.reward(), 100);
    assert_eq!(*t2.reward(), *config.default_task_reward());

    assert_eq!(*t1.step("s1").unwrap().xp_value(), 15);
    assert_eq!(*t1.step("s2").unwrap().xp_value(), *config.default_step_xp());

    let s2 = t1.step("s2").unwrap();
    assert_eq!(*s2.starter_code(), config.starter_code_for("Read a name"));
}

#[test]
fn test_loader_strips_guideline_numbers() {
    let project = load_sample_project("py-101");
    let s1 = project.task("t1").unwrap().step("s1").unwrap();
    assert_eq!(
        s1.guidelines(),
        &vec!["Call print".to_string(), "Pass a string".to_string()]
    );
}

#[test]
fn test_loader_produces_independent_trees() {
    let loader = CurriculumLoader::new(&instant_config());
    let json = sample_curriculum_json();

    let (mut first, _) = loader.load_str(&json).unwrap().into_parts();
    first.complete_step("tiny", "only", "a").unwrap();

    let (second, _) = loader.load_str(&json).unwrap().into_parts();
    let tiny = second.project("tiny").unwrap();
    assert!(!tiny.task("only").unwrap().step("a").unwrap().is_completed());
    assert_eq!(*tiny.xp_gained(), 0);
}

#[test]
fn test_loader_rejects_empty_curriculum() {
    let loader = CurriculumLoader::new(&instant_config());
    let err = loader.load_str(r#"{"projects": []}"#).unwrap_err();
    assert!(matches!(err.kind(), CurriculumErrorKind::EmptyCurriculum));

    let err = loader.load_str("{}").unwrap_err();
    assert!(matches!(err.kind(), CurriculumErrorKind::EmptyCurriculum));
}

#[test]
fn test_loader_reports_invalid_json() {
    let loader = CurriculumLoader::new(&instant_config());
    let err = loader.load_str("{ not json").unwrap_err();
    assert!(matches!(err.kind(), CurriculumErrorKind::JsonParse(_)));
}

#[test]
fn test_loader_reports_missing_file() {
    let loader = CurriculumLoader::new(&instant_config());
    let dir = tempfile::TempDir::new().unwrap();
    let err = loader.load_file(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err.kind(), CurriculumErrorKind::FileRead(_)));
}

#[test]
fn test_loader_reads_file() {
    let loader = CurriculumLoader::new(&instant_config());
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("curriculum.json");
    std::fs::write(&path, sample_curriculum_json()).unwrap();

    let load = loader.load_file(&path).unwrap();
    assert_eq!(load.curriculum().projects().len(), 2);
    assert!(load.skipped().is_empty());
}

#[test]
fn test_loader_skips_degenerate_projects() {
    let json = json!({
        "projects": [
            { "project_id": "no-tasks", "project_name": "Empty", "tasks": [] },
            {
                "project_id": "no-steps",
                "project_name": "Hollow",
                "tasks": [{ "task_id": "t", "task_name": "T", "steps": [] }]
            },
            {
                "project_id": "ok",
                "project_name": "Fine",
                "tasks": [{
                    "task_id": "t",
                    "task_name": "T",
                    "steps": [{ "step_id": "s", "step_name": "S" }]
                }]
            },
            {
                "project_id": "ok",
                "project_name": "Fine again",
                "tasks": [{
                    "task_id": "t",
                    "task_name": "T",
                    "steps": [{ "step_id": "s", "step_name": "S" }]
                }]
            }
        ]
    })
    .to_string();

    let loader = CurriculumLoader::new(&instant_config());
    let (curriculum, skipped) = loader.load_str(&json).unwrap().into_parts();

    assert_eq!(curriculum.projects().len(), 1);
    assert_eq!(curriculum.projects()[0].name(), "Fine");
    assert_eq!(skipped.len(), 3);
    assert!(matches!(skipped[0].kind(), CurriculumErrorKind::NoTasks(_)));
    assert!(matches!(skipped[1].kind(), CurriculumErrorKind::NoSteps { .. }));
    assert!(matches!(skipped[2].kind(), CurriculumErrorKind::DuplicateProject(_)));
}

#[test]
fn test_loader_rejects_unsatisfiable_dependencies() {
    let json = json!({
        "projects": [{
            "project_id": "deps",
            "project_name": "Deps",
            "tasks": [
                {
                    "task_id": "t1",
                    "task_name": "First",
                    "dependencies": ["t2"],
                    "steps": [{ "step_id": "s", "step_name": "S" }]
                },
                {
                    "task_id": "t2",
                    "task_name": "Second",
                    "steps": [{ "step_id": "s", "step_name": "S" }]
                }
            ]
        }]
    })
    .to_string();

    let loader = CurriculumLoader::new(&instant_config());
    let (curriculum, skipped) = loader.load_str(&json).unwrap().into_parts();
    assert!(curriculum.is_empty());
    assert!(matches!(
        skipped[0].kind(),
        CurriculumErrorKind::ForwardDependency { .. }
    ));
}

#[test]
fn test_loader_rejects_duplicate_steps() {
    let json = json!({
        "projects": [{
            "project_id": "dup",
            "project_name": "Dup",
            "tasks": [{
                "task_id": "t",
                "task_name": "T",
                "steps": [
                    { "step_id": "s", "step_name": "One" },
                    { "step_id": "s", "step_name": "Two" }
                ]
            }]
        }]
    })
    .to_string();

    let loader = CurriculumLoader::new(&instant_config());
    let (_, skipped) = loader.load_str(&json).unwrap().into_parts();
    assert!(matches!(skipped[0].kind(), CurriculumErrorKind::DuplicateStep { .. }));
}
