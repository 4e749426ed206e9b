//! Tests for curriculum definition parsing.

use skillpilot_core::{CurriculumDefinition, Difficulty, ProjectDefinitionBuilder};

const CURRICULUM: &str = r#"{
  "projects": [
    {
      "project_id": "calc",
      "project_name": "Calculator",
      "description": "Build a calculator",
      "tasks": [
        {
          "task_id": "t2",
          "task_name": "Parse input",
          "steps": [
            { "step_id": "s2", "step_name": "Read", "guidelines": ["1. Read a line"] },
            { "step_id": "s1", "step_name": "Split", "xp_value": 25, "hints": ["use split"] }
          ]
        },
        {
          "task_id": "t1",
          "task_name": "Evaluate",
          "reward": 70,
          "dependencies": ["t2"],
          "steps": [
            { "step_id": "e1", "step_name": "Add", "starting_code": "fn main() {}", "expected_output": "3" }
          ]
        }
      ]
    }
  ]
}"#;

#[test]
fn test_parse_preserves_definition_order() {
    let curriculum: CurriculumDefinition = serde_json::from_str(CURRICULUM).unwrap();
    let project = &curriculum.projects()[0];

    let task_ids: Vec<&str> = project.tasks().iter().map(|t| t.id().as_str()).collect();
    assert_eq!(task_ids, vec!["t2", "t1"]);

    let step_ids: Vec<&str> = project.tasks()[0]
        .steps()
        .iter()
        .map(|s| s.id().as_str())
        .collect();
    assert_eq!(step_ids, vec!["s2", "s1"]);
}

#[test]
fn test_optional_fields_default() {
    let curriculum: CurriculumDefinition = serde_json::from_str(CURRICULUM).unwrap();
    let project = &curriculum.projects()[0];

    assert_eq!(*project.difficulty(), Difficulty::Beginner);

    let first_task = &project.tasks()[0];
    assert_eq!(*first_task.reward(), None);
    assert!(first_task.dependencies().is_empty());
    assert_eq!(first_task.description(), "");

    let read = &first_task.steps()[0];
    assert_eq!(*read.xp_value(), None);
    assert!(read.starting_code().is_none());
    assert!(read.hints().is_empty());

    let split = &first_task.steps()[1];
    assert_eq!(*split.xp_value(), Some(25));
    assert_eq!(split.hints(), &vec!["use split".to_string()]);

    let evaluate = &project.tasks()[1];
    assert_eq!(*evaluate.reward(), Some(70));
    assert_eq!(evaluate.dependencies(), &vec!["t2".to_string()]);
    assert_eq!(
        evaluate.steps()[0].expected_output().as_deref(),
        Some("3")
    );
}

#[test]
fn test_missing_projects_key_is_empty_curriculum() {
    let curriculum: CurriculumDefinition = serde_json::from_str("{}").unwrap();
    assert!(curriculum.projects().is_empty());
}

#[test]
fn test_builder_defaults() {
    let project = ProjectDefinitionBuilder::default()
        .id("p")
        .name("Project")
        .build()
        .unwrap();

    assert_eq!(project.id(), "p");
    assert!(project.tasks().is_empty());
    assert_eq!(*project.difficulty(), Difficulty::Beginner);
}

#[test]
fn test_difficulty_parses_from_str() {
    let parsed: Difficulty = "Advanced".parse().unwrap();
    assert_eq!(parsed, Difficulty::Advanced);
    assert_eq!(Difficulty::Intermediate.to_string(), "Intermediate");
}
