//! Tests for the unlock/completion state machine.

mod test_utils;

use serde_json::json;
use skillpilot_core::{PrerequisiteSource, StepState, Unlockability};
use skillpilot_quest::{CurriculumLoader, Project, Unlocked};
use test_utils::{instant_config, load_sample_project};

/// Every structural invariant the tree must hold between operations.
fn assert_tree_invariants(project: &Project) {
    for task in project.tasks() {
        assert_eq!(
            task.is_completed(),
            task.steps().iter().all(|s| s.is_completed()),
            "Task {} completion disagrees with its steps",
            task.id()
        );
        for step in task.steps() {
            if step.is_completed() {
                assert!(step.is_unlocked(), "Step {} completed while locked", step.id());
            }
        }
    }
    assert_eq!(*project.completion_percentage(), project.tally().percentage());
}

fn completed_step_ids(project: &Project) -> Vec<String> {
    project
        .tasks()
        .iter()
        .flat_map(|t| t.steps())
        .filter(|s| s.is_completed())
        .map(|s| s.id().clone())
        .collect()
}

fn single_task_project(step_count: usize) -> Project {
    let steps: Vec<_> = (1..=step_count)
        .map(|i| json!({ "step_id": format!("s{}", i), "step_name": format!("Step {}", i) }))
        .collect();
    let json = json!({
        "projects": [{
            "project_id": "p",
            "project_name": "P",
            "tasks": [{ "task_id": "t", "task_name": "T", "steps": steps }]
        }]
    })
    .to_string();

    let loader = CurriculumLoader::new(&instant_config());
    let (mut curriculum, _) = loader.load_str(&json).unwrap().into_parts();
    curriculum.take_project("p").unwrap()
}

#[test]
fn test_two_step_task_progresses_to_completion() {
    let mut project = load_sample_project("tiny");

    let first = project.complete_step("only", "a").unwrap();
    assert_eq!(first.percentage(), 50);
    assert_eq!(*first.xp_awarded(), 10);
    assert!(!*first.task_completed());
    assert_eq!(
        first.unlocked(),
        &Some(Unlocked::Step {
            step_id: "b".to_string()
        })
    );
    assert_eq!(
        project.task("only").unwrap().step("b").unwrap().state(),
        StepState::Unlocked
    );

    let second = project.complete_step("only", "b").unwrap();
    assert_eq!(second.percentage(), 100);
    assert!(*second.task_completed());
    // Last task of the project: nothing further to unlock
    assert_eq!(second.unlocked(), &None);
    assert!(project.task("only").unwrap().is_completed());
    assert!(project.is_completed());
    assert_eq!(*project.xp_gained(), 20);
    assert_tree_invariants(&project);
}

#[test]
fn test_locked_step_cannot_complete() {
    let mut project = load_sample_project("tiny");
    let before = project.clone();

    let err = project.complete_step("only", "b").unwrap_err();
    assert!(err.is_illegal_transition());
    assert_eq!(project, before);
}

#[test]
fn test_completed_step_cannot_complete_again() {
    let mut project = load_sample_project("tiny");
    project.complete_step("only", "a").unwrap();
    let before = project.clone();

    let err = project.complete_step("only", "a").unwrap_err();
    assert!(err.is_illegal_transition());
    assert_eq!(project, before);
    assert_eq!(*project.xp_gained(), 10);
}

#[test]
fn test_unknown_ids_are_not_found() {
    let mut project = load_sample_project("tiny");
    assert!(project.complete_step("nope", "a").unwrap_err().is_not_found());
    assert!(project.complete_step("only", "nope").unwrap_err().is_not_found());
    assert!(project.task_unlockability("nope").unwrap_err().is_not_found());
}

#[test]
fn test_curriculum_level_completion_resolves_project() {
    let loader = CurriculumLoader::new(&instant_config());
    let (mut curriculum, _) = loader
        .load_str(&test_utils::sample_curriculum_json())
        .unwrap()
        .into_parts();

    assert!(curriculum.complete_step("missing", "only", "a").unwrap_err().is_not_found());

    let outcome = curriculum.complete_step("tiny", "only", "a").unwrap();
    assert_eq!(outcome.project_id(), "tiny");
    assert_eq!(
        *curriculum.project("tiny").unwrap().completion_percentage(),
        50
    );
}

#[test]
fn test_completing_task_unlocks_next_task_and_its_first_step() {
    let mut project = load_sample_project("py-101");

    let outcome = project.complete_step("t1", "s1").unwrap();
    assert_eq!(*outcome.xp_awarded(), 15);
    let outcome = project.complete_step("t1", "s2").unwrap();

    assert!(*outcome.task_completed());
    assert_eq!(
        outcome.unlocked(),
        &Some(Unlocked::Task {
            task_id: "t2".to_string(),
            step_id: "s3".to_string()
        })
    );
    assert_eq!(*outcome.project_xp(), 25);
    assert_eq!(outcome.percentage(), 40);

    let t2 = project.task("t2").unwrap();
    assert!(t2.is_unlocked());
    assert_eq!(t2.step("s3").unwrap().state(), StepState::Unlocked);
    assert_eq!(t2.step("s4").unwrap().state(), StepState::Locked);
    assert!(!project.task("t3").unwrap().is_unlocked());
    assert_tree_invariants(&project);
}

#[test]
fn test_blocked_task_names_nearest_incomplete_predecessor() {
    let mut project = load_sample_project("py-101");
    project.complete_step("t1", "s1").unwrap();
    project.complete_step("t1", "s2").unwrap();

    // t3 depends on t1, which is done, but t2 still precedes it
    assert!(!project.is_task_unlockable("t3").unwrap());
    match project.task_unlockability("t3").unwrap() {
        Unlockability::Blocked {
            prerequisite: Some(prerequisite),
            ..
        } => {
            assert_eq!(prerequisite.id(), "t2");
            assert_eq!(*prerequisite.source(), PrerequisiteSource::PrecedingSibling);
        }
        other => panic!("Expected blocked verdict, got {:?}", other),
    }
    assert_eq!(
        project.task_unlockability("t3").unwrap().reason().as_deref(),
        Some("You need to complete \"Loops\" first")
    );
}

#[test]
fn test_step_unlockability_follows_order() {
    let project = load_sample_project("py-101");
    let t1 = project.task("t1").unwrap();
    assert!(t1.is_step_unlockable("s1").unwrap());
    assert!(!t1.is_step_unlockable("s2").unwrap());
    assert_eq!(
        t1.step_unlockability("s2").unwrap().reason().as_deref(),
        Some("You need to complete \"Print a greeting\" first")
    );
    assert!(t1.step_unlockability("zzz").unwrap_err().is_not_found());
}

#[test]
fn test_full_walkthrough_is_monotonic() {
    let mut project = load_sample_project("py-101");
    let order = [
        ("t1", "s1"),
        ("t1", "s2"),
        ("t2", "s3"),
        ("t2", "s4"),
        ("t3", "s5"),
    ];

    let mut last_percentage = 0;
    let mut last_completed: Vec<String> = Vec::new();
    for (task_id, step_id) in order {
        project.complete_step(task_id, step_id).unwrap();
        assert_tree_invariants(&project);

        let percentage = *project.completion_percentage();
        assert!(percentage >= last_percentage);
        last_percentage = percentage;

        let completed = completed_step_ids(&project);
        assert!(last_completed.iter().all(|id| completed.contains(id)));
        last_completed = completed;
    }

    assert_eq!(last_percentage, 100);
    assert!(project.tasks().iter().all(|t| t.is_completed()));
    assert_eq!(*project.xp_gained(), 15 + 10 + 10 + 10 + 10);
}

#[test]
fn test_percentage_rounds_half_up() {
    let mut project = single_task_project(3);
    assert_eq!(project.complete_step("t", "s1").unwrap().percentage(), 33);
    assert_eq!(project.complete_step("t", "s2").unwrap().percentage(), 67);
    assert_eq!(project.complete_step("t", "s3").unwrap().percentage(), 100);

    let mut project = single_task_project(8);
    for i in 1..=3 {
        project.complete_step("t", &format!("s{}", i)).unwrap();
    }
    // 3/8 = 37.5
    assert_eq!(*project.completion_percentage(), 38);
}
