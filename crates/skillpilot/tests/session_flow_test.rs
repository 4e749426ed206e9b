//! End-to-end quest flow through the facade re-exports.

use skillpilot::{
    CompletionReport, CurriculumLoader, FileProgressStore, FixedOutcomePolicy, QuestConfigBuilder,
    SessionController, SessionEvent, Unlocked,
};
use tempfile::TempDir;

const CURRICULUM: &str = r#"{
    "projects": [{
        "project_id": "web-1",
        "project_name": "Web Basics",
        "difficulty": "Intermediate",
        "tasks": [
            {
                "task_id": "html",
                "task_name": "HTML",
                "steps": [{ "step_id": "tags", "step_name": "Tags", "xp_value": 20 }]
            },
            {
                "task_id": "css",
                "task_name": "CSS",
                "steps": [
                    { "step_id": "selectors", "step_name": "Selectors" },
                    { "step_id": "layout", "step_name": "Layout" }
                ]
            }
        ]
    }]
}"#;

#[tokio::test]
async fn test_project_completes_and_progress_survives_restart() {
    let dir = TempDir::new().unwrap();
    let config = QuestConfigBuilder::default()
        .completion_delay_ms(0u64)
        .progress_dir(dir.path().to_path_buf())
        .build()
        .unwrap();

    let loader = CurriculumLoader::new(&config);
    let (mut curriculum, skipped) = loader.load_str(CURRICULUM).unwrap().into_parts();
    assert!(skipped.is_empty());
    let project = curriculum.take_project("web-1").unwrap();

    let mut session = SessionController::start(
        project,
        Box::new(FileProgressStore::new(config.progress_dir()).unwrap()),
        Box::new(FixedOutcomePolicy::pass()),
        config.clone(),
    );

    match session.attempt_completion(true).await.unwrap() {
        CompletionReport::Passed { outcome, .. } => {
            assert_eq!(
                outcome.unlocked(),
                &Some(Unlocked::Task {
                    task_id: "css".to_string(),
                    step_id: "selectors".to_string()
                })
            );
        }
        other => panic!("Expected a passed attempt, got {:?}", other),
    }

    assert!(session.select_task("css").unwrap().is_selected());
    session.attempt_completion(true).await.unwrap();
    let project = session.into_project();
    assert_eq!(*project.completion_percentage(), 67);

    // A new session over the same tree resumes at the saved step
    let mut resumed = SessionController::start(
        project,
        Box::new(FileProgressStore::new(config.progress_dir()).unwrap()),
        Box::new(FixedOutcomePolicy::pass()),
        config,
    );
    assert_eq!(
        resumed.drain_events(),
        vec![SessionEvent::Resumed {
            task_id: "css".to_string(),
            step_id: "selectors".to_string()
        }]
    );

    assert!(resumed.select_step("layout").unwrap().is_selected());
    resumed.attempt_completion(true).await.unwrap();
    assert!(resumed.project().is_completed());
    assert_eq!(*resumed.project().completion_percentage(), 100);
    assert_eq!(*resumed.project().xp_gained(), 40);
    assert_eq!(*resumed.tracker().streak(), 3);
}
