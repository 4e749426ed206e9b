//! Project listing command handler.

use skillpilot_quest::{CurriculumLoader, QuestConfig};
use std::path::PathBuf;

/// Handles the projects command.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn handle_projects_command(path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let loader = CurriculumLoader::new(&QuestConfig::default());
    let (curriculum, skipped) = loader.load_file(&path)?.into_parts();

    for project in curriculum.projects() {
        let steps: usize = project.tasks().iter().map(|t| t.steps().len()).sum();
        println!(
            "{:<20} {:<32} {:<12} {} tasks, {} steps",
            project.id(),
            project.name(),
            project.difficulty(),
            project.tasks().len(),
            steps
        );
        if !project.description().is_empty() {
            println!("{:<20} {}", "", project.description());
        }
    }

    if !skipped.is_empty() {
        tracing::warn!(count = skipped.len(), "Some projects were skipped; run validate for details");
    }
    Ok(())
}
