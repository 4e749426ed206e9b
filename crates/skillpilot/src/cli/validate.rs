//! Validation command handler.

use skillpilot_error::CurriculumError;
use skillpilot_quest::{Curriculum, CurriculumLoader, QuestConfig};
use std::path::{Path, PathBuf};

use super::ValidationOutputFormat;

/// Handles the validate command.
///
/// Exits with status 1 when the file cannot be loaded or any project was
/// skipped.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn handle_validate_command(
    path: PathBuf,
    format: ValidationOutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting validation");

    let loader = CurriculumLoader::new(&QuestConfig::default());
    let (curriculum, skipped) = match loader.load_file(&path) {
        Ok(load) => load.into_parts(),
        Err(e) => {
            match format {
                ValidationOutputFormat::Human => {
                    println!("\n❌ {}", path.display());
                    println!("   {}", e.kind());
                }
                ValidationOutputFormat::Json => {
                    let output = serde_json::json!({
                        "valid": false,
                        "file": path.display().to_string(),
                        "error": e.kind().to_string(),
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
            }
            std::process::exit(1);
        }
    };

    match format {
        ValidationOutputFormat::Human => output_human(&path, &curriculum, &skipped),
        ValidationOutputFormat::Json => output_json(&path, &curriculum, &skipped)?,
    }

    if !skipped.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

/// Outputs validation result in human-readable format.
fn output_human(path: &Path, curriculum: &Curriculum, skipped: &[CurriculumError]) {
    let status_icon = if skipped.is_empty() { "✅" } else { "❌" };
    println!("\n{} {}", status_icon, path.display());
    println!("{}", "─".repeat(80));

    for project in curriculum.projects() {
        let steps: usize = project.tasks().iter().map(|t| t.steps().len()).sum();
        println!(
            "  {} ({}): {} tasks, {} steps",
            project.name(),
            project.id(),
            project.tasks().len(),
            steps
        );
    }

    if !skipped.is_empty() {
        println!("\nSkipped projects:");
        for (i, error) in skipped.iter().enumerate() {
            println!("  {}. {}", i + 1, error.kind());
        }
    }
}

/// Outputs validation result in JSON format.
fn output_json(
    path: &Path,
    curriculum: &Curriculum,
    skipped: &[CurriculumError],
) -> Result<(), Box<dyn std::error::Error>> {
    use serde_json::json;

    let projects: Vec<serde_json::Value> = curriculum
        .projects()
        .iter()
        .map(|p| {
            json!({
                "id": p.id(),
                "name": p.name(),
                "tasks": p.tasks().len(),
                "steps": p.tasks().iter().map(|t| t.steps().len()).sum::<usize>(),
            })
        })
        .collect();

    let skipped: Vec<String> = skipped.iter().map(|e| e.kind().to_string()).collect();

    let output = json!({
        "valid": skipped.is_empty(),
        "file": path.display().to_string(),
        "projects": projects,
        "skipped": skipped,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
