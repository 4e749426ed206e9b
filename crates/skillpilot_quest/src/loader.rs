//! Curriculum loader.
//!
//! Turns static curriculum definitions into a fresh progression tree. The
//! first task of every project starts unlocked together with its first
//! step; everything else starts locked, incomplete and at zero XP.

use crate::{Curriculum, Project, QuestConfig, Step, Task};
use derive_getters::Getters;
use skillpilot_core::{CurriculumDefinition, ProjectDefinition, StepDefinition, TaskDefinition};
use skillpilot_error::{CurriculumError, CurriculumErrorKind};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Outcome of loading a whole curriculum.
///
/// Degenerate projects are skipped rather than failing the load; their
/// errors are kept so callers can report them.
#[derive(Debug, Getters)]
pub struct CurriculumLoad {
    /// Projects that loaded
    curriculum: Curriculum,
    /// One error per skipped project
    skipped: Vec<CurriculumError>,
}

impl CurriculumLoad {
    /// Splits the load into the curriculum and the skipped-project errors.
    pub fn into_parts(self) -> (Curriculum, Vec<CurriculumError>) {
        (self.curriculum, self.skipped)
    }
}

/// Builds progression trees from curriculum definitions.
#[derive(Debug, Clone)]
pub struct CurriculumLoader {
    config: QuestConfig,
}

impl CurriculumLoader {
    /// Creates a loader using the XP defaults and starter template in `config`.
    pub fn new(config: &QuestConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Reads and loads a curriculum JSON file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read, is not valid JSON, or defines no
    /// projects. Individual degenerate projects are skipped, not errors.
    #[instrument(skip(self), fields(path = %path.as_ref().display()))]
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<CurriculumLoad, CurriculumError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| CurriculumError::new(CurriculumErrorKind::FileRead(e.to_string())))?;
        self.load_str(&content)
    }

    /// Parses and loads a curriculum JSON document.
    pub fn load_str(&self, json: &str) -> Result<CurriculumLoad, CurriculumError> {
        let definition: CurriculumDefinition = serde_json::from_str(json)
            .map_err(|e| CurriculumError::new(CurriculumErrorKind::JsonParse(e.to_string())))?;
        self.load(&definition)
    }

    /// Loads every project of a curriculum, skipping degenerate ones.
    ///
    /// Each call produces an independent tree.
    #[instrument(skip_all, fields(projects = definition.projects().len()))]
    pub fn load(&self, definition: &CurriculumDefinition) -> Result<CurriculumLoad, CurriculumError> {
        if definition.projects().is_empty() {
            return Err(CurriculumError::new(CurriculumErrorKind::EmptyCurriculum));
        }

        let mut seen = HashSet::new();
        let mut projects = Vec::new();
        let mut skipped = Vec::new();

        for project_def in definition.projects() {
            if !seen.insert(project_def.id().as_str()) {
                let err = CurriculumError::new(CurriculumErrorKind::DuplicateProject(
                    project_def.id().clone(),
                ));
                warn!(project = %project_def.id(), error = %err, "Skipping duplicate project");
                skipped.push(err);
                continue;
            }
            match self.load_project(project_def) {
                Ok(project) => projects.push(project),
                Err(err) => {
                    warn!(project = %project_def.id(), error = %err, "Skipping degenerate project");
                    skipped.push(err);
                }
            }
        }

        info!(
            loaded = projects.len(),
            skipped = skipped.len(),
            "Curriculum loaded"
        );
        Ok(CurriculumLoad {
            curriculum: Curriculum::new(projects),
            skipped,
        })
    }

    /// Loads a single project into a fresh tree.
    ///
    /// # Errors
    ///
    /// Fails when the project has no tasks, a task has no steps, ids
    /// collide, or a dependency list cannot be satisfied.
    #[instrument(skip_all, fields(project = %definition.id()))]
    pub fn load_project(&self, definition: &ProjectDefinition) -> Result<Project, CurriculumError> {
        if definition.tasks().is_empty() {
            return Err(CurriculumError::new(CurriculumErrorKind::NoTasks(
                definition.id().clone(),
            )));
        }

        let task_ids: Vec<&str> = definition.tasks().iter().map(|t| t.id().as_str()).collect();
        if let Some(duplicate) = first_duplicate(&task_ids) {
            return Err(CurriculumError::new(CurriculumErrorKind::DuplicateTask {
                project: definition.id().clone(),
                task: duplicate.to_string(),
            }));
        }

        let mut tasks = definition
            .tasks()
            .iter()
            .enumerate()
            .map(|(index, task_def)| {
                validate_dependencies(task_def.id(), index, task_def.dependencies(), &task_ids)?;
                self.load_task(definition.id(), task_def)
            })
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(first) = tasks.first_mut() {
            first.unlock();
        }

        debug!(tasks = tasks.len(), "Project tree built");
        Ok(Project::new(
            definition.id().clone(),
            definition.name().clone(),
            definition.description().clone(),
            *definition.difficulty(),
            tasks,
        ))
    }

    fn load_task(&self, project_id: &str, definition: &TaskDefinition) -> Result<Task, CurriculumError> {
        if definition.steps().is_empty() {
            return Err(CurriculumError::new(CurriculumErrorKind::NoSteps {
                project: project_id.to_string(),
                task: definition.id().clone(),
            }));
        }

        let step_ids: Vec<&str> = definition.steps().iter().map(|s| s.id().as_str()).collect();
        if let Some(duplicate) = first_duplicate(&step_ids) {
            return Err(CurriculumError::new(CurriculumErrorKind::DuplicateStep {
                task: definition.id().clone(),
                step: duplicate.to_string(),
            }));
        }

        let steps = definition
            .steps()
            .iter()
            .enumerate()
            .map(|(index, step_def)| {
                validate_dependencies(step_def.id(), index, step_def.dependencies(), &step_ids)?;
                Ok(self.load_step(step_def))
            })
            .collect::<Result<Vec<_>, CurriculumError>>()?;

        Ok(Task::new(
            definition.id().clone(),
            definition.name().clone(),
            definition.description().clone(),
            steps,
            definition.reward().unwrap_or(*self.config.default_task_reward()),
            definition.dependencies().clone(),
        ))
    }

    fn load_step(&self, definition: &StepDefinition) -> Step {
        let starter_code = definition
            .starting_code()
            .clone()
            .unwrap_or_else(|| self.config.starter_code_for(definition.name()));

        Step::new(
            definition.id().clone(),
            definition.name().clone(),
            definition.description().clone(),
            definition
                .guidelines()
                .iter()
                .map(|g| strip_list_number(g).to_string())
                .collect(),
            definition.xp_value().unwrap_or(*self.config.default_step_xp()),
            starter_code,
            definition.expected_output().clone(),
            definition.hints().clone(),
            definition.dependencies().clone(),
        )
    }
}

fn first_duplicate<'a>(ids: &[&'a str]) -> Option<&'a str> {
    let mut seen = HashSet::new();
    ids.iter().copied().find(|id| !seen.insert(*id))
}

/// Dependencies must name an earlier sibling; anything else could never
/// be satisfied under the order rule.
fn validate_dependencies(
    item: &str,
    index: usize,
    dependencies: &[String],
    sibling_ids: &[&str],
) -> Result<(), CurriculumError> {
    for dependency in dependencies {
        if dependency == item {
            return Err(CurriculumError::new(CurriculumErrorKind::SelfDependency(
                item.to_string(),
            )));
        }
        match sibling_ids.iter().position(|id| id == dependency) {
            None => {
                return Err(CurriculumError::new(CurriculumErrorKind::UnknownDependency {
                    item: item.to_string(),
                    dependency: dependency.clone(),
                }));
            }
            Some(position) if position > index => {
                return Err(CurriculumError::new(CurriculumErrorKind::ForwardDependency {
                    item: item.to_string(),
                    dependency: dependency.clone(),
                }));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Removes a leading list number such as `"3. "` from a guideline.
fn strip_list_number(guideline: &str) -> &str {
    let digits = guideline.len() - guideline.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return guideline;
    }
    match guideline[digits..].strip_prefix('.') {
        Some(rest) => rest.trim_start(),
        None => guideline,
    }
}
