//! Curriculum loading error types.

/// Specific error conditions raised while loading a curriculum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum CurriculumErrorKind {
    /// Failed to read the curriculum file
    #[display("Failed to read curriculum file: {}", _0)]
    FileRead(String),
    /// Failed to parse JSON content
    #[display("Failed to parse curriculum JSON: {}", _0)]
    JsonParse(String),
    /// Curriculum contains no projects at all
    #[display("Curriculum defines no projects")]
    EmptyCurriculum,
    /// Project defines zero tasks
    #[display("Project '{}' defines no tasks", _0)]
    NoTasks(String),
    /// Task defines zero steps
    #[display("Task '{}' in project '{}' defines no steps", task, project)]
    NoSteps {
        /// Project id
        project: String,
        /// Task id
        task: String,
    },
    /// Two projects share an id
    #[display("Project id '{}' is defined more than once", _0)]
    DuplicateProject(String),
    /// Two tasks in one project share an id
    #[display("Task id '{}' is defined more than once in project '{}'", task, project)]
    DuplicateTask {
        /// Project id
        project: String,
        /// Task id
        task: String,
    },
    /// Two steps in one task share an id
    #[display("Step id '{}' is defined more than once in task '{}'", step, task)]
    DuplicateStep {
        /// Task id
        task: String,
        /// Step id
        step: String,
    },
    /// A dependency names an id that is not a sibling
    #[display("'{}' depends on unknown sibling '{}'", item, dependency)]
    UnknownDependency {
        /// Task or step id declaring the dependency
        item: String,
        /// The unresolved dependency id
        dependency: String,
    },
    /// An item lists itself as a dependency
    #[display("'{}' lists itself as a dependency", _0)]
    SelfDependency(String),
    /// A dependency names a later sibling, which can never complete first
    #[display("'{}' depends on later sibling '{}' and could never unlock", item, dependency)]
    ForwardDependency {
        /// Task or step id declaring the dependency
        item: String,
        /// The later sibling id
        dependency: String,
    },
}

/// Error type for curriculum loading.
///
/// Fatal to the project it was raised for; loaders skip that project and
/// continue with the rest.
///
/// # Examples
///
/// ```
/// use skillpilot_error::{CurriculumError, CurriculumErrorKind};
///
/// let err = CurriculumError::new(CurriculumErrorKind::NoTasks("intro".to_string()));
/// assert!(format!("{}", err).contains("no tasks"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Curriculum Error: {} at line {} in {}", kind, line, file)]
pub struct CurriculumError {
    /// The specific error condition
    pub kind: CurriculumErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl CurriculumError {
    /// Create a new CurriculumError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CurriculumErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CurriculumErrorKind {
        &self.kind
    }
}
