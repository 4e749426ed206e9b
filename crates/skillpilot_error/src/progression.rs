//! Progression error types raised by the unlock/completion state machine
//! and the XP tracker.

/// Which id failed to resolve against the live tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum NotFoundKind {
    /// Unknown project id
    #[display("project '{}'", _0)]
    Project(String),
    /// Unknown task id within a known project
    #[display("task '{}' in project '{}'", task, project)]
    Task {
        /// Project id
        project: String,
        /// Task id
        task: String,
    },
    /// Unknown step id within a known task
    #[display("step '{}' in task '{}'", step, task)]
    Step {
        /// Task id
        task: String,
        /// Step id
        step: String,
    },
}

/// An id passed to the state machine did not resolve.
///
/// This is a programmer error: surfaced to the caller and never retried.
///
/// # Examples
///
/// ```
/// use skillpilot_error::{NotFoundError, NotFoundKind};
///
/// let err = NotFoundError::new(NotFoundKind::Project("intro".to_string()));
/// assert!(format!("{}", err).contains("intro"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Not Found: {} at line {} in {}", kind, line, file)]
pub struct NotFoundError {
    /// What failed to resolve
    pub kind: NotFoundKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl NotFoundError {
    /// Create a new NotFoundError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: NotFoundKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &NotFoundKind {
        &self.kind
    }
}

/// Why a step could not move to `Completed`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum IllegalTransitionKind {
    /// The step is still locked
    #[display("step '{}' is locked", _0)]
    StepLocked(String),
    /// The step has already been completed
    #[display("step '{}' is already completed", _0)]
    StepAlreadyCompleted(String),
}

/// Attempted to complete a step that is not currently unlocked.
///
/// Not fatal: callers surface it as a user-visible no-op.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Illegal Transition: {} at line {} in {}", kind, line, file)]
pub struct IllegalTransitionError {
    /// Which transition was refused
    pub kind: IllegalTransitionKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl IllegalTransitionError {
    /// Create a new IllegalTransitionError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: IllegalTransitionKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &IllegalTransitionKind {
        &self.kind
    }
}

/// A negative XP amount was passed to the tracker.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Invalid XP amount {} at line {} in {}", amount, line, file)]
pub struct InvalidAmountError {
    /// The rejected amount
    pub amount: i64,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl InvalidAmountError {
    /// Create a new InvalidAmountError with automatic location tracking.
    ///
    /// # Examples
    ///
    /// ```
    /// use skillpilot_error::InvalidAmountError;
    ///
    /// let err = InvalidAmountError::new(-5);
    /// assert_eq!(err.amount, -5);
    /// ```
    #[track_caller]
    pub fn new(amount: i64) -> Self {
        let location = std::panic::Location::caller();
        Self {
            amount,
            line: location.line(),
            file: location.file(),
        }
    }
}
