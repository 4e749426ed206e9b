//! Session controller error types.

/// Kinds of session errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SessionErrorKind {
    /// A completion attempt is already in flight
    #[display("A completion attempt is already in progress")]
    Busy,
    /// No task is selected, so steps cannot be addressed
    #[display("No task is currently selected")]
    NoActiveTask,
    /// No step is selected, so there is nothing to complete
    #[display("No step is currently selected")]
    NoActiveStep,
    /// The ticket does not match the in-flight completion attempt
    #[display("Completion ticket {} does not match the pending attempt", _0)]
    UnknownTicket(u64),
}

/// Session error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Session Error: {} at line {} in {}", kind, line, file)]
pub struct SessionError {
    /// The kind of error that occurred
    pub kind: SessionErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SessionError {
    /// Create a new session error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SessionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &SessionErrorKind {
        &self.kind
    }
}
