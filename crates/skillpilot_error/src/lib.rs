//! Error types for the SkillPilot quest progression engine.
//!
//! Every error records the source location it was created at. The
//! crate-level [`SkillPilotError`] wraps any of them so operations spanning
//! several concerns can use `?` throughout.

mod config;
mod curriculum;
mod progression;
mod session;
mod storage;

pub use config::ConfigError;
pub use curriculum::{CurriculumError, CurriculumErrorKind};
pub use progression::{
    IllegalTransitionError, IllegalTransitionKind, InvalidAmountError, NotFoundError,
    NotFoundKind,
};
pub use session::{SessionError, SessionErrorKind};
pub use storage::{StorageError, StorageErrorKind};

/// Crate-level error variants.
#[derive(Debug, derive_more::From)]
pub enum SkillPilotErrorKind {
    /// Malformed or degenerate curriculum
    Curriculum(CurriculumError),
    /// Unknown project, task or step id
    NotFound(NotFoundError),
    /// Step cannot be completed from its current state
    IllegalTransition(IllegalTransitionError),
    /// Negative XP amount
    InvalidAmount(InvalidAmountError),
    /// Session controller refused the request
    Session(SessionError),
    /// Progress store failure
    Storage(StorageError),
    /// Configuration error
    Config(ConfigError),
}

impl std::fmt::Display for SkillPilotErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkillPilotErrorKind::Curriculum(e) => write!(f, "{}", e),
            SkillPilotErrorKind::NotFound(e) => write!(f, "{}", e),
            SkillPilotErrorKind::IllegalTransition(e) => write!(f, "{}", e),
            SkillPilotErrorKind::InvalidAmount(e) => write!(f, "{}", e),
            SkillPilotErrorKind::Session(e) => write!(f, "{}", e),
            SkillPilotErrorKind::Storage(e) => write!(f, "{}", e),
            SkillPilotErrorKind::Config(e) => write!(f, "{}", e),
        }
    }
}

/// SkillPilot error with kind discrimination.
#[derive(Debug)]
pub struct SkillPilotError(Box<SkillPilotErrorKind>);

impl SkillPilotError {
    /// Create a new error from a kind.
    pub fn new(kind: SkillPilotErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &SkillPilotErrorKind {
        &self.0
    }

    /// Returns true when the error is a refused state transition.
    pub fn is_illegal_transition(&self) -> bool {
        matches!(*self.0, SkillPilotErrorKind::IllegalTransition(_))
    }

    /// Returns true when the error is an unresolved id.
    pub fn is_not_found(&self) -> bool {
        matches!(*self.0, SkillPilotErrorKind::NotFound(_))
    }

    /// Returns true when a completion attempt was rejected as already in flight.
    pub fn is_busy(&self) -> bool {
        matches!(
            &*self.0,
            SkillPilotErrorKind::Session(e) if e.kind == SessionErrorKind::Busy
        )
    }
}

impl std::fmt::Display for SkillPilotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SkillPilot Error: {}", self.0)
    }
}

impl std::error::Error for SkillPilotError {}

// Generic From implementation for any type that converts to SkillPilotErrorKind
impl<T> From<T> for SkillPilotError
where
    T: Into<SkillPilotErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for SkillPilot operations.
pub type SkillPilotResult<T> = std::result::Result<T, SkillPilotError>;
