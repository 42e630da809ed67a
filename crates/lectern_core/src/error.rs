use thiserror::Error;

/// Errors that cross the subsystem boundary as `Err`.
///
/// Retrieval-level failures (store errors, unknown course, empty results) are
/// never represented here: they travel as plain text inside a `ToolOutcome` so
/// the reasoning engine can read them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LecternError {
    /// Invalid wiring detected at startup (e.g. a tool without a name).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Operation on a session id that does not exist.
    #[error("Session {0} not found")]
    SessionNotFound(String),

    /// Malformed tool parameters.
    #[error("Invalid parameters: {0}")]
    Validation(String),
}

impl LecternError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LecternError::SessionNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, LecternError>;
