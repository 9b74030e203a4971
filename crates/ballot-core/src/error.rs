// Error types for the entrant lifecycle

use thiserror::Error;

/// Result type alias for lifecycle operations
pub type Result<T> = std::result::Result<T, LifecycleError>;

/// Errors that can occur during lifecycle operations
///
/// Per-item failures inside a draw are not errors at this level: they are
/// reported in `DrawOutcome::errors` and committed winners stay committed.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Bad input - rejected before any write
    #[error("validation failed: {0}")]
    Validation(String),

    /// A precondition about current state failed; caller must re-query before retrying
    #[error("conflict: {0}")]
    Conflict(String),

    /// The referenced entity does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Underlying read/write failed - retryable, never swallowed
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl LifecycleError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        LifecycleError::Validation(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        LifecycleError::Conflict(msg.into())
    }

    /// Create a not-found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        LifecycleError::NotFound(msg.into())
    }

    /// Create a storage error from a displayable cause
    pub fn storage(msg: impl Into<String>) -> Self {
        LifecycleError::Storage(anyhow::anyhow!(msg.into()))
    }
}

// Reason-string classes surfaced to callers so the UI can render a specific
// message rather than a generic failure.
pub mod reasons {
    pub const ALREADY_ENGAGED: &str = "already enrolled or selected";
    pub const CANNOT_REJOIN: &str = "cannot rejoin after cancellation";
    pub const ALREADY_WAITING: &str = "already on waiting list";
    pub const WAITING_LIST_FULL: &str = "waiting list full";
    pub const LOCATION_REQUIRED: &str = "location required";
    pub const NOT_SELECTED: &str = "not currently selected";
    pub const INVALID_DRAW_SIZE: &str = "invalid draw size";
    pub const NO_RECIPIENTS: &str = "no recipients";
}
