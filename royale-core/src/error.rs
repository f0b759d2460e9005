//! Error types for the royale ecosystem.

use thiserror::Error;

/// Errors that can occur during schedule ingestion.
#[derive(Error, Debug)]
pub enum RoyaleError {
    /// The input does not parse as a well-formed calendar document.
    /// Fatal for the whole run; never produces partial events.
    #[error("Malformed calendar: {0}")]
    MalformedCalendar(String),

    /// A single event carries an RRULE the expander cannot evaluate.
    /// Recoverable: the pipeline skips the event and continues.
    #[error("Invalid recurrence rule: {0}")]
    InvalidRecurrenceRule(String),

    /// A store operation failed mid-replace. `completed` counts the
    /// operations that finished in the failing stage.
    #[error("Sync failed after {completed} completed operations: {reason}")]
    SyncFailed { completed: usize, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Store backend '{0}' not found in PATH")]
    StoreNotInstalled(String),

    #[error("Store request timed out after {0}s")]
    StoreTimeout(u64),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for royale operations.
pub type RoyaleResult<T> = Result<T, RoyaleError>;
