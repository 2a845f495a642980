//! Error types for habit operations
//!
//! Every failure here is non-fatal: validation and lookup errors are
//! returned at the operation boundary, load errors are also recorded in the
//! store's state so readers can observe them.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

/// A habit name or frequency that violates the data model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name is empty after trimming
    #[error("Habit name is required")]
    EmptyName,

    /// Name is shorter than the minimum length
    #[error("Habit name must be at least {min} characters (got {len})")]
    NameTooShort { len: usize, min: usize },

    /// Name is longer than the maximum length
    #[error("Habit name must be at most {max} characters (got {len})")]
    NameTooLong { len: usize, max: usize },

    /// Frequency string is neither daily nor weekly
    #[error("Unknown frequency '{0}'. Use 'daily' or 'weekly'.")]
    UnknownFrequency(String),
}

/// Errors raised by a habit source while fetching or saving
#[derive(Error, Debug)]
pub enum LoadError {
    /// Failed to read a habits file
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write a habits file
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Payload could not be decoded
    #[error("Invalid habit data from {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// Request to a remote source failed
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote source answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Payload decoded but breaks a data model invariant
    #[error("Invalid habit data: {0}")]
    InvalidPayload(String),
}

impl LoadError {
    /// Whether retrying the same load could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            LoadError::Http(_) | LoadError::Read { .. } => true,
            LoadError::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            LoadError::Read { .. } | LoadError::Write { .. } => {
                Some("Check that the data directory exists and you have read/write permissions.")
            }
            LoadError::Parse { .. } | LoadError::InvalidPayload(_) => {
                Some("The habit data is malformed. Fix or remove the file and try again.")
            }
            LoadError::Http(_) => Some("Check your network connection and the source_url setting."),
            LoadError::Status { .. } => Some("The habit server rejected the request. Try again later."),
        }
    }
}

/// Errors returned by store operations
#[derive(Error, Debug)]
pub enum HabitError {
    /// Input rejected before touching state
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No habit with this id (stale reference)
    #[error("Habit not found: {id}")]
    NotFound { id: Uuid },

    /// The habit source failed
    #[error("Failed to load habits: {0}")]
    Load(#[from] LoadError),
}

/// Result type for store operations
pub type HabitResult<T> = Result<T, HabitError>;
