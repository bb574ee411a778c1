//! Error types for yearwheel
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (invalid rule, unknown task, bad arguments or config)
//! - 4: Operation failed (I/O, corrupt task file)

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::fields::Recurrence;

/// Exit codes for the yw CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Rule fields that carry a numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Month,
    Day,
    Weekday,
}

impl Field {
    /// Inclusive bounds accepted for this field.
    pub fn bounds(self) -> (u32, u32) {
        match self {
            Field::Month => (1, 12),
            Field::Day => (1, 31),
            Field::Weekday => (0, 6),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Month => "month",
            Field::Day => "day",
            Field::Weekday => "weekday",
        };
        f.write_str(name)
    }
}

/// Reasons a rule draft cannot become a schedule rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Task name cannot be empty")]
    EmptyName,

    #[error("Provide a season, an exact day, or a weekday together with a week rank")]
    IncompleteSchedule,

    #[error("Use either an exact day or a weekday with a week rank, not both")]
    MixedScheduleKinds,

    #[error("{field} {value} is out of range ({min}-{max})", min = .field.bounds().0, max = .field.bounds().1)]
    OutOfRange { field: Field, value: u32 },

    #[error("A {recurrence} schedule needs an anchor month")]
    MissingAnchorMonth { recurrence: Recurrence },
}

impl ValidationError {
    /// The rule field this failure is attributed to, if any.
    pub fn field(&self) -> Option<Field> {
        match self {
            ValidationError::OutOfRange { field, .. } => Some(*field),
            ValidationError::MissingAnchorMonth { .. } => Some(Field::Month),
            ValidationError::EmptyName
            | ValidationError::IncompleteSchedule
            | ValidationError::MixedScheduleKinds => None,
        }
    }
}

/// Main error type for yearwheel operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid schedule: {0}")]
    Validation(#[from] ValidationError),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Multiple tasks named '{name}' (ids {ids}); use the id instead")]
    AmbiguousTask { name: String, ids: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration in {path}: {source}")]
    InvalidConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Task file error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(_)
            | Error::TaskNotFound(_)
            | Error::AmbiguousTask { .. }
            | Error::InvalidArgument(_)
            | Error::InvalidConfig { .. } => exit_codes::USER_ERROR,

            Error::Io(_) | Error::Json(_) => exit_codes::OPERATION_FAILED,
        }
    }
}

/// Result type alias for yearwheel operations
pub type Result<T> = std::result::Result<T, Error>;
