//! Error types for schedule generation.

use thiserror::Error;

/// Errors raised while loading or validating input files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },

    /// The file is not valid JSON for the expected shape
    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    /// A time-of-day string could not be understood
    #[error("Invalid time of day: {value}")]
    InvalidTime { value: String },

    /// A buffer ends before it starts
    #[error("Buffer '{name}' ends before it starts")]
    InvalidBuffer { name: String },

    /// `noClassBefore` is later than `noClassAfter`
    #[error("noClassBefore ({before}) is later than noClassAfter ({after})")]
    EmptyDay { before: String, after: String },

    /// The layover is longer than a day
    #[error("Layover of {minutes} minutes exceeds {max} minutes")]
    InvalidLayover { minutes: u32, max: u32 },

    /// A requested course code is not in the catalog
    #[error("Course {code} is not in the catalog")]
    UnknownCourse { code: String },
}

/// Errors that stop a generation run.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// A course lost every section to the rules and the policy is to abort
    #[error("Course {course} has no sections left after applying rules")]
    EmptyCourse { course: String },

    /// The caller's deadline passed before the search finished
    #[error("Deadline exceeded after finding {found} schedules")]
    DeadlineExceeded { found: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ScheduleError {
    /// Returns true if the error was caused by the request rather than by
    /// the search running out of time.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ScheduleError::EmptyCourse { .. } | ScheduleError::Config(_)
        )
    }
}
