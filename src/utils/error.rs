use crate::domain::model::Verb;
use std::path::PathBuf;
use thiserror::Error;

/// Failures reported by a [`FleetClient`](crate::domain::ports::FleetClient).
#[derive(Error, Debug)]
pub enum FleetError {
    #[error("unit not found: {0}")]
    UnitNotFound(String),

    #[error("fleet request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("fleet responded with status {status}: {message}")]
    UnexpectedResponse { status: u16, message: String },

    #[error("invalid unit file {unit} at line {line}: {reason}")]
    InvalidUnitFile {
        unit: String,
        line: usize,
        reason: String,
    },

    #[error("invalid fleet endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("group directory {} could not be opened: {source}", .path.display())]
    DirectoryNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unit file {} could not be read: {source}", .path.display())]
    FileReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{verb} failed for unit {unit}: {source}")]
    SchedulerOperationFailure {
        unit: String,
        verb: Verb,
        #[source]
        source: FleetError,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    FileSystem,
    Scheduler,
}

impl ControllerError {
    pub fn scheduler(verb: Verb, unit: &str, source: FleetError) -> Self {
        ControllerError::SchedulerOperationFailure {
            unit: unit.to_string(),
            verb,
            source,
        }
    }

    pub fn is_directory_not_found(&self) -> bool {
        matches!(self, ControllerError::DirectoryNotFound { .. })
    }

    /// True when the scheduler reported that the unit does not exist.
    pub fn is_unit_not_found(&self) -> bool {
        matches!(
            self,
            ControllerError::SchedulerOperationFailure {
                source: FleetError::UnitNotFound(_),
                ..
            }
        )
    }

    /// Name of the first unit that failed in a batch, if any.
    pub fn failed_unit(&self) -> Option<&str> {
        match self {
            ControllerError::SchedulerOperationFailure { unit, .. } => Some(unit),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ControllerError::DirectoryNotFound { .. }
            | ControllerError::FileReadFailure { .. } => ErrorCategory::FileSystem,
            ControllerError::SchedulerOperationFailure { .. } => ErrorCategory::Scheduler,
            ControllerError::ConfigError { .. }
            | ControllerError::ConfigValidationError { .. }
            | ControllerError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ControllerError::DirectoryNotFound { path, .. } => {
                format!("Group directory '{}' does not exist", path.display())
            }
            ControllerError::FileReadFailure { path, .. } => {
                format!("Could not read unit file '{}'", path.display())
            }
            ControllerError::SchedulerOperationFailure { unit, verb, source } => match source {
                FleetError::UnitNotFound(_) => {
                    format!("Unit '{}' is not known to the cluster ({} aborted)", unit, verb)
                }
                _ => format!("Could not {} unit '{}': {}", verb, unit, source),
            },
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ControllerError::DirectoryNotFound { .. } => {
                "Check the group name and --groups-dir; a group is a directory of unit files"
            }
            ControllerError::FileReadFailure { .. } => {
                "Make sure every file in the group directory is readable UTF-8 text"
            }
            ControllerError::SchedulerOperationFailure { source, .. } => match source {
                FleetError::UnitNotFound(_) => "Submit the group before starting or querying it",
                FleetError::Transport(_) => "Check that fleet is reachable at --fleet-endpoint",
                FleetError::InvalidUnitFile { .. } => "Fix the unit file syntax and submit again",
                _ => "Units before the failed one were applied; run `status` to inspect the group",
            },
            ControllerError::ConfigError { .. }
            | ControllerError::ConfigValidationError { .. }
            | ControllerError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line flags"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ControllerError>;
