use crate::domain::line::LineId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubwayError {
    #[error("Invalid distance: {reason}")]
    InvalidDistance { reason: String },

    #[error("Section {up} -> {down} cannot be added: both stations are already registered on the line")]
    DuplicateSection { up: String, down: String },

    #[error("Section {up} -> {down} cannot be added: neither station touches the line")]
    DisconnectedSection { up: String, down: String },

    #[error("Station not found: {station}")]
    StationNotFound { station: String },

    #[error("Cannot remove the only remaining section of a line")]
    LastSectionRemoval,

    #[error("Section chain is in an invalid state: {message}")]
    InvalidChainState { message: String },

    #[error("Line not found: {id}")]
    LineNotFound { id: LineId },

    #[error("Line {line_id} was modified concurrently (expected version {expected}, found {found})")]
    ConcurrentModification {
        line_id: LineId,
        expected: u64,
        found: u64,
    },

    #[error("Validation error on '{field}': {reason}")]
    ValidationError { field: String, reason: String },

    #[error("Configuration error on '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Domain,
    NotFound,
    Conflict,
    Config,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SubwayError {
    /// Stable snake_case name, used in scenario reports.
    pub fn kind(&self) -> &'static str {
        match self {
            SubwayError::InvalidDistance { .. } => "invalid_distance",
            SubwayError::DuplicateSection { .. } => "duplicate_section",
            SubwayError::DisconnectedSection { .. } => "disconnected_section",
            SubwayError::StationNotFound { .. } => "station_not_found",
            SubwayError::LastSectionRemoval => "last_section_removal",
            SubwayError::InvalidChainState { .. } => "invalid_chain_state",
            SubwayError::LineNotFound { .. } => "line_not_found",
            SubwayError::ConcurrentModification { .. } => "concurrent_modification",
            SubwayError::ValidationError { .. } => "validation",
            SubwayError::ConfigValidationError { .. } => "config",
            SubwayError::IoError(_) => "io",
            SubwayError::SerializationError(_) => "serialization",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SubwayError::InvalidDistance { .. }
            | SubwayError::DuplicateSection { .. }
            | SubwayError::DisconnectedSection { .. }
            | SubwayError::LastSectionRemoval
            | SubwayError::ValidationError { .. } => ErrorCategory::Domain,
            SubwayError::StationNotFound { .. } | SubwayError::LineNotFound { .. } => {
                ErrorCategory::NotFound
            }
            SubwayError::ConcurrentModification { .. } => ErrorCategory::Conflict,
            SubwayError::ConfigValidationError { .. } => ErrorCategory::Config,
            SubwayError::InvalidChainState { .. }
            | SubwayError::IoError(_)
            | SubwayError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Domain | ErrorCategory::NotFound => ErrorSeverity::High,
            ErrorCategory::Conflict => ErrorSeverity::Medium,
            ErrorCategory::Config => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SubwayError::InvalidDistance { reason } => {
                format!("The section distance is not acceptable: {}", reason)
            }
            SubwayError::DuplicateSection { up, down } => format!(
                "Both {} and {} are already on this line, so the section would duplicate an existing route",
                up, down
            ),
            SubwayError::DisconnectedSection { up, down } => format!(
                "Neither {} nor {} is on this line, so the section cannot be connected",
                up, down
            ),
            SubwayError::StationNotFound { station } => {
                format!("Could not find station '{}'", station)
            }
            SubwayError::LastSectionRemoval => {
                "A line must keep at least one section".to_string()
            }
            SubwayError::LineNotFound { id } => format!("Could not find line {}", id),
            SubwayError::ConcurrentModification { line_id, .. } => {
                format!("Line {} was changed by someone else in the meantime", line_id)
            }
            SubwayError::ValidationError { field, reason } => {
                format!("Invalid value for {}: {}", field, reason)
            }
            SubwayError::ConfigValidationError { field, message } => {
                format!("Configuration problem in {}: {}", field, message)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SubwayError::InvalidDistance { .. } => {
                "Use a positive distance shorter than the section being divided"
            }
            SubwayError::DuplicateSection { .. } => {
                "Register a section where exactly one station is already on the line"
            }
            SubwayError::DisconnectedSection { .. } => {
                "Connect the new section to a station that is already on the line"
            }
            SubwayError::StationNotFound { .. } => {
                "Check the station id, or register the station first"
            }
            SubwayError::LastSectionRemoval => "Delete the whole line instead",
            SubwayError::LineNotFound { .. } => "Check the line id",
            SubwayError::ConcurrentModification { .. } => "Reload the line and retry",
            SubwayError::ValidationError { .. } => "Provide a non-empty value",
            SubwayError::ConfigValidationError { .. } => {
                "Fix the scenario file and run again"
            }
            SubwayError::InvalidChainState { .. } => {
                "The stored line is corrupted; recreate it"
            }
            SubwayError::IoError(_) => "Check that the file exists and is readable",
            SubwayError::SerializationError(_) => "Report this as a bug",
        }
    }
}

pub type Result<T> = std::result::Result<T, SubwayError>;
