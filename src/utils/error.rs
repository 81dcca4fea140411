use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Scenario '{scenario}' disagrees on backend '{backend}': expected {expected}, got {actual}")]
    Mismatch {
        scenario: String,
        backend: String,
        expected: String,
        actual: String,
    },

    #[error("Unknown scenario: {name}")]
    UnknownScenario { name: String },

    #[error("Unknown backend: {name}")]
    UnknownBackend { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Verification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl HarnessError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            HarnessError::IoError(_)
            | HarnessError::SerializationError(_)
            | HarnessError::CsvError(_) => ErrorCategory::Io,
            HarnessError::ConfigValidationError { .. }
            | HarnessError::InvalidConfigValueError { .. }
            | HarnessError::MissingConfigError { .. }
            | HarnessError::UnknownScenario { .. }
            | HarnessError::UnknownBackend { .. } => ErrorCategory::Configuration,
            HarnessError::Mismatch { .. } => ErrorCategory::Verification,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Io => ErrorSeverity::Critical,
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Verification => ErrorSeverity::High,
        }
    }

    /// Process exit code for the CLI, chosen by severity.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            HarnessError::IoError(_) => "Check that the output directory exists and is writable",
            HarnessError::SerializationError(_) | HarnessError::CsvError(_) => {
                "Try another report format (--format text)"
            }
            HarnessError::ConfigValidationError { .. } => "Check the TOML syntax of the config file",
            HarnessError::InvalidConfigValueError { .. } => {
                "Fix the reported field and run again"
            }
            HarnessError::MissingConfigError { .. } => "Add the missing field to the config file",
            HarnessError::Mismatch { .. } => {
                "Backends disagree; rerun with --verbose and compare the per-backend results"
            }
            HarnessError::UnknownScenario { .. } => {
                "Valid scenarios: sum-filtered-scaled, sort-ascending, sort-descending, min-by-age, min-of-empty, group-and-count, descending, lazy-find-first, timed-range, timed-range-filtered"
            }
            HarnessError::UnknownBackend { .. } => "Valid backends: sequential, eager, parallel",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            HarnessError::Mismatch {
                scenario, backend, ..
            } => format!("Scenario '{}' failed on backend '{}'", scenario, backend),
            HarnessError::IoError(e) => format!("Could not read or write a file: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
