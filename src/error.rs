//! Error types for `HashGrid`
//!
//! Domain-specific error enums plus a top-level aggregate that maps each
//! failure class to a Unix exit code for the CLI.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `HashGrid` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Progress store error (connection failed, bad response)
    pub const STORE_ERROR: i32 = 4;

    /// Puzzle session error (invalid operation for the current state)
    pub const SESSION_ERROR: i32 = 5;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `HashGrid` operations.
///
/// Aggregates all domain-specific errors and provides a unified interface
/// for error handling and exit code mapping.
#[derive(Debug, Error)]
pub enum HashGridError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Puzzle session error
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Progress store error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl HashGridError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Json(_) | Self::Yaml(_) => ExitCode::CONFIG_ERROR,
            Self::Store(_) => ExitCode::STORE_ERROR,
            Self::Session(_) => ExitCode::SESSION_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Configuration validation failed
    #[error("validation failed for {path}")]
    ValidationError {
        /// Path to the configuration file
        path: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// Referenced configuration file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found during configuration validation.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Path to the problematic field (e.g., `puzzles[2].span`)
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Validation failure that prevents the configuration from being used
    Error,
    /// Potential issue that does not prevent configuration loading
    Warning,
}

// ============================================================================
// Session Errors
// ============================================================================

/// Puzzle session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A guess was submitted with no puzzle selected
    #[error("no puzzle selected")]
    NoPuzzleSelected,

    /// The selected puzzle id is not in the configured table
    #[error("unknown puzzle id {0}")]
    UnknownPuzzle(u32),

    /// Recording a solve with the progress store failed
    #[error("progress store: {0}")]
    Store(#[from] StoreError),
}

// ============================================================================
// Progress Store Errors
// ============================================================================

/// Errors from the remote progress store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection or request failure
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx HTTP status from the store
    #[error("store returned HTTP status {0}")]
    HttpStatus(u16),

    /// Request or response exceeded the configured timeout
    #[error("store request timed out")]
    Timeout,

    /// Response body could not be parsed
    #[error("invalid store response: {0}")]
    InvalidResponse(String),
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `HashGrid` operations.
pub type Result<T> = std::result::Result<T, HashGridError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::SUCCESS, 0);
        assert_eq!(ExitCode::ERROR, 1);
        assert_eq!(ExitCode::CONFIG_ERROR, 2);
        assert_eq!(ExitCode::IO_ERROR, 3);
        assert_eq!(ExitCode::STORE_ERROR, 4);
        assert_eq!(ExitCode::SESSION_ERROR, 5);
        assert_eq!(ExitCode::USAGE_ERROR, 64);
        assert_eq!(ExitCode::INTERRUPTED, 130);
        assert_eq!(ExitCode::TERMINATED, 143);
    }

    #[test]
    fn test_config_error_exit_code() {
        let err: HashGridError = ConfigError::MissingFile {
            path: PathBuf::from("/test"),
        }
        .into();
        assert_eq!(err.exit_code(), ExitCode::CONFIG_ERROR);
    }

    #[test]
    fn test_store_error_exit_code() {
        let err: HashGridError = StoreError::Network("refused".to_string()).into();
        assert_eq!(err.exit_code(), ExitCode::STORE_ERROR);
    }

    #[test]
    fn test_session_error_exit_code() {
        let err: HashGridError = SessionError::NoPuzzleSelected.into();
        assert_eq!(err.exit_code(), ExitCode::SESSION_ERROR);
    }

    #[test]
    fn test_io_error_exit_code() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let err: HashGridError = io_err.into();
        assert_eq!(err.exit_code(), ExitCode::IO_ERROR);
    }

    #[test]
    fn test_session_wraps_store_error() {
        let err = SessionError::from(StoreError::Timeout);
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_validation_issue_display() {
        let issue = ValidationIssue {
            path: "puzzles[0].span".to_string(),
            message: "span must be 1 or 2".to_string(),
            severity: Severity::Error,
        };
        assert_eq!(issue.to_string(), "error: span must be 1 or 2 at puzzles[0].span");
    }

    #[test]
    fn test_validation_issue_warning_display() {
        let issue = ValidationIssue {
            path: "boot[4]".to_string(),
            message: "ticking bar has zero ticks".to_string(),
            severity: Severity::Warning,
        };
        assert_eq!(issue.to_string(), "warning: ticking bar has zero ticks at boot[4]");
    }
}
