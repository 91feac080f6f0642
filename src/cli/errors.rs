//! CLI-specific error types
//!
//! Every error that reaches the CLI is reported once, as a JSON error
//! response, and the process exits non-zero.

use std::fmt;
use std::io;

use crate::session::SessionError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout, input files)
    IoError,
    /// Already initialized
    AlreadyInitialized,
    /// Not initialized
    NotInitialized,
    /// Boot failed
    BootFailed,
    /// Rejected argument or input file
    InvalidInput,
    /// A session operation failed; carries the session's own code
    Session(&'static str),
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "FISH_CLI_CONFIG_ERROR",
            Self::IoError => "FISH_CLI_IO_ERROR",
            Self::AlreadyInitialized => "FISH_CLI_ALREADY_INITIALIZED",
            Self::NotInitialized => "FISH_CLI_NOT_INITIALIZED",
            Self::BootFailed => "FISH_CLI_BOOT_FAILED",
            Self::InvalidInput => "FISH_CLI_INVALID_INPUT",
            Self::Session(code) => code,
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Already initialized
    pub fn already_initialized() -> Self {
        Self::new(
            CliErrorCode::AlreadyInitialized,
            "Data directory already initialized",
        )
    }

    /// Not initialized
    pub fn not_initialized() -> Self {
        Self::new(
            CliErrorCode::NotInitialized,
            "Data directory not initialized. Run 'fishdoc init' first.",
        )
    }

    /// Boot failed
    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BootFailed, msg)
    }

    /// Rejected input
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidInput, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<SessionError> for CliError {
    fn from(e: SessionError) -> Self {
        Self::new(CliErrorCode::Session(e.code()), e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reveal::RevealError;

    #[test]
    fn test_session_errors_keep_their_code() {
        let err = CliError::from(SessionError::from(RevealError::NoActiveDocument));
        assert_eq!(err.code_str(), "FISH_NO_ACTIVE_DOCUMENT");
        assert_eq!(err.to_string(), "FISH_NO_ACTIVE_DOCUMENT: contract violation: no active document");
    }

    #[test]
    fn test_cli_codes() {
        assert_eq!(CliError::not_initialized().code_str(), "FISH_CLI_NOT_INITIALIZED");
        assert_eq!(CliError::invalid_input("x").code(), &CliErrorCode::InvalidInput);
    }
}
