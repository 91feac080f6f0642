//! Metadata store error types
//!
//! Error codes:
//! - FISH_META_WRITE_FAILED (ERROR severity)
//! - FISH_META_READ_FAILED (ERROR severity)
//! - FISH_META_CORRUPTION (FATAL severity)

use std::fmt;
use std::io;

use crate::content::Severity;

/// Metadata-store error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataErrorCode {
    /// Persisting the record failed
    FishMetaWriteFailed,
    /// Reading the record failed
    FishMetaReadFailed,
    /// Record failed checksum or did not parse
    FishMetaCorruption,
}

impl MetadataErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            MetadataErrorCode::FishMetaWriteFailed => "FISH_META_WRITE_FAILED",
            MetadataErrorCode::FishMetaReadFailed => "FISH_META_READ_FAILED",
            MetadataErrorCode::FishMetaCorruption => "FISH_META_CORRUPTION",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            MetadataErrorCode::FishMetaCorruption => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for MetadataErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Metadata-store error with context
#[derive(Debug)]
pub struct MetadataError {
    code: MetadataErrorCode,
    message: String,
    source: Option<io::Error>,
}

impl MetadataError {
    /// Create a write failure
    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: MetadataErrorCode::FishMetaWriteFailed,
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a read failure
    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: MetadataErrorCode::FishMetaReadFailed,
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a corruption error (FATAL)
    pub fn corruption(message: impl Into<String>) -> Self {
        Self {
            code: MetadataErrorCode::FishMetaCorruption,
            message: message.into(),
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> MetadataErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns whether this error is fatal
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for MetadataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for MetadataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for metadata-store operations
pub type MetadataResult<T> = Result<T, MetadataError>;
