//! Content store error types
//!
//! Error codes:
//! - FISH_CONTENT_IO_ERROR (ERROR severity)
//! - FISH_CONTENT_WRITE_FAILED (ERROR severity)
//! - FISH_CONTENT_READ_FAILED (ERROR severity)
//! - FISH_CONTENT_CORRUPTION (FATAL severity)

use std::fmt;
use std::io;

/// Severity levels shared by the storage layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, process continues
    Error,
    /// Persistent state cannot be trusted
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Content-store error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentErrorCode {
    /// Disk I/O failure outside a read or write of a blob
    FishContentIoError,
    /// Blob write failed
    FishContentWriteFailed,
    /// Blob read failed
    FishContentReadFailed,
    /// Stored blob is not valid text
    FishContentCorruption,
}

impl ContentErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ContentErrorCode::FishContentIoError => "FISH_CONTENT_IO_ERROR",
            ContentErrorCode::FishContentWriteFailed => "FISH_CONTENT_WRITE_FAILED",
            ContentErrorCode::FishContentReadFailed => "FISH_CONTENT_READ_FAILED",
            ContentErrorCode::FishContentCorruption => "FISH_CONTENT_CORRUPTION",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            ContentErrorCode::FishContentCorruption => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for ContentErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Content-store error with context
#[derive(Debug)]
pub struct ContentError {
    code: ContentErrorCode,
    message: String,
    details: Option<String>,
    source: Option<io::Error>,
}

impl ContentError {
    /// Create a generic I/O error
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: ContentErrorCode::FishContentIoError,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a write failure
    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: ContentErrorCode::FishContentWriteFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a read failure
    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: ContentErrorCode::FishContentReadFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a failure for a poisoned in-memory lock
    pub fn lock_poisoned() -> Self {
        Self {
            code: ContentErrorCode::FishContentIoError,
            message: "content store lock poisoned".to_string(),
            details: None,
            source: None,
        }
    }

    /// Create a corruption error for a specific document
    pub fn corruption_for_document(document_id: &str, reason: impl Into<String>) -> Self {
        Self {
            code: ContentErrorCode::FishContentCorruption,
            message: reason.into(),
            details: Some(format!("document_id: {}", document_id)),
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ContentErrorCode {
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

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns whether this error is fatal
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for content-store operations
pub type ContentResult<T> = Result<T, ContentError>;
