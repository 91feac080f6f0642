//! Session error types
//!
//! Every failure a session operation can report falls into one of three
//! kinds:
//!
//! - `StorageFailure`: a persistent read or write failed; in-memory state
//!   is unchanged
//! - `ContractViolation`: the request is refused as a no-op
//! - `NotFound`: the identifier has no stored content

use thiserror::Error;

use crate::content::{ContentError, DocumentId};
use crate::metadata::MetadataError;
use crate::reveal::RevealError;

/// Coarse error taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    StorageFailure,
    ContractViolation,
    NotFound,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::StorageFailure => "storage_failure",
            ErrorKind::ContractViolation => "contract_violation",
            ErrorKind::NotFound => "not_found",
        }
    }
}

/// Error returned by session operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error("contract violation: {0}")]
    Contract(#[from] RevealError),

    #[error("document not found: {0}")]
    NotFound(DocumentId),

    /// The blocking task running the operation was cancelled before it ran
    #[error("session operation interrupted")]
    Interrupted,
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::Content(_) | SessionError::Metadata(_) | SessionError::Interrupted => {
                ErrorKind::StorageFailure
            }
            SessionError::Contract(_) => ErrorKind::ContractViolation,
            SessionError::NotFound(_) => ErrorKind::NotFound,
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::Content(e) => e.code().code(),
            SessionError::Metadata(e) => e.code().code(),
            SessionError::Contract(e) => e.code(),
            SessionError::NotFound(_) => "FISH_NOT_FOUND",
            SessionError::Interrupted => "FISH_SESSION_INTERRUPTED",
        }
    }

    /// Whether persistent state can no longer be trusted
    pub fn is_fatal(&self) -> bool {
        match self {
            SessionError::Content(e) => e.is_fatal(),
            SessionError::Metadata(e) => e.is_fatal(),
            _ => false,
        }
    }
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_kinds_and_codes() {
        let err = SessionError::from(RevealError::NoActiveDocument);
        assert_eq!(err.kind(), ErrorKind::ContractViolation);
        assert_eq!(err.code(), "FISH_NO_ACTIVE_DOCUMENT");

        let err = SessionError::NotFound(DocumentId::from_text("x"));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.code(), "FISH_NOT_FOUND");

        let err = SessionError::Interrupted;
        assert_eq!(err.kind(), ErrorKind::StorageFailure);
        assert_eq!(err.code(), "FISH_SESSION_INTERRUPTED");
        assert!(!err.is_fatal());

        let err = SessionError::from(ContentError::write_failed(
            "disk full",
            io::Error::other("ENOSPC"),
        ));
        assert_eq!(err.kind(), ErrorKind::StorageFailure);
        assert_eq!(err.code(), "FISH_CONTENT_WRITE_FAILED");
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_corruption_is_fatal() {
        let err = SessionError::from(MetadataError::corruption("bad checksum"));
        assert_eq!(err.kind(), ErrorKind::StorageFailure);
        assert!(err.is_fatal());
    }
}
