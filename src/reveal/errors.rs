//! Reveal contract violations
//!
//! Every variant is a request the engine refuses outright. Nothing is
//! clamped into a "close enough" range; the caller's state stays as it was.

use thiserror::Error;

/// A transition request the engine rejects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RevealError {
    /// Transition requested with no active document
    #[error("no active document")]
    NoActiveDocument,

    /// Selection reaches into text that is not revealed yet
    #[error("selection {start}+{length} reaches past reveal offset {offset}")]
    SelectionPastOffset {
        start: usize,
        length: usize,
        offset: usize,
    },

    /// Range deletion with an empty selection
    #[error("empty selection at {start}")]
    EmptySelection { start: usize },
}

impl RevealError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            RevealError::NoActiveDocument => "FISH_NO_ACTIVE_DOCUMENT",
            RevealError::SelectionPastOffset { .. } => "FISH_SELECTION_PAST_OFFSET",
            RevealError::EmptySelection { .. } => "FISH_EMPTY_SELECTION",
        }
    }
}

/// Result type for reveal transitions
pub type RevealResult<T> = Result<T, RevealError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(RevealError::NoActiveDocument.code(), "FISH_NO_ACTIVE_DOCUMENT");
        assert_eq!(
            RevealError::SelectionPastOffset { start: 0, length: 1, offset: 0 }.code(),
            "FISH_SELECTION_PAST_OFFSET"
        );
        assert_eq!(RevealError::EmptySelection { start: 0 }.code(), "FISH_EMPTY_SELECTION");
    }

    #[test]
    fn test_display_mentions_bounds() {
        let err = RevealError::SelectionPastOffset { start: 3, length: 4, offset: 5 };
        let display = err.to_string();
        assert!(display.contains("3+4"));
        assert!(display.contains('5'));
    }
}
