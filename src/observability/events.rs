//! Observable events
//!
//! Events are explicit and typed; the string form is what lands in the
//! `event` field of a log line.

use std::fmt;

use super::logger::Severity;

/// Observable events in fishdoc
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Process startup begins
    BootStart,
    /// Stores loaded, ready for input
    BootComplete,
    /// Configuration loaded
    ConfigLoaded,
    /// Shutdown initiated
    ShutdownStart,
    /// State flushed, shutdown complete
    ShutdownComplete,

    // Documents
    /// Text imported (new or already known)
    DocumentImported,
    /// Active document switched
    DocumentActivated,
    /// Active document removed from both stores
    DocumentRemoved,
    /// Rate setting changed
    RateChanged,
    /// Title changed
    TitleChanged,

    // Transitions
    /// Offset moved forward
    RevealAdvanced,
    /// Offset moved back
    RevealRetreated,
    /// Visible range permanently deleted
    RangeDeleted,
    /// IME composition committed
    CompositionFlushed,

    // Failures
    /// Collaborator broke the transition contract
    ContractViolation,
    /// Persistent read or write failed
    StorageFailure,
    /// Metadata record failed verification (FATAL)
    MetadataCorruption,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "FISHDOC_STARTUP_BEGIN",
            Event::BootComplete => "FISHDOC_STARTUP_COMPLETE",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::DocumentImported => "DOCUMENT_IMPORTED",
            Event::DocumentActivated => "DOCUMENT_ACTIVATED",
            Event::DocumentRemoved => "DOCUMENT_REMOVED",
            Event::RateChanged => "RATE_CHANGED",
            Event::TitleChanged => "TITLE_CHANGED",

            Event::RevealAdvanced => "REVEAL_ADVANCED",
            Event::RevealRetreated => "REVEAL_RETREATED",
            Event::RangeDeleted => "RANGE_DELETED",
            Event::CompositionFlushed => "COMPOSITION_FLUSHED",

            Event::ContractViolation => "CONTRACT_VIOLATION",
            Event::StorageFailure => "STORAGE_FAILURE",
            Event::MetadataCorruption => "METADATA_CORRUPTION",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::RevealAdvanced
            | Event::RevealRetreated
            | Event::CompositionFlushed => Severity::Trace,
            Event::ContractViolation => Severity::Warn,
            Event::StorageFailure => Severity::Error,
            Event::MetadataCorruption => Severity::Fatal,
            _ => Severity::Info,
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Event; 17] = [
        Event::BootStart,
        Event::BootComplete,
        Event::ConfigLoaded,
        Event::ShutdownStart,
        Event::ShutdownComplete,
        Event::DocumentImported,
        Event::DocumentActivated,
        Event::DocumentRemoved,
        Event::RateChanged,
        Event::TitleChanged,
        Event::RevealAdvanced,
        Event::RevealRetreated,
        Event::RangeDeleted,
        Event::CompositionFlushed,
        Event::ContractViolation,
        Event::StorageFailure,
        Event::MetadataCorruption,
    ];

    #[test]
    fn test_all_events_have_string_representation() {
        for event in ALL {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_fatal_events() {
        assert!(Event::MetadataCorruption.is_fatal());
        assert!(!Event::StorageFailure.is_fatal());
        assert!(!Event::RevealAdvanced.is_fatal());
    }

    #[test]
    fn test_keystroke_events_are_trace() {
        assert_eq!(Event::RevealAdvanced.severity(), Severity::Trace);
        assert_eq!(Event::RangeDeleted.severity(), Severity::Info);
    }
}
