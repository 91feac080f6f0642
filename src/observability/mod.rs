//! Observability subsystem
//!
//! - Structured JSON logging to stderr
//! - Typed lifecycle and transition events
//! - Session counters
//!
//! Observability is read-only: nothing here feeds back into reveal state,
//! and a failed log write never fails an operation.
//!
//! # Usage
//!
//! ```ignore
//! use fishdoc::observability::{log_event_with_fields, Event, Logger};
//!
//! Logger::info("CONFIG_LOADED", &[("data_dir", "/tmp/fishdoc")]);
//! log_event_with_fields(Event::DocumentImported, &[("document", id.as_str())]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log a lifecycle event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
