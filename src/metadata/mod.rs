//! Metadata store
//!
//! Persistent process-wide state: the active document pointer, per-document
//! reveal offset, display title and import filename, and the global reveal
//! rate. Stored as a single checksummed record that survives restarts.
//!
//! # Offsets
//!
//! The store does not know text lengths. Every operation that can move an
//! offset takes the live text length of the same document as `max_len`,
//! and clamps at mutation time. Reads clamp again, since the text may have
//! shrunk since the offset was written.

mod checksum;
mod errors;
mod record;
mod store;

pub use checksum::compute_checksum;
pub use errors::{MetadataError, MetadataErrorCode, MetadataResult};
pub use record::{MetaRecord, RevealRate};
pub use store::{MetadataStore, UNTITLED};
