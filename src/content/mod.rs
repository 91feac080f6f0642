//! Content-addressed source storage
//!
//! Maps a document identifier (SHA-1 of the imported text) to the full
//! text of the document. Importing identical bytes twice lands on the same
//! identifier, so no text is ever stored twice.
//!
//! The identifier is assigned once. Range deletions overwrite the text
//! under the same identifier; nothing here ever rehashes stored text.

mod document_id;
mod errors;
mod local;
mod store;

pub use document_id::{DocumentId, InvalidDocumentId};
pub use errors::{ContentError, ContentErrorCode, ContentResult, Severity};
pub use local::FsContentStore;
pub use store::{ContentStore, InMemoryContentStore};
