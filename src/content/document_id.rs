//! Document identifiers
//!
//! A document identifier is the SHA-1 digest of the imported text, rendered
//! as 40 lowercase hex characters. It is computed once at import and then
//! travels with the document as a handle, even after the text is edited.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use thiserror::Error;

/// Rejected identifier string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid document id '{0}': expected {len} hex characters", len = DocumentId::HEX_LEN)]
pub struct InvalidDocumentId(pub String);

/// Stable handle of a stored document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    /// Length of the hex rendering of a 20-byte digest
    pub const HEX_LEN: usize = 40;

    /// Computes the identifier of `text`.
    ///
    /// Hashes the exact UTF-8 bytes, so the result is the same on every
    /// platform and across restarts.
    pub fn from_text(text: &str) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(text.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Parses an identifier supplied from outside the process.
    ///
    /// Upper-case hex is accepted and normalised.
    pub fn parse(raw: &str) -> Result<Self, InvalidDocumentId> {
        let trimmed = raw.trim();
        if trimmed.len() != Self::HEX_LEN || !trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(InvalidDocumentId(raw.to_string()));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// Returns the hex string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the first eight hex characters
    pub fn short(&self) -> &str {
        &self.0[..8]
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DocumentId {
    type Error = InvalidDocumentId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}
