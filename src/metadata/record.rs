//! Persisted metadata record
//!
//! The whole metadata namespace is one record. On disk it is wrapped in an
//! envelope carrying a CRC32 over the compact serialization of the record:
//!
//! ```text
//! { "checksum": u32, "record": { active_document, progress, titles, file_names, rate } }
//! ```
//!
//! Maps are `BTreeMap` so serialization is deterministic, which is what
//! lets the checksum be recomputed on load.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::content::DocumentId;

/// Global reveal rate: characters revealed per keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RateRepr", into = "RateRepr")]
pub struct RevealRate {
    chars_per_keystroke: usize,
}

#[derive(Serialize, Deserialize)]
struct RateRepr {
    chars_per_keystroke: usize,
}

impl RevealRate {
    pub const MIN: usize = 1;
    pub const MAX: usize = 1000;
    pub const DEFAULT: usize = 2;

    /// Builds a rate, clamping into `MIN..=MAX`
    pub fn new(chars_per_keystroke: usize) -> Self {
        Self {
            chars_per_keystroke: chars_per_keystroke.clamp(Self::MIN, Self::MAX),
        }
    }

    pub fn chars_per_keystroke(&self) -> usize {
        self.chars_per_keystroke
    }
}

impl Default for RevealRate {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

impl From<RateRepr> for RevealRate {
    fn from(raw: RateRepr) -> Self {
        Self::new(raw.chars_per_keystroke)
    }
}

impl From<RevealRate> for RateRepr {
    fn from(rate: RevealRate) -> Self {
        Self {
            chars_per_keystroke: rate.chars_per_keystroke,
        }
    }
}

/// Process-wide metadata state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaRecord {
    /// Active document pointer
    #[serde(default)]
    pub active_document: Option<DocumentId>,

    /// Stored reveal offset per document, in characters
    #[serde(default)]
    pub progress: BTreeMap<DocumentId, usize>,

    /// Display title per document
    #[serde(default)]
    pub titles: BTreeMap<DocumentId, String>,

    /// Original import filename per document
    #[serde(default)]
    pub file_names: BTreeMap<DocumentId, String>,

    /// Global reveal rate
    #[serde(default)]
    pub rate: RevealRate,
}

impl MetaRecord {
    /// Empty record using `rate`
    pub fn with_rate(rate: RevealRate) -> Self {
        Self {
            rate,
            ..Self::default()
        }
    }

    /// Every identifier that has any metadata
    pub fn documents(&self) -> Vec<DocumentId> {
        let ids: BTreeSet<&DocumentId> = self
            .progress
            .keys()
            .chain(self.titles.keys())
            .chain(self.file_names.keys())
            .collect();
        ids.into_iter().cloned().collect()
    }

    /// Drops every entry for `id`; clears the active pointer if it matches
    pub fn forget(&mut self, id: &DocumentId) {
        self.progress.remove(id);
        self.titles.remove(id);
        self.file_names.remove(id);
        if self.active_document.as_ref() == Some(id) {
            self.active_document = None;
        }
    }

    /// Compact deterministic bytes used for the checksum
    pub(crate) fn canonical_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// On-disk wrapper for the record
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Envelope {
    pub checksum: u32,
    pub record: MetaRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_clamps() {
        assert_eq!(RevealRate::new(0).chars_per_keystroke(), 1);
        assert_eq!(RevealRate::new(5).chars_per_keystroke(), 5);
        assert_eq!(RevealRate::new(5000).chars_per_keystroke(), 1000);
        assert_eq!(RevealRate::default().chars_per_keystroke(), 2);
    }

    #[test]
    fn test_rate_clamps_on_deserialize() {
        let rate: RevealRate = serde_json::from_str(r#"{"chars_per_keystroke":0}"#).unwrap();
        assert_eq!(rate.chars_per_keystroke(), 1);
    }

    #[test]
    fn test_missing_fields_default() {
        let record: MetaRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record, MetaRecord::default());
        assert_eq!(record.rate.chars_per_keystroke(), 2);
    }

    #[test]
    fn test_canonical_bytes_deterministic() {
        let a = DocumentId::from_text("a");
        let b = DocumentId::from_text("b");

        let mut first = MetaRecord::default();
        first.progress.insert(a.clone(), 1);
        first.progress.insert(b.clone(), 2);

        let mut second = MetaRecord::default();
        second.progress.insert(b, 2);
        second.progress.insert(a, 1);

        assert_eq!(
            first.canonical_bytes().unwrap(),
            second.canonical_bytes().unwrap()
        );
    }

    #[test]
    fn test_forget_clears_everything() {
        let id = DocumentId::from_text("doc");
        let mut record = MetaRecord::default();
        record.active_document = Some(id.clone());
        record.progress.insert(id.clone(), 3);
        record.titles.insert(id.clone(), "Title".into());
        record.file_names.insert(id.clone(), "doc.txt".into());

        record.forget(&id);

        assert!(record.active_document.is_none());
        assert!(record.documents().is_empty());
    }

    #[test]
    fn test_documents_union() {
        let a = DocumentId::from_text("a");
        let b = DocumentId::from_text("b");
        let mut record = MetaRecord::default();
        record.progress.insert(a.clone(), 0);
        record.titles.insert(b.clone(), "B".into());
        record.file_names.insert(a.clone(), "a.txt".into());

        let docs = record.documents();
        assert_eq!(docs.len(), 2);
        assert!(docs.contains(&a));
        assert!(docs.contains(&b));
    }
}
