//! Metadata store
//!
//! Holds the record in memory and persists it synchronously on every
//! mutation. A mutation builds the next record, writes it, and only then
//! swaps it in, so a failed write leaves the in-memory state untouched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::checksum::{compute_checksum, verify_checksum};
use super::errors::{MetadataError, MetadataResult};
use super::record::{Envelope, MetaRecord, RevealRate};
use crate::content::DocumentId;
use crate::durable;

/// Title shown for documents that were never given one
pub const UNTITLED: &str = "Untitled document";

/// Persistent per-document reveal state plus global settings
#[derive(Debug)]
pub struct MetadataStore {
    /// Backing file; `None` for an in-memory store
    path: Option<PathBuf>,
    record: MetaRecord,
}

impl MetadataStore {
    /// Opens `<data_dir>/meta.json`.
    ///
    /// A missing file yields an empty record using `default_rate`; the file
    /// is written on the first mutation.
    ///
    /// # Errors
    ///
    /// `FISH_META_CORRUPTION` if the file does not parse or its checksum
    /// does not match.
    pub fn open(data_dir: &Path, default_rate: RevealRate) -> MetadataResult<Self> {
        Self::load(&Self::meta_path(data_dir), default_rate)
    }

    /// Loads the record stored at `path`.
    pub fn load(path: &Path, default_rate: RevealRate) -> MetadataResult<Self> {
        let record = match fs::read(path) {
            Ok(bytes) => Self::decode(&bytes)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => MetaRecord::with_rate(default_rate),
            Err(e) => {
                return Err(MetadataError::read_failed(
                    format!("Failed to read metadata: {}", path.display()),
                    e,
                ))
            }
        };

        Ok(Self {
            path: Some(path.to_path_buf()),
            record,
        })
    }

    /// Store with no backing file
    pub fn in_memory(default_rate: RevealRate) -> Self {
        Self {
            path: None,
            record: MetaRecord::with_rate(default_rate),
        }
    }

    /// Location of the metadata record for `data_dir`
    pub fn meta_path(data_dir: &Path) -> PathBuf {
        data_dir.join("meta.json")
    }

    /// Backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Current record
    pub fn record(&self) -> &MetaRecord {
        &self.record
    }

    /// Writes the current record to disk.
    pub fn flush(&self) -> MetadataResult<()> {
        match self.path {
            Some(ref path) => Self::persist(path, &self.record),
            None => Ok(()),
        }
    }

    fn decode(bytes: &[u8]) -> MetadataResult<MetaRecord> {
        let envelope: Envelope = serde_json::from_slice(bytes)
            .map_err(|e| MetadataError::corruption(format!("metadata does not parse: {}", e)))?;

        let canonical = envelope
            .record
            .canonical_bytes()
            .map_err(|e| MetadataError::corruption(format!("metadata does not serialize: {}", e)))?;

        if !verify_checksum(&canonical, envelope.checksum) {
            return Err(MetadataError::corruption("metadata checksum mismatch"));
        }

        Ok(envelope.record)
    }

    fn persist(path: &Path, record: &MetaRecord) -> MetadataResult<()> {
        let canonical = record.canonical_bytes().map_err(|e| {
            MetadataError::write_failed("Failed to serialize metadata", io::Error::other(e))
        })?;
        let envelope = Envelope {
            checksum: compute_checksum(&canonical),
            record: record.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&envelope).map_err(|e| {
            MetadataError::write_failed("Failed to serialize metadata", io::Error::other(e))
        })?;

        durable::write_atomic(path, &bytes).map_err(|e| {
            MetadataError::write_failed(format!("Failed to write metadata: {}", path.display()), e)
        })
    }

    /// Persists `next` and swaps it in. Unchanged records skip the write.
    fn commit(&mut self, next: MetaRecord) -> MetadataResult<()> {
        if next == self.record {
            return Ok(());
        }
        if let Some(ref path) = self.path {
            Self::persist(path, &next)?;
        }
        self.record = next;
        Ok(())
    }

    // Session pointer

    /// Active document, if any
    pub fn active(&self) -> Option<&DocumentId> {
        self.record.active_document.as_ref()
    }

    /// Points the session at `id` (or at nothing)
    pub fn set_active(&mut self, id: Option<DocumentId>) -> MetadataResult<()> {
        let mut next = self.record.clone();
        next.active_document = id;
        self.commit(next)
    }

    // Documents

    /// Whether `id` has a reveal entry
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.record.progress.contains_key(id)
    }

    /// Creates the reveal entry for `id` at offset 0 if missing.
    ///
    /// Returns `true` if the entry was created.
    pub fn ensure_document(&mut self, id: &DocumentId) -> MetadataResult<bool> {
        if self.contains(id) {
            return Ok(false);
        }
        let mut next = self.record.clone();
        next.progress.insert(id.clone(), 0);
        self.commit(next)?;
        Ok(true)
    }

    /// Makes `id` active in a single write.
    ///
    /// Creates the reveal entry at offset 0 if missing and, when given,
    /// replaces the file name. Either all of it is stored or none of it.
    pub fn attach(&mut self, id: &DocumentId, file_name: Option<&str>) -> MetadataResult<()> {
        let mut next = self.record.clone();
        next.active_document = Some(id.clone());
        next.progress.entry(id.clone()).or_insert(0);
        if let Some(name) = file_name {
            next.file_names.insert(id.clone(), name.to_string());
        }
        self.commit(next)
    }

    /// Every identifier with metadata
    pub fn documents(&self) -> Vec<DocumentId> {
        self.record.documents()
    }

    /// Deletes every entry for `id`; clears the active pointer if it was `id`.
    pub fn remove_document(&mut self, id: &DocumentId) -> MetadataResult<()> {
        let mut next = self.record.clone();
        next.forget(id);
        self.commit(next)
    }

    // Reveal offsets

    /// Raw stored offset, unclamped
    pub fn stored_offset(&self, id: &DocumentId) -> Option<usize> {
        self.record.progress.get(id).copied()
    }

    /// Offset of `id` clamped against the live text length
    pub fn reveal_offset(&self, id: &DocumentId, text_len: usize) -> usize {
        self.stored_offset(id).unwrap_or(0).min(text_len)
    }

    /// Moves the offset of `id` by `delta`, clamped to `[0, max_len]`.
    ///
    /// `max_len` must be the current text length of the same document.
    /// Saturating at either end is not an error.
    pub fn reveal(&mut self, id: &DocumentId, delta: i64, max_len: usize) -> MetadataResult<usize> {
        let current = self.reveal_offset(id, max_len);
        let magnitude = usize::try_from(delta.unsigned_abs()).unwrap_or(usize::MAX);
        let target = if delta >= 0 {
            current.saturating_add(magnitude)
        } else {
            current.saturating_sub(magnitude)
        };
        self.set_offset(id, target, max_len)
    }

    /// Stores `offset` for `id`, clamped to `max_len`. Returns the stored value.
    pub fn set_offset(&mut self, id: &DocumentId, offset: usize, max_len: usize) -> MetadataResult<usize> {
        let clamped = offset.min(max_len);
        let mut next = self.record.clone();
        next.progress.insert(id.clone(), clamped);
        self.commit(next)?;
        Ok(clamped)
    }

    // Titles and filenames

    /// Title set for `id`
    pub fn title(&self, id: &DocumentId) -> Option<&str> {
        self.record.titles.get(id).map(String::as_str)
    }

    /// Title to display for `id`, falling back to [`UNTITLED`]
    pub fn display_title(&self, id: &DocumentId) -> &str {
        match self.title(id) {
            Some(title) if !title.is_empty() => title,
            _ => UNTITLED,
        }
    }

    /// Sets the title of `id`; blank titles store [`UNTITLED`]
    pub fn set_title(&mut self, id: &DocumentId, title: &str) -> MetadataResult<()> {
        let title = title.trim();
        let title = if title.is_empty() { UNTITLED } else { title };
        let mut next = self.record.clone();
        next.titles.insert(id.clone(), title.to_string());
        self.commit(next)
    }

    /// Filename `id` was imported from
    pub fn file_name(&self, id: &DocumentId) -> Option<&str> {
        self.record.file_names.get(id).map(String::as_str)
    }

    pub fn set_file_name(&mut self, id: &DocumentId, name: &str) -> MetadataResult<()> {
        let mut next = self.record.clone();
        next.file_names.insert(id.clone(), name.to_string());
        self.commit(next)
    }

    // Rate

    pub fn rate(&self) -> RevealRate {
        self.record.rate
    }

    pub fn set_rate(&mut self, rate: RevealRate) -> MetadataResult<()> {
        let mut next = self.record.clone();
        next.rate = rate;
        self.commit(next)
    }
}
