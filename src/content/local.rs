//! Filesystem content store
//!
//! One file per document: `<data_dir>/sources/<id>.txt`, holding the exact
//! UTF-8 bytes of the text. Writes are atomic replacements.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::document_id::DocumentId;
use super::errors::{ContentError, ContentResult};
use super::store::ContentStore;
use crate::durable;

const SOURCE_EXTENSION: &str = "txt";

/// Content store backed by a directory of text files
#[derive(Debug)]
pub struct FsContentStore {
    root: PathBuf,
}

impl FsContentStore {
    /// Opens the store under `<data_dir>/sources`, creating it if missing.
    pub fn open(data_dir: &Path) -> ContentResult<Self> {
        let root = Self::sources_dir(data_dir);
        fs::create_dir_all(&root).map_err(|e| {
            ContentError::io_error(
                format!("Failed to create sources directory: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Directory holding the source blobs for `data_dir`
    pub fn sources_dir(data_dir: &Path) -> PathBuf {
        data_dir.join("sources")
    }

    /// Returns the store root
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, id: &DocumentId) -> PathBuf {
        self.root.join(format!("{}.{}", id, SOURCE_EXTENSION))
    }
}

impl ContentStore for FsContentStore {
    fn put(&self, id: &DocumentId, text: &str) -> ContentResult<()> {
        let path = self.blob_path(id);
        durable::write_atomic(&path, text.as_bytes()).map_err(|e| {
            ContentError::write_failed(format!("Failed to write source: {}", id), e)
        })
    }

    fn get(&self, id: &DocumentId) -> ContentResult<Option<String>> {
        let path = self.blob_path(id);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ContentError::read_failed(
                    format!("Failed to read source: {}", id),
                    e,
                ))
            }
        };

        String::from_utf8(bytes)
            .map(Some)
            .map_err(|_| ContentError::corruption_for_document(id.as_str(), "source is not valid UTF-8"))
    }

    fn remove(&self, id: &DocumentId) -> ContentResult<()> {
        match fs::remove_file(self.blob_path(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ContentError::write_failed(
                format!("Failed to remove source: {}", id),
                e,
            )),
        }
    }

    fn ids(&self) -> ContentResult<Vec<DocumentId>> {
        let entries = fs::read_dir(&self.root).map_err(|e| {
            ContentError::io_error(
                format!("Failed to list sources: {}", self.root.display()),
                e,
            )
        })?;

        let mut ids = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SOURCE_EXTENSION) {
                continue;
            }
            // Foreign files in the directory are not ours to report.
            if let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| DocumentId::parse(s).ok())
            {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn contains(&self, id: &DocumentId) -> ContentResult<bool> {
        Ok(self.blob_path(id).is_file())
    }
}
