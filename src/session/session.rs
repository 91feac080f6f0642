//! The session state container
//!
//! A `Session` binds one content store and one metadata store, caches the
//! active document's text, and runs every transition as read, compute,
//! write back. A deletion stores the lowered offset before the shorter text
//! and puts the old offset back if the text write fails, so a failed write
//! never reveals more than before.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use super::errors::{ErrorKind, SessionError, SessionResult};
use crate::content::{ContentStore, DocumentId, FsContentStore, InMemoryContentStore};
use crate::metadata::{MetadataStore, RevealRate};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};
use crate::reveal::{
    progress_percent, text, CompositionState, Disposition, EditIntent, Frame, InputEvent,
    InputTracker, RevealEngine, RevealError,
};

/// Text of the active document, mirrored from the content store
#[derive(Debug)]
struct ActiveDocument {
    id: DocumentId,
    text: String,
    len: usize,
}

impl ActiveDocument {
    fn new(id: DocumentId, text: String) -> Self {
        let len = text::char_len(&text);
        Self { id, text, len }
    }
}

/// Result of handling one input event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub disposition: Disposition,
    /// Frame to render; unchanged state for pass-through and suppressed events
    pub frame: Frame,
}

/// Everything the CLI reports about one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentStatus {
    pub id: DocumentId,
    pub title: String,
    pub display_name: String,
    pub file_name: Option<String>,
    pub offset: usize,
    pub length: usize,
    pub progress: u8,
    pub active: bool,
}

/// Reveal session over a content store and a metadata store
#[derive(Debug)]
pub struct Session<C: ContentStore> {
    content: C,
    meta: MetadataStore,
    cache: Option<ActiveDocument>,
    input: InputTracker,
    metrics: Arc<MetricsRegistry>,
}

impl Session<FsContentStore> {
    /// Opens the on-disk stores under `data_dir`.
    ///
    /// `default_rate` is used only when no metadata record exists yet.
    pub fn open(data_dir: &Path, default_rate: RevealRate) -> SessionResult<Self> {
        let content = FsContentStore::open(data_dir)?;
        let meta = MetadataStore::open(data_dir, default_rate).map_err(|e| {
            if e.is_fatal() {
                log_event_with_fields(
                    Event::MetadataCorruption,
                    &[("code", e.code().code()), ("message", e.message())],
                );
            }
            SessionError::from(e)
        })?;
        Self::new(content, meta)
    }
}

impl Session<InMemoryContentStore> {
    /// Session with nothing on disk
    pub fn in_memory(rate: RevealRate) -> Self {
        Self {
            content: InMemoryContentStore::new(),
            meta: MetadataStore::in_memory(rate),
            cache: None,
            input: InputTracker::new(),
            metrics: Arc::new(MetricsRegistry::new()),
        }
    }
}

impl<C: ContentStore> Session<C> {
    /// Binds already-opened stores and loads the active document, if any.
    ///
    /// An active pointer whose content is gone is kept; transitions then
    /// report `NotFound` until another document is activated.
    pub fn new(content: C, meta: MetadataStore) -> SessionResult<Self> {
        let cache = match meta.active() {
            Some(id) => content
                .get(id)?
                .map(|text| ActiveDocument::new(id.clone(), text)),
            None => None,
        };

        Ok(Self {
            content,
            meta,
            cache,
            input: InputTracker::new(),
            metrics: Arc::new(MetricsRegistry::new()),
        })
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn metadata(&self) -> &MetadataStore {
        &self.meta
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    pub fn composition_state(&self) -> CompositionState {
        self.input.state()
    }

    /// Active document identifier
    pub fn active(&self) -> Option<&DocumentId> {
        self.meta.active()
    }

    /// Text of the active document, if loaded
    pub fn active_text(&self) -> Option<&str> {
        self.cache.as_ref().map(|doc| doc.text.as_str())
    }

    pub fn rate(&self) -> RevealRate {
        self.meta.rate()
    }

    /// Engine at the current rate
    pub fn engine(&self) -> RevealEngine {
        RevealEngine::new(self.meta.rate())
    }

    // Documents

    /// Imports `raw_text` under its content hash and makes it active.
    ///
    /// Known text is not stored again; the existing document (with any
    /// deletions already applied to it) is reattached and the file name is
    /// replaced by `file_name`.
    pub fn import(&mut self, file_name: &str, raw_text: &str) -> SessionResult<DocumentId> {
        let result = self.try_import(file_name, raw_text);
        self.observe(result)
    }

    fn try_import(&mut self, file_name: &str, raw_text: &str) -> SessionResult<DocumentId> {
        let id = self.content.hash(raw_text);
        let text = match self.content.get(&id)? {
            Some(existing) => existing,
            None => {
                self.content.put(&id, raw_text)?;
                raw_text.to_string()
            }
        };

        self.meta.attach(&id, Some(file_name))?;
        self.switch_to(ActiveDocument::new(id.clone(), text));

        self.metrics.increment_imports();
        log_event_with_fields(
            Event::DocumentImported,
            &[("document", id.as_str()), ("file_name", file_name)],
        );
        Ok(id)
    }

    /// Makes a stored document active
    pub fn activate(&mut self, id: &DocumentId) -> SessionResult<Frame> {
        let result = self.try_activate(id);
        self.observe(result)
    }

    fn try_activate(&mut self, id: &DocumentId) -> SessionResult<Frame> {
        let text = self
            .content
            .get(id)?
            .ok_or_else(|| SessionError::NotFound(id.clone()))?;

        self.meta.attach(id, None)?;
        self.switch_to(ActiveDocument::new(id.clone(), text));

        log_event_with_fields(Event::DocumentActivated, &[("document", id.as_str())]);
        Ok(self.render())
    }

    /// Deletes the active document from both stores and clears the pointer.
    ///
    /// Returns the removed identifier, or `None` if nothing was active.
    pub fn remove_current(&mut self) -> SessionResult<Option<DocumentId>> {
        let result = self.try_remove_current();
        self.observe(result)
    }

    fn try_remove_current(&mut self) -> SessionResult<Option<DocumentId>> {
        let Some(id) = self.meta.active().cloned() else {
            return Ok(None);
        };

        self.content.remove(&id)?;
        self.meta.remove_document(&id)?;
        self.cache = None;
        self.input.reset();

        log_event_with_fields(Event::DocumentRemoved, &[("document", id.as_str())]);
        Ok(Some(id))
    }

    fn switch_to(&mut self, doc: ActiveDocument) {
        self.cache = Some(doc);
        self.input.reset();
    }

    // Transitions

    /// Classifies a raw event and runs the resulting transition
    pub fn handle(&mut self, event: &InputEvent) -> SessionResult<Outcome> {
        let disposition = self.input.classify(event);
        let frame = match disposition {
            Disposition::Transition(intent) => self.apply(intent)?,
            Disposition::PassThrough => {
                self.metrics.increment_pass_through();
                self.render()
            }
            Disposition::Suppressed => {
                self.metrics.increment_suppressed();
                self.render()
            }
        };
        Ok(Outcome { disposition, frame })
    }

    /// Runs `intent` against the active document
    pub fn apply(&mut self, intent: EditIntent) -> SessionResult<Frame> {
        let result = self.try_apply(intent);
        self.observe(result)
    }

    fn try_apply(&mut self, intent: EditIntent) -> SessionResult<Frame> {
        let Some(active) = self.meta.active().cloned() else {
            return Err(RevealError::NoActiveDocument.into());
        };
        let doc = match self.cache {
            Some(ref mut doc) if doc.id == active => doc,
            _ => return Err(SessionError::NotFound(active)),
        };

        let offset = self.meta.reveal_offset(&doc.id, doc.len);
        let engine = RevealEngine::new(self.meta.rate());
        let transition = engine.apply(&doc.text, offset, intent)?;

        // A deletion only lowers the offset, so the new offset is valid
        // against the old text and goes first.
        let next_offset = self.meta.set_offset(&doc.id, transition.offset, doc.len)?;
        if let Some(next_text) = transition.text {
            if let Err(e) = self.content.put(&doc.id, &next_text) {
                // If the restore fails too, the offset stays lowered: more
                // text hidden, never less.
                let _ = self.meta.set_offset(&doc.id, offset, doc.len);
                return Err(e.into());
            }
            doc.text = next_text;
            doc.len = transition.length;
        }
        let offset = next_offset.min(doc.len);

        record_transition(&self.metrics, intent, &doc.id, offset);
        Ok(Frame::render(&doc.text, offset))
    }

    pub fn advance(&mut self) -> SessionResult<Frame> {
        self.apply(EditIntent::Advance)
    }

    pub fn retreat(&mut self) -> SessionResult<Frame> {
        self.apply(EditIntent::Retreat)
    }

    pub fn delete_range(&mut self, start: usize, length: usize) -> SessionResult<Frame> {
        self.apply(EditIntent::DeleteRange { start, length })
    }

    pub fn composition_flush(&mut self) -> SessionResult<Frame> {
        self.apply(EditIntent::CompositionFlush)
    }

    /// Visible prefix and caret of the active document; empty when none is loaded
    pub fn render(&self) -> Frame {
        match self.cache {
            Some(ref doc) => Frame::render(&doc.text, self.meta.reveal_offset(&doc.id, doc.len)),
            None => Frame::empty(),
        }
    }

    // Settings

    /// Sets the global reveal rate
    pub fn set_rate(&mut self, rate: RevealRate) -> SessionResult<()> {
        let result = self.meta.set_rate(rate).map_err(SessionError::from);
        self.observe(result)?;
        let rate = rate.chars_per_keystroke().to_string();
        log_event_with_fields(Event::RateChanged, &[("chars_per_keystroke", rate.as_str())]);
        Ok(())
    }

    /// Sets the active document's title
    pub fn set_title(&mut self, title: &str) -> SessionResult<()> {
        let result = self.try_set_title(title);
        self.observe(result)
    }

    fn try_set_title(&mut self, title: &str) -> SessionResult<()> {
        let id = self
            .meta
            .active()
            .cloned()
            .ok_or(RevealError::NoActiveDocument)?;
        self.meta.set_title(&id, title)?;
        log_event_with_fields(
            Event::TitleChanged,
            &[("document", id.as_str()), ("title", self.meta.display_title(&id))],
        );
        Ok(())
    }

    /// Renames the file the active document was imported from
    pub fn set_file_name(&mut self, file_name: &str) -> SessionResult<()> {
        let result = self.try_set_file_name(file_name);
        self.observe(result)
    }

    fn try_set_file_name(&mut self, file_name: &str) -> SessionResult<()> {
        let id = self
            .meta
            .active()
            .cloned()
            .ok_or(RevealError::NoActiveDocument)?;
        self.meta.set_file_name(&id, file_name)?;
        Ok(())
    }

    // Reporting

    /// File name, else a shortened identifier
    pub fn display_name(&self, id: &DocumentId) -> String {
        match self.meta.file_name(id) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("{}…", id.short()),
        }
    }

    /// Status of the active document
    pub fn status(&self) -> SessionResult<Option<DocumentStatus>> {
        match self.meta.active() {
            Some(id) => self.document_status(id).map(Some),
            None => Ok(None),
        }
    }

    /// Status of any known document; missing content reports length 0
    pub fn document_status(&self, id: &DocumentId) -> SessionResult<DocumentStatus> {
        let length = match self.cache {
            Some(ref doc) if &doc.id == id => doc.len,
            _ => self
                .content
                .get(id)?
                .map(|text| text::char_len(&text))
                .unwrap_or(0),
        };
        let offset = self.meta.reveal_offset(id, length);

        Ok(DocumentStatus {
            id: id.clone(),
            title: self.meta.display_title(id).to_string(),
            display_name: self.display_name(id),
            file_name: self.meta.file_name(id).map(str::to_string),
            offset,
            length,
            progress: progress_percent(offset, length),
            active: self.meta.active() == Some(id),
        })
    }

    /// Every document known to either store, by identifier
    pub fn list(&self) -> SessionResult<Vec<DocumentStatus>> {
        let mut ids: BTreeSet<DocumentId> = self.meta.documents().into_iter().collect();
        ids.extend(self.content.ids()?);
        ids.iter().map(|id| self.document_status(id)).collect()
    }

    /// Flushes metadata to disk
    pub fn shutdown(&self) -> SessionResult<()> {
        log_event_with_fields(Event::ShutdownStart, &[]);
        self.meta.flush()?;
        log_event_with_fields(Event::ShutdownComplete, &[]);
        Ok(())
    }

    /// Counts and logs a failed operation
    fn observe<T>(&self, result: SessionResult<T>) -> SessionResult<T> {
        if let Err(ref e) = result {
            let message = e.to_string();
            let fields = [("code", e.code()), ("message", message.as_str())];
            match e.kind() {
                ErrorKind::ContractViolation => {
                    self.metrics.increment_contract_violations();
                    log_event_with_fields(Event::ContractViolation, &fields);
                }
                ErrorKind::StorageFailure => {
                    self.metrics.increment_storage_failures();
                    log_event_with_fields(Event::StorageFailure, &fields);
                }
                ErrorKind::NotFound => {}
            }
        }
        result
    }
}

fn record_transition(metrics: &MetricsRegistry, intent: EditIntent, id: &DocumentId, offset: usize) {
    let event = match intent {
        EditIntent::Advance => {
            metrics.increment_advances();
            Event::RevealAdvanced
        }
        EditIntent::Retreat => {
            metrics.increment_retreats();
            Event::RevealRetreated
        }
        EditIntent::DeleteRange { .. } => {
            metrics.increment_range_deletions();
            Event::RangeDeleted
        }
        EditIntent::CompositionFlush => {
            metrics.increment_composition_flushes();
            Event::CompositionFlushed
        }
    };
    let offset = offset.to_string();
    log_event_with_fields(event, &[("document", id.as_str()), ("offset", offset.as_str())]);
}
