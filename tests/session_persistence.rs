//! Session Persistence Tests
//!
//! Tests for invariants:
//! - Offsets, titles, file names, the rate, the active pointer and mutated
//!   text survive closing and reopening the stores
//! - A corrupted metadata record is detected on open
//! - A failed content write leaves offset and cached text unchanged
//! - A failed metadata write reveals nothing new and never moves the
//!   active pointer away from the cached text
//! - An active pointer whose content vanished is kept but never rendered

use fishdoc::content::{ContentError, ContentResult, ContentStore, DocumentId, InMemoryContentStore};
use fishdoc::metadata::{MetadataStore, RevealRate};
use fishdoc::session::{ErrorKind, Session};
use std::fs;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

/// In-memory store whose writes can be made to fail
#[derive(Debug, Default)]
struct FlakyStore {
    inner: InMemoryContentStore,
    fail_writes: AtomicBool,
}

impl ContentStore for FlakyStore {
    fn put(&self, id: &DocumentId, text: &str) -> ContentResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ContentError::write_failed(
                "injected write failure",
                io::Error::other("disk full"),
            ));
        }
        self.inner.put(id, text)
    }

    fn get(&self, id: &DocumentId) -> ContentResult<Option<String>> {
        self.inner.get(id)
    }

    fn remove(&self, id: &DocumentId) -> ContentResult<()> {
        self.inner.remove(id)
    }

    fn ids(&self) -> ContentResult<Vec<DocumentId>> {
        self.inner.ids()
    }
}

fn create_temp_data_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Session whose metadata lives in `<temp>/meta`, so removing that
/// directory makes every metadata write fail
fn session_with_removable_meta(temp_dir: &TempDir, rate: usize) -> Session<InMemoryContentStore> {
    let meta_dir = temp_dir.path().join("meta");
    fs::create_dir(&meta_dir).unwrap();
    let meta = MetadataStore::load(&meta_dir.join("meta.json"), RevealRate::new(rate)).unwrap();
    Session::new(InMemoryContentStore::new(), meta).unwrap()
}

// =============================================================================
// Restart
// =============================================================================

#[test]
fn test_state_survives_reopen() {
    let temp_dir = create_temp_data_dir();
    let id;

    {
        let mut session = Session::open(temp_dir.path(), RevealRate::new(2)).unwrap();
        id = session.import("story.txt", "Once upon a time").unwrap();
        session.advance().unwrap();
        session.advance().unwrap();
        session.advance().unwrap();
        session.delete_range(0, 5).unwrap();
        session.set_title("Story").unwrap();
        session.set_rate(RevealRate::new(4)).unwrap();
        session.shutdown().unwrap();
    }

    // The default rate only applies to a fresh record
    let session = Session::open(temp_dir.path(), RevealRate::new(9)).unwrap();
    assert_eq!(session.active(), Some(&id));
    assert_eq!(session.active_text(), Some("upon a time"));
    assert_eq!(session.render().visible, "u");
    assert_eq!(session.rate().chars_per_keystroke(), 4);

    let status = session.status().unwrap().unwrap();
    assert_eq!(status.title, "Story");
    assert_eq!(status.display_name, "story.txt");
    assert_eq!(status.offset, 1);
    assert_eq!(status.length, 11);
    assert_eq!(status.progress, 9);
}

#[test]
fn test_switching_documents_restores_each_offset() {
    let temp_dir = create_temp_data_dir();
    let (a, b);

    {
        let mut session = Session::open(temp_dir.path(), RevealRate::new(1)).unwrap();
        a = session.import("a.txt", "aaaa").unwrap();
        session.advance().unwrap();
        b = session.import("b.txt", "bbbb").unwrap();
        session.advance().unwrap();
        session.advance().unwrap();
    }

    let mut session = Session::open(temp_dir.path(), RevealRate::new(1)).unwrap();
    assert_eq!(session.render().visible, "bb");
    session.activate(&a).unwrap();
    assert_eq!(session.render().visible, "a");
    session.activate(&b).unwrap();
    assert_eq!(session.render().visible, "bb");
}

// =============================================================================
// Corruption
// =============================================================================

#[test]
fn test_corrupted_metadata_detected_on_open() {
    let temp_dir = create_temp_data_dir();

    {
        let mut session = Session::open(temp_dir.path(), RevealRate::new(2)).unwrap();
        session.import("a.txt", "abcdef").unwrap();
        session.set_title("Original").unwrap();
    }

    let meta_path = MetadataStore::meta_path(temp_dir.path());
    let tampered = fs::read_to_string(&meta_path).unwrap().replace("Original", "Tampered");
    fs::write(&meta_path, tampered).unwrap();

    let err = Session::open(temp_dir.path(), RevealRate::new(2)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageFailure);
    assert!(err.is_fatal());
    assert_eq!(err.code(), "FISH_META_CORRUPTION");
}

#[test]
fn test_non_utf8_source_is_corruption() {
    let temp_dir = create_temp_data_dir();
    let id;

    {
        let mut session = Session::open(temp_dir.path(), RevealRate::new(2)).unwrap();
        id = session.import("a.txt", "abcdef").unwrap();
    }

    let blob = temp_dir.path().join("sources").join(format!("{}.txt", id));
    fs::write(&blob, [0xc3, 0x28]).unwrap();

    let err = Session::open(temp_dir.path(), RevealRate::new(2)).unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(err.code(), "FISH_CONTENT_CORRUPTION");
}

// =============================================================================
// Storage failure
// =============================================================================

#[test]
fn test_failed_content_write_changes_nothing() {
    let store = FlakyStore::default();
    let mut session = Session::new(store, MetadataStore::in_memory(RevealRate::new(3))).unwrap();
    let id = session.import("a.txt", "abcdefghi").unwrap();
    session.advance().unwrap();
    session.advance().unwrap();

    session.content().fail_writes.store(true, Ordering::SeqCst);

    let err = session.delete_range(1, 3).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageFailure);
    assert_eq!(err.code(), "FISH_CONTENT_WRITE_FAILED");

    assert_eq!(session.render().offset, 6);
    assert_eq!(session.active_text(), Some("abcdefghi"));
    assert_eq!(session.content().get(&id).unwrap().as_deref(), Some("abcdefghi"));
    assert_eq!(session.metrics().snapshot().storage_failures, 1);

    // Transitions that do not touch the text still work
    assert_eq!(session.retreat().unwrap().offset, 3);

    session.content().fail_writes.store(false, Ordering::SeqCst);
    assert_eq!(session.delete_range(0, 3).unwrap().visible, "");
    assert_eq!(session.active_text(), Some("defghi"));
}

#[test]
fn test_failed_metadata_write_keeps_deletion_hidden() {
    let temp_dir = create_temp_data_dir();
    let mut session = session_with_removable_meta(&temp_dir, 5);
    let id = session.import("a.txt", "hello world").unwrap();
    assert_eq!(session.advance().unwrap().visible, "hello");

    fs::remove_dir_all(temp_dir.path().join("meta")).unwrap();

    let err = session.delete_range(0, 3).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageFailure);
    assert_eq!(err.code(), "FISH_META_WRITE_FAILED");

    let frame = session.render();
    assert_eq!(frame.visible, "hello");
    assert_eq!(frame.offset, 5);
    assert_eq!(frame.length, 11);
    assert_eq!(session.active_text(), Some("hello world"));
    assert_eq!(session.content().get(&id).unwrap().as_deref(), Some("hello world"));
    assert_eq!(session.metrics().snapshot().range_deletions, 0);

    fs::create_dir(temp_dir.path().join("meta")).unwrap();
    assert_eq!(session.delete_range(0, 3).unwrap().visible, "lo");
    assert_eq!(session.active_text(), Some("lo world"));
}

#[test]
fn test_failed_metadata_write_keeps_previous_document_active() {
    let temp_dir = create_temp_data_dir();
    let mut session = session_with_removable_meta(&temp_dir, 2);
    let a = session.import("a.txt", "aaaaaa").unwrap();
    session.advance().unwrap();
    let b = session.import("b.txt", "bbbbbb").unwrap();
    session.activate(&a).unwrap();

    fs::remove_dir_all(temp_dir.path().join("meta")).unwrap();

    let err = session.import("c.txt", "cccccc").unwrap_err();
    assert_eq!(err.code(), "FISH_META_WRITE_FAILED");
    let err = session.activate(&b).unwrap_err();
    assert_eq!(err.code(), "FISH_META_WRITE_FAILED");

    assert_eq!(session.active(), Some(&a));
    assert_eq!(session.active_text(), Some("aaaaaa"));
    assert_eq!(session.metadata().file_name(&b), Some("b.txt"));
    assert_eq!(session.render().visible, "aa");

    // The pointer still matches the cache, so typing resumes once writes work
    fs::create_dir(temp_dir.path().join("meta")).unwrap();
    assert_eq!(session.advance().unwrap().visible, "aaaa");
}

#[test]
fn test_failed_import_write_activates_nothing() {
    let store = FlakyStore::default();
    store.fail_writes.store(true, Ordering::SeqCst);
    let mut session = Session::new(store, MetadataStore::in_memory(RevealRate::new(3))).unwrap();

    let err = session.import("a.txt", "abc").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageFailure);
    assert!(session.active().is_none());
    assert!(session.list().unwrap().is_empty());
}

// =============================================================================
// Missing content
// =============================================================================

#[test]
fn test_active_pointer_to_missing_content() {
    let temp_dir = create_temp_data_dir();
    let id;

    {
        let mut session = Session::open(temp_dir.path(), RevealRate::new(2)).unwrap();
        id = session.import("a.txt", "abcdef").unwrap();
        session.advance().unwrap();
    }

    fs::remove_file(temp_dir.path().join("sources").join(format!("{}.txt", id))).unwrap();

    let mut session = Session::open(temp_dir.path(), RevealRate::new(2)).unwrap();
    assert_eq!(session.active(), Some(&id));
    assert_eq!(session.render().visible, "");

    let err = session.advance().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let status = session.status().unwrap().unwrap();
    assert_eq!(status.length, 0);
    assert_eq!(status.progress, 0);
}
