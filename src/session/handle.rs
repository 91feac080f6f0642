//! Shared async handle over a session
//!
//! Every operation takes the session lock for its whole read, compute and
//! write cycle. `tokio::sync::Mutex` queues waiters in FIFO order, so
//! transitions run one at a time in the order they were dispatched.
//!
//! Operations that may write to disk run on tokio's blocking pool with the
//! lock guard moved into the task, so fsync never stalls a runtime worker.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::errors::{SessionError, SessionResult};
use super::session::{DocumentStatus, Outcome, Session};
use crate::content::{ContentStore, DocumentId};
use crate::metadata::RevealRate;
use crate::observability::MetricsSnapshot;
use crate::reveal::{EditIntent, Frame, InputEvent};

/// Cloneable handle; clones share one session
#[derive(Debug)]
pub struct SessionHandle<C: ContentStore> {
    inner: Arc<Mutex<Session<C>>>,
}

impl<C: ContentStore> Clone for SessionHandle<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: ContentStore + 'static> SessionHandle<C> {
    pub fn new(session: Session<C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Takes the lock in FIFO order, then runs `op` on the blocking pool.
    async fn run_blocking<T, F>(&self, op: F) -> SessionResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Session<C>) -> SessionResult<T> + Send + 'static,
    {
        let mut session = Arc::clone(&self.inner).lock_owned().await;
        match tokio::task::spawn_blocking(move || op(&mut *session)).await {
            Ok(result) => result,
            Err(e) => match e.try_into_panic() {
                Ok(payload) => std::panic::resume_unwind(payload),
                Err(_) => Err(SessionError::Interrupted),
            },
        }
    }

    pub async fn handle(&self, event: InputEvent) -> SessionResult<Outcome> {
        self.run_blocking(move |s| s.handle(&event)).await
    }

    pub async fn apply(&self, intent: EditIntent) -> SessionResult<Frame> {
        self.run_blocking(move |s| s.apply(intent)).await
    }

    pub async fn import(&self, file_name: &str, raw_text: &str) -> SessionResult<DocumentId> {
        let file_name = file_name.to_string();
        let raw_text = raw_text.to_string();
        self.run_blocking(move |s| s.import(&file_name, &raw_text)).await
    }

    pub async fn activate(&self, id: &DocumentId) -> SessionResult<Frame> {
        let id = id.clone();
        self.run_blocking(move |s| s.activate(&id)).await
    }

    pub async fn remove_current(&self) -> SessionResult<Option<DocumentId>> {
        self.run_blocking(|s| s.remove_current()).await
    }

    pub async fn render(&self) -> Frame {
        self.inner.lock().await.render()
    }

    pub async fn status(&self) -> SessionResult<Option<DocumentStatus>> {
        self.inner.lock().await.status()
    }

    pub async fn set_rate(&self, rate: RevealRate) -> SessionResult<()> {
        self.run_blocking(move |s| s.set_rate(rate)).await
    }

    pub async fn metrics(&self) -> MetricsSnapshot {
        self.inner.lock().await.metrics().snapshot()
    }

    /// Runs `f` with exclusive access to the session
    pub async fn with<R>(&self, f: impl FnOnce(&mut Session<C>) -> R) -> R {
        let mut session = self.inner.lock().await;
        f(&mut session)
    }

    /// Waits for queued operations, then flushes metadata
    pub async fn shutdown(&self) -> SessionResult<()> {
        self.run_blocking(|s| s.shutdown()).await
    }
}
