//! Reveal sessions
//!
//! A [`Session`] is the explicit state container: it is opened over a pair
//! of stores, serves transitions for at most one active document, and is
//! flushed on shutdown. [`SessionHandle`] shares one session between async
//! tasks and serializes everything that touches it.

mod errors;
mod handle;
#[allow(clippy::module_inception)]
mod session;

pub use errors::{ErrorKind, SessionError, SessionResult};
pub use handle::SessionHandle;
pub use session::{DocumentStatus, Outcome, Session};
