//! Reveal engine
//!
//! The visible text is always exactly `text[..offset]`, counted in
//! characters, and the caret always sits at `offset`. Nothing beyond the
//! offset is ever exposed or editable.
//!
//! - [`RevealEngine`] computes transitions from `(text, offset, intent)`.
//! - [`InputTracker`] maps raw surface events to intents and owns the IME
//!   composition sub-machine.

mod engine;
mod errors;
pub mod input;
pub mod text;

pub use engine::{progress_percent, EditIntent, Frame, RevealEngine, Transition};
pub use errors::{RevealError, RevealResult};
pub use input::{
    CompositionState, Disposition, InputEvent, InputTracker, Key, KeyEvent, NavKey, Selection,
};
