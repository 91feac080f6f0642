//! fishdoc - reveal a stored document a few characters per keystroke
//!
//! Whatever the user types, the next characters of a pre-imported text
//! appear instead. Layers, leaves first:
//!
//! - `content`: content-addressed text storage
//! - `metadata`: persistent reveal offsets, titles and settings
//! - `reveal`: the transition engine and input classification
//! - `session`: the state container tying the three together
//! - `cli`: commands and the JSON line protocol

pub mod cli;
pub mod content;
mod durable;
pub mod metadata;
pub mod observability;
pub mod reveal;
pub mod session;
