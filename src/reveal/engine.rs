//! The reveal state machine
//!
//! State is implicit in `(offset, text length)`. Each transition is a pure
//! function of the text, the current offset and the intent; the engine
//! holds nothing but the rate.
//!
//! | intent              | offset                          | text                         |
//! |---------------------|---------------------------------|------------------------------|
//! | `Advance`           | `min(offset + rate, len)`       | unchanged                    |
//! | `Retreat`           | `offset - rate`, floored at 0   | unchanged                    |
//! | `DeleteRange(s, n)` | `offset - n`                    | `text[..s] + text[s + n..]`  |
//! | `CompositionFlush`  | same as `Advance`               | unchanged                    |

use serde::Serialize;

use super::errors::{RevealError, RevealResult};
use super::text;
use crate::metadata::RevealRate;

/// What a keystroke asks the engine to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum EditIntent {
    /// Reveal `rate` more characters
    Advance,
    /// Hide `rate` characters again
    Retreat,
    /// Permanently remove a selected range of the visible prefix.
    ///
    /// `start` and `length` are in characters, relative to the visible text.
    DeleteRange { start: usize, length: usize },
    /// An IME composition committed
    CompositionFlush,
}

/// Result of one transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Offset after the transition
    pub offset: usize,
    /// Length of the text after the transition, in characters
    pub length: usize,
    /// New text if the transition changed it
    pub text: Option<String>,
}

impl Transition {
    /// Whether the stored text must be rewritten
    pub fn text_changed(&self) -> bool {
        self.text.is_some()
    }
}

/// Computes reveal transitions at a fixed rate
#[derive(Debug, Clone, Copy)]
pub struct RevealEngine {
    rate: RevealRate,
}

impl RevealEngine {
    pub fn new(rate: RevealRate) -> Self {
        Self { rate }
    }

    pub fn rate(&self) -> RevealRate {
        self.rate
    }

    /// Applies `intent` to `text` revealed up to `offset`.
    ///
    /// A stale `offset` beyond the end of `text` is clamped first.
    ///
    /// # Errors
    ///
    /// `DeleteRange` is rejected when the range is empty or reaches past
    /// the revealed prefix. Nothing changes in that case.
    pub fn apply(&self, text: &str, offset: usize, intent: EditIntent) -> RevealResult<Transition> {
        let len = text::char_len(text);
        let offset = offset.min(len);
        let rate = self.rate.chars_per_keystroke();

        match intent {
            EditIntent::Advance | EditIntent::CompositionFlush => Ok(Transition {
                offset: offset.saturating_add(rate).min(len),
                length: len,
                text: None,
            }),
            EditIntent::Retreat => Ok(Transition {
                offset: offset.saturating_sub(rate),
                length: len,
                text: None,
            }),
            EditIntent::DeleteRange { start, length } => {
                if length == 0 {
                    return Err(RevealError::EmptySelection { start });
                }
                match start.checked_add(length) {
                    Some(end) if end <= offset => {}
                    _ => {
                        return Err(RevealError::SelectionPastOffset {
                            start,
                            length,
                            offset,
                        })
                    }
                }

                Ok(Transition {
                    offset: offset - length,
                    length: len - length,
                    text: Some(text::splice_out(text, start, length)),
                })
            }
        }
    }
}

/// What the editor surface shows after a transition.
///
/// The caret always sits at the end of the visible prefix; wherever the
/// surface had put it, the next frame moves it back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Frame {
    /// Revealed prefix of the text
    pub visible: String,
    /// Caret position in characters, always `offset`
    pub caret: usize,
    /// Reveal offset in characters
    pub offset: usize,
    /// Full text length in characters
    pub length: usize,
}

impl Frame {
    /// Frame for `text` revealed up to `offset`
    pub fn render(text: &str, offset: usize) -> Self {
        let length = text::char_len(text);
        let offset = offset.min(length);
        Self {
            visible: text::prefix(text, offset).to_string(),
            caret: offset,
            offset,
            length,
        }
    }

    /// Frame with nothing loaded
    pub fn empty() -> Self {
        Self::default()
    }

    /// Revealed share of the text, rounded to a whole percent
    pub fn progress_percent(&self) -> u8 {
        progress_percent(self.offset, self.length)
    }
}

/// `min(100, round(offset / length * 100))`, 0 for empty text
pub fn progress_percent(offset: usize, length: usize) -> u8 {
    if length == 0 {
        return 0;
    }
    let offset = offset as u128;
    let length = length as u128;
    let rounded = (offset * 200 + length) / (length * 2);
    rounded.min(100) as u8
}
