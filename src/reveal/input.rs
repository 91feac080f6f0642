//! Raw input classification
//!
//! Turns editor-surface events into edit intents. Key names follow the
//! DOM `KeyboardEvent.key` vocabulary ("a", "Backspace", "ArrowLeft", ...).
//!
//! IME handling is a small sub-machine:
//!
//! ```text
//! Idle --CompositionStart--> Composing --CompositionEnd--> Idle  (emits CompositionFlush)
//! ```
//!
//! Everything that arrives while composing is suppressed: partial
//! candidates are not committed text.

use serde::{Deserialize, Serialize};

use super::engine::EditIntent;

/// Navigation keys; they move the surface's caret and never reveal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    PageUp,
    PageDown,
}

impl NavKey {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "ArrowLeft" => NavKey::ArrowLeft,
            "ArrowRight" => NavKey::ArrowRight,
            "ArrowUp" => NavKey::ArrowUp,
            "ArrowDown" => NavKey::ArrowDown,
            "Home" => NavKey::Home,
            "End" => NavKey::End,
            "PageUp" => NavKey::PageUp,
            "PageDown" => NavKey::PageDown,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            NavKey::ArrowLeft => "ArrowLeft",
            NavKey::ArrowRight => "ArrowRight",
            NavKey::ArrowUp => "ArrowUp",
            NavKey::ArrowDown => "ArrowDown",
            NavKey::Home => "Home",
            NavKey::End => "End",
            NavKey::PageUp => "PageUp",
            NavKey::PageDown => "PageDown",
        }
    }
}

const MODIFIER_KEYS: &[&str] = &["Shift", "Control", "Alt", "AltGraph", "Meta", "CapsLock", "Fn"];

/// A physical key, by DOM key name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Key {
    /// A printable character
    Char(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Navigation(NavKey),
    /// A bare modifier key press
    Modifier(String),
    /// The key an IME reports while it owns the keystroke
    Process,
    /// Anything without a character: Escape, F1, Insert, ...
    Other(String),
}

impl Key {
    /// Parses a DOM key name
    pub fn parse(name: &str) -> Self {
        match name {
            "Enter" => return Key::Enter,
            "Tab" => return Key::Tab,
            "Backspace" => return Key::Backspace,
            "Delete" => return Key::Delete,
            "Process" => return Key::Process,
            _ => {}
        }
        if let Some(nav) = NavKey::parse(name) {
            return Key::Navigation(nav);
        }
        if MODIFIER_KEYS.contains(&name) {
            return Key::Modifier(name.to_string());
        }

        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_control() => Key::Char(c),
            _ => Key::Other(name.to_string()),
        }
    }

    /// DOM key name
    pub fn name(&self) -> String {
        match self {
            Key::Char(c) => c.to_string(),
            Key::Enter => "Enter".to_string(),
            Key::Tab => "Tab".to_string(),
            Key::Backspace => "Backspace".to_string(),
            Key::Delete => "Delete".to_string(),
            Key::Navigation(nav) => nav.name().to_string(),
            Key::Modifier(name) | Key::Other(name) => name.clone(),
            Key::Process => "Process".to_string(),
        }
    }

    /// Whether pressing this key types a character
    pub fn produces_character(&self) -> bool {
        matches!(self, Key::Char(_) | Key::Enter | Key::Tab)
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::parse(&name)
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.name()
    }
}

/// Selection on the visible prefix, in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub start: usize,
    pub length: usize,
}

impl Selection {
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    pub fn is_collapsed(&self) -> bool {
        self.length == 0
    }
}

/// One keydown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub meta: bool,
    /// The surface reports this key as part of an IME composition
    #[serde(default)]
    pub composing: bool,
    /// Current selection, if the surface has one
    #[serde(default)]
    pub selection: Option<Selection>,
}

impl KeyEvent {
    /// Plain keypress with no modifiers or selection
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
            composing: false,
            selection: None,
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn composing(mut self) -> Self {
        self.composing = true;
        self
    }
}

/// Raw events forwarded by the editor surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    Key(KeyEvent),
    CompositionStart,
    CompositionUpdate {
        #[serde(default)]
        data: String,
    },
    CompositionEnd {
        #[serde(default)]
        data: String,
    },
}

impl InputEvent {
    /// Keydown for a DOM key name
    pub fn key(name: &str) -> Self {
        InputEvent::Key(KeyEvent::plain(Key::parse(name)))
    }
}

/// What to do with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Run this transition
    Transition(EditIntent),
    /// Let the surface handle it; no reveal state change
    PassThrough,
    /// Swallow it; no reveal state change
    Suppressed,
}

impl Disposition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Disposition::Transition(EditIntent::Advance) => "advance",
            Disposition::Transition(EditIntent::Retreat) => "retreat",
            Disposition::Transition(EditIntent::DeleteRange { .. }) => "delete_range",
            Disposition::Transition(EditIntent::CompositionFlush) => "composition_flush",
            Disposition::PassThrough => "pass_through",
            Disposition::Suppressed => "suppressed",
        }
    }
}

/// Composition sub-machine state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositionState {
    #[default]
    Idle,
    /// An IME owns the keyboard; `suppressed` events swallowed so far
    Composing { suppressed: usize },
}

/// Classifies input events, tracking IME composition
#[derive(Debug, Default)]
pub struct InputTracker {
    state: CompositionState,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CompositionState {
        self.state
    }

    pub fn is_composing(&self) -> bool {
        matches!(self.state, CompositionState::Composing { .. })
    }

    /// Drops any composition in progress
    pub fn reset(&mut self) {
        self.state = CompositionState::Idle;
    }

    /// Classifies `event`, advancing the composition state
    pub fn classify(&mut self, event: &InputEvent) -> Disposition {
        match event {
            InputEvent::CompositionStart => {
                self.state = CompositionState::Composing { suppressed: 0 };
                Disposition::Suppressed
            }
            InputEvent::CompositionUpdate { .. } => {
                self.note_suppressed();
                Disposition::Suppressed
            }
            InputEvent::CompositionEnd { .. } => {
                if self.is_composing() {
                    self.state = CompositionState::Idle;
                    Disposition::Transition(EditIntent::CompositionFlush)
                } else {
                    Disposition::Suppressed
                }
            }
            InputEvent::Key(key_event) => self.classify_key(key_event),
        }
    }

    fn classify_key(&mut self, event: &KeyEvent) -> Disposition {
        // Shortcuts belong to the surface
        if event.ctrl || event.meta {
            return Disposition::PassThrough;
        }

        if event.composing || event.key == Key::Process || self.is_composing() {
            self.note_suppressed();
            return Disposition::Suppressed;
        }

        match event.key {
            Key::Backspace | Key::Delete => match event.selection {
                Some(sel) if !sel.is_collapsed() => Disposition::Transition(EditIntent::DeleteRange {
                    start: sel.start,
                    length: sel.length,
                }),
                _ => Disposition::Transition(EditIntent::Retreat),
            },
            ref key if key.produces_character() => Disposition::Transition(EditIntent::Advance),
            _ => Disposition::PassThrough,
        }
    }

    fn note_suppressed(&mut self) {
        if let CompositionState::Composing { ref mut suppressed } = self.state {
            *suppressed += 1;
        }
    }
}
