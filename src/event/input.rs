//! Key presses and row clicks as the grid sees them.
//!
//! Hosts on crossterm convert with `KeyEvent::from` and
//! [`RowClick::from_mouse`]; other hosts build the types directly.

use std::ops::{BitAnd, BitOr};

use crossterm::event as ct;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// A key the grid can bind. Letters are stored lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Delete,
    Left,
    Right,
    Up,
    Down,
    F(u8),
    /// Any key the grid has no use for.
    Other,
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Held modifier keys, as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(1 << 1);
    pub const ALT: Modifiers = Modifiers(1 << 2);
    /// Command / Super / Windows key.
    pub const META: Modifiers = Modifiers(1 << 3);

    pub fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self == Modifiers::NONE
    }

    /// Whether the platform "mod" key (Ctrl or Meta) is held.
    pub fn has_mod(self) -> bool {
        self.contains(Modifiers::CTRL) || self.contains(Modifiers::META)
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitAnd for Modifiers {
    type Output = Modifiers;
    fn bitand(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 & rhs.0)
    }
}

impl From<ct::KeyModifiers> for Modifiers {
    fn from(m: ct::KeyModifiers) -> Self {
        [
            (ct::KeyModifiers::SHIFT, Modifiers::SHIFT),
            (ct::KeyModifiers::CONTROL, Modifiers::CTRL),
            (ct::KeyModifiers::ALT, Modifiers::ALT),
            (ct::KeyModifiers::SUPER, Modifiers::META),
            (ct::KeyModifiers::META, Modifiers::META),
        ]
        .into_iter()
        .filter(|(flag, _)| m.contains(*flag))
        .fold(Modifiers::NONE, |acc, (_, ours)| acc | ours)
    }
}

// ---------------------------------------------------------------------------
// KeyEvent
// ---------------------------------------------------------------------------

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key event without modifiers.
    pub fn plain(code: Key) -> Self {
        Self::new(code, Modifiers::NONE)
    }
}

impl From<ct::KeyEvent> for KeyEvent {
    fn from(event: ct::KeyEvent) -> Self {
        let code = match event.code {
            ct::KeyCode::Char(c) => Key::Char(c.to_ascii_lowercase()),
            ct::KeyCode::Enter => Key::Enter,
            ct::KeyCode::Esc => Key::Escape,
            ct::KeyCode::Delete => Key::Delete,
            ct::KeyCode::Left => Key::Left,
            ct::KeyCode::Right => Key::Right,
            ct::KeyCode::Up => Key::Up,
            ct::KeyCode::Down => Key::Down,
            ct::KeyCode::F(n) => Key::F(n),
            _ => Key::Other,
        };
        KeyEvent::new(code, event.modifiers.into())
    }
}

// ---------------------------------------------------------------------------
// RowClick
// ---------------------------------------------------------------------------

/// A primary-button click on a grid row, as reported by the row view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowClick {
    /// Index into the visible rows.
    pub row: usize,
    pub modifiers: Modifiers,
    /// Whether the click landed on the row's selection checkbox.
    pub checkbox: bool,
}

impl RowClick {
    /// Plain click on the row body.
    pub fn new(row: usize) -> Self {
        Self {
            row,
            modifiers: Modifiers::NONE,
            checkbox: false,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Mark the click as a checkbox hit (builder).
    pub fn on_checkbox(mut self) -> Self {
        self.checkbox = true;
        self
    }

    /// Translate a crossterm left-button press into a row click.
    ///
    /// `top_row` is the index of the first rendered row; the first
    /// `checkbox_width` columns are the checkbox cell. Other mouse events
    /// yield `None`.
    pub fn from_mouse(event: &ct::MouseEvent, top_row: usize, checkbox_width: u16) -> Option<Self> {
        let ct::MouseEventKind::Down(ct::MouseButton::Left) = event.kind else {
            return None;
        };
        Some(Self {
            row: top_row + usize::from(event.row),
            modifiers: event.modifiers.into(),
            checkbox: event.column < checkbox_width,
        })
    }
}

// ===========================================================================
// Tests
// ===========================================================================
