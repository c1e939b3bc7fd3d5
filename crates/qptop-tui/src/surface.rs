//! Drawing surface abstraction and key model.
//!
//! The loop only ever talks to a [`Surface`]: a character grid with a known
//! size plus non-blocking and blocking key reads. [`crate::tui::Tui`] is the
//! terminal-backed implementation.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::layout::Tone;

/// A key press, reduced to what the dashboard reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Left,
    Right,
    PageUp,
    PageDown,
    /// Ctrl-C. Raw mode swallows SIGINT, so it arrives as a key.
    Interrupt,
    /// The terminal was resized; triggers a redraw in blocking views.
    Resize,
    Other,
}

impl From<KeyEvent> for Key {
    fn from(key: KeyEvent) -> Self {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Self::Interrupt,
            KeyCode::Char(c) => Self::Char(c),
            KeyCode::Left => Self::Left,
            KeyCode::Right => Self::Right,
            KeyCode::PageUp => Self::PageUp,
            KeyCode::PageDown => Self::PageDown,
            _ => Self::Other,
        }
    }
}

/// Character-grid drawing surface.
pub trait Surface {
    /// Forget everything written since the last refresh.
    fn clear(&mut self);

    /// Place `text` at (`row`, `col`). Text past the right edge is dropped.
    fn write_at(&mut self, row: u16, col: u16, text: &str);

    /// Like [`Surface::write_at`], with a styling hint.
    fn write_styled(&mut self, row: u16, col: u16, text: &str, _tone: Tone) {
        self.write_at(row, col, text);
    }

    /// Push the pending writes to the screen.
    fn refresh(&mut self) -> Result<()>;

    /// Current size as `(height, width)`.
    fn size(&self) -> Result<(u16, u16)>;

    /// Next pending key, or `None` right away if there is none.
    fn read_key_nonblocking(&mut self) -> Result<Option<Key>>;

    /// Wait for the next key.
    fn read_key_blocking(&mut self) -> Result<Key>;
}
