//! Terminal initialization, restoration, and panic-safe cleanup.
//!
//! Wraps the crossterm + ratatui terminal lifecycle and exposes it as a
//! [`Surface`], so the dashboard loop never has to think about raw mode or
//! the alternate screen.

use std::io::{Stdout, stdout};
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::{
    ExecutableCommand, cursor,
    event::{self, Event, KeyEventKind},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::layout::Tone;
use crate::surface::{Key, Surface};
use crate::theme;

pub type Backend = CrosstermBackend<Stdout>;

struct PendingWrite {
    row: u16,
    col: u16,
    text: String,
    tone: Tone,
}

/// Terminal wrapper that handles setup, teardown, and panic recovery.
pub struct Tui {
    terminal: Terminal<Backend>,
    /// Writes since the last clear, replayed on every refresh.
    pending: Vec<PendingWrite>,
}

impl Tui {
    /// Create a new terminal instance (does NOT enter raw mode yet).
    pub fn new() -> Result<Self> {
        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            pending: Vec::new(),
        })
    }

    /// Enter TUI mode: alternate screen, raw mode, hidden cursor.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;
        stdout().execute(cursor::Hide)?;
        self.terminal.clear()?;
        Ok(())
    }

    /// Exit TUI mode: restore terminal to its original state.
    pub fn exit(&mut self) {
        // Best-effort restoration, partial failures are ignored
        restore();
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        self.exit();
    }
}

fn restore() {
    let _ = stdout().execute(cursor::Show);
    let _ = stdout().execute(LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

/// Reduce a terminal event to a dashboard key. Key releases and mouse
/// events are dropped.
fn key_of(event: &Event) -> Option<Key> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(Key::from(*key)),
        Event::Resize(..) => Some(Key::Resize),
        _ => None,
    }
}

impl Surface for Tui {
    fn clear(&mut self) {
        self.pending.clear();
    }

    fn write_at(&mut self, row: u16, col: u16, text: &str) {
        self.write_styled(row, col, text, Tone::Body);
    }

    fn write_styled(&mut self, row: u16, col: u16, text: &str, tone: Tone) {
        self.pending.push(PendingWrite {
            row,
            col,
            text: text.to_owned(),
            tone,
        });
    }

    fn refresh(&mut self) -> Result<()> {
        let pending = &self.pending;
        self.terminal.draw(|frame| {
            let area = frame.area();
            let buf = frame.buffer_mut();
            for write in pending {
                if write.row >= area.height || write.col >= area.width {
                    continue;
                }
                buf.set_stringn(
                    area.x + write.col,
                    area.y + write.row,
                    &write.text,
                    usize::from(area.width - write.col),
                    theme::style(write.tone),
                );
            }
        })?;
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16)> {
        let size = self.terminal.size()?;
        Ok((size.height, size.width))
    }

    fn read_key_nonblocking(&mut self) -> Result<Option<Key>> {
        while event::poll(Duration::ZERO)? {
            if let Some(key) = key_of(&event::read()?) {
                return Ok(Some(key));
            }
        }
        Ok(None)
    }

    fn read_key_blocking(&mut self) -> Result<Key> {
        loop {
            if let Some(key) = key_of(&event::read()?) {
                return Ok(key);
            }
        }
    }
}

/// Install panic and error hooks that restore the terminal before printing.
///
/// Must be called BEFORE entering the terminal, so panics during init
/// also get clean output.
pub fn install_hooks() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .into_hooks();

    eyre_hook.install()?;

    let panic_hook = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore();
        panic_hook(info);
    }));

    Ok(())
}
