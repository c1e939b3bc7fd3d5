//! Palette and semantic styling for the dashboard.

use ratatui::style::{Color, Modifier, Style};

use crate::layout::Tone;

// ── Palette ───────────────────────────────────────────────────────────

pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

// ── Semantic Styles ───────────────────────────────────────────────────

/// Header line and view titles.
pub fn title_style() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

/// Legend and key help rows.
pub fn legend_style() -> Style {
    Style::default().fg(ELECTRIC_YELLOW)
}

/// Bar lines and group headers.
pub fn body_style() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Pager and navigation hints on the bottom row.
pub fn footer_style() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn notice_style() -> Style {
    Style::default().fg(ERROR_RED)
}

pub fn style(tone: Tone) -> Style {
    match tone {
        Tone::Title => title_style(),
        Tone::Legend => legend_style(),
        Tone::Body => body_style(),
        Tone::Footer => footer_style(),
        Tone::Notice => notice_style(),
    }
}
