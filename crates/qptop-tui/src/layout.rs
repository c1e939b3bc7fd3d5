//! Frame composition.
//!
//! A [`Frame`] is the full set of positioned lines for one redraw. Composers
//! only ever call [`Frame::put`], which enforces the terminal bounds: rows
//! past the bottom are dropped and every line stops one column short of the
//! right edge so nothing wraps.

use std::fmt::Write as _;

use color_eyre::eyre::Result;
use qptop_core::{DeviceStatus, Snapshot};

use crate::screens::{queue_pairs, wqe_sizes};
use crate::state::{DashboardState, ViewMode};
use crate::surface::Surface;
use crate::widgets::bar_chart::truncate;

/// First row below the header block.
pub const BODY_TOP: u16 = 5;

pub const LEGEND: &str = "Legend: C - Cts QP | * - WQE Sent | + - WQE Rcvd";
pub const KEY_HELP: &str = "Space - Next Page | d - Next Device | s - WQE Size Stats | l - Latency Histogram | r - Return to Default";

/// Styling hint carried alongside each line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tone {
    Title,
    Legend,
    #[default]
    Body,
    Footer,
    Notice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedLine {
    pub row: u16,
    pub col: u16,
    pub text: String,
    pub tone: Tone,
}

/// Lines for one redraw, already clipped to the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    height: u16,
    width: u16,
    lines: Vec<PlacedLine>,
}

impl Frame {
    pub fn new(height: u16, width: u16) -> Self {
        Self {
            height,
            width,
            lines: Vec::new(),
        }
    }

    /// Bottom row, reserved for footers.
    pub fn last_row(&self) -> u16 {
        self.height.saturating_sub(1)
    }

    #[cfg(test)]
    pub fn lines(&self) -> &[PlacedLine] {
        &self.lines
    }

    /// Place `text` at (`row`, `col`). Out-of-bounds rows are skipped and
    /// the text is cut at `width - 1`.
    pub fn put(&mut self, row: u16, col: u16, text: &str, tone: Tone) {
        if row >= self.height || col >= self.width.saturating_sub(1) {
            return;
        }
        let room = usize::from(self.width - 1 - col);
        self.lines.push(PlacedLine {
            row,
            col,
            text: truncate(text, room),
            tone,
        });
    }

    /// Text at `row` with every line on that row merged by column.
    #[cfg(test)]
    pub fn text_at(&self, row: u16) -> String {
        let mut cells: Vec<char> = Vec::new();
        for line in self.lines.iter().filter(|l| l.row == row) {
            let col = usize::from(line.col);
            for (offset, ch) in line.text.chars().enumerate() {
                let at = col + offset;
                if cells.len() <= at {
                    cells.resize(at + 1, ' ');
                }
                cells[at] = ch;
            }
        }
        cells.into_iter().collect::<String>().trim_end().to_string()
    }

    /// Clear the surface, write every line, and refresh.
    pub fn draw(&self, surface: &mut dyn Surface) -> Result<()> {
        surface.clear();
        for line in &self.lines {
            surface.write_styled(line.row, line.col, &line.text, line.tone);
        }
        surface.refresh()
    }
}

/// Identity line for the device, e.g.
/// `Process: trainer | Host: node-3 | Device ID: 0 | Eth: eth0 | RoCE: mlx5_0 | Channels: 2`.
pub fn identity_line(status: &DeviceStatus) -> String {
    let mut line = format!("Process: {}", status.process_name);
    if !status.host_name.is_empty() {
        let _ = write!(line, " | Host: {}", status.host_name);
    }
    let _ = write!(line, " | Device ID: {}", status.device_id);
    if !status.eth_device.is_empty() {
        let _ = write!(line, " | Eth: {}", status.eth_device);
    }
    let _ = write!(
        line,
        " | RoCE: {} | Channels: {}",
        status.roce_device, status.num_channels
    );
    line
}

/// Rows 0..3: identity, legend, key bindings.
pub fn header(frame: &mut Frame, status: &DeviceStatus) {
    frame.put(0, 0, &identity_line(status), Tone::Title);
    frame.put(1, 0, LEGEND, Tone::Legend);
    frame.put(2, 0, KEY_HELP, Tone::Legend);
}

/// Compose the frame for the current state, or `None` in the latency
/// mode, whose frames come from its own [`LatencyView`](crate::screens::latency::LatencyView).
pub fn compose(
    state: &DashboardState,
    snapshot: &Snapshot,
    height: u16,
    width: u16,
) -> Option<Frame> {
    let device = snapshot.primary();
    match state.mode() {
        ViewMode::Default => Some(queue_pairs::compose(state, device, height, width)),
        ViewMode::WqeSizeStats => Some(wqe_sizes::compose(state, device, height, width)),
        ViewMode::LatencyHistogram => None,
    }
}

/// Shown when the selected device has not produced a readable snapshot yet.
pub fn unavailable(device_index: usize, path: &str, height: u16, width: u16) -> Frame {
    let mut frame = Frame::new(height, width);
    frame.put(
        0,
        0,
        &format!("No snapshot available for device {device_index} ({path})"),
        Tone::Notice,
    );
    frame
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::surface::Key;

    fn status() -> DeviceStatus {
        DeviceStatus {
            host_name: "node-3".into(),
            process_name: "trainer".into(),
            process_id: Some(4242),
            device_id: "0".into(),
            eth_device: String::new(),
            roce_device: "mlx5_0".into(),
            num_channels: 2,
        }
    }

    #[test]
    fn put_clips_to_width_minus_one() {
        let mut frame = Frame::new(5, 10);
        frame.put(0, 0, "0123456789abc", Tone::Body);
        frame.put(1, 4, "0123456789", Tone::Body);
        assert_eq!(frame.text_at(0), "012345678");
        assert_eq!(frame.text_at(1), "    01234");
    }

    #[test]
    fn put_skips_rows_and_columns_out_of_bounds() {
        let mut frame = Frame::new(3, 10);
        frame.put(3, 0, "below", Tone::Body);
        frame.put(u16::MAX, 0, "far below", Tone::Body);
        frame.put(0, 9, "right edge", Tone::Body);
        assert!(frame.lines().is_empty());

        let mut empty = Frame::new(0, 0);
        empty.put(0, 0, "nothing fits", Tone::Body);
        assert!(empty.lines().is_empty());
    }

    #[test]
    fn identity_line_skips_empty_fields() {
        assert_eq!(
            identity_line(&status()),
            "Process: trainer | Host: node-3 | Device ID: 0 | RoCE: mlx5_0 | Channels: 2"
        );
    }

    #[test]
    fn header_occupies_first_three_rows() {
        let mut frame = Frame::new(24, 200);
        header(&mut frame, &status());
        assert!(frame.text_at(0).starts_with("Process: trainer"));
        assert_eq!(frame.text_at(1), LEGEND);
        assert_eq!(frame.text_at(2), KEY_HELP);
        assert_eq!(frame.text_at(3), "");
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn latency_mode_has_no_outer_frame() {
        let snapshot = Snapshot::new(vec![qptop_core::Device::default()]).unwrap();
        let state = DashboardState::new(1);
        assert!(compose(&state, &snapshot, 24, 80).is_some());
        assert!(compose(&state.on_key(Key::Char('s')), &snapshot, 24, 80).is_some());
        assert!(compose(&state.on_key(Key::Char('l')), &snapshot, 24, 80).is_none());
    }

    #[test]
    fn unavailable_names_device_and_path() {
        let frame = unavailable(2, "/tmp/device_status_2.json", 24, 80);
        assert_eq!(
            frame.text_at(0),
            "No snapshot available for device 2 (/tmp/device_status_2.json)"
        );
        assert_eq!(frame.lines().len(), 1);
    }
}
