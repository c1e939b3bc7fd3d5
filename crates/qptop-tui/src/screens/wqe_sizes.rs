//! WQE size histogram plus the compressed device summary.

use qptop_core::Device;

use crate::layout::{self, Frame, Tone};
use crate::state::DashboardState;
use crate::widgets::bar_chart::BarChart;
use crate::widgets::bytes_fmt::fmt_size;

const TITLE_ROW: u16 = 7;
/// Gap between the last histogram row and the summary title.
const SUMMARY_GAP: u16 = 3;
const SUMMARY_CAP: usize = 5;

pub fn compose(state: &DashboardState, device: &Device, height: u16, width: u16) -> Frame {
    let mut frame = Frame::new(height, width);
    layout::header(&mut frame, &device.status);
    let footer_row = frame.last_row();
    if TITLE_ROW < footer_row {
        frame.put(TITLE_ROW, 0, "WQE Size Stats:", Tone::Title);
    }

    let rows: Vec<(String, u64)> = device
        .stats
        .wqe_sizes
        .iter()
        .map(|b| (format!("wqe-size: {} ", fmt_size(b.wqe_size)), b.num_wqe))
        .collect();
    let lines = BarChart::new(width, '+').render(&rows);

    let mut drawn: u16 = 0;
    for (row, line) in (TITLE_ROW + 1..footer_row).zip(&lines) {
        frame.put(row, 0, line, Tone::Body);
        drawn += 1;
    }

    let summary_row = TITLE_ROW + drawn + SUMMARY_GAP;
    if summary_row + 5 < footer_row {
        summary(&mut frame, device, summary_row, width);
    }

    frame.put(
        footer_row,
        0,
        &format!("Device {}/{}", state.device_index() + 1, state.device_count()),
        Tone::Footer,
    );
    frame
}

fn summary(frame: &mut Frame, device: &Device, top: u16, width: u16) {
    let stats = &device.stats;
    frame.put(top, 0, "Device Stats Summary:", Tone::Title);
    let rows = [
        ("num_wqe_sent: ", '*', stats.num_wqe_sent),
        ("num_wqe_rcvd: ", '+', stats.num_wqe_rcvd),
        ("num_cts_sent: ", '#', stats.num_cts_sent),
        ("cq_poll_count: ", '-', stats.cq_poll_count),
    ];
    for (row, (label, glyph, value)) in (top + 1..).zip(rows) {
        let chart = BarChart::new(width, glyph).capped(SUMMARY_CAP);
        frame.put(row, 0, &chart.line(label, value, value), Tone::Body);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::screens::fixtures::{two_channels, with_wqe_sizes};
    use crate::widgets::bar_chart::glyph_run;

    #[test]
    fn all_zero_counts_draw_minimum_bars() {
        let dev = with_wqe_sizes(two_channels(), &[(512, 0), (1024, 0), (1 << 20, 0)]);
        let frame = compose(&DashboardState::new(2), &dev, 24, 80);

        assert_eq!(frame.text_at(7), "WQE Size Stats:");
        assert_eq!(frame.text_at(8), "wqe-size: 512 B + (0)");
        assert_eq!(frame.text_at(9), "wqe-size: 1.00 KB + (0)");
        assert_eq!(frame.text_at(10), "wqe-size: 1.00 MB + (0)");

        assert_eq!(frame.text_at(13), "Device Stats Summary:");
        assert_eq!(frame.text_at(14), "num_wqe_sent: ***** (0)");
        assert_eq!(frame.text_at(15), "num_wqe_rcvd: +++++ (0)");
        assert_eq!(frame.text_at(16), "num_cts_sent: ##### (0)");
        assert_eq!(frame.text_at(17), "cq_poll_count: ----- (0)");
        assert_eq!(frame.text_at(23), "Device 1/2");
    }

    #[test]
    fn sizes_scale_against_largest_bucket() {
        let dev = with_wqe_sizes(two_channels(), &[(64, 100), (4096, 50), (1 << 30, 1)]);
        let frame = compose(&DashboardState::new(1), &dev, 24, 100);

        let big = glyph_run(&frame.text_at(8), "wqe-size: 64 B ", '+');
        let half = glyph_run(&frame.text_at(9), "wqe-size: 4.00 KB ", '+');
        let tiny = glyph_run(&frame.text_at(10), "wqe-size: 1.00 GB ", '+');
        assert!(big > half && half > tiny);
        assert!(tiny >= 1);
    }

    #[test]
    fn summary_is_capped_regardless_of_magnitude() {
        let mut dev = two_channels();
        dev.stats.num_wqe_sent = 123_456_789;
        dev.stats.cq_poll_count = 1;
        let frame = compose(&DashboardState::new(1), &dev, 24, 80);
        // No size buckets: summary starts three rows below the title.
        assert_eq!(frame.text_at(10), "Device Stats Summary:");
        assert_eq!(frame.text_at(11), "num_wqe_sent: ***** (123456789)");
        assert_eq!(frame.text_at(14), "cq_poll_count: ----- (1)");
    }

    #[test]
    fn long_histogram_drops_summary_and_stays_above_footer() {
        let sizes: Vec<(u64, u64)> = (0..40).map(|i| (64 << (i % 20), i + 1)).collect();
        let dev = with_wqe_sizes(two_channels(), &sizes);
        let frame = compose(&DashboardState::new(1), &dev, 24, 80);

        let body_rows: Vec<u16> = frame
            .lines()
            .iter()
            .filter(|l| l.text.starts_with("wqe-size:"))
            .map(|l| l.row)
            .collect();
        assert_eq!(body_rows, (8..23).collect::<Vec<u16>>());
        assert!(frame.lines().iter().all(|l| !l.text.starts_with("Device Stats")));
    }

    #[test]
    fn short_terminal_skips_everything_below() {
        let dev = with_wqe_sizes(two_channels(), &[(512, 3)]);
        let frame = compose(&DashboardState::new(1), &dev, 8, 80);
        assert_eq!(frame.text_at(7), "Device 1/1");
        assert!(frame.lines().iter().all(|l| l.row < 8));
    }
}
