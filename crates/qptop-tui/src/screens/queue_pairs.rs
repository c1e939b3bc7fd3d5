//! Default view: per-queue-pair sent/received bars, paginated.

use qptop_core::{Device, QueuePair};

use crate::layout::{self, BODY_TOP, Frame, Tone};
use crate::state::DashboardState;
use crate::widgets::bar_chart::BarChart;

/// Queue pairs that fit on one page at `height`, never less than one.
pub fn pairs_per_page(height: u16) -> usize {
    usize::from(height.saturating_sub(10) / 2).max(1)
}

/// Pages needed for `count` rows at `per_page`, never less than one.
pub fn page_count(count: usize, per_page: usize) -> usize {
    count.div_ceil(per_page.max(1)).max(1)
}

/// Row label, `Channel-<id> | QP-<id>` with ` (C)` for control QPs.
pub fn label(channel_id: i64, qp: &QueuePair) -> String {
    let cts = if qp.kind.is_cts() { " (C)" } else { "" };
    format!("Channel-{channel_id} | QP-{}{cts} ", qp.id)
}

pub fn compose(state: &DashboardState, device: &Device, height: u16, width: u16) -> Frame {
    let mut frame = Frame::new(height, width);
    layout::header(&mut frame, &device.status);

    let active: Vec<(i64, &QueuePair)> = device
        .queue_pairs()
        .filter(|(_, qp)| qp.stats.num_wqe_sent > 0)
        .collect();

    // Sent and received share one scale so their bars compare directly.
    let series_max = BarChart::series_max(
        active
            .iter()
            .flat_map(|(_, qp)| [qp.stats.num_wqe_sent, qp.stats.num_wqe_rcvd]),
    );
    let sent_chart = BarChart::new(width, '*');
    let rcvd_chart = BarChart::new(width, '+');

    let per_page = pairs_per_page(height);
    let footer_row = frame.last_row();
    let start = state.page().saturating_mul(per_page);
    let mut row = BODY_TOP;
    for (channel_id, qp) in active.iter().skip(start).take(per_page) {
        if row.saturating_add(1) >= footer_row {
            break;
        }
        let label = label(*channel_id, qp);
        frame.put(row, 0, &sent_chart.line(&label, qp.stats.num_wqe_sent, series_max), Tone::Body);
        frame.put(row + 1, 0, &rcvd_chart.line(&label, qp.stats.num_wqe_rcvd, series_max), Tone::Body);
        row += 2;
    }

    let footer = format!(
        "Device {}/{} | Page {} of {}",
        state.device_index() + 1,
        state.device_count(),
        state.page().saturating_add(1),
        page_count(active.len(), per_page),
    );
    frame.put(footer_row, 0, &footer, Tone::Footer);
    frame
}
