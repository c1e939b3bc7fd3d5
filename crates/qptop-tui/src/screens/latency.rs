//! Completion-latency histogram.
//!
//! Unlike the other views this one is key driven: [`LatencyView`] is built
//! once from the snapshot present on entry, then redrawn after every key
//! until `q` hands control back to the dashboard.

use qptop_core::{Device, LatencyBucket};

use crate::layout::{Frame, Tone};
use crate::surface::Key;
use crate::widgets::bar_chart::BarChart;

pub const TITLE: &str = "WQE Completion Histogram";
const FIRST_GROUP_ROW: u16 = 2;
/// Indent of the bucket lines under their group header.
const BUCKET_COL: u16 = 2;

/// Latency series of one queue pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatencyGroup {
    pub channel_id: i64,
    pub qp_id: i64,
    pub buckets: Vec<LatencyBucket>,
}

/// Outcome of a key press inside the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyTransition {
    Stay,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatencyView {
    groups: Vec<LatencyGroup>,
    per_page: usize,
    page: usize,
}

fn groups_per_page(height: u16) -> usize {
    usize::from(height.saturating_sub(5)).max(1)
}

impl LatencyView {
    /// Collect every queue pair with a non-empty latency series.
    pub fn enter(device: &Device, height: u16) -> Self {
        let groups = device
            .queue_pairs()
            .filter(|(_, qp)| !qp.stats.completion_latency.is_empty())
            .map(|(channel_id, qp)| LatencyGroup {
                channel_id,
                qp_id: qp.id,
                buckets: qp.stats.completion_latency.clone(),
            })
            .collect();
        Self {
            groups,
            per_page: groups_per_page(height),
            page: 0,
        }
    }

    pub fn groups(&self) -> &[LatencyGroup] {
        &self.groups
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        self.groups.len().div_ceil(self.per_page).max(1)
    }

    /// Re-paginate for a new terminal height, keeping the page in range.
    pub fn fit(&mut self, height: u16) {
        self.per_page = groups_per_page(height);
        self.page = self.page.min(self.total_pages() - 1);
    }

    pub fn handle_key(&mut self, key: Key) -> LatencyTransition {
        match key {
            Key::Char('q') => return LatencyTransition::Exit,
            Key::Left | Key::PageUp => self.page = self.page.saturating_sub(1),
            Key::Right | Key::PageDown => {
                self.page = (self.page + 1).min(self.total_pages() - 1);
            }
            _ => {}
        }
        LatencyTransition::Stay
    }

    pub fn compose(&self, height: u16, width: u16) -> Frame {
        let mut frame = Frame::new(height, width);
        frame.put(0, 0, TITLE, Tone::Title);

        let limit = height.saturating_sub(2);
        let chart_width = width.saturating_sub(BUCKET_COL);
        let mut row = FIRST_GROUP_ROW;
        let page = self
            .groups
            .iter()
            .skip(self.page.saturating_mul(self.per_page))
            .take(self.per_page);

        'groups: for group in page {
            if row >= limit {
                break;
            }
            let header = format!("Channel-{:<4} | QP-{:<6}", group.channel_id, group.qp_id);
            frame.put(row, 0, &header, Tone::Body);
            row += 1;

            let series_max = BarChart::series_max(group.buckets.iter().map(|b| b.num_wqe));
            let chart = BarChart::new(chart_width, '#');
            for bucket in &group.buckets {
                if row >= limit {
                    break 'groups;
                }
                let label = format!("Latency: {} ns ", bucket.latency_ns);
                frame.put(row, BUCKET_COL, &chart.line(&label, bucket.num_wqe, series_max), Tone::Body);
                row += 1;
            }
        }

        let footer = format!(
            "Page {} of {} (Arrow keys to navigate, 'q' to exit)",
            self.page + 1,
            self.total_pages()
        );
        frame.put(frame.last_row(), 0, &footer, Tone::Footer);
        frame
    }
}
