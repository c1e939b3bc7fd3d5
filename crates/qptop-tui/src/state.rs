//! Navigation state for the dashboard.
//!
//! [`DashboardState`] is a small value type: each key press produces the
//! next state, nothing is mutated behind the loop's back.

use std::fmt;

use crate::surface::Key;

/// Which body the dashboard is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ViewMode {
    #[default]
    Default,
    WqeSizeStats,
    LatencyHistogram,
}

impl ViewMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Default => "Queue Pairs",
            Self::WqeSizeStats => "WQE Size Stats",
            Self::LatencyHistogram => "Latency Histogram",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Selected device, active mode, and page within the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardState {
    device_index: usize,
    device_count: usize,
    mode: ViewMode,
    page: usize,
}

impl DashboardState {
    /// Start on device 0, Default mode, first page. A zero count is
    /// treated as one so the index stays in range.
    pub fn new(device_count: usize) -> Self {
        Self {
            device_index: 0,
            device_count: device_count.max(1),
            mode: ViewMode::Default,
            page: 0,
        }
    }

    pub fn device_index(&self) -> usize {
        self.device_index
    }

    pub fn device_count(&self) -> usize {
        self.device_count
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Apply one key press. Unrecognized keys leave the state unchanged.
    #[must_use]
    pub fn on_key(self, key: Key) -> Self {
        let Key::Char(ch) = key else {
            return self;
        };
        match ch {
            'd' => Self {
                device_index: (self.device_index + 1) % self.device_count,
                ..self
            },
            ' ' if self.mode == ViewMode::Default => Self {
                page: self.page.saturating_add(1),
                ..self
            },
            's' => self.with_mode(ViewMode::WqeSizeStats),
            'l' => self.with_mode(ViewMode::LatencyHistogram),
            'r' => self.with_mode(ViewMode::Default),
            _ => self,
        }
    }

    /// Leave the latency view and land back on the first Default page.
    #[must_use]
    pub fn exit_latency(self) -> Self {
        self.with_mode(ViewMode::Default)
    }

    fn with_mode(self, mode: ViewMode) -> Self {
        Self {
            mode,
            page: 0,
            ..self
        }
    }
}
