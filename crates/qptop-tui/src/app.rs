//! Application core: the poll-render loop.
//!
//! Each outer tick applies at most one pending key, loads the selected
//! device's snapshot (nudging its producer for fresh data when the refresh
//! policy says so), and redraws. The latency view suspends ticking and is
//! driven by blocking key reads until it exits.

use std::thread;
use std::time::Duration;

use color_eyre::eyre::Result;
use tracing::{debug, info, warn};

use qptop_config::{Config, RefreshPolicy};
use qptop_core::{CoreError, Refresher, Snapshot, SnapshotSource};

use crate::layout;
use crate::screens::latency::{LatencyTransition, LatencyView};
use crate::state::{DashboardState, ViewMode};
use crate::surface::{Key, Surface};

/// Top-level dashboard state and loop.
pub struct App {
    source: SnapshotSource,
    refresher: Refresher,
    policy: RefreshPolicy,
    /// Pause between outer ticks.
    interval: Duration,
    state: DashboardState,
    /// Active latency view; while set the outer tick is suspended.
    latency: Option<LatencyView>,
    /// (device, mode) the last refresh request was made for.
    last_refreshed: Option<(usize, ViewMode)>,
    /// Device whose snapshot is currently failing to load, already logged.
    failing: Option<usize>,
    /// Device whose data is on screen right now.
    drawn_device: Option<usize>,
    running: bool,
}

impl App {
    pub fn new(
        source: SnapshotSource,
        refresher: Refresher,
        policy: RefreshPolicy,
        interval: Duration,
    ) -> Self {
        let state = DashboardState::new(source.device_count());
        Self {
            source,
            refresher,
            policy,
            interval,
            state,
            latency: None,
            last_refreshed: None,
            failing: None,
            drawn_device: None,
            running: true,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.snapshot_source(),
            Refresher::system(config.refresh.sync_passes, config.settle()),
            config.refresh.policy,
            config.interval(),
        )
    }

    #[cfg(test)]
    pub fn state(&self) -> DashboardState {
        self.state
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run until interrupted.
    pub fn run(&mut self, surface: &mut dyn Surface) -> Result<()> {
        info!(
            devices = self.source.device_count(),
            policy = %self.policy,
            "dashboard started"
        );
        while self.running {
            self.step(surface)?;
        }
        info!("dashboard stopped");
        Ok(())
    }

    /// One iteration: a latency-view key cycle, or one outer tick.
    pub fn step(&mut self, surface: &mut dyn Surface) -> Result<()> {
        if self.latency.is_some() {
            self.latency_step(surface)
        } else {
            self.tick(surface)
        }
    }

    fn tick(&mut self, surface: &mut dyn Surface) -> Result<()> {
        let before = self.state;
        if let Some(key) = surface.read_key_nonblocking()? {
            if key == Key::Interrupt {
                self.running = false;
                return Ok(());
            }
            self.apply_key(key);
        }

        let index = self.state.device_index();
        let snapshot = match self.load_fresh(index) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                // The latency view is scoped to a loaded snapshot; without
                // one the `l` press is not committed.
                if self.state.mode() == ViewMode::LatencyHistogram {
                    debug!(device = index, "no snapshot for the latency view");
                    self.state = before;
                }
                self.on_unavailable(index, &err, surface)?;
                self.pace();
                return Ok(());
            }
        };
        if self.failing.take().is_some() {
            info!(device = index, "snapshot available again");
        }

        let (height, width) = surface.size()?;
        let Some(frame) = layout::compose(&self.state, &snapshot, height, width) else {
            let view = LatencyView::enter(snapshot.primary(), height);
            debug!(device = index, groups = view.groups().len(), "entering latency view");
            self.latency = Some(view);
            return Ok(());
        };

        frame.draw(surface)?;
        self.drawn_device = Some(index);
        self.pace();
        Ok(())
    }

    fn latency_step(&mut self, surface: &mut dyn Surface) -> Result<()> {
        let (height, width) = surface.size()?;
        let Some(view) = self.latency.as_mut() else {
            return Ok(());
        };
        view.fit(height);
        view.compose(height, width).draw(surface)?;

        let key = surface.read_key_blocking()?;
        if key == Key::Interrupt {
            self.running = false;
            return Ok(());
        }
        if view.handle_key(key) == LatencyTransition::Stay {
            debug!(page = view.page(), pages = view.total_pages(), "latency view key");
        } else {
            debug!("leaving latency view");
            self.latency = None;
            self.state = self.state.exit_latency();
            self.drawn_device = None;
            self.pace();
        }
        Ok(())
    }

    fn apply_key(&mut self, key: Key) {
        let next = self.state.on_key(key);
        if next != self.state {
            debug!(
                device = next.device_index(),
                mode = %next.mode(),
                page = next.page(),
                "view changed"
            );
        }
        self.state = next;
    }

    /// Load the device's snapshot, refreshing and reloading when the
    /// policy asks for it.
    fn load_fresh(&mut self, index: usize) -> Result<Snapshot, CoreError> {
        let snapshot = self.source.load(index)?;
        let target = (index, self.state.mode());
        let wanted = match self.policy {
            RefreshPolicy::Always => true,
            RefreshPolicy::OnChange => self.last_refreshed != Some(target),
            RefreshPolicy::Never => false,
        };
        if !wanted {
            return Ok(snapshot);
        }

        self.last_refreshed = Some(target);
        match self.refresher.request_refresh(&snapshot) {
            Ok(()) => self.source.load(index),
            Err(err @ (CoreError::RefreshTargetGone { .. } | CoreError::MissingProcessId)) => {
                debug!(device = index, error = %err, "refresh skipped");
                Ok(snapshot)
            }
            Err(err) => {
                warn!(device = index, error = %err, "refresh request failed, showing stale data");
                Ok(snapshot)
            }
        }
    }

    /// Keep the last frame if it belongs to this device, otherwise say why
    /// the screen is empty.
    fn on_unavailable(
        &mut self,
        index: usize,
        err: &CoreError,
        surface: &mut dyn Surface,
    ) -> Result<()> {
        if self.failing != Some(index) {
            warn!(device = index, error = %err, "snapshot not available");
            self.failing = Some(index);
        }
        if self.drawn_device == Some(index) {
            return Ok(());
        }
        let path = self
            .source
            .path(index)
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let (height, width) = surface.size()?;
        layout::unavailable(index, &path, height, width).draw(surface)
    }

    fn pace(&self) {
        if !self.interval.is_zero() {
            thread::sleep(self.interval);
        }
    }
}
