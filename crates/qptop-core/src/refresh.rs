// ── Refresh trigger ──
//
// Push-assisted polling: nudge the producer, give it a moment to rewrite
// its file, then let the next load pick up whatever landed.

use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::error::CoreError;
use crate::model::Snapshot;
use crate::process::{ProcessControl, SystemProcess};

/// Storage flushes issued after each signal.
pub const DEFAULT_SYNC_PASSES: u32 = 3;

/// Time the producer is given to rewrite its snapshot.
pub const DEFAULT_SETTLE: Duration = Duration::from_secs(1);

/// Sends refresh requests to the process that owns a snapshot.
pub struct Refresher {
    control: Box<dyn ProcessControl>,
    sync_passes: u32,
    settle: Duration,
}

impl std::fmt::Debug for Refresher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Refresher")
            .field("sync_passes", &self.sync_passes)
            .field("settle", &self.settle)
            .finish_non_exhaustive()
    }
}

impl Refresher {
    pub fn new(control: Box<dyn ProcessControl>, sync_passes: u32, settle: Duration) -> Self {
        Self {
            control,
            sync_passes,
            settle,
        }
    }

    /// Refresher that signals real processes.
    pub fn system(sync_passes: u32, settle: Duration) -> Self {
        Self::new(Box::new(SystemProcess), sync_passes, settle)
    }

    /// Signal the snapshot's owning process, flush storage, and block for
    /// the settle delay.
    ///
    /// Returns `RefreshTargetGone` when the process is not running (callers
    /// treat that as a silent no-op) and `SignalDeliveryFailed` when the
    /// signal could not be sent.
    pub fn request_refresh(&self, snapshot: &Snapshot) -> Result<(), CoreError> {
        let pid = snapshot
            .primary()
            .status
            .process_id
            .ok_or(CoreError::MissingProcessId)?;

        if !self.control.is_running(pid) {
            return Err(CoreError::RefreshTargetGone { pid });
        }

        self.control
            .signal_refresh(pid)
            .map_err(|source| CoreError::SignalDeliveryFailed { pid, source })?;

        for _ in 0..self.sync_passes {
            self.control.sync_storage();
        }

        debug!(pid, settle = ?self.settle, "refresh requested");
        if !self.settle.is_zero() {
            thread::sleep(self.settle);
        }
        Ok(())
    }
}
