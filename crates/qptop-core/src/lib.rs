//! Data layer for the `qptop` queue-pair telemetry dashboard.
//!
//! - **[`Snapshot`]**: typed, immutable view of one `device_status_<i>.json`
//!   document written by the telemetry producer. Built once per tick by
//!   [`SnapshotSource::load`], never mutated afterwards.
//!
//! - **[`SnapshotSource`]**: the fixed set of per-device snapshot files.
//!   Any read or parse failure surfaces as [`CoreError::NotAvailable`].
//!
//! - **[`Refresher`]**: asks the producing process to rewrite its snapshot
//!   (SIGUSR1), flushes storage, and waits a short settle delay.
//!
//! The wire format is stringly typed; [`convert`] turns it into native
//! numbers and enums at the boundary so nothing downstream parses text.

pub mod convert;
pub mod error;
pub mod loader;
pub mod model;
pub mod process;
pub mod refresh;

pub use error::CoreError;
pub use loader::{SnapshotSource, load_file};
pub use model::{
    Channel, Device, DeviceStats, DeviceStatus, LatencyBucket, QpKind, QpStats, QueuePair,
    Snapshot, WqeSizeBucket,
};
pub use process::{ProcessControl, SystemProcess};
pub use refresh::{DEFAULT_SETTLE, DEFAULT_SYNC_PASSES, Refresher};
