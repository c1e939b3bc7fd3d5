// ── Core error types ──
//
// Nothing in this taxonomy is fatal to the dashboard. The loop matches on
// these variants to decide between "skip this tick", "ignore silently",
// and "log and keep going".

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Snapshot errors ──────────────────────────────────────────────
    /// The snapshot file is missing, unreadable, or not a usable document.
    #[error("Snapshot not available at {}: {reason}", path.display())]
    NotAvailable { path: PathBuf, reason: String },

    /// A field inside an otherwise parseable document had the wrong shape.
    /// Conversion coerces these to zero/empty; the variant exists so the
    /// coercion can be reported.
    #[error("Malformed field `{field}`: {value}")]
    MalformedField { field: &'static str, value: String },

    // ── Refresh errors ───────────────────────────────────────────────
    #[error("Snapshot does not report a usable process id")]
    MissingProcessId,

    #[error("Refresh target process {pid} is not running")]
    RefreshTargetGone { pid: i32 },

    #[error("Failed to signal process {pid}: {source}")]
    SignalDeliveryFailed {
        pid: i32,
        #[source]
        source: std::io::Error,
    },
}

impl CoreError {
    pub(crate) fn not_available(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::NotAvailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
