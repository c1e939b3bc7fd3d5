// ── Snapshot loader ──
//
// One fixed file path per device index, resolved once at startup. A load
// is a single read + parse; anything that goes wrong is `NotAvailable`.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::error::CoreError;
use crate::model::Snapshot;

/// Placeholder replaced by the device index in a file name pattern.
pub const INDEX_PLACEHOLDER: &str = "{index}";

/// The set of snapshot files the dashboard cycles through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotSource {
    paths: Vec<PathBuf>,
}

impl SnapshotSource {
    /// Use an explicit list of paths, indexed by device.
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// Expand `pattern` (e.g. `device_status_{index}.json`) for device
    /// indices `0..count` under `dir`.
    pub fn from_pattern(dir: &Path, pattern: &str, count: usize) -> Self {
        let paths = (0..count)
            .map(|index| dir.join(pattern.replace(INDEX_PLACEHOLDER, &index.to_string())))
            .collect();
        Self { paths }
    }

    /// Number of device files, at least conceptually one per device.
    pub fn device_count(&self) -> usize {
        self.paths.len()
    }

    pub fn path(&self, index: usize) -> Option<&Path> {
        self.paths.get(index).map(PathBuf::as_path)
    }

    /// Read and parse the snapshot for `index`.
    pub fn load(&self, index: usize) -> Result<Snapshot, CoreError> {
        let Some(path) = self.path(index) else {
            return Err(CoreError::not_available(
                PathBuf::new(),
                format!("no snapshot file configured for device {index}"),
            ));
        };
        load_file(path)
    }
}

/// Read and parse a single snapshot file.
pub fn load_file(path: &Path) -> Result<Snapshot, CoreError> {
    let raw = std::fs::read_to_string(path).map_err(|e| CoreError::not_available(path, e))?;
    let doc: Value = serde_json::from_str(&raw).map_err(|e| CoreError::not_available(path, e))?;
    let snapshot = Snapshot::from_document(&doc)
        .ok_or_else(|| CoreError::not_available(path, "document has no device entries"))?;
    debug!(path = %path.display(), "snapshot loaded");
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pattern_expands_per_device() {
        let source = SnapshotSource::from_pattern(Path::new("/tmp"), "device_status_{index}.json", 3);
        assert_eq!(source.device_count(), 3);
        assert_eq!(source.path(0), Some(Path::new("/tmp/device_status_0.json")));
        assert_eq!(source.path(2), Some(Path::new("/tmp/device_status_2.json")));
        assert_eq!(source.path(3), None);
    }

    #[test]
    fn unknown_index_is_not_available() {
        let source = SnapshotSource::new(Vec::new());
        assert!(matches!(source.load(0), Err(CoreError::NotAvailable { .. })));
    }
}
