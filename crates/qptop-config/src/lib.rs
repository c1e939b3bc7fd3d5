//! Configuration for the qptop dashboard.
//!
//! Layers, lowest priority first: built-in defaults, a TOML file, then
//! `QPTOP_`-prefixed environment variables (nested keys split on `__`,
//! e.g. `QPTOP_REFRESH__POLICY=on-change`). The binary applies its CLI
//! flags on top of the loaded [`Config`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

use qptop_core::SnapshotSource;
use qptop_core::loader::INDEX_PLACEHOLDER;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub snapshots: SnapshotSettings,

    #[serde(default)]
    pub refresh: RefreshSettings,

    #[serde(default)]
    pub display: DisplaySettings,
}

/// Where the producer's per-device snapshot files live.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SnapshotSettings {
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    /// File name with an `{index}` placeholder for the device index.
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Number of device files cycled by the `d` key.
    #[serde(default = "default_count")]
    pub count: usize,
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            pattern: default_pattern(),
            count: default_count(),
        }
    }
}

fn default_dir() -> PathBuf {
    PathBuf::from("/tmp")
}
fn default_pattern() -> String {
    "device_status_{index}.json".into()
}
fn default_count() -> usize {
    8
}

/// When the dashboard asks the producer for fresh data.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RefreshPolicy {
    /// Signal the producer on every tick.
    #[default]
    Always,
    /// Signal only on the first tick and after a device or view change.
    OnChange,
    /// Never signal; just re-read whatever is on disk.
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RefreshSettings {
    #[serde(default)]
    pub policy: RefreshPolicy,

    /// Storage flushes after each signal.
    #[serde(default = "default_sync_passes")]
    pub sync_passes: u32,

    /// Delay after signalling, in milliseconds.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            policy: RefreshPolicy::default(),
            sync_passes: default_sync_passes(),
            settle_ms: default_settle_ms(),
        }
    }
}

fn default_sync_passes() -> u32 {
    qptop_core::DEFAULT_SYNC_PASSES
}
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn default_settle_ms() -> u64 {
    qptop_core::DEFAULT_SETTLE.as_millis() as u64
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DisplaySettings {
    /// Outer loop pacing, in milliseconds.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

fn default_interval_ms() -> u64 {
    1000
}

impl Config {
    /// Check the values the dashboard cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.snapshots.count == 0 {
            return Err(ConfigError::Validation {
                field: "snapshots.count".into(),
                reason: "at least one device file is required".into(),
            });
        }
        if !self.snapshots.pattern.contains(INDEX_PLACEHOLDER) {
            return Err(ConfigError::Validation {
                field: "snapshots.pattern".into(),
                reason: format!(
                    "'{}' must contain the {INDEX_PLACEHOLDER} placeholder",
                    self.snapshots.pattern
                ),
            });
        }
        Ok(())
    }

    /// Expand the snapshot settings into the per-device file list.
    pub fn snapshot_source(&self) -> SnapshotSource {
        SnapshotSource::from_pattern(
            &self.snapshots.dir,
            &self.snapshots.pattern,
            self.snapshots.count,
        )
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.refresh.settle_ms)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.display.interval_ms)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "qptop").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("qptop");
    p
}

// ── Config loading ──────────────────────────────────────────────────

fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("QPTOP_").split("__"))
}

/// Load and validate the config from `path` (or the default location)
/// plus the environment. A missing file just means defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    let config: Config = figment(&path).extract()?;
    config.validate()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
