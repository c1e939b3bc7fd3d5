//! `qptop`: live terminal dashboard for RDMA queue-pair telemetry.
//!
//! Reads the per-device `device_status_<i>.json` snapshots written by the
//! telemetry producer, nudges the producer for fresh data, and draws
//! per-queue-pair WQE counts, WQE size histograms, and completion latency
//! histograms as width-bounded ASCII bars.
//!
//! Logs are written to a file (default `/tmp/qptop.log`) to avoid
//! corrupting the terminal UI.
//!
//! Entry point: CLI argument parsing, config layering, tracing setup, panic
//! hooks, and app launch.

mod app;
mod layout;
mod screens;
mod state;
mod surface;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use qptop_config::{Config, RefreshPolicy};

use crate::app::App;
use crate::tui::Tui;

/// Live dashboard for RDMA queue-pair telemetry snapshots.
#[derive(Parser, Debug)]
#[command(name = "qptop", version, about)]
struct Cli {
    /// Config file (defaults to the platform config dir, e.g. ~/.config/qptop/config.toml)
    #[arg(short, long, env = "QPTOP_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the device_status_<i>.json snapshots
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Number of device snapshot files cycled by the `d` key
    #[arg(short = 'n', long)]
    devices: Option<usize>,

    /// Pause between redraws, in milliseconds
    #[arg(short, long)]
    interval_ms: Option<u64>,

    /// When to signal the producer for fresh data (always, on-change, never)
    #[arg(short, long)]
    refresh_policy: Option<RefreshPolicy>,

    /// Write the effective config to the config file path and exit
    #[arg(long)]
    write_config: bool,

    /// Log file path (defaults to /tmp/qptop.log)
    #[arg(long, default_value = "/tmp/qptop.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. Nothing may be logged to stdout/stderr while
/// the dashboard owns the terminal. The returned guard must be held for the
/// lifetime of the application so logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("qptop={log_level},qptop_core={log_level}"))
    });

    let log_dir = cli
        .log_file
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("qptop.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Config file and environment first, then CLI flags on top.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = qptop_config::load_config(cli.config.as_deref())?;
    if let Some(dir) = &cli.dir {
        config.snapshots.dir.clone_from(dir);
    }
    if let Some(count) = cli.devices {
        config.snapshots.count = count;
    }
    if let Some(interval_ms) = cli.interval_ms {
        config.display.interval_ms = interval_ms;
    }
    if let Some(policy) = cli.refresh_policy {
        config.refresh.policy = policy;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file, hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    let config = load_config(&cli)?;
    if cli.write_config {
        let path = cli.config.clone().unwrap_or_else(qptop_config::config_path);
        qptop_config::save_config(&config, &path)?;
        info!(path = %path.display(), "config written");
        println!("Config written to {}", path.display());
        return Ok(());
    }

    info!(
        dir = %config.snapshots.dir.display(),
        devices = config.snapshots.count,
        policy = %config.refresh.policy,
        "starting qptop"
    );

    let mut app = App::from_config(&config);
    let mut tui = Tui::new()?;
    tui.enter()?;
    let outcome = app.run(&mut tui);
    // Dropping the terminal restores it before any error is reported
    drop(tui);
    outcome
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_parses_overrides() {
        let cli = Cli::try_parse_from([
            "qptop",
            "--dir",
            "/var/run/anp",
            "-n",
            "4",
            "--refresh-policy",
            "on-change",
            "-vv",
        ]);
        let cli = match cli {
            Ok(cli) => cli,
            Err(err) => panic!("{err}"),
        };
        assert_eq!(cli.dir, Some(PathBuf::from("/var/run/anp")));
        assert_eq!(cli.devices, Some(4));
        assert_eq!(cli.refresh_policy, Some(RefreshPolicy::OnChange));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_file, PathBuf::from("/tmp/qptop.log"));
        assert!(!cli.write_config);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(Cli::try_parse_from(["qptop", "--refresh-policy", "sometimes"]).is_err());
    }
}
