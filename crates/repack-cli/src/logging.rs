//! Log output setup.
//!
//! Core events go through `tracing`; this module installs the global
//! subscriber that formats them for the terminal.

use anyhow::Result;
use anyhow::anyhow;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

/// Where log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stdout,
    Stderr,
}

/// Maps the `--verbosity` value to a filter directive.
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "error",
        1 => "info",
        _ => "debug",
    }
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `verbosity` when set.
pub fn init(verbosity: u8, ansi: bool, target: LogTarget) -> Result<()> {
    let builder = fmt::fmt()
        .with_env_filter(build_env_filter(level_for(verbosity)))
        .with_target(false)
        .with_ansi(ansi);

    let installed = match target {
        LogTarget::Stdout => builder.with_writer(std::io::stdout).try_init(),
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}
