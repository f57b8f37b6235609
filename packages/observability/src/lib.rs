//! # Observability
//!
//! Shared logging setup for gitwrap binaries.
//!
//! Libraries in the workspace only use the `tracing` macros. Binaries call
//! [`init`] or [`init_with_config`] once at startup and decide where the
//! events go:
//!
//! - stderr, compact human-readable lines (default) or JSON lines
//! - optionally an append-only JSONL file shared by every process
//!
//! `RUST_LOG` always wins over the configured default level, so
//! `RUST_LOG=gitwrap_ops=debug gitwrap fetch` shows every git invocation.
//!
//! ## Usage
//!
//! ```rust,ignore
//! fn main() {
//!     observability::init("gitwrap");
//!     tracing::info!("ready");
//! }
//! ```
//!
//! Or with configuration:
//!
//! ```rust,ignore
//! observability::init_with_config(observability::LogConfig {
//!     service_name: "gitwrap".into(),
//!     default_level: "debug".into(),
//!     json: true,
//!     ..Default::default()
//! })?;
//! ```

mod writer;

use std::io;
use std::path::PathBuf;

use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

pub use writer::AppendWriter;

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Name of the binary, reported once at startup.
    pub service_name: String,

    /// Default log level filter (e.g., "debug", "info", "warn").
    /// Can be overridden by `RUST_LOG` environment variable.
    pub default_level: String,

    /// Emit JSON lines on stderr instead of compact text.
    pub json: bool,

    /// Also append JSON lines to this file.
    pub log_path: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown".into(),
            default_level: "warn".into(),
            json: false,
            log_path: None,
        }
    }
}

/// Errors from installing the global subscriber.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("failed to open log file: {0}")]
    LogFile(#[from] io::Error),

    #[error("a global subscriber is already installed: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

/// Initialize logging with default settings.
///
/// Silently does nothing if a subscriber is already installed, which makes
/// it safe to call from tests.
pub fn init(service_name: &str) {
    let _ = init_with_config(LogConfig {
        service_name: service_name.into(),
        ..Default::default()
    });
}

/// Initialize logging with custom configuration.
pub fn init_with_config(config: LogConfig) -> Result<(), InitError> {
    let filter = build_filter(&config.default_level);

    let (compact, json) = if config.json {
        (
            None,
            Some(fmt::layer().json().with_target(true).with_writer(io::stderr)),
        )
    } else {
        (
            Some(
                fmt::layer()
                    .compact()
                    .with_target(true)
                    .with_writer(io::stderr),
            ),
            None,
        )
    };

    let file = match &config.log_path {
        Some(path) => Some(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(AppendWriter::open(path)?),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(compact)
        .with(json)
        .with(file)
        .try_init()?;

    tracing::debug!(
        service = %config.service_name,
        log_path = ?config.log_path,
        "observability initialized"
    );
    Ok(())
}

/// `RUST_LOG` if set and valid, otherwise `default_level`.
fn build_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Re-export tracing macros for convenience.
pub use tracing::{debug, error, info, instrument, trace, warn};

/// Re-export Level for advanced filtering.
pub use tracing::Level;
