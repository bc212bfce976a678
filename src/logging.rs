//! Logging setup.
//!
//! The terminal belongs to the UI, so log records go to a file instead of
//! stderr.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const LOG_FILE_NAME: &str = "student-results.log";

/// Verbosity level for logging output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Info and above.
    #[default]
    Normal,
    /// Debug and above.
    Verbose,
    /// Everything.
    Trace,
}

impl Verbosity {
    /// Map a repeated `-v` flag count to a verbosity.
    pub fn from_occurrences(count: u8) -> Self {
        match count {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Trace,
        }
    }

    pub fn to_level(self) -> Level {
        match self {
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }
}

/// Filter directives, highest precedence first: `RUST_LOG`, the configured
/// level, the `-v` count.
fn build_filter(verbosity: Verbosity, configured: Option<&str>) -> EnvFilter {
    let fallback = match configured {
        Some(level) => format!("student_results={}", level),
        None => format!("student_results={}", verbosity.to_level()),
    };
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&fallback))
        .unwrap_or_else(|_| EnvFilter::new(format!("student_results={}", Level::INFO)))
}

/// Initialize file logging under `directory`.
///
/// Keep the returned guard alive for the life of the program; dropping it
/// flushes pending records.
pub fn init_logging(
    verbosity: Verbosity,
    configured: Option<&str>,
    directory: &Path,
) -> std::io::Result<(WorkerGuard, PathBuf)> {
    std::fs::create_dir_all(directory)?;
    let path = directory.join(LOG_FILE_NAME);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let subscriber = tracing_subscriber::registry()
        .with(build_filter(verbosity, configured))
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        );

    // Already set (tests) is fine.
    let _ = subscriber.try_init();
    Ok((guard, path))
}
