//! Tracing setup for wicket.
//!
//! Log lines go to stdout and, when file logging is configured, to an
//! append-mode log file as well. `RUST_LOG` overrides the configured
//! level when set.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::Result;

/// Build a filter from a configured level string.
///
/// Accepts anything `EnvFilter` parses ("debug", "warn,sqlx=info", ...);
/// an unparseable value falls back to `info`.
fn parse_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize logging to stdout and the configured log file.
pub fn init(config: &LoggingConfig) -> Result<()> {
    if let Some(dir) = Path::new(&config.file).parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| parse_filter(&config.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(std::io::stdout.and(Arc::new(file))),
        )
        .init();

    Ok(())
}

/// Initialize stdout-only logging, used when the log file cannot be opened.
pub fn init_console_only(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| parse_filter(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter_passes_directives_through() {
        assert_eq!(parse_filter("debug").to_string(), "debug");

        let filter = parse_filter("warn,sqlx=info").to_string();
        assert!(filter.contains("warn"));
        assert!(filter.contains("sqlx=info"));
    }

    #[test]
    fn test_parse_filter_falls_back_on_garbage() {
        assert_eq!(parse_filter("no such level").to_string(), "info");
    }
}
