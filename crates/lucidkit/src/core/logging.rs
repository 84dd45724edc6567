//! Logging infrastructure
//!
//! The library emits structured events through the `tracing` crate and never
//! installs a subscriber on its own. Applications (including the `lucidkit`
//! CLI) call [`init_logging`] once at startup.
//!
//! # Usage
//!
//! ```rust,no_run
//! use lucidkit::core::logging::init_logging;
//!
//! // Initialize with default settings
//! init_logging(None, None).unwrap();
//! ```
//!
//! # Log Formats
//!
//! - `compact`: Single-line format, good for production
//! - `pretty`: Multi-line format with colors, good for development
//! - `json`: JSON format, good for log aggregation systems
//!
//! # Environment Variables
//!
//! - `LUCIDKIT_LOG_LEVEL`: Set log level (trace|debug|info|warn|error)
//! - `LUCIDKIT_LOG_FORMAT`: Set log format (compact|pretty|json)
//! - `RUST_LOG`: Standard filter directives, e.g.
//!   `RUST_LOG="info,lucidkit::client=debug"` to see every HTTP exchange

use std::str::FromStr;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

use super::LucidError;

/// Output style of the stderr subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    const ALL: [LogFormat; 3] = [LogFormat::Compact, LogFormat::Pretty, LogFormat::Json];

    pub fn name(self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }

    /// Names accepted by `LUCIDKIT_LOG_FORMAT` and `--log-format`
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

impl FromStr for LogFormat {
    type Err = LucidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                LucidError::config(format!(
                    "unknown log format '{}', expected one of {}",
                    s,
                    Self::variants().join(", ")
                ))
            })
    }
}

/// Initialize the tracing subscriber with the given log level and format
///
/// * `level` - trace|debug|info|warn|error|off. Falls back to
///   `LUCIDKIT_LOG_LEVEL`, then `RUST_LOG`, then `warn`.
/// * `format` - compact|pretty|json. Falls back to `LUCIDKIT_LOG_FORMAT`,
///   then `compact`.
///
/// Returns an error for an unknown format or when a global subscriber is
/// already installed.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = level
        .map(|s| s.to_string())
        .or_else(|| std::env::var("LUCIDKIT_LOG_LEVEL").ok())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "warn".to_string());

    let log_format = format
        .map(|s| s.to_string())
        .or_else(|| std::env::var("LUCIDKIT_LOG_FORMAT").ok())
        .unwrap_or_else(|| "compact".to_string());

    let format = LogFormat::from_str(&log_format)?;

    let filter = if log_level == "off" {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    match format {
        LogFormat::Compact => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .with_level(true)
                        .with_span_events(FmtSpan::NONE),
                )
                .try_init()?;
        }
        LogFormat::Pretty => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .pretty(),
                )
                .try_init()?;
        }
        LogFormat::Json => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .json(),
                )
                .try_init()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
        assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("JSON").unwrap(), LogFormat::Json);
        assert!(LogFormat::from_str(" Pretty ").is_ok());
        let err = LogFormat::from_str("yaml").unwrap_err();
        assert!(matches!(err, LucidError::Config { .. }));
        assert!(err.to_string().contains("compact, pretty, json"));
    }

    #[test]
    fn test_log_format_variants() {
        let variants = LogFormat::variants();
        assert_eq!(variants.len(), 3);
        assert!(variants.contains(&"json"));
        for name in variants {
            assert_eq!(LogFormat::from_str(name).unwrap().name(), *name);
        }
    }
}
