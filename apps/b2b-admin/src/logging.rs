//! Diagnostic logging setup using tracing.
//!
//! Logs go to stderr so they never mix with command output. `RUST_LOG`
//! takes precedence over the `-v` flags.

use clap::ValueEnum;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Default filter directive for a verbosity count (`-v`, `-vv`)
pub fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn,b2b_admin=info,b2b_directory=info",
        1 => "warn,b2b_admin=debug,b2b_directory=debug",
        _ => "info,b2b_admin=trace,b2b_directory=trace",
    }
}

/// Initialize the global tracing subscriber.
///
/// Returns an error if a subscriber is already installed.
pub fn init_logging(
    verbosity: u8,
    format: LogFormat,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .flatten_event(true),
            )
            .try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_levels() {
        assert!(default_filter(0).contains("b2b_admin=info"));
        assert!(default_filter(1).contains("b2b_directory=debug"));
        assert_eq!(default_filter(2), default_filter(7));
    }

    #[test]
    fn test_filters_parse() {
        for v in 0..3 {
            assert!(EnvFilter::try_new(default_filter(v)).is_ok());
        }
    }
}
