//! Tracing setup.
//!
//! Stdout carries the MCP protocol in stdio mode, so log output only ever goes
//! to stderr, and by default not at all in stdio mode.

use tracing_subscriber::EnvFilter;

/// Where log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    Stderr,
    Disabled,
}

/// Logging configuration resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogConfig {
    /// 0 = warn, 1 = info, 2 = debug, 3+ = trace
    pub verbosity: u8,
    pub destination: LogDestination,
}

impl LogConfig {
    /// Pick a configuration for the serving mode.
    ///
    /// HTTP mode always logs to stderr. Stdio mode stays silent unless the
    /// caller raised the log level.
    #[must_use]
    pub fn for_mode(http_port: Option<u16>, log_level: u8) -> Self {
        let destination = if http_port.is_some() || log_level > 0 {
            LogDestination::Stderr
        } else {
            LogDestination::Disabled
        };
        Self {
            verbosity: log_level,
            destination,
        }
    }

    /// Default filter directive for the verbosity.
    #[must_use]
    pub fn directive(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the verbosity directive.
pub fn init_tracing(config: &LogConfig) {
    if config.destination == LogDestination::Disabled {
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.directive()));

    // try_init: tests and embedders may already own the global subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
