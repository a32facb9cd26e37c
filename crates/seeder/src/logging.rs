//! Structured logging setup
//!
//! Lambda writes JSON lines to stdout for CloudWatch; the CLI prefers
//! human-readable output. `RUST_LOG` always wins over the built-in filter.

use std::io;
use std::str::FromStr;
use tracing_subscriber::{fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
    Plain,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "plain" | "text" => Ok(LogFormat::Plain),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Output format
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is not set
    pub env_filter: String,
    /// ANSI colours (off for CloudWatch)
    pub ansi: bool,
    /// Include the target module in each line
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::cli()
    }
}

impl LoggingConfig {
    /// Lambda runtime: JSON, no colours
    pub fn lambda() -> Self {
        Self {
            format: LogFormat::Json,
            env_filter: "maint_seed=info,maint_seed_cli=info,aws_config=warn".to_string(),
            ansi: false,
            include_target: true,
        }
    }

    /// Interactive use
    pub fn cli() -> Self {
        Self {
            format: LogFormat::Pretty,
            env_filter: "maint_seed=info,maint_seed_cli=info,aws_config=warn".to_string(),
            ansi: true,
            include_target: false,
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_env_filter<S: Into<String>>(mut self, filter: S) -> Self {
        self.env_filter = filter.into();
        self
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.env_filter))?;

    let layer = Layer::new()
        .with_writer(io::stdout)
        .with_ansi(config.ansi)
        .with_target(config.include_target);

    match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(layer.json().flatten_event(true))
            .try_init()?,
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(layer.pretty())
            .try_init()?,
        LogFormat::Plain => tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init()?,
    }

    tracing::debug!(format = ?config.format, "Logging initialized");
    Ok(())
}
