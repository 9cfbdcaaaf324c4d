use tracing_subscriber::fmt::{self, format::FmtSpan};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;
use vellum_domain::{Result, VellumError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Subscriber settings. `RUST_LOG` overrides `directive` when set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub directive: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { directive: "info,vellum_infra=debug".to_string(), format: LogFormat::Pretty }
    }
}

impl LoggingConfig {
    pub fn json() -> Self {
        Self { format: LogFormat::Json, ..Self::default() }
    }
}

/// Install a global `tracing` subscriber.
///
/// # Errors
/// Returns `VellumError::Config` if the directive is invalid or a global
/// subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.directive).map_err(|e| {
            VellumError::Config(format!("Invalid log directive '{}': {e}", config.directive))
        })?,
    };

    let subscriber = tracing_subscriber::registry().with(env_filter);

    let result = match config.format {
        LogFormat::Json => subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init(),
        LogFormat::Pretty => subscriber
            .with(fmt::layer().with_target(true).with_span_events(FmtSpan::CLOSE))
            .try_init(),
    };

    result.map_err(|e| VellumError::Config(format!("Failed to install log subscriber: {e}")))
}
