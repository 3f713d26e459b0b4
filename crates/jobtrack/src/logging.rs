//! Process-wide log and trace output.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::JobtrackError;

/// Installs the global subscriber and routes `log` records into it.
///
/// `RUST_LOG` takes precedence over `config.level`. Fails if a global
/// subscriber or logger is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), JobtrackError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            JobtrackError::Logging(format!("invalid log level '{}': {}", config.level, e))
        })?,
    };

    let (json, text) = if config.json {
        (Some(fmt::layer().json().with_current_span(true)), None)
    } else {
        (None, Some(fmt::layer().with_target(true)))
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(text);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| JobtrackError::Logging(e.to_string()))?;
    tracing_log::LogTracer::init().map_err(|e| JobtrackError::Logging(e.to_string()))?;

    log::debug!("Logging initialised (json = {})", config.json);
    Ok(())
}
