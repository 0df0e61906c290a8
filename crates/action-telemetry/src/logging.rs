//! Structured logging.
//!
//! Logs carry consistent fields so that an aggregator can index them:
//! - `timestamp`, `level`, `target`
//! - `service` and `network` on the root span
//! - `action_id` and related fields from the call site macros

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Install the global subscriber described by `config`.
///
/// Fails if a global subscriber is already installed or the filter directive
/// does not parse.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::Config(format!("log level {}: {e}", config.log_level)))?;

    let json_layer = (config.console_output && config.json_logs).then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
    });

    let pretty_layer = (config.console_output && !config.json_logs).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_ansi(true)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    tracing::info!(
        service = %config.full_service_name(),
        network = %config.network,
        json_logs = config.json_logs,
        "Structured logging initialized"
    );

    Ok(())
}

/// Route logs through the libtest capture. Safe to call from every test.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Log an action lifecycle event with standard fields.
#[macro_export]
macro_rules! log_action_event {
    ($level:ident, $msg:expr, $action_id:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            module = "action",
            action_id = %$action_id,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a supernode-scoped event with standard fields.
#[macro_export]
macro_rules! log_supernode_event {
    ($level:ident, $msg:expr, $action_id:expr, $supernode:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            module = "action",
            action_id = %$action_id,
            supernode = %$supernode,
            $($($field)*,)?
            $msg
        )
    };
}
