//! # Action Telemetry
//!
//! Structured logging for action-chain services, built on `tracing`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use action_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::for_module("action");
//! init_logging(&config).expect("logging already initialized");
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AC_LOG_LEVEL` | `info` | Log level filter |
//! | `AC_JSON_LOGS` | `false` | JSON output |
//! | `AC_CONSOLE_OUTPUT` | `true` | Console output |
//! | `AC_NETWORK` | `testnet` | Network name |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{init_logging, init_test_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
