//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for structured logging.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Module identifier (e.g. "action")
    pub module: String,

    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,

    /// Whether to enable console output
    pub console_output: bool,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,

    /// Network identifier (testnet, mainnet, devnet)
    pub network: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "action-chain".to_string(),
            module: "core".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            network: "testnet".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `AC_SERVICE_NAME`: Service name (default: action-chain)
    /// - `AC_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `AC_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `AC_JSON_LOGS`: Enable JSON logs (default: false, true in containers)
    /// - `AC_NETWORK`: Network name (default: testnet)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("AC_SERVICE_NAME")
                .unwrap_or_else(|_| "action-chain".to_string()),

            module: "core".to_string(),

            log_level: env::var("AC_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("AC_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            json_logs: env::var("AC_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),

            network: env::var("AC_NETWORK").unwrap_or_else(|_| "testnet".to_string()),
        }
    }

    /// Configuration for a named module, layered over the environment.
    pub fn for_module(module: &str) -> Self {
        Self {
            module: module.to_string(),
            ..Self::from_env()
        }
    }

    /// Service name qualified with the module.
    pub fn full_service_name(&self) -> String {
        if self.module == "core" {
            self.service_name.clone()
        } else {
            format!("{}-{}", self.service_name, self.module)
        }
    }
}
