//! Configuration data model and validation

use crate::error::{AppError, Result};
use crate::logging::LogFormat;
use crate::models::{ensure_unique_names, Endpoint, RequestPayload};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address the HTTP server listens on
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Endpoints to probe, as `NAME=URL`, in probe order
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<String>,

    /// Number of requests sent to each endpoint per run
    #[serde(default = "default_test_count")]
    pub test_count: u32,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_seconds: u64,

    /// `name` field of the request payload
    #[serde(default = "default_tool_name")]
    pub tool_name: String,

    /// `company_id` field of the request payload
    #[serde(default = "default_company_id")]
    pub company_id: String,

    /// Log line format
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable debug logging
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            endpoints: default_endpoints(),
            test_count: default_test_count(),
            timeout_seconds: default_timeout_secs(),
            tool_name: default_tool_name(),
            company_id: default_company_id(),
            log_format: default_log_format(),
            enable_color: default_enable_color(),
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Payload posted to every endpoint
    pub fn payload(&self) -> RequestPayload {
        RequestPayload::new(self.tool_name.clone(), self.company_id.clone())
    }

    /// Parse the listen address
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.bind_address
            .parse()
            .map_err(|e| AppError::config(format!("Invalid bind address '{}': {}", self.bind_address, e)))
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;

        let endpoints = self.create_endpoints()?;
        if endpoints.is_empty() {
            return Err(AppError::config("At least one endpoint must be configured"));
        }

        ensure_unique_names(&endpoints)?;

        if self.tool_name.trim().is_empty() {
            return Err(AppError::config("Tool name cannot be empty"));
        }

        if self.test_count == 0 {
            return Err(AppError::config("Test count must be greater than 0"));
        }

        if self.test_count > 100 {
            return Err(AppError::config("Test count cannot exceed 100"));
        }

        if self.timeout_seconds == 0 {
            return Err(AppError::config("Timeout must be greater than 0"));
        }

        if self.timeout_seconds > 300 {
            return Err(AppError::config("Timeout cannot exceed 300 seconds"));
        }

        Ok(())
    }

    /// Build the endpoint list, each carrying the configured payload
    pub fn create_endpoints(&self) -> Result<Vec<Endpoint>> {
        let payload = self.payload();

        self.endpoints
            .iter()
            .map(|spec| {
                spec.parse::<Endpoint>()
                    .map(|endpoint| endpoint.with_payload(payload.clone()))
                    .map_err(|e| AppError::config(format!("Failed to parse endpoint '{}': {}", spec, e)))
            })
            .collect()
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        self.merge_from_vars(|key| std::env::var(key).ok())
    }

    /// Merge variables looked up through `lookup` into this configuration
    pub fn merge_from_vars<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("PROBE_BIND") {
            self.bind_address = bind.trim().to_string();
        }

        if let Some(endpoints) = lookup("PROBE_ENDPOINTS") {
            self.endpoints = endpoints
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Some(test_count) = lookup("PROBE_COUNT") {
            self.test_count = test_count.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid PROBE_COUNT value '{}': {}", test_count, e)))?;
        }

        if let Some(timeout) = lookup("PROBE_TIMEOUT_SECONDS") {
            self.timeout_seconds = timeout.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid PROBE_TIMEOUT_SECONDS value '{}': {}", timeout, e)))?;
        }

        if let Some(tool_name) = lookup("PROBE_TOOL_NAME") {
            self.tool_name = tool_name;
        }

        if let Some(company_id) = lookup("PROBE_COMPANY_ID") {
            self.company_id = company_id;
        }

        if let Some(format) = lookup("PROBE_LOG_FORMAT") {
            self.log_format = format.parse()
                .map_err(|e| AppError::config(format!("Invalid PROBE_LOG_FORMAT value: {}", e)))?;
        }

        if let Some(enable_color) = lookup("PROBE_ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid PROBE_ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_bind_address() -> String {
    crate::defaults::DEFAULT_BIND_ADDRESS.to_string()
}

fn default_endpoints() -> Vec<String> {
    crate::defaults::DEFAULT_ENDPOINTS
        .iter()
        .map(|(name, url)| format!("{}={}", name, url))
        .collect()
}

fn default_test_count() -> u32 {
    crate::defaults::DEFAULT_TEST_COUNT
}

fn default_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_TIMEOUT.as_secs()
}

fn default_tool_name() -> String {
    crate::defaults::DEFAULT_TOOL_NAME.to_string()
}

fn default_company_id() -> String {
    crate::defaults::DEFAULT_COMPANY_ID.to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Console
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
