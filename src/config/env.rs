//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file from the working directory if it exists.
    ///
    /// Returns whether a file was loaded. Variables already present in the
    /// process environment are not overwritten.
    pub fn load_env_file() -> Result<bool> {
        Self::load_env_file_from(Path::new(".env"))
    }

    /// Load a specific env file if it exists
    pub fn load_env_file_from(path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }

        dotenv::from_path(path)
            .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;

        Ok(true)
    }

    /// Supported environment variables with descriptions and examples
    pub fn supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("PROBE_BIND", "Address the HTTP server listens on", "127.0.0.1:8000"),
            ("PROBE_ENDPOINTS", "Comma-separated NAME=URL endpoints, probed in order", "K8S=https://a.example/run,EBS=https://b.example/run"),
            ("PROBE_COUNT", "Requests per endpoint per run (1-100)", "10"),
            ("PROBE_TIMEOUT_SECONDS", "Request timeout in seconds (1-300)", "5"),
            ("PROBE_TOOL_NAME", "`name` field of the request payload", "zendesk_list_all_articles"),
            ("PROBE_COMPANY_ID", "`company_id` field of the request payload", "2438"),
            ("PROBE_LOG_FORMAT", "Log format: console, json or compact", "json"),
            ("PROBE_ENABLE_COLOR", "Enable colored output", "true"),
        ]
    }

    /// Text listing the supported variables, shown after `--help`
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Environment variables (also read from .env):\n");

        for (var, description, example) in Self::supported_env_vars() {
            help.push_str(&format!("  {:<22} {} (e.g. {})\n", var, description, example));
        }

        help.push_str("\nPrecedence: command-line flags > environment > .env > defaults\n");
        help
    }
}
