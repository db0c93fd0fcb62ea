//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    models::Config,
    error::Result,
    config::env::EnvManager,
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        // .env only fills variables the process environment does not already set
        EnvManager::load_env_file()?;

        let mut config = Config::default();
        config.merge_from_env()?;
        self.finish(config)
    }

    /// Build the configuration from defaults, `lookup` and the CLI, then validate it
    pub fn parse_with_vars<F>(&self, lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        config.merge_from_vars(lookup)?;
        self.finish(config)
    }

    /// Apply the CLI on top of the merged variables, then validate
    fn finish(&self, mut config: Config) -> Result<Config> {
        self.apply_cli_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        if let Some(ref bind) = self.cli.bind {
            config.bind_address = bind.clone();
        }

        if !self.cli.endpoints.is_empty() {
            config.endpoints = self.cli.endpoints.clone();
        }

        if let Some(count) = self.cli.count {
            config.test_count = count;
        }

        if let Some(timeout) = self.cli.timeout {
            config.timeout_seconds = timeout;
        }

        if let Some(ref tool_name) = self.cli.tool_name {
            config.tool_name = tool_name.clone();
        }

        if let Some(ref company_id) = self.cli.company_id {
            config.company_id = company_id.clone();
        }

        if let Some(format) = self.cli.log_format {
            config.log_format = format;
        }

        if self.cli.no_color {
            config.enable_color = false;
        }

        // CLI-only
        config.debug = self.cli.debug;
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Bind Address: {}", config.bind_address));
    summary.push(format!("Endpoints: {}", config.endpoints.join(", ")));
    summary.push(format!("Requests per Endpoint: {}", config.test_count));
    summary.push(format!("Timeout: {}s", config.timeout_seconds));
    summary.push(format!("Payload: name={}, company_id={}", config.tool_name, config.company_id));
    summary.push(format!("Log Format: {}", config.log_format.as_str()));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}
