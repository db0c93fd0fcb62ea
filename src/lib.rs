//! Backend Latency Probe
//!
//! A small HTTP service that compares request latency across backend
//! endpoints. Each `GET /` sends a fixed number of identical POST requests to
//! every configured endpoint, one after another, and answers with the min,
//! max and mean latency observed per endpoint.

pub mod cli;
pub mod config;
pub mod client;
pub mod error;
pub mod executor;
pub mod logging;
pub mod models;
pub mod server;
pub mod stats;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use executor::{ProbeReport, ProbeRunner};
pub use logging::{Logger, LogFormat, LogSink};
pub use models::{Config, Endpoint, Measurement, RequestPayload};
pub use stats::Summary;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8000";
    pub const DEFAULT_TEST_COUNT: u32 = 10;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
    pub const DEFAULT_ENDPOINTS: &[(&str, &str)] = &[
        ("K8S", "https://prod-tools.kodif.io/tools/internal/execute"),
        ("EBS", "https://tools.kodif.io/tools/internal/execute"),
    ];
    pub const DEFAULT_TOOL_NAME: &str = "zendesk_list_all_articles";
    pub const DEFAULT_COMPANY_ID: &str = "2438";
    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
