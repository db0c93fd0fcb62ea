//! Data models and structures for the latency probe

pub mod config;
pub mod endpoint;
pub mod measurement;

// Re-export main model types
pub use config::Config;
pub use endpoint::{ensure_unique_names, Endpoint, RequestPayload};
pub use measurement::Measurement;
