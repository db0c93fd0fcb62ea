//! Command-line interface

use clap::{ArgAction, Parser};

use crate::logging::LogFormat;
use crate::models::Endpoint;

/// Backend Latency Probe - compare request latency across backend endpoints
///
/// Serves `GET /`; every call posts the configured payload N times to each
/// endpoint in turn and answers with min/max/avg latency per endpoint.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "latency-probe")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Address to listen on (e.g. 127.0.0.1:8000)
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Endpoint to probe as NAME=URL (repeatable; replaces the defaults)
    #[arg(short, long = "endpoint", value_name = "NAME=URL", action = ArgAction::Append, value_parser = parse_endpoint)]
    pub endpoints: Vec<String>,

    /// Number of requests per endpoint per run
    #[arg(short, long)]
    pub count: Option<u32>,

    /// Request timeout in seconds
    #[arg(short, long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// `name` field of the request payload
    #[arg(long)]
    pub tool_name: Option<String>,

    /// `company_id` field of the request payload
    #[arg(long)]
    pub company_id: Option<String>,

    /// Log line format (console, json, compact)
    #[arg(long, value_name = "FORMAT", value_parser = parse_log_format)]
    pub log_format: Option<LogFormat>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

/// Validate `NAME=URL` at parse time, keeping the raw string for the config layer
fn parse_endpoint(s: &str) -> Result<String, String> {
    s.parse::<Endpoint>()
        .map(|_| s.trim().to_string())
        .map_err(|e| e.to_string())
}

fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    s.parse::<LogFormat>().map_err(|e| e.to_string())
}
