//! Probe targets and the payload posted to them

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// JSON body posted to every endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestPayload {
    /// Tool to execute on the backend
    pub name: String,
    /// Company the tool runs for
    pub company_id: String,
    /// Execution context, always sent as an empty object
    #[serde(default)]
    pub context: serde_json::Map<String, serde_json::Value>,
}

impl RequestPayload {
    pub fn new<N: Into<String>, C: Into<String>>(name: N, company_id: C) -> Self {
        Self {
            name: name.into(),
            company_id: company_id.into(),
            context: serde_json::Map::new(),
        }
    }
}

impl Default for RequestPayload {
    fn default() -> Self {
        Self::new(crate::defaults::DEFAULT_TOOL_NAME, crate::defaults::DEFAULT_COMPANY_ID)
    }
}

/// A named backend URL under comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Label used as the key in the probe report
    pub name: String,
    /// Absolute http(s) URL the probe posts to
    pub url: String,
    /// Body sent with every request
    pub payload: RequestPayload,
}

impl Endpoint {
    pub fn new<N: Into<String>, U: Into<String>>(name: N, url: U, payload: RequestPayload) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            payload,
        }
    }

    /// Replace the payload sent to this endpoint
    pub fn with_payload(mut self, payload: RequestPayload) -> Self {
        self.payload = payload;
        self
    }

    /// Check the name is usable as a report key and the URL is http(s)
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation(format!("Endpoint name cannot be empty (url: {})", self.url)));
        }

        let parsed = url::Url::parse(&self.url)
            .map_err(|e| AppError::validation(format!("Invalid endpoint URL '{}': {}", self.url, e)))?;

        match parsed.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(AppError::validation(format!(
                    "Endpoint '{}' uses unsupported scheme '{}'",
                    self.name, scheme
                )))
            }
        }

        if parsed.host().is_none() {
            return Err(AppError::validation(format!("Endpoint '{}' URL must have a host", self.name)));
        }

        Ok(())
    }
}

/// Reject endpoint lists where two entries share a name; names key the report
pub fn ensure_unique_names(endpoints: &[Endpoint]) -> Result<()> {
    let mut seen = HashSet::new();
    for endpoint in endpoints {
        if !seen.insert(endpoint.name.as_str()) {
            return Err(AppError::validation(format!("Duplicate endpoint name: {}", endpoint.name)));
        }
    }
    Ok(())
}

/// Parses `NAME=URL`, the form used on the command line and in `PROBE_ENDPOINTS`
impl FromStr for Endpoint {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let (name, url) = s.split_once('=').ok_or_else(|| {
            AppError::parse(format!("Invalid endpoint '{}': expected NAME=URL", s))
        })?;

        let endpoint = Endpoint::new(name.trim(), url.trim(), RequestPayload::default());
        endpoint.validate()?;
        Ok(endpoint)
    }
}
