//! HTTP transport used by the probe runner
//!
//! The runner talks to backends through two small traits so tests can swap
//! the network out:
//! - [`Connector`] opens one session per probe run
//! - [`HttpTransport`] is that session; it posts a JSON payload and reports
//!   the response status
//!
//! [`ReqwestConnector`] is the production implementation.

use crate::{
    error::{AppError, Result},
    models::{Config, RequestPayload},
};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, CONNECTION, CONTENT_TYPE},
    Client,
};
use std::time::Duration;

/// An open HTTP session, shared by every request of one probe run
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST `payload` as JSON to `url` and return the response status code.
    ///
    /// Any status, including 4xx/5xx, is a successful return. Only
    /// transport-level failures are errors.
    async fn post_json(&self, url: &str, payload: &RequestPayload) -> Result<u16>;
}

/// Opens a fresh session for each probe run
pub trait Connector: Send + Sync {
    fn connect(&self) -> Result<Box<dyn HttpTransport>>;
}

/// Client settings for the reqwest-backed transport
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Total per-request timeout
    pub timeout: Duration,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout: crate::defaults::DEFAULT_TIMEOUT,
            user_agent: format!("{}/{}", crate::PKG_NAME, crate::VERSION),
        }
    }
}

impl From<&Config> for ClientSettings {
    fn from(config: &Config) -> Self {
        Self {
            timeout: config.timeout(),
            ..Self::default()
        }
    }
}

/// Builds one reqwest [`Client`] per probe run
#[derive(Debug, Clone, Default)]
pub struct ReqwestConnector {
    settings: ClientSettings,
}

impl ReqwestConnector {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Headers attached to every probe request
    pub fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        // Sent literally even though the client is reused across the run
        headers.insert(CONNECTION, HeaderValue::from_static("close"));
        headers
    }
}

impl Connector for ReqwestConnector {
    fn connect(&self) -> Result<Box<dyn HttpTransport>> {
        let client = Client::builder()
            .timeout(self.settings.timeout)
            .user_agent(self.settings.user_agent.as_str())
            .default_headers(Self::default_headers())
            .http1_only()
            .build()
            .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Box::new(ReqwestTransport { client }))
    }
}

/// Session backed by a single reqwest client
pub struct ReqwestTransport {
    client: Client,
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(&self, url: &str, payload: &RequestPayload) -> Result<u16> {
        let response = self.client
            .post(url)
            .json(payload)
            .send()
            .await?;

        let status_code = response.status().as_u16();

        // Drain the body so the timing covers the whole response; contents are ignored
        response.bytes().await?;

        Ok(status_code)
    }
}
