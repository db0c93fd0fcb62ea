//! Scripted in-process transport shared by unit tests

use crate::{
    client::{Connector, HttpTransport},
    error::{AppError, Result},
    models::RequestPayload,
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the mock does for one call
#[derive(Debug, Clone)]
pub enum Reply {
    /// Wait `delay`, then answer with `status`
    Status { status: u16, delay: Duration },
    /// Fail like a refused connection
    ConnectionRefused,
}

impl Reply {
    pub fn ok() -> Self {
        Reply::Status { status: 200, delay: Duration::ZERO }
    }

    pub fn status(status: u16) -> Self {
        Reply::Status { status, delay: Duration::ZERO }
    }

    pub fn after(delay: Duration) -> Self {
        Reply::Status { status: 200, delay }
    }
}

/// Transport event, in the order it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Connect,
    Start(String),
    End(String),
    Closed,
}

type Script = dyn Fn(&str, usize) -> Reply + Send + Sync;

/// Connector whose sessions answer from a script `(url, call index) -> Reply`
#[derive(Clone)]
pub struct ScriptedConnector {
    script: Arc<Script>,
    events: Arc<Mutex<Vec<Event>>>,
    payloads: Arc<Mutex<Vec<RequestPayload>>>,
}

impl ScriptedConnector {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(&str, usize) -> Reply + Send + Sync + 'static,
    {
        Self {
            script: Arc::new(script),
            events: Arc::new(Mutex::new(Vec::new())),
            payloads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every call answers 200 immediately
    pub fn always_ok() -> Self {
        Self::new(|_, _| Reply::ok())
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn payloads(&self) -> Vec<RequestPayload> {
        self.payloads.lock().unwrap().clone()
    }

    /// URLs in the order requests were started
    pub fn started_urls(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Start(url) => Some(url),
                _ => None,
            })
            .collect()
    }
}

impl Connector for ScriptedConnector {
    fn connect(&self) -> Result<Box<dyn HttpTransport>> {
        self.events.lock().unwrap().push(Event::Connect);
        Ok(Box::new(ScriptedSession {
            connector: self.clone(),
            calls: Mutex::new(0),
        }))
    }
}

struct ScriptedSession {
    connector: ScriptedConnector,
    calls: Mutex<usize>,
}

#[async_trait]
impl HttpTransport for ScriptedSession {
    async fn post_json(&self, url: &str, payload: &RequestPayload) -> Result<u16> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            let index = *calls;
            *calls += 1;
            index
        };

        self.connector.events.lock().unwrap().push(Event::Start(url.to_string()));
        self.connector.payloads.lock().unwrap().push(payload.clone());

        let reply = (self.connector.script)(url, index);
        let result = match reply {
            Reply::Status { status, delay } => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(status)
            }
            Reply::ConnectionRefused => Err(AppError::network(format!("error sending request for url ({}): connection refused", url))),
        };

        self.connector.events.lock().unwrap().push(Event::End(url.to_string()));
        result
    }
}

impl Drop for ScriptedSession {
    fn drop(&mut self) {
        if let Ok(mut events) = self.connector.events.lock() {
            events.push(Event::Closed);
        }
    }
}
