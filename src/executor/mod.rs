//! Probe execution
//!
//! [`ProbeRunner`] sends `iterations` sequential POSTs to each configured
//! endpoint, in configuration order, times every request and reduces each
//! endpoint's measurements to a [`Summary`]. One HTTP session is opened per
//! run and shared by all of its requests; it is dropped when the run ends,
//! whether the run succeeded or not.

use crate::{
    client::{Connector, HttpTransport},
    error::{AppError, Result},
    logging::Logger,
    models::{ensure_unique_names, Config, Endpoint, Measurement},
    stats::{format_secs, Summary},
};
use serde::{ser::SerializeMap, Serialize, Serializer};
use std::sync::Arc;
use tokio::time::Instant;
use uuid::Uuid;

/// Per-endpoint summaries of one run, in probe order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeReport {
    entries: Vec<(String, Summary)>,
}

impl ProbeReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a summary; the endpoint's position in the report is insertion order
    pub fn insert(&mut self, name: String, summary: Summary) {
        self.entries.push((name, summary));
    }

    pub fn get(&self, name: &str) -> Option<&Summary> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .map(|(_, summary)| summary)
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Summary)> {
        self.entries.iter().map(|(name, summary)| (name.as_str(), summary))
    }
}

impl Serialize for ProbeReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, summary) in &self.entries {
            map.serialize_entry(name, summary)?;
        }
        map.end()
    }
}

/// Sequential latency probe over a fixed list of endpoints
pub struct ProbeRunner {
    endpoints: Vec<Endpoint>,
    iterations: u32,
    connector: Arc<dyn Connector>,
    logger: Logger,
}

impl ProbeRunner {
    pub fn new(
        endpoints: Vec<Endpoint>,
        iterations: u32,
        connector: Arc<dyn Connector>,
        logger: Logger,
    ) -> Result<Self> {
        if endpoints.is_empty() {
            return Err(AppError::config("Probe runner needs at least one endpoint"));
        }
        if iterations == 0 {
            return Err(AppError::config("Probe runner needs at least one iteration per endpoint"));
        }
        ensure_unique_names(&endpoints)?;

        Ok(Self {
            endpoints,
            iterations,
            connector,
            logger,
        })
    }

    /// Build a runner from validated configuration
    pub fn from_config(config: &Config, connector: Arc<dyn Connector>, logger: Logger) -> Result<Self> {
        Self::new(config.create_endpoints()?, config.test_count, connector, logger)
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Run one full probe and summarize it.
    ///
    /// The first transport error aborts the run; nothing partial is returned.
    pub async fn run(&self) -> Result<ProbeReport> {
        let run_id = Uuid::new_v4().to_string();
        let started = Instant::now();

        self.logger.info(&format!(
            "Starting probe run: {} endpoint(s) x {} request(s)",
            self.endpoints.len(),
            self.iterations
        ))
            .correlation_id(&run_id)
            .field("endpoints", self.endpoints.iter().map(|e| e.name.as_str()).collect::<Vec<_>>())
            .field("iterations", self.iterations)
            .log()
            .await;

        let groups = match self.measure_all(&run_id).await {
            Ok(groups) => groups,
            Err(e) => {
                self.logger.error(&format!("Probe run aborted: {}", e))
                    .correlation_id(&run_id)
                    .error_info(&e)
                    .log()
                    .await;
                return Err(e);
            }
        };

        let mut report = ProbeReport::new();
        for (endpoint, measurements) in groups {
            report.insert(endpoint.name.clone(), Summary::from_measurements(&measurements)?);
        }

        for (name, summary) in report.iter() {
            self.logger.info(&format!(
                "{} - Min: {}, Max: {}, Avg: {}",
                name,
                summary.min(),
                summary.max(),
                summary.avg()
            ))
                .correlation_id(&run_id)
                .field("endpoint", name)
                .field("min_secs", summary.min_secs)
                .field("max_secs", summary.max_secs)
                .field("avg_secs", summary.avg_secs)
                .field("samples", summary.sample_count)
                .log()
                .await;
        }

        self.logger.info(&format!(
            "Probe run completed in {}",
            format_secs(started.elapsed().as_secs_f64())
        ))
            .correlation_id(&run_id)
            .log()
            .await;

        Ok(report)
    }

    /// Measure every endpoint in order over one shared session
    async fn measure_all(&self, run_id: &str) -> Result<Vec<(&Endpoint, Vec<Measurement>)>> {
        let session = self.connector.connect()?;

        let mut groups = Vec::with_capacity(self.endpoints.len());
        for endpoint in &self.endpoints {
            let measurements = self.measure_endpoint(session.as_ref(), endpoint, run_id).await?;
            groups.push((endpoint, measurements));
        }

        drop(session);
        Ok(groups)
    }

    /// Send `iterations` requests to one endpoint, strictly one after another
    async fn measure_endpoint(
        &self,
        transport: &dyn HttpTransport,
        endpoint: &Endpoint,
        run_id: &str,
    ) -> Result<Vec<Measurement>> {
        let mut measurements = Vec::with_capacity(self.iterations as usize);

        for sequence in 1..=self.iterations {
            let start = Instant::now();
            let status_code = transport.post_json(&endpoint.url, &endpoint.payload).await?;
            let measurement = Measurement::new(sequence, start.elapsed(), status_code);

            self.logger.info(&format!(
                "[{} - #{}] Status: {}, Time: {:.3}s",
                endpoint.name,
                sequence,
                status_code,
                measurement.secs()
            ))
                .correlation_id(run_id)
                .field("endpoint", &endpoint.name)
                .field("sequence", sequence)
                .field("status", status_code)
                .field("duration_secs", measurement.secs())
                .log()
                .await;

            measurements.push(measurement);
        }

        Ok(measurements)
    }
}
