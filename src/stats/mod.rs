//! Summary statistics over a run's measurements

use crate::{
    error::{AppError, Result},
    models::Measurement,
};
use serde::{Serialize, Serializer, ser::SerializeStruct};

/// Min/max/mean latency for one endpoint
///
/// Serializes as `{"min": "0.123 sec", "max": "...", "avg": "..."}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Shortest observed duration in seconds
    pub min_secs: f64,
    /// Longest observed duration in seconds
    pub max_secs: f64,
    /// Arithmetic mean duration in seconds
    pub avg_secs: f64,
    /// Number of measurements the summary was built from
    pub sample_count: usize,
}

impl Summary {
    /// Compute the summary of a non-empty measurement sequence
    pub fn from_measurements(measurements: &[Measurement]) -> Result<Self> {
        if measurements.is_empty() {
            return Err(AppError::statistics("Cannot summarize an empty measurement sequence"));
        }

        let times: Vec<f64> = measurements.iter().map(Measurement::secs).collect();
        let min = times.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = times.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let avg = times.iter().sum::<f64>() / times.len() as f64;

        Ok(Self {
            min_secs: min,
            max_secs: max,
            // Float summation can land a hair outside [min, max] for equal samples
            avg_secs: avg.clamp(min, max),
            sample_count: times.len(),
        })
    }

    pub fn min(&self) -> String {
        format_secs(self.min_secs)
    }

    pub fn max(&self) -> String {
        format_secs(self.max_secs)
    }

    pub fn avg(&self) -> String {
        format_secs(self.avg_secs)
    }
}

impl Serialize for Summary {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Summary", 3)?;
        state.serialize_field("min", &self.min())?;
        state.serialize_field("max", &self.max())?;
        state.serialize_field("avg", &self.avg())?;
        state.end()
    }
}

/// Render seconds as `"X.XXX sec"`
pub fn format_secs(secs: f64) -> String {
    format!("{:.3} sec", secs)
}
