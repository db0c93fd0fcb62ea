//! Per-request timing observations

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One observation for a single request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// 1-based position of the request within its endpoint group
    pub sequence: u32,
    /// Wall-clock time from send to response
    pub duration: Duration,
    /// HTTP status code returned by the backend
    pub status_code: u16,
}

impl Measurement {
    pub fn new(sequence: u32, duration: Duration, status_code: u16) -> Self {
        Self {
            sequence,
            duration,
            status_code,
        }
    }

    /// Elapsed time in fractional seconds
    pub fn secs(&self) -> f64 {
        self.duration.as_secs_f64()
    }
}
