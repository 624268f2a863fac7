//! Core data types for the location filter

use serde::{Deserialize, Serialize};

/// A single raw location fix from a positioning provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Latitude in decimal degrees, [-90, 90]
    pub latitude: f64,
    /// Longitude in decimal degrees, [-180, 180]
    pub longitude: f64,
    /// Estimated radius of positional uncertainty in meters; smaller is better
    pub accuracy: f64,
    /// Milliseconds since the epoch
    pub timestamp: i64,
    /// Identifier of the subsystem that produced the fix, e.g. "gps" or "network"
    pub provider: String,
}

impl Point {
    /// Create a new point
    pub fn new(
        latitude: f64,
        longitude: f64,
        accuracy: f64,
        timestamp: i64,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            accuracy,
            timestamp,
            provider: provider.into(),
        }
    }
}

/// Outcome of evaluating one candidate fix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The candidate becomes the new confirmed point
    Accept,
    /// The candidate is discarded as noise
    Reject,
}

impl Decision {
    pub fn is_accept(&self) -> bool {
        matches!(self, Decision::Accept)
    }
}
