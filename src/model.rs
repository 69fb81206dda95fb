//! Frontend-facing data shapes returned by every data source.

use serde::{Deserialize, Serialize};

/// A bus line identifier such as `"116"`.
pub type LineCode = String;

/// Default search radius for stop queries, in meters.
pub const DEFAULT_STOP_RADIUS_M: u32 = 1000;

/// A single vehicle position snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub line: LineCode,
    pub order: u32,
    pub latitude: f64,
    pub longitude: f64,
    /// Degrees in `[0, 360)`.
    pub heading: f64,
    /// km/h, never negative.
    pub speed: f64,
    pub destination: String,
    /// ISO-8601.
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subline: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: String,
    pub code: String,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub lines: Vec<LineCode>,
}

/// Location filter for stop queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopQuery {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_m: u32,
}

impl StopQuery {
    pub fn new(latitude: Option<f64>, longitude: Option<f64>, radius_m: Option<u32>) -> Self {
        Self {
            latitude,
            longitude,
            radius_m: radius_m.unwrap_or(DEFAULT_STOP_RADIUS_M),
        }
    }

    /// Both coordinates, when the caller supplied a full center point.
    pub fn center(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

impl Default for StopQuery {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}
