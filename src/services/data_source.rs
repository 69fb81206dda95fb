//! Trait and types shared by every data source.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::GatewayError;
use crate::model::{LineCode, Stop, StopQuery, Vehicle};
use crate::stats::StatsSnapshot;

/// Where query results come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Live,
    Simulation,
}

/// Whether the upstream API can currently be reached with our credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpstreamStatus {
    Connected,
    Unavailable,
    /// Simulation mode never contacts upstream.
    Simulated,
}

/// Answers the gateway's logical queries.
#[async_trait]
pub trait DataSource: Send + Sync {
    fn mode(&self) -> Mode;

    /// Active vehicles, optionally restricted to one line.
    async fn vehicles(&self, line: Option<&str>) -> Result<Vec<Vehicle>, GatewayError>;

    /// Distinct line codes, sorted.
    async fn lines(&self) -> Result<Vec<LineCode>, GatewayError>;

    async fn stops(&self, query: &StopQuery) -> Result<Vec<Stop>, GatewayError>;

    async fn upstream_status(&self) -> UpstreamStatus;

    /// Normalization drop counters, for sources that normalize.
    fn normalization(&self) -> Option<StatsSnapshot> {
        None
    }
}
