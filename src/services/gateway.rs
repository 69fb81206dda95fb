use anyhow::{Context, Result};
use reqwest::Url;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use super::data_source::{DataSource, Mode, UpstreamStatus};
use super::live::LiveSource;
use super::simulated::SimulatedSource;
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::fetch::BasicClient;
use crate::infra::montevideo::{TokenManager, UpstreamClient};
use crate::model::{LineCode, Stop, StopQuery, Vehicle};
use crate::stats::StatsSnapshot;

/// Report served by the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GatewayStatus {
    pub mode: Mode,
    pub upstream: UpstreamStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalization: Option<StatsSnapshot>,
}

/// Entry point for the HTTP layer and the CLI.
///
/// Cheap to clone; all clones share the same data source (and therefore the
/// same cached token).
#[derive(Clone)]
pub struct GatewayService {
    source: Arc<dyn DataSource>,
}

impl GatewayService {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self { source }
    }

    pub fn simulated() -> Self {
        Self::new(Arc::new(SimulatedSource::default()))
    }

    /// Selects the data source once, from configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        if config.simulation_mode {
            info!("Simulation mode is enabled");
            return Ok(Self::simulated());
        }
        info!("Simulation mode is disabled");

        let credentials = config
            .credentials
            .clone()
            .context("live mode requires upstream credentials")?;
        let auth_url = config
            .auth_url
            .parse::<Url>()
            .with_context(|| format!("invalid auth URL '{}'", config.auth_url))?;
        let client = BasicClient::new(config.request_timeout, config.connect_timeout)
            .context("failed to build HTTP client")?;

        let tokens = Arc::new(TokenManager::new(client.clone(), auth_url, credentials));
        let upstream = UpstreamClient::new(client, config.api_base_url.clone(), tokens);
        Ok(Self::new(Arc::new(LiveSource::new(upstream))))
    }

    pub fn mode(&self) -> Mode {
        self.source.mode()
    }

    #[tracing::instrument(skip(self))]
    pub async fn buses(&self, line: Option<&str>) -> Result<Vec<Vehicle>, GatewayError> {
        self.source
            .vehicles(line)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to get bus data"))
    }

    #[tracing::instrument(skip(self))]
    pub async fn lines(&self) -> Result<Vec<LineCode>, GatewayError> {
        self.source
            .lines()
            .await
            .inspect_err(|e| error!(error = %e, "Failed to get line data"))
    }

    #[tracing::instrument(skip(self))]
    pub async fn stops(&self, query: StopQuery) -> Result<Vec<Stop>, GatewayError> {
        self.source
            .stops(&query)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to get stops data"))
    }

    pub async fn status(&self) -> GatewayStatus {
        GatewayStatus {
            mode: self.source.mode(),
            upstream: self.source.upstream_status().await,
            normalization: self.source.normalization(),
        }
    }
}
