use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing::{error, info, warn};

use super::data_source::{DataSource, Mode, UpstreamStatus};
use crate::error::GatewayError;
use crate::fetch::HttpClient;
use crate::infra::montevideo::{Resource, UpstreamClient};
use crate::model::{LineCode, Stop, StopQuery, Vehicle};
use crate::normalize::{normalize_lines, normalize_stops, normalize_vehicles};
use crate::stats::{NormalizationStats, StatsSnapshot};

/// Fetches from the upstream API and normalizes the payloads.
pub struct LiveSource<C> {
    upstream: UpstreamClient<C>,
    stats: NormalizationStats,
}

impl<C: HttpClient> LiveSource<C> {
    pub fn new(upstream: UpstreamClient<C>) -> Self {
        Self {
            upstream,
            stats: NormalizationStats::default(),
        }
    }
}

/// Upstream list endpoints must answer with a JSON array.
fn records(payload: &Value, resource: Resource) -> Result<&[Value], GatewayError> {
    payload.as_array().map(Vec::as_slice).ok_or_else(|| {
        error!(resource = %resource, "Expected a JSON array from API");
        GatewayError::MalformedResponse
    })
}

#[async_trait]
impl<C: HttpClient> DataSource for LiveSource<C> {
    fn mode(&self) -> Mode {
        Mode::Live
    }

    async fn vehicles(&self, line: Option<&str>) -> Result<Vec<Vehicle>, GatewayError> {
        let mut query = Vec::new();
        if let Some(line) = line.filter(|l| !l.is_empty()) {
            info!(line, "Filtering buses by line");
            query.push(("lines", line.to_string()));
        }

        let payload = self.upstream.request(Resource::Buses, &query).await?;
        let batch = normalize_vehicles(records(&payload, Resource::Buses)?, Utc::now());
        self.stats.record_vehicles(&batch);

        if batch.dropped > 0 {
            warn!(dropped = batch.dropped, "Skipped buses without valid coordinates");
        }
        info!(
            received = batch.received,
            formatted = batch.items.len(),
            "Formatted buses for frontend"
        );
        Ok(batch.items)
    }

    async fn lines(&self) -> Result<Vec<LineCode>, GatewayError> {
        let payload = self.upstream.request(Resource::LineVariants, &[]).await?;
        let lines = normalize_lines(records(&payload, Resource::LineVariants)?);
        info!(count = lines.len(), "Extracted unique lines");
        Ok(lines)
    }

    async fn stops(&self, query: &StopQuery) -> Result<Vec<Stop>, GatewayError> {
        let mut params = Vec::new();
        if let Some((lat, lng)) = query.center() {
            info!(lat, lng, radius = query.radius_m, "Querying stops near point");
            params.push(("lat", lat.to_string()));
            params.push(("lng", lng.to_string()));
            params.push(("radius", query.radius_m.to_string()));
        }

        let payload = self.upstream.request(Resource::BusStops, &params).await?;
        let batch = normalize_stops(records(&payload, Resource::BusStops)?);
        self.stats.record_stops(&batch);

        if batch.dropped > 0 {
            warn!(dropped = batch.dropped, "Skipped stops without valid coordinates");
        }
        info!(
            received = batch.received,
            formatted = batch.items.len(),
            "Formatted stops for frontend"
        );
        Ok(batch.items)
    }

    async fn upstream_status(&self) -> UpstreamStatus {
        match self.upstream.tokens().get_token().await {
            Ok(_) => UpstreamStatus::Connected,
            Err(e) => {
                warn!(error = %e, "Upstream API unavailable");
                UpstreamStatus::Unavailable
            }
        }
    }

    fn normalization(&self) -> Option<StatsSnapshot> {
        Some(self.stats.snapshot())
    }
}
