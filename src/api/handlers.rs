use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use std::str::FromStr;

use crate::error::GatewayError;
use crate::model::{LineCode, Stop, StopQuery, Vehicle};
use crate::services::{GatewayService, GatewayStatus};

#[derive(Debug, Default, Deserialize)]
pub struct BusesParams {
    pub line: Option<String>,
}

/// Raw stop-search parameters. Values that don't parse are treated as
/// absent rather than rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct StopsParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius: Option<String>,
}

fn lenient<T: FromStr>(raw: Option<&str>) -> Option<T> {
    raw.and_then(|v| v.trim().parse().ok())
}

impl StopsParams {
    pub fn to_query(&self) -> StopQuery {
        let coord = |raw: &Option<String>| lenient::<f64>(raw.as_deref()).filter(|v| v.is_finite());
        StopQuery::new(
            coord(&self.lat),
            coord(&self.lng),
            lenient(self.radius.as_deref()),
        )
    }
}

/// Active buses, optionally filtered by `?line=`.
pub async fn get_buses(
    State(gateway): State<GatewayService>,
    Query(params): Query<BusesParams>,
) -> Result<Json<Vec<Vehicle>>, GatewayError> {
    let buses = gateway.buses(params.line.as_deref()).await?;
    Ok(Json(buses))
}

pub async fn get_lines(
    State(gateway): State<GatewayService>,
) -> Result<Json<Vec<LineCode>>, GatewayError> {
    Ok(Json(gateway.lines().await?))
}

/// Stops near `?lat=&lng=` within `?radius=` meters (default 1000).
pub async fn get_stops(
    State(gateway): State<GatewayService>,
    Query(params): Query<StopsParams>,
) -> Result<Json<Vec<Stop>>, GatewayError> {
    Ok(Json(gateway.stops(params.to_query()).await?))
}

pub async fn get_status(State(gateway): State<GatewayService>) -> Json<GatewayStatus> {
    Json(gateway.status().await)
}
