//! Deterministic synthetic transit data.
//!
//! Every call derives its random stream from the current 15-second time
//! bucket, so repeated polls within a bucket see the same world and the
//! world shifts when the bucket advances. Nothing is stored between calls.

pub mod catalog;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::model::{DEFAULT_STOP_RADIUS_M, LineCode, Stop, StopQuery, Vehicle};
use catalog::{
    BUCKET_SECS, CITY_CENTER, LINE_CATALOG, METERS_PER_DEGREE, SAMPLED_LINES, STREETS, TERMINALS,
    VEHICLE_JITTER_DEG,
};

const VEHICLE_STREAM: u64 = 0;
const STOP_STREAM: u64 = 1;

/// Index of the time bucket containing `now`.
pub fn time_bucket(now: DateTime<Utc>) -> i64 {
    now.timestamp().div_euclid(BUCKET_SECS)
}

#[derive(Debug, Clone, Copy)]
pub struct SimulationEngine {
    center: (f64, f64),
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new(CITY_CENTER)
    }
}

impl SimulationEngine {
    pub fn new(center: (f64, f64)) -> Self {
        Self { center }
    }

    pub fn simulate_vehicles(&self, line_filter: Option<&str>) -> Vec<Vehicle> {
        self.vehicles_at(Utc::now(), line_filter)
    }

    pub fn simulate_stops(&self, query: &StopQuery) -> Vec<Stop> {
        self.stops_at(Utc::now(), query)
    }

    pub fn simulate_lines(&self) -> Vec<LineCode> {
        LINE_CATALOG.iter().map(|l| l.to_string()).collect()
    }

    /// Vehicles for the bucket containing `now`.
    ///
    /// Without a filter, 10 distinct catalog lines are sampled; each line
    /// gets 3 to 8 vehicles scattered around the city center.
    pub fn vehicles_at(&self, now: DateTime<Utc>, line_filter: Option<&str>) -> Vec<Vehicle> {
        let bucket = time_bucket(now);
        let mut rng = bucket_rng(bucket, VEHICLE_STREAM);
        let timestamp = bucket_start(bucket);

        let lines: Vec<&str> = match line_filter.filter(|l| !l.is_empty()) {
            Some(line) => vec![line],
            None => LINE_CATALOG
                .choose_multiple(&mut rng, SAMPLED_LINES)
                .copied()
                .collect(),
        };

        let mut vehicles = Vec::new();
        for line in lines {
            let count: u32 = rng.gen_range(3..=8);
            for i in 1..=count {
                let latitude = self.center.0 + (rng.r#gen::<f64>() - 0.5) * 2.0 * VEHICLE_JITTER_DEG;
                let longitude = self.center.1 + (rng.r#gen::<f64>() - 0.5) * 2.0 * VEHICLE_JITTER_DEG;
                let heading: u32 = rng.gen_range(0..=359);
                let speed: u32 = rng.gen_range(0..=45);
                let terminal = TERMINALS.choose(&mut rng).copied().unwrap_or(TERMINALS[0]);

                vehicles.push(Vehicle {
                    id: format!("{line}-{i}"),
                    line: line.to_string(),
                    order: i,
                    latitude,
                    longitude,
                    heading: f64::from(heading),
                    speed: f64::from(speed),
                    destination: format!("Terminal {terminal}"),
                    timestamp: timestamp.clone(),
                    company: None,
                    subline: None,
                });
            }
        }
        vehicles
    }

    /// 10 to 20 stops within `query.radius_m` of the query center (or the
    /// city center when no full center is given).
    pub fn stops_at(&self, now: DateTime<Utc>, query: &StopQuery) -> Vec<Stop> {
        let mut rng = bucket_rng(time_bucket(now), STOP_STREAM);

        let (latitude, longitude) = query.center().unwrap_or(self.center);
        let radius = match query.radius_m {
            0 => DEFAULT_STOP_RADIUS_M,
            r => r,
        };
        let (lat_span, lng_span) = radius_to_degrees(f64::from(radius), latitude);

        let count: usize = rng.gen_range(10..=20);
        (0..count)
            .map(|i| {
                let lat_offset = (rng.r#gen::<f64>() - 0.5) * 2.0 * lat_span;
                let lng_offset = (rng.r#gen::<f64>() - 0.5) * 2.0 * lng_span;

                let served = rng.gen_range(2..=5);
                let lines = LINE_CATALOG
                    .choose_multiple(&mut rng, served)
                    .map(|l| l.to_string())
                    .collect();
                let street = STREETS.choose(&mut rng).copied().unwrap_or(STREETS[0]);

                Stop {
                    id: format!("stop-{}", i + 1),
                    code: format!("P{}", 1000 + i),
                    name: format!("Parada #{}", i + 1),
                    address: format!("Calle {street} {}", 1000 + i * 10),
                    latitude: latitude + lat_offset,
                    longitude: longitude + lng_offset,
                    lines,
                }
            })
            .collect()
    }
}

/// Converts a radius in meters into `(latitude, longitude)` degree spans
/// around `latitude` using a flat-Earth approximation.
pub fn radius_to_degrees(radius_m: f64, latitude: f64) -> (f64, f64) {
    let lat_span = radius_m / METERS_PER_DEGREE;
    let lng_span = radius_m / (METERS_PER_DEGREE * latitude.to_radians().cos());
    (lat_span, lng_span)
}

fn bucket_rng(bucket: i64, stream: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(bucket as u64);
    rng.set_stream(stream);
    rng
}

fn bucket_start(bucket: i64) -> String {
    Utc.timestamp_opt(bucket * BUCKET_SECS, 0)
        .single()
        .unwrap_or_else(Utc::now)
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    // 1_700_000_010 is the first second of its bucket.
    fn instant(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_010 + secs, 0).unwrap()
    }

    #[test]
    fn test_time_bucket_boundaries() {
        assert_eq!(time_bucket(instant(0)), time_bucket(instant(14)));
        assert_ne!(time_bucket(instant(14)), time_bucket(instant(15)));
    }

    #[test]
    fn test_same_bucket_same_vehicles() {
        let engine = SimulationEngine::default();
        assert_eq!(
            engine.vehicles_at(instant(0), None),
            engine.vehicles_at(instant(14), None)
        );
    }

    #[test]
    fn test_next_bucket_moves_vehicles() {
        let engine = SimulationEngine::default();
        assert_ne!(
            engine.vehicles_at(instant(0), None),
            engine.vehicles_at(instant(15), None)
        );
    }

    #[test]
    fn test_unfiltered_vehicles_cover_ten_catalog_lines() {
        let engine = SimulationEngine::default();
        let vehicles = engine.vehicles_at(instant(3), None);

        let lines: HashSet<&str> = vehicles.iter().map(|v| v.line.as_str()).collect();
        assert_eq!(lines.len(), SAMPLED_LINES);
        assert!(lines.iter().all(|l| LINE_CATALOG.contains(l)));
        assert!((30..=80).contains(&vehicles.len()));

        for v in &vehicles {
            assert!((v.latitude - CITY_CENTER.0).abs() <= VEHICLE_JITTER_DEG);
            assert!((v.longitude - CITY_CENTER.1).abs() <= VEHICLE_JITTER_DEG);
            assert!((0.0..360.0).contains(&v.heading));
            assert!((0.0..=45.0).contains(&v.speed));
            let terminal = v.destination.strip_prefix("Terminal ").unwrap();
            assert!(TERMINALS.contains(&terminal));
            assert_eq!(v.id, format!("{}-{}", v.line, v.order));
        }
    }

    #[test]
    fn test_line_filter_limits_vehicles() {
        let engine = SimulationEngine::default();
        let vehicles = engine.vehicles_at(instant(3), Some("116"));
        assert!((3..=8).contains(&vehicles.len()));
        assert!(vehicles.iter().all(|v| v.line == "116"));
        assert_eq!(vehicles[0].order, 1);
    }

    #[test]
    fn test_empty_filter_means_no_filter() {
        let engine = SimulationEngine::default();
        assert_eq!(
            engine.vehicles_at(instant(3), Some("")),
            engine.vehicles_at(instant(3), None)
        );
    }

    #[test]
    fn test_stops_shape() {
        let engine = SimulationEngine::default();
        let stops = engine.stops_at(instant(5), &StopQuery::default());
        assert!((10..=20).contains(&stops.len()));

        for (i, stop) in stops.iter().enumerate() {
            assert_eq!(stop.code, format!("P{}", 1000 + i));
            assert!((2..=5).contains(&stop.lines.len()));
            let distinct: HashSet<_> = stop.lines.iter().collect();
            assert_eq!(distinct.len(), stop.lines.len());
            assert!(stop.address.starts_with("Calle "));
        }
    }

    #[test]
    fn test_stop_radius_at_equator() {
        let engine = SimulationEngine::default();
        let query = StopQuery::new(Some(0.0), Some(0.0), Some(1000));
        let limit = 1000.0 / METERS_PER_DEGREE;

        for stop in engine.stops_at(instant(5), &query) {
            assert!(stop.latitude.abs() <= limit);
            assert!(stop.longitude.abs() <= limit);
        }
    }

    #[test]
    fn test_partial_center_falls_back_to_city() {
        let engine = SimulationEngine::default();
        let query = StopQuery::new(Some(10.0), None, None);
        let (lat_span, lng_span) = radius_to_degrees(1000.0, CITY_CENTER.0);

        for stop in engine.stops_at(instant(5), &query) {
            assert!((stop.latitude - CITY_CENTER.0).abs() <= lat_span);
            assert!((stop.longitude - CITY_CENTER.1).abs() <= lng_span);
        }
    }

    #[test]
    fn test_lines_are_the_catalog() {
        let lines = SimulationEngine::default().simulate_lines();
        assert_eq!(lines.len(), 30);
        assert_eq!(lines.first().map(String::as_str), Some("100"));
        assert_eq!(lines.last().map(String::as_str), Some("199"));
    }
}
