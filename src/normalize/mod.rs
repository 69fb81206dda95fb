//! Reshapes raw upstream JSON records into the frontend contract.
//!
//! Normalization is pure and never fails on missing optional fields. The
//! only records dropped are those whose `location.coordinates` cannot be
//! resolved into a latitude/longitude pair; the drop count is reported in
//! [`Normalized`] so callers can account for it.

mod lines;
mod stops;
mod vehicles;

pub use lines::{LineKey, normalize_lines};
pub use stops::normalize_stops;
pub use vehicles::normalize_vehicles;

use serde_json::Value;

/// Records that survived normalization plus bookkeeping about the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    pub items: Vec<T>,
    pub received: usize,
    pub dropped: usize,
}

impl<T> Normalized<T> {
    fn collect<F>(records: &[Value], f: F) -> Self
    where
        F: Fn(&Value) -> Option<T>,
    {
        let items: Vec<T> = records.iter().filter_map(f).collect();
        Self {
            received: records.len(),
            dropped: records.len() - items.len(),
            items,
        }
    }
}

/// Upstream sends GeoJSON-style `[longitude, latitude]`; returns `(lat, lng)`.
pub(crate) fn coordinates(record: &Value) -> Option<(f64, f64)> {
    let coords = record.get("location")?.get("coordinates")?.as_array()?;
    if coords.len() < 2 {
        return None;
    }
    let longitude = number(&coords[0])?;
    let latitude = number(&coords[1])?;
    Some((latitude, longitude))
}

/// Strings as-is, numbers in their JSON form; anything else is absent.
pub(crate) fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn field_text(record: &Value, key: &str) -> Option<String> {
    record.get(key).and_then(text)
}

pub(crate) fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
