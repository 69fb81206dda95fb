use serde_json::Value;

use super::{Normalized, coordinates, field_text, text};
use crate::model::Stop;

/// Normalizes upstream bus-stop records.
pub fn normalize_stops(records: &[Value]) -> Normalized<Stop> {
    Normalized::collect(records, stop)
}

fn stop(record: &Value) -> Option<Stop> {
    let (latitude, longitude) = coordinates(record)?;

    let mut lines: Vec<String> = Vec::new();
    if let Some(raw) = record.get("lines").and_then(Value::as_array) {
        for line in raw.iter().filter_map(text) {
            if !lines.contains(&line) {
                lines.push(line);
            }
        }
    }

    Some(Stop {
        id: field_text(record, "id").unwrap_or_default(),
        code: field_text(record, "code").unwrap_or_default(),
        name: field_text(record, "nombre")
            .or_else(|| field_text(record, "name"))
            .unwrap_or_default(),
        address: field_text(record, "direccion")
            .or_else(|| field_text(record, "address"))
            .unwrap_or_default(),
        latitude,
        longitude,
        lines,
    })
}
