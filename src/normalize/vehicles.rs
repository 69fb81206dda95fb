use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use super::{Normalized, coordinates, field_text, number};
use crate::model::Vehicle;

/// Normalizes upstream bus records. `now` stamps records without a timestamp.
pub fn normalize_vehicles(records: &[Value], now: DateTime<Utc>) -> Normalized<Vehicle> {
    let fallback_timestamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    Normalized::collect(records, |record| vehicle(record, &fallback_timestamp))
}

fn vehicle(record: &Value, fallback_timestamp: &str) -> Option<Vehicle> {
    let (latitude, longitude) = coordinates(record)?;

    let line = field_text(record, "line").unwrap_or_else(|| "unknown".to_string());
    let id = field_text(record, "id").unwrap_or_else(|| {
        let bus_id = field_text(record, "busId").unwrap_or_else(|| "unknown".to_string());
        format!("{line}-{bus_id}")
    });

    let heading = record
        .get("heading")
        .and_then(number)
        .or_else(|| record.get("direction").and_then(number))
        .unwrap_or(0.0)
        .rem_euclid(360.0);

    let speed = record
        .get("speed")
        .and_then(number)
        .unwrap_or(0.0)
        .max(0.0);

    let order = record
        .get("order")
        .and_then(Value::as_u64)
        .and_then(|o| u32::try_from(o).ok())
        .unwrap_or(1);

    let subline = field_text(record, "subline");
    let destination = field_text(record, "destination")
        .or_else(|| subline.clone())
        .unwrap_or_else(|| "Unknown".to_string());

    Some(Vehicle {
        id,
        line,
        order,
        latitude,
        longitude,
        heading,
        speed,
        destination,
        timestamp: field_text(record, "timestamp")
            .unwrap_or_else(|| fallback_timestamp.to_string()),
        company: Some(field_text(record, "company").unwrap_or_default()),
        subline: Some(subline.unwrap_or_default()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_full_record() {
        let records = vec![json!({
            "id": "bus-7",
            "line": "116",
            "busId": 7,
            "order": 3,
            "location": {"coordinates": [-56.16, -34.90]},
            "heading": 90,
            "speed": 32.5,
            "destination": "Pocitos",
            "timestamp": "2024-05-01T11:59:30Z",
            "company": "CUTCSA",
            "subline": "Pocitos - Ciudad Vieja"
        })];

        let out = normalize_vehicles(&records, now());
        assert_eq!(out.dropped, 0);
        let v = &out.items[0];
        assert_eq!(v.id, "bus-7");
        assert_eq!(v.latitude, -34.90);
        assert_eq!(v.longitude, -56.16);
        assert_eq!(v.order, 3);
        assert_eq!(v.heading, 90.0);
        assert_eq!(v.speed, 32.5);
        assert_eq!(v.destination, "Pocitos");
        assert_eq!(v.timestamp, "2024-05-01T11:59:30Z");
        assert_eq!(v.company.as_deref(), Some("CUTCSA"));
    }

    #[test]
    fn test_defaults_for_sparse_record() {
        let records = vec![json!({
            "line": 181,
            "busId": 42,
            "location": {"coordinates": [-56.1, -34.8]},
            "subline": "Terminal Colon"
        })];

        let v = &normalize_vehicles(&records, now()).items[0];
        assert_eq!(v.id, "181-42");
        assert_eq!(v.line, "181");
        assert_eq!(v.order, 1);
        assert_eq!(v.heading, 0.0);
        assert_eq!(v.speed, 0.0);
        assert_eq!(v.destination, "Terminal Colon");
        assert_eq!(v.timestamp, "2024-05-01T12:00:00.000Z");
        assert_eq!(v.company.as_deref(), Some(""));
    }

    #[test]
    fn test_heading_falls_back_to_direction() {
        let records = vec![
            json!({"location": {"coordinates": [0.0, 0.0]}, "direction": 270}),
            json!({"location": {"coordinates": [0.0, 0.0]}, "heading": 10, "direction": 270}),
            json!({"location": {"coordinates": [0.0, 0.0]}, "heading": -90}),
        ];

        let out = normalize_vehicles(&records, now());
        assert_eq!(out.items[0].heading, 270.0);
        assert_eq!(out.items[1].heading, 10.0);
        assert_eq!(out.items[2].heading, 270.0);
        assert_eq!(out.items[0].destination, "Unknown");
        assert_eq!(out.items[0].id, "unknown-unknown");
    }

    #[test]
    fn test_records_without_coordinates_are_dropped() {
        let records = vec![
            json!({"line": "100", "location": {"coordinates": [-56.2, -34.9]}}),
            json!({"line": "101"}),
            json!({"line": "102", "location": {"coordinates": []}}),
            json!({"line": "103", "location": {"coordinates": [-56.3, -34.8]}}),
        ];

        let out = normalize_vehicles(&records, now());
        assert_eq!(out.received, 4);
        assert_eq!(out.dropped, 2);
        assert_eq!(out.items.len(), out.received - out.dropped);
        let lines: Vec<_> = out.items.iter().map(|v| v.line.as_str()).collect();
        assert_eq!(lines, vec!["100", "103"]);
    }
}
