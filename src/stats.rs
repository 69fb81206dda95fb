use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::normalize::Normalized;

/// Running totals of records received from upstream and dropped during
/// normalization, per resource.
#[derive(Debug, Default)]
pub struct NormalizationStats {
    vehicles_received: AtomicU64,
    vehicles_dropped: AtomicU64,
    stops_received: AtomicU64,
    stops_dropped: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ResourceCounts {
    pub received: u64,
    pub dropped: u64,
    pub dropped_pct: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub vehicles: ResourceCounts,
    pub stops: ResourceCounts,
}

impl NormalizationStats {
    pub fn record_vehicles<T>(&self, batch: &Normalized<T>) {
        self.vehicles_received
            .fetch_add(batch.received as u64, Ordering::Relaxed);
        self.vehicles_dropped
            .fetch_add(batch.dropped as u64, Ordering::Relaxed);
    }

    pub fn record_stops<T>(&self, batch: &Normalized<T>) {
        self.stops_received
            .fetch_add(batch.received as u64, Ordering::Relaxed);
        self.stops_dropped
            .fetch_add(batch.dropped as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            vehicles: counts(&self.vehicles_received, &self.vehicles_dropped),
            stops: counts(&self.stops_received, &self.stops_dropped),
        }
    }

    pub fn pct(part: u64, total: u64) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }
}

fn counts(received: &AtomicU64, dropped: &AtomicU64) -> ResourceCounts {
    let received = received.load(Ordering::Relaxed);
    let dropped = dropped.load(Ordering::Relaxed);
    ResourceCounts {
        received,
        dropped,
        dropped_pct: NormalizationStats::pct(dropped, received),
    }
}
