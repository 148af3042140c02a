//! In-memory state store
//!
//! Worker state lives in a sharded `DashMap`, so readings for different
//! workers take different shard locks. The alert log is a single
//! `RwLock<VecDeque>`; it is the only lock that spans workers.

use std::collections::{HashMap, VecDeque};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;

use super::{StateStore, WorkerState};
use crate::models::{Alert, Reading, Severity, SystemStatus, OPERATIONAL};

/// Volatile, unbounded state store
#[derive(Default)]
pub struct MemoryStore {
    workers: DashMap<String, WorkerState>,
    /// Newest first
    alerts: RwLock<VecDeque<Alert>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn record_reading(&self, reading: Reading) {
        // The entry holds the shard write lock, so latest and history move together.
        match self.workers.entry(reading.worker_id.clone()) {
            Entry::Occupied(mut entry) => entry.get_mut().push(reading),
            Entry::Vacant(entry) => {
                entry.insert(WorkerState::new(reading));
            }
        }
    }

    fn append_alert(&self, alert: Alert) {
        self.alerts.write().push_front(alert);
    }

    fn clear_alerts(&self) -> usize {
        let mut alerts = self.alerts.write();
        let cleared = alerts.len();
        alerts.clear();
        cleared
    }

    fn all_alerts(&self) -> Vec<Alert> {
        self.alerts.read().iter().cloned().collect()
    }

    fn alerts_for_worker(&self, worker_id: &str) -> Vec<Alert> {
        self.alerts
            .read()
            .iter()
            .filter(|a| a.worker_id == worker_id)
            .cloned()
            .collect()
    }

    fn latest_readings(&self) -> HashMap<String, Reading> {
        self.workers
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().latest.clone()))
            .collect()
    }

    fn history_for_worker(&self, worker_id: &str) -> Vec<Reading> {
        self.workers
            .get(worker_id)
            .map(|state| state.history.clone())
            .unwrap_or_default()
    }

    fn status(&self) -> SystemStatus {
        let total_workers = self.workers.len();
        let alerts = self.alerts.read();
        let count = |severity: Severity| alerts.iter().filter(|a| a.severity == severity).count();

        SystemStatus {
            total_workers,
            total_alerts: alerts.len(),
            critical_alerts: count(Severity::Critical),
            high_alerts: count(Severity::High),
            medium_alerts: count(Severity::Medium),
            system_status: OPERATIONAL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AlertCategory;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use uuid::Uuid;

    fn alert_for(worker_id: &str, severity: Severity) -> Alert {
        Alert {
            alert_id: Uuid::new_v4(),
            worker_id: worker_id.to_string(),
            sensor_id: "s1".to_string(),
            message: format!("alert for {worker_id}"),
            severity,
            alert_type: AlertCategory::Generic,
            trigger_value: Some(80.0),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_unknown_worker_has_empty_views() {
        let store = MemoryStore::new();

        assert!(store.history_for_worker("nobody").is_empty());
        assert!(store.alerts_for_worker("nobody").is_empty());
        assert!(store.latest_readings().is_empty());
    }

    #[test]
    fn test_history_keeps_call_order_and_latest_wins() {
        let store = MemoryStore::new();
        for value in [40.0, 41.0, 42.0] {
            store.record_reading(Reading::new("s1", "w1", "temperature", value));
        }

        let history: Vec<f64> = store
            .history_for_worker("w1")
            .iter()
            .map(|r| r.metric_value)
            .collect();
        assert_eq!(history, vec![40.0, 41.0, 42.0]);
        assert_eq!(store.latest_readings()["w1"].metric_value, 42.0);
    }

    #[test]
    fn test_alert_log_is_newest_first() {
        let store = MemoryStore::new();
        let first = alert_for("w1", Severity::High);
        let second = alert_for("w2", Severity::Medium);

        store.append_alert(first.clone());
        store.append_alert(second.clone());

        assert_eq!(store.all_alerts(), vec![second, first.clone()]);
        assert_eq!(store.alerts_for_worker("w1"), vec![first]);
    }

    #[test]
    fn test_clear_alerts_empties_every_view() {
        let store = MemoryStore::new();
        store.append_alert(alert_for("w1", Severity::Critical));
        store.append_alert(alert_for("w2", Severity::High));

        assert_eq!(store.clear_alerts(), 2);
        assert!(store.all_alerts().is_empty());
        assert!(store.alerts_for_worker("w1").is_empty());
        assert_eq!(store.status().total_alerts, 0);
    }

    #[test]
    fn test_status_counts() {
        let store = MemoryStore::new();
        store.record_reading(Reading::new("s1", "w1", "gas", 10.0));
        store.record_reading(Reading::new("s2", "w2", "gas", 10.0));
        store.record_reading(Reading::new("s1", "w1", "gas", 12.0));
        store.append_alert(alert_for("w1", Severity::Critical));
        store.append_alert(alert_for("w1", Severity::High));
        store.append_alert(alert_for("w2", Severity::High));
        store.append_alert(alert_for("w2", Severity::Medium));

        let status = store.status();

        assert_eq!(
            status,
            SystemStatus {
                total_workers: 2,
                total_alerts: 4,
                critical_alerts: 1,
                high_alerts: 2,
                medium_alerts: 1,
                system_status: "OPERATIONAL".to_string(),
            }
        );
    }

    #[test]
    fn test_concurrent_distinct_workers() {
        let store = Arc::new(MemoryStore::new());
        let workers = 64;

        let handles: Vec<_> = (0..workers)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store.record_reading(Reading::new(
                        format!("s{i}"),
                        format!("w{i}"),
                        "noise",
                        f64::from(i),
                    ));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let latest = store.latest_readings();
        assert_eq!(latest.len(), 64);
        for i in 0..workers {
            let reading = &latest[&format!("w{i}")];
            assert_eq!(reading.sensor_id, format!("s{i}"));
            assert_eq!(reading.metric_value, f64::from(i));
        }
    }

    #[test]
    fn test_concurrent_same_worker_loses_nothing() {
        let store = Arc::new(MemoryStore::new());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        store.record_reading(Reading::new("s1", "w1", "oxygen", f64::from(t * 100 + i)));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let history = store.history_for_worker("w1");
        assert_eq!(history.len(), 400);
        // Latest is always the last entry appended to history
        assert_eq!(store.latest_readings()["w1"], *history.last().unwrap());
    }

    #[test]
    fn test_concurrent_prepends_are_not_lost() {
        let store = Arc::new(MemoryStore::new());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        store.append_alert(alert_for(&format!("w{t}"), Severity::High));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let alerts = store.all_alerts();
        assert_eq!(alerts.len(), 800);
        for t in 0..8 {
            assert_eq!(store.alerts_for_worker(&format!("w{t}")).len(), 100);
        }
    }
}
