//! State layer for SafeWatch
//!
//! Provides the worker/alert state store and the optional Redis pub/sub
//! connection.

mod memory;
mod redis;

pub use memory::MemoryStore;
pub use self::redis::{RedisBroadcaster, RedisPool};

use std::collections::HashMap;

use crate::models::{Alert, Reading, SystemStatus};

/// Per-worker readings
#[derive(Debug, Clone)]
pub struct WorkerState {
    /// Most recently recorded reading
    pub latest: Reading,
    /// Every reading ever recorded, oldest first
    pub history: Vec<Reading>,
}

impl WorkerState {
    /// State for a worker's first reading
    pub fn new(reading: Reading) -> Self {
        Self {
            latest: reading.clone(),
            history: vec![reading],
        }
    }

    /// Record a subsequent reading
    pub fn push(&mut self, reading: Reading) {
        self.latest = reading.clone();
        self.history.push(reading);
    }
}

/// Worker readings and the global alert log.
///
/// Calls for the same worker are linearizable. The alert log is newest-first
/// and its writers are mutually exclusive; readers always see a whole log.
/// Reads return owned snapshots.
pub trait StateStore: Send + Sync {
    /// Set the worker's latest reading and append it to their history
    fn record_reading(&self, reading: Reading);

    /// Prepend an alert to the log
    fn append_alert(&self, alert: Alert);

    /// Empty the alert log, returning how many alerts were removed
    fn clear_alerts(&self) -> usize;

    /// Every alert, newest first
    fn all_alerts(&self) -> Vec<Alert>;

    /// Alerts for one worker, newest first
    fn alerts_for_worker(&self, worker_id: &str) -> Vec<Alert>;

    /// Latest reading per worker
    fn latest_readings(&self) -> HashMap<String, Reading>;

    /// A worker's readings in arrival order (empty if unknown)
    fn history_for_worker(&self, worker_id: &str) -> Vec<Reading>;

    /// Aggregate counts computed from current state
    fn status(&self) -> SystemStatus;
}
