//! Read-only views over the state store

use std::collections::HashMap;
use std::sync::Arc;

use crate::db::StateStore;
use crate::models::{Alert, Reading, SystemStatus};

/// Query surface for dashboards and clients.
///
/// Every call reads current state; nothing is cached and nothing is mutated.
#[derive(Clone)]
pub struct QueryService {
    store: Arc<dyn StateStore>,
}

impl QueryService {
    /// Create a query service over a store
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    /// Every alert, newest first
    pub fn all_alerts(&self) -> Vec<Alert> {
        self.store.all_alerts()
    }

    /// One worker's alerts, newest first
    pub fn alerts_for_worker(&self, worker_id: &str) -> Vec<Alert> {
        self.store.alerts_for_worker(worker_id)
    }

    /// Latest reading for each worker
    pub fn latest_readings(&self) -> HashMap<String, Reading> {
        self.store.latest_readings()
    }

    /// One worker's reading history in arrival order
    pub fn history_for_worker(&self, worker_id: &str) -> Vec<Reading> {
        self.store.history_for_worker(worker_id)
    }

    /// Aggregate counts
    pub fn status(&self) -> SystemStatus {
        self.store.status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerting::ChannelBroadcaster;
    use crate::collector::{Pipeline, PipelineConfig};
    use crate::db::MemoryStore;

    #[tokio::test]
    async fn test_views_track_pipeline_writes() {
        let store = Arc::new(MemoryStore::new());
        let queries = QueryService::new(store.clone());
        let pipeline = Pipeline::new(
            PipelineConfig::default(),
            store,
            Arc::new(ChannelBroadcaster::default()),
        );

        pipeline.ingest(Reading::new("s1", "w1", "gas", 150.0)).await.unwrap();
        pipeline.ingest(Reading::new("s2", "w2", "noise", 90.0)).await.unwrap();
        pipeline.ingest(Reading::new("s3", "w3", "oxygen", 99.0)).await.unwrap();

        let status = queries.status();
        assert_eq!(status.total_workers, 3);
        assert_eq!(status.total_alerts, 2);
        assert_eq!(status.critical_alerts, 1);
        assert_eq!(status.high_alerts, 0);
        assert_eq!(status.medium_alerts, 1);

        assert_eq!(queries.all_alerts()[0].worker_id, "w2");
        assert_eq!(queries.alerts_for_worker("w1").len(), 1);
        assert!(queries.alerts_for_worker("w3").is_empty());
        assert_eq!(queries.latest_readings().len(), 3);
        assert_eq!(queries.history_for_worker("w3").len(), 1);

        pipeline.clear();
        assert_eq!(queries.status().total_alerts, 0);
        assert_eq!(queries.status().total_workers, 3);
    }
}
