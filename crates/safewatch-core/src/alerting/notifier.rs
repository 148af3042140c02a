//! Live delivery of alerts to subscribers

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::Alert;

/// Default buffer capacity for the in-process alert channel
pub const DEFAULT_CAPACITY: usize = 1024;

/// Fire-and-forget publication of alerts to live clients.
///
/// Implementations must not assume any subscriber is present. An error means
/// the transport itself failed, not that nobody was listening.
#[async_trait]
pub trait AlertBroadcaster: Send + Sync {
    /// Publish an alert to every current subscriber
    async fn publish(&self, alert: &Alert) -> Result<()>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// In-process alert topic backed by a `tokio::sync::broadcast` channel.
///
/// When the buffer is full the oldest undelivered alerts are dropped and slow
/// receivers observe `RecvError::Lagged`.
#[derive(Clone)]
pub struct ChannelBroadcaster {
    sender: broadcast::Sender<Alert>,
}

impl ChannelBroadcaster {
    /// Create a channel with the given buffer capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to alerts published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Alert> {
        self.sender.subscribe()
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChannelBroadcaster {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl AlertBroadcaster for ChannelBroadcaster {
    async fn publish(&self, alert: &Alert) -> Result<()> {
        // SendError only means there are zero receivers.
        match self.sender.send(alert.clone()) {
            Ok(receivers) => debug!(alert_id = %alert.alert_id, receivers, "Alert broadcast"),
            Err(_) => debug!(alert_id = %alert.alert_id, "No live subscribers"),
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "channel"
    }
}

/// Publishes to several broadcasters in turn
pub struct FanoutBroadcaster {
    sinks: Vec<Arc<dyn AlertBroadcaster>>,
}

impl FanoutBroadcaster {
    /// Create a fan-out over the given sinks
    pub fn new(sinks: Vec<Arc<dyn AlertBroadcaster>>) -> Self {
        Self { sinks }
    }
}

#[async_trait]
impl AlertBroadcaster for FanoutBroadcaster {
    /// Every sink is attempted; the first failure is reported after all ran.
    async fn publish(&self, alert: &Alert) -> Result<()> {
        let mut failures = Vec::new();

        for sink in &self.sinks {
            if let Err(e) = sink.publish(alert).await {
                warn!(sink = sink.name(), alert_id = %alert.alert_id, error = %e, "Broadcast sink failed");
                failures.push(format!("{}: {e}", sink.name()));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::broadcast(failures.join("; ")))
        }
    }

    fn name(&self) -> &'static str {
        "fanout"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlertCategory, Severity};
    use chrono::Utc;
    use uuid::Uuid;

    fn test_alert() -> Alert {
        Alert {
            alert_id: Uuid::new_v4(),
            worker_id: "w1".to_string(),
            sensor_id: "s1".to_string(),
            message: "test".to_string(),
            severity: Severity::High,
            alert_type: AlertCategory::Gas,
            trigger_value: Some(60.0),
            timestamp: Utc::now(),
        }
    }

    struct FailingSink;

    #[async_trait]
    impl AlertBroadcaster for FailingSink {
        async fn publish(&self, _alert: &Alert) -> Result<()> {
            Err(Error::broadcast("transport down"))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_subscriber_receives_alert() {
        let channel = ChannelBroadcaster::new(8);
        let mut rx = channel.subscribe();
        let alert = test_alert();

        channel.publish(&alert).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), alert);
        assert_eq!(channel.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_ok() {
        let channel = ChannelBroadcaster::default();
        assert!(channel.publish(&test_alert()).await.is_ok());
    }

    #[tokio::test]
    async fn test_fanout_reaches_healthy_sinks_despite_failure() {
        let channel = ChannelBroadcaster::new(8);
        let mut rx = channel.subscribe();
        let fanout = FanoutBroadcaster::new(vec![
            Arc::new(FailingSink),
            Arc::new(channel.clone()),
        ]);
        let alert = test_alert();

        let err = fanout.publish(&alert).await.unwrap_err();

        assert!(matches!(err, Error::Broadcast(ref msg) if msg.contains("failing")));
        assert_eq!(rx.recv().await.unwrap().alert_id, alert.alert_id);
    }
}
