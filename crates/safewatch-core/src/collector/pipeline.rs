//! Ingestion pipeline for readings
//!
//! A reading is recorded, evaluated, and, if a rule fires, its alert is
//! appended to the log and then published. Each step finishes before the next
//! begins; a reading yields at most one alert and one publish.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tracing::{debug, info, warn};

use crate::alerting::{evaluate, AlertBroadcaster};
use crate::db::StateStore;
use crate::error::{Error, Result};
use crate::models::{Alert, Reading};

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Upper bound on a single broadcast publish
    pub publish_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            publish_timeout: Duration::from_secs(2),
        }
    }
}

/// Outcome of ingesting one reading
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineResult {
    /// The reading was within safe limits
    NoAlert,
    /// A rule fired; the alert was logged and broadcast
    AlertGenerated(Alert),
}

impl PipelineResult {
    /// The generated alert, if any
    pub fn alert(&self) -> Option<&Alert> {
        match self {
            Self::NoAlert => None,
            Self::AlertGenerated(alert) => Some(alert),
        }
    }
}

/// Processing pipeline for readings
pub struct Pipeline {
    config: PipelineConfig,
    store: Arc<dyn StateStore>,
    broadcaster: Arc<dyn AlertBroadcaster>,
}

impl Pipeline {
    /// Create a new pipeline
    pub fn new(
        config: PipelineConfig,
        store: Arc<dyn StateStore>,
        broadcaster: Arc<dyn AlertBroadcaster>,
    ) -> Self {
        Self {
            config,
            store,
            broadcaster,
        }
    }

    /// Record a reading and raise an alert if a rule fires
    pub async fn ingest(&self, reading: Reading) -> Result<PipelineResult> {
        self.store.record_reading(reading.clone());
        counter!("safewatch_readings_ingested_total").increment(1);

        let alert = evaluate(&reading);

        debug!(
            worker_id = %reading.worker_id,
            sensor_id = %reading.sensor_id,
            metric_type = %reading.metric_type,
            value = reading.metric_value,
            alert = alert.is_some(),
            "Evaluated reading"
        );

        match alert {
            Some(alert) => {
                info!(
                    alert_id = %alert.alert_id,
                    worker_id = %alert.worker_id,
                    severity = %alert.severity,
                    category = alert.alert_type.as_str(),
                    "Alert triggered"
                );
                counter!(
                    "safewatch_alerts_generated_total",
                    "severity" => alert.severity.as_str(),
                    "category" => alert.alert_type.as_str()
                )
                .increment(1);

                let alert = self.commit(alert).await?;
                Ok(PipelineResult::AlertGenerated(alert))
            }
            None => Ok(PipelineResult::NoAlert),
        }
    }

    /// Append and broadcast an operator-supplied alert
    pub async fn inject(&self, alert: Alert) -> Result<Alert> {
        info!(
            alert_id = %alert.alert_id,
            worker_id = %alert.worker_id,
            severity = %alert.severity,
            "Manual alert injected"
        );
        self.commit(alert).await
    }

    /// Empty the alert log
    pub fn clear(&self) -> usize {
        let cleared = self.store.clear_alerts();
        info!(cleared, "Alert log cleared");
        cleared
    }

    /// Append to the log, then publish. A failed publish leaves the alert logged.
    async fn commit(&self, alert: Alert) -> Result<Alert> {
        self.store.append_alert(alert.clone());

        let publish = self.broadcaster.publish(&alert);
        let outcome = match tokio::time::timeout(self.config.publish_timeout, publish).await {
            Ok(result) => result,
            Err(_) => Err(Error::broadcast(format!(
                "publish timed out after {}ms",
                self.config.publish_timeout.as_millis()
            ))),
        };

        if let Err(e) = outcome {
            warn!(alert_id = %alert.alert_id, error = %e, "Alert logged but not broadcast");
            counter!("safewatch_broadcast_failures_total").increment(1);
            return Err(e);
        }

        Ok(alert)
    }
}
