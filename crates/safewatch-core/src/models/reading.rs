//! Sensor reading models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Metric type recorded when a reading arrives without one
pub const UNKNOWN_METRIC: &str = "unknown";

/// A single sensor observation for a worker.
///
/// Readings are immutable once validated; the pipeline and the rule engine
/// only ever borrow them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    /// Sensor that produced the observation
    pub sensor_id: String,

    /// Worker wearing or assigned to the sensor
    pub worker_id: String,

    /// Free-form metric category, matched case-insensitively
    pub metric_type: String,

    /// Observed value
    pub metric_value: f64,

    /// When the observation was taken (ingestion time if not supplied)
    pub timestamp: DateTime<Utc>,
}

impl Reading {
    /// Create a reading stamped with the current time
    pub fn new(
        sensor_id: impl Into<String>,
        worker_id: impl Into<String>,
        metric_type: impl Into<String>,
        metric_value: f64,
    ) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            worker_id: worker_id.into(),
            metric_type: metric_type.into(),
            metric_value,
            timestamp: Utc::now(),
        }
    }
}

/// Reading as submitted over the wire, before validation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingInput {
    /// Sensor that produced the reading
    pub sensor_id: Option<String>,
    /// Worker wearing the sensor
    pub worker_id: Option<String>,
    /// Metric family; treated as unknown when absent
    pub metric_type: Option<String>,
    /// Observed value
    pub metric_value: Option<f64>,
    /// Capture time; defaults to now
    pub timestamp: Option<DateTime<Utc>>,
}

impl ReadingInput {
    /// Check required fields and build a [`Reading`]
    pub fn validate(self) -> Result<Reading> {
        let sensor_id = required(self.sensor_id, "Sensor ID is required")?;
        let worker_id = required(self.worker_id, "Worker ID is required")?;

        let metric_value = self
            .metric_value
            .ok_or_else(|| Error::validation("Metric value is required"))?;
        if !metric_value.is_finite() {
            return Err(Error::validation("Metric value must be a finite number"));
        }

        let metric_type = self
            .metric_type
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_METRIC.to_string());

        Ok(Reading {
            sensor_id,
            worker_id,
            metric_type,
            metric_value,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
        })
    }
}

/// Require a non-blank string field
pub(crate) fn required(value: Option<String>, message: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::validation(message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ReadingInput {
        ReadingInput {
            sensor_id: Some("s1".to_string()),
            worker_id: Some("w1".to_string()),
            metric_type: Some("temperature".to_string()),
            metric_value: Some(42.0),
            timestamp: None,
        }
    }

    #[test]
    fn test_validate_complete_input() {
        let before = Utc::now();
        let reading = input().validate().unwrap();

        assert_eq!(reading.sensor_id, "s1");
        assert_eq!(reading.worker_id, "w1");
        assert_eq!(reading.metric_type, "temperature");
        assert_eq!(reading.metric_value, 42.0);
        assert!(reading.timestamp >= before);
    }

    #[test]
    fn test_validate_keeps_supplied_timestamp() {
        let ts = "2024-03-01T08:30:00Z".parse::<DateTime<Utc>>().unwrap();
        let reading = ReadingInput {
            timestamp: Some(ts),
            ..input()
        }
        .validate()
        .unwrap();

        assert_eq!(reading.timestamp, ts);
    }

    #[test]
    fn test_blank_worker_rejected() {
        let err = ReadingInput {
            worker_id: Some("  ".to_string()),
            ..input()
        }
        .validate()
        .unwrap_err();

        assert_eq!(err.to_string(), "Validation error: Worker ID is required");
    }

    #[test]
    fn test_missing_sensor_rejected() {
        let err = ReadingInput {
            sensor_id: None,
            ..input()
        }
        .validate()
        .unwrap_err();

        assert!(err.is_client_error());
        assert!(err.to_string().contains("Sensor ID is required"));
    }

    #[test]
    fn test_missing_or_nan_value_rejected() {
        let missing = ReadingInput {
            metric_value: None,
            ..input()
        }
        .validate();
        assert!(missing.unwrap_err().to_string().contains("Metric value is required"));

        let nan = ReadingInput {
            metric_value: Some(f64::NAN),
            ..input()
        }
        .validate();
        assert!(nan.is_err());
    }

    #[test]
    fn test_missing_metric_type_defaults_to_unknown() {
        let reading = ReadingInput {
            metric_type: None,
            ..input()
        }
        .validate()
        .unwrap();

        assert_eq!(reading.metric_type, UNKNOWN_METRIC);
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let input: ReadingInput = serde_json::from_str(
            r#"{"sensorId":"s9","workerId":"w9","metricType":"gas","metricValue":12.5}"#,
        )
        .unwrap();
        let reading = input.validate().unwrap();

        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["workerId"], "w9");
        assert_eq!(json["metricValue"], 12.5);
    }
}
