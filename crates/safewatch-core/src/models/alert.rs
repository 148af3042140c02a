//! Alert data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::reading::required;
use crate::error::Result;

/// Alert severity level, ordered from least to most urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Needs attention
    Medium,
    /// Worker at risk
    High,
    /// Immediate action required
    Critical,
}

impl Severity {
    /// Wire name of the severity
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Family of rule that raised an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AlertCategory {
    /// Ambient temperature
    #[serde(rename = "TEMPERATURE_ALERT")]
    Temperature,
    /// Gas concentration
    #[serde(rename = "GAS_ALERT")]
    Gas,
    /// Noise exposure
    #[serde(rename = "NOISE_ALERT")]
    Noise,
    /// Heart rate and blood oxygen
    #[serde(rename = "HEALTH_ALERT")]
    Health,
    /// Any other metric
    #[default]
    #[serde(rename = "GENERIC_ALERT")]
    Generic,
}

impl AlertCategory {
    /// Wire name of the category
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Temperature => "TEMPERATURE_ALERT",
            Self::Gas => "GAS_ALERT",
            Self::Noise => "NOISE_ALERT",
            Self::Health => "HEALTH_ALERT",
            Self::Generic => "GENERIC_ALERT",
        }
    }
}

/// A safety alert raised for a worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Unique identifier
    pub alert_id: Uuid,

    /// Worker the alert concerns
    pub worker_id: String,

    /// Sensor that reported the violating value
    pub sensor_id: String,

    /// Human-readable message
    pub message: String,

    /// Severity level
    pub severity: Severity,

    /// Rule family that fired
    pub alert_type: AlertCategory,

    /// The value that triggered the alert (absent for some manual alerts)
    pub trigger_value: Option<f64>,

    /// When the alert was raised
    pub timestamp: DateTime<Utc>,
}

/// Input for an operator-injected alert
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualAlertInput {
    /// Generated when absent
    pub alert_id: Option<Uuid>,
    /// Worker the alert concerns
    pub worker_id: Option<String>,
    /// Originating sensor or station
    pub sensor_id: Option<String>,
    /// Operator message
    pub message: Option<String>,
    /// Severity level
    pub severity: Severity,
    /// Defaults to [`AlertCategory::Generic`]
    pub alert_type: Option<AlertCategory>,
    /// Value behind the alert, if any
    pub trigger_value: Option<f64>,
    /// Defaults to now
    pub timestamp: Option<DateTime<Utc>>,
}

impl ManualAlertInput {
    /// Check required fields and build an [`Alert`]
    pub fn validate(self) -> Result<Alert> {
        Ok(Alert {
            alert_id: self.alert_id.unwrap_or_else(Uuid::new_v4),
            worker_id: required(self.worker_id, "Worker ID is required")?,
            sensor_id: required(self.sensor_id, "Sensor ID is required")?,
            message: required(self.message, "Alert message is required")?,
            severity: self.severity,
            alert_type: self.alert_type.unwrap_or_default(),
            trigger_value: self.trigger_value,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
        })
    }
}
