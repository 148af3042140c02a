//! Safety rule evaluation engine
//!
//! Each metric family has one independent threshold rule. Evaluation is a pure
//! function of the reading: no shared state, no I/O, and every well-formed
//! reading yields either exactly one alert or none.

use chrono::Utc;
use uuid::Uuid;

use crate::models::{Alert, AlertCategory, Reading, Severity};

// Thresholds. All comparisons are strict.
const TEMPERATURE_MAX: f64 = 45.0; // Celsius
const TEMPERATURE_CRITICAL: f64 = 55.0;
const GAS_MAX: f64 = 50.0; // PPM
const GAS_CRITICAL: f64 = 100.0;
const NOISE_MAX: f64 = 85.0; // Decibels
const NOISE_HIGH: f64 = 100.0;
const HEART_RATE_MIN: f64 = 60.0; // BPM
const HEART_RATE_MAX: f64 = 100.0;
const HEART_RATE_CRITICAL_MIN: f64 = 50.0;
const HEART_RATE_CRITICAL_MAX: f64 = 120.0;
const OXYGEN_MIN: f64 = 95.0; // Saturation %
const OXYGEN_CRITICAL: f64 = 90.0;
const GENERIC_MAX: f64 = 75.0;
const GENERIC_HIGH: f64 = 90.0;

/// Known metric families, plus a catch-all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Ambient temperature
    Temperature,
    /// Gas concentration
    Gas,
    /// Noise level
    Noise,
    /// Heart rate
    HeartRate,
    /// Blood oxygen saturation
    Oxygen,
    /// Anything not listed above
    Other,
}

impl MetricKind {
    /// Resolve a free-form metric type, ignoring case
    pub fn parse(metric_type: &str) -> Self {
        match metric_type.to_lowercase().as_str() {
            "temperature" => Self::Temperature,
            "gas" => Self::Gas,
            "noise" => Self::Noise,
            "heartrate" => Self::HeartRate,
            "oxygen" => Self::Oxygen,
            _ => Self::Other,
        }
    }

    /// Category tag for alerts raised by this family
    pub fn category(self) -> AlertCategory {
        match self {
            Self::Temperature => AlertCategory::Temperature,
            Self::Gas => AlertCategory::Gas,
            Self::Noise => AlertCategory::Noise,
            Self::HeartRate | Self::Oxygen => AlertCategory::Health,
            Self::Other => AlertCategory::Generic,
        }
    }
}

/// Classify a value against its family's rule.
///
/// Returns `None` when the value is within the safe range.
pub fn classify(kind: MetricKind, value: f64) -> Option<Severity> {
    match kind {
        MetricKind::Temperature => (value > TEMPERATURE_MAX).then(|| {
            if value > TEMPERATURE_CRITICAL {
                Severity::Critical
            } else {
                Severity::High
            }
        }),
        MetricKind::Gas => (value > GAS_MAX).then(|| {
            if value > GAS_CRITICAL {
                Severity::Critical
            } else {
                Severity::High
            }
        }),
        MetricKind::Noise => (value > NOISE_MAX).then(|| {
            if value > NOISE_HIGH {
                Severity::High
            } else {
                Severity::Medium
            }
        }),
        MetricKind::HeartRate => (value < HEART_RATE_MIN || value > HEART_RATE_MAX).then(|| {
            if value < HEART_RATE_CRITICAL_MIN || value > HEART_RATE_CRITICAL_MAX {
                Severity::Critical
            } else {
                Severity::High
            }
        }),
        MetricKind::Oxygen => (value < OXYGEN_MIN).then(|| {
            if value < OXYGEN_CRITICAL {
                Severity::Critical
            } else {
                Severity::High
            }
        }),
        MetricKind::Other => (value > GENERIC_MAX).then(|| {
            if value > GENERIC_HIGH {
                Severity::High
            } else {
                Severity::Medium
            }
        }),
    }
}

/// Evaluate a reading and build an alert if its rule fires
pub fn evaluate(reading: &Reading) -> Option<Alert> {
    let kind = MetricKind::parse(&reading.metric_type);
    let value = reading.metric_value;
    let severity = classify(kind, value)?;

    Some(Alert {
        alert_id: Uuid::new_v4(),
        worker_id: reading.worker_id.clone(),
        sensor_id: reading.sensor_id.clone(),
        message: format_message(kind, &reading.metric_type, value),
        severity,
        alert_type: kind.category(),
        trigger_value: Some(value),
        timestamp: Utc::now(),
    })
}

fn format_message(kind: MetricKind, metric_type: &str, value: f64) -> String {
    let v = format_value(value);
    match kind {
        MetricKind::Temperature => {
            format!("High temperature detected: {v}°C. Worker safety at risk!")
        }
        MetricKind::Gas => {
            format!("Dangerous gas level detected: {v} PPM. Immediate evacuation required!")
        }
        MetricKind::Noise => {
            format!("Excessive noise level: {v} dB. Hearing protection required!")
        }
        MetricKind::HeartRate if value < HEART_RATE_MIN => {
            format!("Low heart rate detected: {v} BPM. Medical attention needed!")
        }
        MetricKind::HeartRate => {
            format!("High heart rate detected: {v} BPM. Worker may be in distress!")
        }
        MetricKind::Oxygen => {
            format!("Low oxygen saturation: {v}%. Immediate medical attention required!")
        }
        MetricKind::Other => format!("Safety threshold exceeded for {metric_type}: {v}"),
    }
}

/// Render with at least one decimal place (60 -> "60.0", 60.25 -> "60.25")
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}
