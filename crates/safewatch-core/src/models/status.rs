//! Aggregate system status

use serde::{Deserialize, Serialize};

/// Fixed value reported while the service is serving
pub const OPERATIONAL: &str = "OPERATIONAL";

/// Point-in-time counts over the state store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    /// Distinct workers that have reported at least one reading
    pub total_workers: usize,

    /// Alerts currently in the log
    pub total_alerts: usize,

    /// CRITICAL alerts currently in the log
    pub critical_alerts: usize,

    /// HIGH alerts currently in the log
    pub high_alerts: usize,

    /// MEDIUM alerts currently in the log
    pub medium_alerts: usize,

    /// Service state
    pub system_status: String,
}
