//! # SafeWatch
//!
//! Real-time safety monitoring for workers on hazardous sites.
//!
//! SafeWatch ingests physiological and environmental readings, evaluates each
//! one against per-metric safety rules, and broadcasts any resulting alert to
//! live dashboards while keeping it for later queries.
//!
//! ## Architecture
//!
//! - **Alerting**: Pure per-metric rule engine and live broadcast channels
//! - **Storage**: Concurrent in-memory store of worker readings and the alert log
//! - **Collector**: Ingestion pipeline (record, evaluate, append, publish)
//! - **API**: REST endpoints plus WebSocket and SSE alert feeds
//!
//! ## Quick Start
//!
//! ```bash
//! # Start the service
//! safewatch serve
//!
//! # Check a single reading against the rules
//! safewatch evaluate --metric-type temperature --value 60
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod alerting;
pub mod api;
pub mod collector;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod query;

pub use crate::config::Config;
pub use crate::error::{Error, Result};

/// Re-exports for convenience
pub mod prelude {
    pub use crate::alerting::{evaluate, AlertBroadcaster, ChannelBroadcaster};
    pub use crate::collector::{Collector, Pipeline, PipelineConfig, PipelineResult};
    pub use crate::config::Config;
    pub use crate::db::{MemoryStore, StateStore};
    pub use crate::error::{Error, Result};
    pub use crate::models::*;
    pub use crate::query::QueryService;
}
