//! Alerting system for SafeWatch
//!
//! Per-metric safety rules and live alert delivery.

pub mod evaluator;
pub mod notifier;

pub use evaluator::{classify, evaluate, MetricKind};
pub use notifier::{AlertBroadcaster, ChannelBroadcaster, FanoutBroadcaster};
