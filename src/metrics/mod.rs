//! Metrics and monitoring for the rating engine
//!
//! This module provides Prometheus metrics collection for match intake and
//! per-system update performance.

pub mod collector;

pub use collector::{MatchMetrics, MetricsCollector, SystemMetrics};
