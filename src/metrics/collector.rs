//! Metrics collection using Prometheus
//!
//! This module provides metrics for the rating engine: recorded and rejected
//! matches, per-system update latency, failures and player counts.

use anyhow::Result;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGaugeVec, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;
use std::time::Duration;

/// Main metrics collector for the rating engine
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Match intake metrics
    match_metrics: MatchMetrics,

    /// Per rating system metrics
    system_metrics: SystemMetrics,
}

/// Match intake metrics
#[derive(Clone)]
pub struct MatchMetrics {
    /// Matches appended to the canonical log
    pub matches_recorded_total: IntCounter,

    /// Submissions rejected as invalid
    pub matches_rejected_total: IntCounter,
}

/// Per rating system metrics
#[derive(Clone)]
pub struct SystemMetrics {
    /// Time spent folding one match into a system
    pub update_duration_seconds: HistogramVec,

    /// Update steps that returned an error
    pub algorithm_failures_total: IntCounterVec,

    /// Players registered in each system
    pub players: IntGaugeVec,
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let match_metrics = MatchMetrics::new(&registry)?;
        let system_metrics = SystemMetrics::new(&registry)?;

        Ok(Self {
            registry,
            match_metrics,
            system_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    pub fn matches(&self) -> &MatchMetrics {
        &self.match_metrics
    }

    pub fn systems(&self) -> &SystemMetrics {
        &self.system_metrics
    }

    pub fn record_match(&self) {
        self.match_metrics.matches_recorded_total.inc();
    }

    pub fn record_rejected_match(&self) {
        self.match_metrics.matches_rejected_total.inc();
    }

    /// Record how long one system took to absorb a match
    pub fn observe_update(&self, system: &str, duration: Duration) {
        self.system_metrics
            .update_duration_seconds
            .with_label_values(&[system])
            .observe(duration.as_secs_f64());
    }

    pub fn record_algorithm_failure(&self, system: &str) {
        self.system_metrics
            .algorithm_failures_total
            .with_label_values(&[system])
            .inc();
    }

    pub fn set_player_count(&self, system: &str, players: usize) {
        self.system_metrics
            .players
            .with_label_values(&[system])
            .set(players as i64);
    }

    /// Render every metric in the Prometheus text exposition format
    pub fn gather_text(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

impl MatchMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let matches_recorded_total = IntCounter::new(
            "ratings_matches_recorded_total",
            "Total matches appended to the match log",
        )?;
        registry.register(Box::new(matches_recorded_total.clone()))?;

        let matches_rejected_total = IntCounter::new(
            "ratings_matches_rejected_total",
            "Total match submissions rejected as invalid",
        )?;
        registry.register(Box::new(matches_rejected_total.clone()))?;

        Ok(Self {
            matches_recorded_total,
            matches_rejected_total,
        })
    }
}

impl SystemMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let update_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "ratings_update_duration_seconds",
                "Time taken by a rating system to absorb one match",
            )
            .buckets(vec![
                0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01, 0.05, 0.1,
            ]),
            &["system"],
        )?;
        registry.register(Box::new(update_duration_seconds.clone()))?;

        let algorithm_failures_total = IntCounterVec::new(
            Opts::new(
                "ratings_algorithm_failures_total",
                "Total rating system update failures",
            ),
            &["system"],
        )?;
        registry.register(Box::new(algorithm_failures_total.clone()))?;

        let players = IntGaugeVec::new(
            Opts::new("ratings_players", "Players registered per rating system"),
            &["system"],
        )?;
        registry.register(Box::new(players.clone()))?;

        Ok(Self {
            update_duration_seconds,
            algorithm_failures_total,
            players,
        })
    }
}
