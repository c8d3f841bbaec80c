//! Rating registry
//!
//! Owns the canonical, append-only match log and every registered rating
//! algorithm. A recorded match is appended to the log first and then handed
//! to each algorithm in registration order. Queries only read state the
//! algorithms have already computed.

use crate::config::{RatingConfig, RatingSystemKind};
use crate::error::{RatingError, Result};
use crate::metrics::MetricsCollector;
use crate::rating::algorithm::{RatingAlgorithm, RatingSnapshot};
use crate::rating::elo::EloRatingSystem;
use crate::rating::net_promoter::NetPromoterRating;
use crate::rating::rpi::RpiRating;
use crate::rating::wins_minus_losses::WinsMinusLossesRating;
use crate::types::{BySystem, MatchRecord, MatchSubmission, PlayerId, Standing};
use crate::utils::sort_standings_descending;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

pub struct RatingRegistry {
    algorithms: Vec<Box<dyn RatingAlgorithm>>,
    /// Canonical match log, append-only
    games: Vec<MatchRecord>,
    metrics: Option<Arc<MetricsCollector>>,
}

impl RatingRegistry {
    /// Create a registry with no algorithms
    pub fn new() -> Self {
        Self {
            algorithms: Vec::new(),
            games: Vec::new(),
            metrics: None,
        }
    }

    /// Create a registry running every configured system in configured order
    pub fn from_config(config: &RatingConfig) -> Result<Self> {
        config.validate()?;

        let mut registry = Self::new();
        for system in &config.systems {
            let algorithm: Box<dyn RatingAlgorithm> = match system {
                RatingSystemKind::NetPromoter => {
                    Box::new(NetPromoterRating::new(config.net_promoter.clone())?)
                }
                RatingSystemKind::WinsMinusLosses => Box::new(WinsMinusLossesRating::new()),
                RatingSystemKind::RatingPercentageIndex => {
                    Box::new(RpiRating::new(config.rpi.clone())?)
                }
                RatingSystemKind::Elo => Box::new(EloRatingSystem::new(config.elo.clone())?),
            };
            registry.register(algorithm)?;
        }

        info!(
            "Rating registry ready with systems: {}",
            registry.system_names().join(", ")
        );
        Ok(registry)
    }

    /// Attach a metrics collector; updates are timed and counted from now on
    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Add an algorithm. Matches already in the log are not replayed into it.
    pub fn register(&mut self, algorithm: Box<dyn RatingAlgorithm>) -> Result<()> {
        let name = algorithm.name();
        if self.algorithms.iter().any(|a| a.name() == name) {
            return Err(RatingError::ConfigurationError {
                message: format!("Rating system already registered: {}", name),
            }
            .into());
        }

        debug!("Registered rating system {}", name);
        self.algorithms.push(algorithm);
        Ok(())
    }

    /// Validate and record a match given as its four fields
    pub fn add_match(
        &mut self,
        player1: &str,
        score1: i64,
        player2: &str,
        score2: i64,
    ) -> Result<MatchRecord> {
        self.submit(MatchSubmission::new(player1, score1, player2, score2))
    }

    /// Validate and record a raw submission
    pub fn submit(&mut self, submission: MatchSubmission) -> Result<MatchRecord> {
        let record = match submission.validate() {
            Ok(record) => record,
            Err(e) => {
                warn!("Rejected match submission: {}", e);
                if let Some(metrics) = &self.metrics {
                    metrics.record_rejected_match();
                }
                return Err(e);
            }
        };

        self.record(record.clone())?;
        Ok(record)
    }

    /// Append an already validated record and fan it out to every algorithm.
    ///
    /// The log append is never rolled back. If an algorithm fails, the
    /// remaining algorithms are skipped and the error is returned; the
    /// registry should be treated as unusable afterwards.
    pub fn record(&mut self, record: MatchRecord) -> Result<()> {
        let index = self.games.len();
        self.games.push(record);
        let record = &self.games[index];

        info!(
            "Recorded match #{}: {} {} - {} {}",
            self.games.len(),
            record.player1,
            record.score1,
            record.score2,
            record.player2
        );
        if let Some(metrics) = &self.metrics {
            metrics.record_match();
        }

        for algorithm in self.algorithms.iter_mut() {
            let started = Instant::now();
            if let Err(e) = algorithm.update_with_match(record) {
                error!(
                    "Rating system {} failed on match {}: {}",
                    algorithm.name(),
                    record.id,
                    e
                );
                if let Some(metrics) = &self.metrics {
                    metrics.record_algorithm_failure(algorithm.name());
                }
                return Err(match e.downcast::<RatingError>() {
                    Ok(err @ RatingError::AlgorithmInvariantViolation { .. }) => err.into(),
                    Ok(other) => RatingError::invariant(algorithm.name(), other.to_string()).into(),
                    Err(other) => RatingError::invariant(algorithm.name(), other.to_string()).into(),
                });
            }

            if let Some(metrics) = &self.metrics {
                metrics.observe_update(algorithm.name(), started.elapsed());
                metrics.set_player_count(algorithm.name(), algorithm.player_count());
            }
        }

        Ok(())
    }

    /// Every player's current rating per system, best first, ties in registration order
    pub fn current_standings(&self) -> BySystem<Vec<Standing>> {
        self.algorithms
            .iter()
            .map(|algorithm| {
                let mut standings = algorithm.current_ratings();
                sort_standings_descending(&mut standings);
                (algorithm.name().to_string(), standings)
            })
            .collect()
    }

    /// The canonical match log in the order matches were recorded
    pub fn full_history(&self) -> &[MatchRecord] {
        &self.games
    }

    /// A player's snapshot history per system, empty where the player is unknown
    pub fn player_trajectory(&self, player: &str) -> BySystem<Vec<RatingSnapshot>> {
        self.algorithms
            .iter()
            .map(|algorithm| (algorithm.name().to_string(), algorithm.player_history(player)))
            .collect()
    }

    /// Names of the registered systems in registration order
    pub fn system_names(&self) -> Vec<&'static str> {
        self.algorithms.iter().map(|a| a.name()).collect()
    }

    pub fn match_count(&self) -> usize {
        self.games.len()
    }

    /// Every player in the canonical log, in the order they first appeared
    pub fn player_names(&self) -> Vec<PlayerId> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for game in &self.games {
            for player in [&game.player1, &game.player2] {
                if seen.insert(player.as_str()) {
                    names.push(player.clone());
                }
            }
        }
        names
    }
}

impl Default for RatingRegistry {
    /// Registry with the four standard systems and their default constants
    fn default() -> Self {
        Self {
            algorithms: vec![
                Box::new(NetPromoterRating::default()),
                Box::new(WinsMinusLossesRating::default()),
                Box::new(RpiRating::default()),
                Box::new(EloRatingSystem::default()),
            ],
            games: Vec::new(),
            metrics: None,
        }
    }
}
