//! Elo rating with a provisional period
//!
//! New players start at the configured initial rating. While a player has
//! fewer than `provisional_snapshots` entries in their history (baseline
//! included), each result moves them to a blended average of their past
//! rating and the opponent's rating plus or minus a bonus. After that the
//! standard `K * (points - expected)` update applies, with the expected score
//! taken from the skillratings Elo model.

use crate::error::{RatingError, Result};
use crate::rating::algorithm::{EloSnapshot, PlayerLedger, RatingAlgorithm, RatingSnapshot};
use crate::types::{MatchRecord, Standing};
use serde::{Deserialize, Serialize};
use skillratings::elo::{expected_score, EloRating};
use tracing::debug;

pub const ELO_NAME: &str = "Elo";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EloConfig {
    /// Rating given to a player the first time they are seen
    pub initial_rating: f64,
    /// Maximum rating change per game once established
    pub k_factor: f64,
    /// Players with fewer snapshots than this are provisional
    pub provisional_snapshots: usize,
    /// Swing used in the blended average when the opponent is also provisional
    pub provisional_bonus: f64,
    /// Swing used in the blended average against an established opponent
    pub established_bonus: f64,
}

impl Default for EloConfig {
    fn default() -> Self {
        Self {
            initial_rating: 1200.0,
            k_factor: 20.0,
            provisional_snapshots: 5,
            provisional_bonus: 200.0,
            established_bonus: 400.0,
        }
    }
}

impl EloConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.initial_rating.is_finite() {
            return Err(RatingError::ConfigurationError {
                message: "Initial Elo rating must be finite".to_string(),
            }
            .into());
        }

        if self.k_factor <= 0.0 || !self.k_factor.is_finite() {
            return Err(RatingError::ConfigurationError {
                message: "K-factor must be positive".to_string(),
            }
            .into());
        }

        if self.provisional_snapshots == 0 {
            return Err(RatingError::ConfigurationError {
                message: "Provisional threshold must be at least 1 snapshot".to_string(),
            }
            .into());
        }

        if self.provisional_bonus < 0.0 || self.established_bonus < 0.0 {
            return Err(RatingError::ConfigurationError {
                message: "Provisional bonuses must be non-negative".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Pre-match view of one side of a game
#[derive(Debug, Clone, Copy)]
struct Side {
    rating: f64,
    snapshots: usize,
    provisional: bool,
}

#[derive(Debug)]
pub struct EloRatingSystem {
    config: EloConfig,
    ledger: PlayerLedger<EloSnapshot>,
}

impl Default for EloRatingSystem {
    fn default() -> Self {
        Self {
            config: EloConfig::default(),
            ledger: PlayerLedger::new(),
        }
    }
}

impl EloRatingSystem {
    pub fn new(config: EloConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ledger: PlayerLedger::new(),
        })
    }

    fn baseline(&self) -> EloSnapshot {
        EloSnapshot {
            rating: self.config.initial_rating,
            provisional: true,
        }
    }

    fn is_provisional(&self, snapshots: usize) -> bool {
        snapshots < self.config.provisional_snapshots
    }

    fn side(&mut self, player: &str) -> Side {
        let baseline = self.baseline();
        let current = self.ledger.current_or_register(player, baseline);
        let snapshots = self.ledger.snapshot_count(player);
        Side {
            rating: current.rating,
            snapshots,
            provisional: self.is_provisional(snapshots),
        }
    }

    /// Rating change for `player` against `opponent`.
    ///
    /// `outcome` is -1, 0 or 1 from `player`'s point of view and `expected`
    /// is `player`'s expected score; both sides use the same pre-match pair.
    fn delta(&self, player: Side, opponent: Side, outcome: f64, expected: f64) -> f64 {
        if player.provisional {
            let bonus = if opponent.provisional {
                self.config.provisional_bonus
            } else {
                self.config.established_bonus
            };
            let games = player.snapshots as f64;
            (player.rating * games + opponent.rating + bonus * outcome) / (games + 1.0)
                - player.rating
        } else {
            let points = (1.0 + outcome) / 2.0;
            self.config.k_factor * (points - expected)
        }
    }
}

impl RatingAlgorithm for EloRatingSystem {
    fn name(&self) -> &'static str {
        ELO_NAME
    }

    fn update_with_match(&mut self, record: &MatchRecord) -> Result<()> {
        let first = self.side(&record.player1);
        let second = self.side(&record.player2);

        let outcome = record.margin().signum() as f64;
        let (expected_first, expected_second) = expected_score(
            &EloRating {
                rating: first.rating,
            },
            &EloRating {
                rating: second.rating,
            },
        );

        let delta_first = self.delta(first, second, outcome, expected_first);
        let delta_second = self.delta(second, first, -outcome, expected_second);

        let new_first = EloSnapshot {
            rating: first.rating + delta_first,
            provisional: first.provisional,
        };
        let new_second = EloSnapshot {
            rating: second.rating + delta_second,
            provisional: second.provisional,
        };

        debug!(
            "{}: {} {:+.2} -> {:.2}, {} {:+.2} -> {:.2}",
            ELO_NAME,
            record.player1,
            delta_first,
            new_first.rating,
            record.player2,
            delta_second,
            new_second.rating
        );

        self.ledger.push(&record.player1, new_first);
        self.ledger.push(&record.player2, new_second);
        Ok(())
    }

    fn current_ratings(&self) -> Vec<Standing> {
        self.ledger.standings(|s| s.rating)
    }

    fn player_history(&self, player: &str) -> Vec<RatingSnapshot> {
        self.ledger
            .history(player)
            .iter()
            .map(|s| RatingSnapshot::from(*s))
            .collect()
    }

    fn player_count(&self) -> usize {
        self.ledger.len()
    }
}
