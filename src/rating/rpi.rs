//! Rating Percentage Index
//!
//! Ratings are a weighted blend of a player's own win percentage (WP), their
//! opponents' win percentage (OWP) and their opponents' opponents' win
//! percentage (OOWP). OWP and OOWP depend on the whole match graph, so every
//! new match triggers a full recomputation over the algorithm's private copy
//! of the history. Only the two participants of the triggering match get a
//! new snapshot; everyone else keeps their last materialized entry.

use crate::error::{RatingError, Result};
use crate::rating::algorithm::{PlayerLedger, RatingAlgorithm, RatingSnapshot, RpiSnapshot};
use crate::types::{MatchRecord, PlayerId, Standing};
use crate::utils::ratio_or_zero;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

pub const RPI_NAME: &str = "Rating Percentage Index";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpiConfig {
    pub wp_weight: f64,
    pub owp_weight: f64,
    pub oowp_weight: f64,
}

impl Default for RpiConfig {
    fn default() -> Self {
        Self {
            wp_weight: 0.25,
            owp_weight: 0.5,
            oowp_weight: 0.25,
        }
    }
}

impl RpiConfig {
    pub fn validate(&self) -> Result<()> {
        let weights = [self.wp_weight, self.owp_weight, self.oowp_weight];
        if weights.iter().any(|w| *w < 0.0 || !w.is_finite()) {
            return Err(RatingError::ConfigurationError {
                message: "RPI weights must be non-negative".to_string(),
            }
            .into());
        }

        let total: f64 = weights.iter().sum();
        if (total - 1.0).abs() > 1e-9 {
            return Err(RatingError::ConfigurationError {
                message: format!("RPI weights must sum to 1, got {}", total),
            }
            .into());
        }

        Ok(())
    }
}

/// Wins and games, signed so that a bad subtraction is detectable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Tally {
    wins: i64,
    games: i64,
}

/// Win percentage of an opponent with the games against the rated player removed
fn adjusted_win_percentage(total: Tally, against_player: Tally) -> Result<f64> {
    let wins = total.wins - against_player.wins;
    let games = total.games - against_player.games;
    if games < 0 || wins < 0 || wins > games {
        return Err(RatingError::invariant(
            RPI_NAME,
            format!(
                "adjusted opponent record of {} wins in {} games",
                wins, games
            ),
        )
        .into());
    }
    Ok(ratio_or_zero(wins as f64, games as f64))
}

#[derive(Debug, Default)]
pub struct RpiRating {
    config: RpiConfig,
    ledger: PlayerLedger<RpiSnapshot>,
    /// Private copy of every match seen, in arrival order
    games: Vec<MatchRecord>,
}

impl RpiRating {
    pub fn new(config: RpiConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ledger: PlayerLedger::new(),
            games: Vec::new(),
        })
    }

    /// Recompute every player's RPI from the full match history
    fn recompute(&self) -> Result<HashMap<PlayerId, RpiSnapshot>> {
        let mut tallies: HashMap<&str, Tally> = HashMap::new();
        // (player, opponent) -> player's record in games against opponent
        let mut head_to_head: HashMap<(&str, &str), Tally> = HashMap::new();

        for game in &self.games {
            let pairs = [
                (game.player1.as_str(), game.player2.as_str()),
                (game.player2.as_str(), game.player1.as_str()),
            ];
            for (player, opponent) in pairs {
                tallies.entry(player).or_default().games += 1;
                head_to_head.entry((player, opponent)).or_default().games += 1;
            }
            if let (Some(winner), Some(loser)) = (game.winner(), game.loser()) {
                tallies.entry(winner).or_default().wins += 1;
                head_to_head.entry((winner, loser)).or_default().wins += 1;
            }
        }

        // (player, opponent) -> opponent's WP excluding games against player
        let mut adjusted: HashMap<(&str, &str), f64> = HashMap::new();
        for &(player, opponent) in head_to_head.keys() {
            let total = tallies.get(opponent).copied().unwrap_or_default();
            let against = head_to_head
                .get(&(opponent, player))
                .copied()
                .unwrap_or_default();
            adjusted.insert((player, opponent), adjusted_win_percentage(total, against)?);
        }

        let mut owp_sums: HashMap<&str, f64> = HashMap::new();
        for game in &self.games {
            let (first, second) = (game.player1.as_str(), game.player2.as_str());
            *owp_sums.entry(first).or_default() +=
                adjusted.get(&(first, second)).copied().unwrap_or_default();
            *owp_sums.entry(second).or_default() +=
                adjusted.get(&(second, first)).copied().unwrap_or_default();
        }

        let games_of = |player: &str| tallies.get(player).map_or(0, |t| t.games) as f64;
        let owp: HashMap<&str, f64> = owp_sums
            .iter()
            .map(|(player, sum)| (*player, ratio_or_zero(*sum, games_of(*player))))
            .collect();

        let mut oowp_sums: HashMap<&str, f64> = HashMap::new();
        for game in &self.games {
            let (first, second) = (game.player1.as_str(), game.player2.as_str());
            *oowp_sums.entry(first).or_default() += owp.get(second).copied().unwrap_or_default();
            *oowp_sums.entry(second).or_default() += owp.get(first).copied().unwrap_or_default();
        }

        let mut snapshots = HashMap::with_capacity(tallies.len());
        for (player, tally) in &tallies {
            if tally.games < 0 || tally.wins < 0 {
                return Err(RatingError::invariant(
                    RPI_NAME,
                    format!("{} has a negative record", player),
                )
                .into());
            }

            let games = tally.games as f64;
            let wp = ratio_or_zero(tally.wins as f64, games);
            let player_owp = owp.get(player).copied().unwrap_or_default();
            let player_oowp =
                ratio_or_zero(oowp_sums.get(player).copied().unwrap_or_default(), games);
            let rating = 100.0
                * (self.config.wp_weight * wp
                    + self.config.owp_weight * player_owp
                    + self.config.oowp_weight * player_oowp);

            snapshots.insert(
                player.to_string(),
                RpiSnapshot {
                    rating,
                    wins: tally.wins as u32,
                    games_played: tally.games as u32,
                    wp,
                    owp: player_owp,
                    oowp: player_oowp,
                },
            );
        }

        Ok(snapshots)
    }
}

impl RatingAlgorithm for RpiRating {
    fn name(&self) -> &'static str {
        RPI_NAME
    }

    fn update_with_match(&mut self, record: &MatchRecord) -> Result<()> {
        self.ledger
            .ensure_player(&record.player1, RpiSnapshot::default());
        self.ledger
            .ensure_player(&record.player2, RpiSnapshot::default());
        self.games.push(record.clone());

        let table = self.recompute()?;

        for player in [&record.player1, &record.player2] {
            let snapshot = table.get(player.as_str()).copied().ok_or_else(|| {
                RatingError::invariant(RPI_NAME, format!("{} missing after recompute", player))
            })?;
            debug!(
                "{}: {} -> {:.2} (WP {:.3}, OWP {:.3}, OOWP {:.3})",
                RPI_NAME, player, snapshot.rating, snapshot.wp, snapshot.owp, snapshot.oowp
            );
            self.ledger.push(player, snapshot);
        }

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MatchSubmission;

    const EPSILON: f64 = 1e-9;

    fn play(rpi: &mut RpiRating, p1: &str, s1: i64, p2: &str, s2: i64) {
        let record = MatchSubmission::new(p1, s1, p2, s2).validate().unwrap();
        rpi.update_with_match(&record).unwrap();
    }

    fn current(rpi: &RpiRating, player: &str) -> RpiSnapshot {
        rpi.ledger.current(player).unwrap()
    }

    #[test]
    fn test_config_validation() {
        assert!(RpiConfig::default().validate().is_ok());

        let config = RpiConfig {
            wp_weight: 0.5,
            owp_weight: 0.5,
            oowp_weight: 0.5,
        };
        assert!(config.validate().is_err());

        let config = RpiConfig {
            wp_weight: -0.25,
            owp_weight: 1.0,
            oowp_weight: 0.25,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_baseline_has_zero_percentages() {
        let baseline = RpiSnapshot::default();
        assert_eq!(baseline.wp, 0.0);
        assert_eq!(baseline.rating, 0.0);
        assert_eq!(baseline.games_played, 0);
    }

    #[test]
    fn test_single_game() {
        let mut rpi = RpiRating::default();
        play(&mut rpi, "Alex", 5, "Barrett", 3);

        // each side's only opponent has no games left once head-to-head is removed
        let alex = current(&rpi, "Alex");
        assert_eq!(alex.wp, 1.0);
        assert_eq!(alex.owp, 0.0);
        assert_eq!(alex.oowp, 0.0);
        assert!((alex.rating - 25.0).abs() < EPSILON);

        let barrett = current(&rpi, "Barrett");
        assert_eq!(barrett.wp, 0.0);
        assert_eq!(barrett.rating, 0.0);
    }

    #[test]
    fn test_draw_is_a_game_without_wins() {
        let mut rpi = RpiRating::default();
        play(&mut rpi, "Alex", 2, "Barrett", 2);

        for player in ["Alex", "Barrett"] {
            let snapshot = current(&rpi, player);
            assert_eq!(snapshot.games_played, 1);
            assert_eq!(snapshot.wins, 0);
            assert_eq!(snapshot.wp, 0.0);
            assert!(!snapshot.rating.is_nan());
        }
    }

    #[test]
    fn test_chain_of_results() {
        let mut rpi = RpiRating::default();
        play(&mut rpi, "Alex", 5, "Barrett", 1);
        play(&mut rpi, "Barrett", 5, "Joel", 2);

        // Barrett beat Joel, Alex's only opponent is 1-0 outside their game
        let table = rpi.recompute().unwrap();
        let alex = table["Alex"];
        assert!((alex.owp - 1.0).abs() < EPSILON);
        assert!((alex.oowp - 0.0).abs() < EPSILON);
        assert!((alex.rating - 75.0).abs() < EPSILON);

        let barrett = current(&rpi, "Barrett");
        assert!((barrett.wp - 0.5).abs() < EPSILON);
        assert!((barrett.owp - 0.0).abs() < EPSILON);
        assert!((barrett.oowp - 0.5).abs() < EPSILON);
        assert!((barrett.rating - 25.0).abs() < EPSILON);

        assert_eq!(current(&rpi, "Joel").rating, 0.0);
    }

    #[test]
    fn test_only_participants_get_new_snapshots() {
        let mut rpi = RpiRating::default();
        play(&mut rpi, "Alex", 5, "Barrett", 1);
        play(&mut rpi, "Barrett", 5, "Joel", 2);

        // Alex's live RPI moved to 75 but the materialized history is untouched
        let alex_history = rpi.player_history("Alex");
        assert_eq!(alex_history.len(), 2);
        assert!((alex_history[1].rating() - 25.0).abs() < EPSILON);
        assert_eq!(rpi.player_history("Barrett").len(), 3);
        assert_eq!(rpi.player_history("Joel").len(), 2);
    }

    #[test]
    fn test_adjusted_win_percentage() {
        let total = Tally { wins: 3, games: 4 };
        let against = Tally { wins: 1, games: 2 };
        assert_eq!(adjusted_win_percentage(total, against).unwrap(), 1.0);

        let only_games = Tally { wins: 1, games: 1 };
        assert_eq!(adjusted_win_percentage(only_games, only_games).unwrap(), 0.0);
    }

    #[test]
    fn test_negative_adjusted_games_is_invariant_violation() {
        let total = Tally { wins: 0, games: 1 };
        let against = Tally { wins: 0, games: 2 };
        let err = adjusted_win_percentage(total, against).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RatingError>(),
            Some(RatingError::AlgorithmInvariantViolation { .. })
        ));
    }
}
