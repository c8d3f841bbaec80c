//! Rating algorithm trait, snapshot types and the per-algorithm player ledger
//!
//! Every algorithm owns a [`PlayerLedger`] mapping players to their
//! append-only snapshot history. The first element of each history is the
//! baseline created when the player is first seen; the last element is the
//! player's current rating.

use crate::error::Result;
use crate::types::{MatchRecord, PlayerId, Standing};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Trait implemented by every rating method the registry fans matches out to
#[cfg_attr(test, mockall::automock)]
pub trait RatingAlgorithm: Send + Sync {
    /// Name reported in standings and trajectories
    fn name(&self) -> &'static str;

    /// Fold one validated match into the algorithm's state.
    ///
    /// Total over valid records; an error here signals a broken invariant,
    /// never bad input.
    fn update_with_match(&mut self, record: &MatchRecord) -> Result<()>;

    /// Current rating of every known player, in registration order
    fn current_ratings(&self) -> Vec<Standing>;

    /// Full snapshot history of one player, empty if the player is unknown
    fn player_history(&self, player: &str) -> Vec<RatingSnapshot>;

    /// Number of players this algorithm has registered
    fn player_count(&self) -> usize;
}

/// Net Promoter Score state after one game
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NetPromoterSnapshot {
    pub rating: f64,
    pub games_played: u32,
    pub promoters: u32,
    pub detractors: u32,
}

/// Wins Minus Losses state after one game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinsMinusLossesSnapshot {
    pub rating: i64,
}

/// Elo state after one game
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EloSnapshot {
    pub rating: f64,
    /// Whether this entry came from the provisional blending rule
    pub provisional: bool,
}

/// Rating Percentage Index state, as recomputed over the full history
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RpiSnapshot {
    pub rating: f64,
    pub wins: u32,
    pub games_played: u32,
    pub wp: f64,
    pub owp: f64,
    pub oowp: f64,
}

/// One entry of a player's history under any algorithm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "system", rename_all = "snake_case")]
pub enum RatingSnapshot {
    NetPromoter(NetPromoterSnapshot),
    WinsMinusLosses(WinsMinusLossesSnapshot),
    Elo(EloSnapshot),
    RatingPercentageIndex(RpiSnapshot),
}

impl RatingSnapshot {
    /// Scalar rating every snapshot exposes
    pub fn rating(&self) -> f64 {
        match self {
            RatingSnapshot::NetPromoter(s) => s.rating,
            RatingSnapshot::WinsMinusLosses(s) => s.rating as f64,
            RatingSnapshot::Elo(s) => s.rating,
            RatingSnapshot::RatingPercentageIndex(s) => s.rating,
        }
    }
}

impl From<NetPromoterSnapshot> for RatingSnapshot {
    fn from(snapshot: NetPromoterSnapshot) -> Self {
        RatingSnapshot::NetPromoter(snapshot)
    }
}

impl From<WinsMinusLossesSnapshot> for RatingSnapshot {
    fn from(snapshot: WinsMinusLossesSnapshot) -> Self {
        RatingSnapshot::WinsMinusLosses(snapshot)
    }
}

impl From<EloSnapshot> for RatingSnapshot {
    fn from(snapshot: EloSnapshot) -> Self {
        RatingSnapshot::Elo(snapshot)
    }
}

impl From<RpiSnapshot> for RatingSnapshot {
    fn from(snapshot: RpiSnapshot) -> Self {
        RatingSnapshot::RatingPercentageIndex(snapshot)
    }
}

/// Player registry owned by a single algorithm
#[derive(Debug, Clone)]
pub struct PlayerLedger<S> {
    /// Registration order, used to break rating ties
    order: Vec<PlayerId>,
    histories: HashMap<PlayerId, Vec<S>>,
}

impl<S: Clone> PlayerLedger<S> {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            histories: HashMap::new(),
        }
    }

    /// Register `player` with `baseline` unless already known
    pub fn ensure_player(&mut self, player: &str, baseline: S) {
        if !self.histories.contains_key(player) {
            self.order.push(player.to_string());
            self.histories.insert(player.to_string(), vec![baseline]);
        }
    }

    /// Latest snapshot, registering the player first if needed
    pub fn current_or_register(&mut self, player: &str, baseline: S) -> S {
        self.ensure_player(player, baseline.clone());
        self.current(player).unwrap_or(baseline)
    }

    pub fn current(&self, player: &str) -> Option<S> {
        self.histories
            .get(player)
            .and_then(|history| history.last())
            .cloned()
    }

    /// Number of snapshots recorded for `player`, baseline included
    pub fn snapshot_count(&self, player: &str) -> usize {
        self.histories.get(player).map_or(0, Vec::len)
    }

    /// Append a new snapshot; earlier entries are never touched
    pub fn push(&mut self, player: &str, snapshot: S) {
        if let Some(history) = self.histories.get_mut(player) {
            history.push(snapshot);
        }
    }

    pub fn history(&self, player: &str) -> &[S] {
        match self.histories.get(player) {
            Some(history) => history,
            None => &[],
        }
    }

    /// Players in the order they were first seen
    pub fn players(&self) -> impl Iterator<Item = &PlayerId> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Current rating of every player in registration order
    pub fn standings(&self, rating: impl Fn(&S) -> f64) -> Vec<Standing> {
        self.order
            .iter()
            .filter_map(|player| {
                self.histories
                    .get(player)
                    .and_then(|history| history.last())
                    .map(|current| Standing::new(player.clone(), rating(current)))
            })
            .collect()
    }
}

impl<S: Clone> Default for PlayerLedger<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_registers_once_with_baseline() {
        let mut ledger = PlayerLedger::new();
        ledger.ensure_player("Alex", WinsMinusLossesSnapshot { rating: 0 });
        ledger.ensure_player("Alex", WinsMinusLossesSnapshot { rating: 99 });

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.snapshot_count("Alex"), 1);
        assert_eq!(ledger.current("Alex").unwrap().rating, 0);
    }

    #[test]
    fn test_ledger_push_is_append_only() {
        let mut ledger = PlayerLedger::new();
        let baseline = WinsMinusLossesSnapshot { rating: 0 };
        let mut current = ledger.current_or_register("Alex", baseline);
        current.rating += 1;
        ledger.push("Alex", current);

        let history = ledger.history("Alex");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].rating, 0);
        assert_eq!(history[1].rating, 1);
    }

    #[test]
    fn test_ledger_unknown_player() {
        let ledger: PlayerLedger<EloSnapshot> = PlayerLedger::new();
        assert!(ledger.history("Nobody").is_empty());
        assert_eq!(ledger.snapshot_count("Nobody"), 0);
        assert!(ledger.current("Nobody").is_none());
    }

    #[test]
    fn test_ledger_standings_follow_registration_order() {
        let mut ledger = PlayerLedger::new();
        ledger.ensure_player("Tim", WinsMinusLossesSnapshot { rating: 0 });
        ledger.ensure_player("Alex", WinsMinusLossesSnapshot { rating: 0 });
        ledger.push("Alex", WinsMinusLossesSnapshot { rating: 3 });

        let standings = ledger.standings(|s| s.rating as f64);
        assert_eq!(standings[0], Standing::new("Tim", 0.0));
        assert_eq!(standings[1], Standing::new("Alex", 3.0));
    }

    #[test]
    fn test_snapshot_rating_and_serialization() {
        let snapshot: RatingSnapshot = WinsMinusLossesSnapshot { rating: -2 }.into();
        assert_eq!(snapshot.rating(), -2.0);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["system"], "wins_minus_losses");
        assert_eq!(json["rating"], -2);
    }
}
