//! Wins Minus Losses rating

use crate::error::Result;
use crate::rating::algorithm::{
    PlayerLedger, RatingAlgorithm, RatingSnapshot, WinsMinusLossesSnapshot,
};
use crate::types::{MatchRecord, Standing};
use tracing::debug;

pub const WINS_MINUS_LOSSES_NAME: &str = "Wins Minus Losses";

/// +1 for a win, -1 for a loss, nothing for a draw
#[derive(Debug, Default)]
pub struct WinsMinusLossesRating {
    ledger: PlayerLedger<WinsMinusLossesSnapshot>,
}

impl WinsMinusLossesRating {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RatingAlgorithm for WinsMinusLossesRating {
    fn name(&self) -> &'static str {
        WINS_MINUS_LOSSES_NAME
    }

    fn update_with_match(&mut self, record: &MatchRecord) -> Result<()> {
        let baseline = WinsMinusLossesSnapshot::default();
        let mut first = self.ledger.current_or_register(&record.player1, baseline);
        let mut second = self.ledger.current_or_register(&record.player2, baseline);

        let swing = record.margin().signum();
        first.rating += swing;
        second.rating -= swing;

        debug!(
            "{}: {} -> {}, {} -> {}",
            WINS_MINUS_LOSSES_NAME, record.player1, first.rating, record.player2, second.rating
        );

        // draws still append, one history entry per game played
        self.ledger.push(&record.player1, first);
        self.ledger.push(&record.player2, second);
        Ok(())
    }

    fn current_ratings(&self) -> Vec<Standing> {
        self.ledger.standings(|s| s.rating as f64)
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

    fn play(rating: &mut WinsMinusLossesRating, p1: &str, s1: i64, p2: &str, s2: i64) {
        let record = MatchSubmission::new(p1, s1, p2, s2).validate().unwrap();
        rating.update_with_match(&record).unwrap();
    }

    #[test]
    fn test_win_and_loss() {
        let mut wml = WinsMinusLossesRating::new();
        play(&mut wml, "Alex", 5, "Barrett", 3);

        let standings = wml.current_ratings();
        assert_eq!(standings[0], Standing::new("Alex", 1.0));
        assert_eq!(standings[1], Standing::new("Barrett", -1.0));
    }

    #[test]
    fn test_draw_appends_unchanged_snapshot() {
        let mut wml = WinsMinusLossesRating::new();
        play(&mut wml, "Alex", 5, "Barrett", 3);
        play(&mut wml, "Alex", 4, "Barrett", 4);

        let history = wml.player_history("Alex");
        assert_eq!(history.len(), 3);
        assert_eq!(history[1], history[2]);
        assert_eq!(history[2].rating(), 1.0);
    }

    #[test]
    fn test_zero_sum() {
        let mut wml = WinsMinusLossesRating::new();
        play(&mut wml, "Alex", 5, "Barrett", 3);
        play(&mut wml, "Joel", 5, "Barrett", 3);
        play(&mut wml, "Tim", 0, "Alex", 5);
        play(&mut wml, "Tim", 2, "Joel", 2);

        let total: f64 = wml.current_ratings().iter().map(|s| s.rating).sum();
        assert_eq!(total, 0.0);
        assert_eq!(wml.player_count(), 4);
    }

    #[test]
    fn test_unknown_player_history_is_empty() {
        let wml = WinsMinusLossesRating::new();
        assert!(wml.player_history("Nobody").is_empty());
    }
}
