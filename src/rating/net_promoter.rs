//! Net Promoter Score rating
//!
//! Winners by a wide enough margin count as promoters, losers count as
//! detractors, narrow wins and draws count as neither. The rating is
//! `100 * (promoters - detractors) / games_played`.

use crate::error::{RatingError, Result};
use crate::rating::algorithm::{NetPromoterSnapshot, PlayerLedger, RatingAlgorithm, RatingSnapshot};
use crate::types::{MatchRecord, Standing};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const NET_PROMOTER_NAME: &str = "Net Promoter Score";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetPromoterConfig {
    /// Minimum winning margin that earns a promoter credit
    pub promoter_margin: u32,
}

impl Default for NetPromoterConfig {
    fn default() -> Self {
        Self { promoter_margin: 2 }
    }
}

impl NetPromoterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.promoter_margin == 0 {
            return Err(RatingError::ConfigurationError {
                message: "Promoter margin must be at least 1".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct NetPromoterRating {
    config: NetPromoterConfig,
    ledger: PlayerLedger<NetPromoterSnapshot>,
}

impl NetPromoterRating {
    pub fn new(config: NetPromoterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ledger: PlayerLedger::new(),
        })
    }

    fn rescore(snapshot: &mut NetPromoterSnapshot) {
        let net = f64::from(snapshot.promoters) - f64::from(snapshot.detractors);
        // games_played is at least 1 here, every caller increments it first
        snapshot.rating = 100.0 * net / f64::from(snapshot.games_played);
    }
}

impl RatingAlgorithm for NetPromoterRating {
    fn name(&self) -> &'static str {
        NET_PROMOTER_NAME
    }

    fn update_with_match(&mut self, record: &MatchRecord) -> Result<()> {
        let baseline = NetPromoterSnapshot::default();
        let mut first = self.ledger.current_or_register(&record.player1, baseline);
        let mut second = self.ledger.current_or_register(&record.player2, baseline);

        let margin = record.margin();
        let promoter_margin = i64::from(self.config.promoter_margin);
        if margin > 0 {
            second.detractors += 1;
            if margin >= promoter_margin {
                first.promoters += 1;
            }
        } else if margin < 0 {
            first.detractors += 1;
            if -margin >= promoter_margin {
                second.promoters += 1;
            }
        }

        first.games_played += 1;
        second.games_played += 1;
        Self::rescore(&mut first);
        Self::rescore(&mut second);

        debug!(
            "{}: {} -> {:.2}, {} -> {:.2}",
            NET_PROMOTER_NAME, record.player1, first.rating, record.player2, second.rating
        );

        self.ledger.push(&record.player1, first);
        self.ledger.push(&record.player2, second);
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
