//! Rating system configuration

use crate::error::{RatingError, Result};
use crate::rating::elo::EloConfig;
use crate::rating::net_promoter::NetPromoterConfig;
use crate::rating::rpi::RpiConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// The rating algorithms the engine knows how to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingSystemKind {
    NetPromoter,
    WinsMinusLosses,
    RatingPercentageIndex,
    Elo,
}

impl RatingSystemKind {
    /// Canonical registration order
    pub fn all() -> Vec<RatingSystemKind> {
        vec![
            RatingSystemKind::NetPromoter,
            RatingSystemKind::WinsMinusLosses,
            RatingSystemKind::RatingPercentageIndex,
            RatingSystemKind::Elo,
        ]
    }

    /// Name reported in standings and trajectories
    pub fn display_name(&self) -> &'static str {
        match self {
            RatingSystemKind::NetPromoter => "Net Promoter Score",
            RatingSystemKind::WinsMinusLosses => "Wins Minus Losses",
            RatingSystemKind::RatingPercentageIndex => "Rating Percentage Index",
            RatingSystemKind::Elo => "Elo",
        }
    }
}

impl fmt::Display for RatingSystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for RatingSystemKind {
    type Err = RatingError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(|c: char| c == '-' || c == ' ', "_");
        match normalized.as_str() {
            "net_promoter" | "net_promoter_score" | "nps" => Ok(RatingSystemKind::NetPromoter),
            "wins_minus_losses" | "wml" => Ok(RatingSystemKind::WinsMinusLosses),
            "rating_percentage_index" | "rpi" => Ok(RatingSystemKind::RatingPercentageIndex),
            "elo" => Ok(RatingSystemKind::Elo),
            other => Err(RatingError::ConfigurationError {
                message: format!("Unknown rating system: {}", other),
            }),
        }
    }
}

/// Which systems run, in which order, and with which constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    pub systems: Vec<RatingSystemKind>,
    pub net_promoter: NetPromoterConfig,
    pub elo: EloConfig,
    pub rpi: RpiConfig,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            systems: RatingSystemKind::all(),
            net_promoter: NetPromoterConfig::default(),
            elo: EloConfig::default(),
            rpi: RpiConfig::default(),
        }
    }
}

impl RatingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.systems.is_empty() {
            return Err(RatingError::ConfigurationError {
                message: "At least one rating system must be enabled".to_string(),
            }
            .into());
        }

        let mut seen = HashSet::new();
        for system in &self.systems {
            if !seen.insert(system) {
                return Err(RatingError::ConfigurationError {
                    message: format!("Rating system listed twice: {}", system),
                }
                .into());
            }
        }

        self.net_promoter.validate()?;
        self.elo.validate()?;
        self.rpi.validate()?;
        Ok(())
    }
}
