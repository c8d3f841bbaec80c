//! Rating systems and the registry that runs them side by side
//!
//! This module provides the [`RatingAlgorithm`] interface, the four
//! algorithms (Net Promoter Score, Wins Minus Losses, Rating Percentage Index
//! and Elo) and the [`RatingRegistry`] that owns the canonical match log.

pub mod algorithm;
pub mod elo;
pub mod net_promoter;
pub mod registry;
pub mod rpi;
pub mod wins_minus_losses;

// Re-export commonly used types
pub use algorithm::{
    EloSnapshot, NetPromoterSnapshot, PlayerLedger, RatingAlgorithm, RatingSnapshot,
    RpiSnapshot, WinsMinusLossesSnapshot,
};
pub use elo::{EloConfig, EloRatingSystem};
pub use net_promoter::{NetPromoterConfig, NetPromoterRating};
pub use registry::RatingRegistry;
pub use rpi::{RpiConfig, RpiRating};
pub use wins_minus_losses::WinsMinusLossesRating;
