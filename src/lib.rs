//! Foosball Ratings - incremental skill ratings for two-player matches
//!
//! This crate keeps a canonical, append-only log of match results and runs
//! several independent rating systems over it side by side: Net Promoter
//! Score, Wins Minus Losses, Rating Percentage Index and Elo.

pub mod config;
pub mod error;
pub mod metrics;
pub mod rating;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{RatingError, Result};
pub use types::*;

// Re-export key components
pub use rating::{RatingAlgorithm, RatingRegistry, RatingSnapshot};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
