//! Utility functions for the rating engine

use crate::types::{MatchId, Standing};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use uuid::Uuid;

/// Generate a new unique match ID
pub fn generate_match_id() -> MatchId {
    Uuid::new_v4()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Sort standings by rating, highest first.
///
/// The sort is stable, so players with equal ratings keep the order in which
/// the algorithm first registered them.
pub fn sort_standings_descending(standings: &mut [Standing]) {
    standings.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal));
}

/// Divide, treating an empty denominator as a zero contribution
pub fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_unique_ids() {
        let id1 = generate_match_id();
        let id2 = generate_match_id();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_sort_standings_is_stable_on_ties() {
        let mut standings = vec![
            Standing::new("Alex", 0.0),
            Standing::new("Barrett", 2.0),
            Standing::new("Joel", 0.0),
            Standing::new("Tim", 2.0),
        ];
        sort_standings_descending(&mut standings);

        let order: Vec<&str> = standings.iter().map(|s| s.player.as_str()).collect();
        assert_eq!(order, vec!["Barrett", "Tim", "Alex", "Joel"]);
    }

    #[test]
    fn test_ratio_or_zero() {
        assert_eq!(ratio_or_zero(3.0, 4.0), 0.75);
        assert_eq!(ratio_or_zero(0.0, 0.0), 0.0);
        assert_eq!(ratio_or_zero(5.0, 0.0), 0.0);
    }
}
