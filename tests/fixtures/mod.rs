//! Test fixtures shared by the integration tests
#![allow(dead_code)]

use foosball_ratings::{MatchSubmission, RatingRegistry};
use std::path::PathBuf;

pub const NET_PROMOTER: &str = "Net Promoter Score";
pub const WINS_MINUS_LOSSES: &str = "Wins Minus Losses";
pub const RPI: &str = "Rating Percentage Index";
pub const ELO: &str = "Elo";

/// Path of the sample league shipped with the crate
pub fn sample_games_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/sample_games.json")
}

/// The sample league: fourteen games between Alex, Barrett, Joel and Tim
pub fn sample_games() -> Vec<MatchSubmission> {
    let contents =
        std::fs::read_to_string(sample_games_path()).expect("sample games file should exist");
    serde_json::from_str(&contents).expect("sample games should parse")
}

/// Registry with the default systems after replaying `games`
pub fn registry_with(games: &[MatchSubmission]) -> RatingRegistry {
    let mut registry = RatingRegistry::default();
    for game in games {
        registry
            .submit(game.clone())
            .expect("fixture games should be valid");
    }
    registry
}

/// Count how many games in `games` `player` took part in
pub fn appearances(games: &[MatchSubmission], player: &str) -> usize {
    games
        .iter()
        .filter(|g| g.player1 == player || g.player2 == player)
        .count()
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {} to be close to {}",
        actual,
        expected
    );
}
