//! Common types used throughout the rating engine

use crate::error::{RatingError, Result};
use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::ops::Index;
use uuid::Uuid;

/// Unique identifier for players
pub type PlayerId = String;

/// Unique identifier for recorded matches
pub type MatchId = Uuid;

/// Raw match result as entered by a caller, not yet validated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSubmission {
    pub player1: String,
    pub score1: i64,
    pub player2: String,
    pub score2: i64,
}

impl MatchSubmission {
    pub fn new(
        player1: impl Into<String>,
        score1: i64,
        player2: impl Into<String>,
        score2: i64,
    ) -> Self {
        Self {
            player1: player1.into(),
            score1,
            player2: player2.into(),
            score2,
        }
    }

    /// Validate the submission and turn it into an immutable record
    pub fn validate(self) -> Result<MatchRecord> {
        let player1 = validate_player("player1", &self.player1)?;
        let player2 = validate_player("player2", &self.player2)?;
        if player1 == player2 {
            return Err(RatingError::invalid_match(format!(
                "player {} cannot play against themselves",
                player1
            ))
            .into());
        }

        Ok(MatchRecord {
            id: crate::utils::generate_match_id(),
            player1,
            score1: validate_score("score1", self.score1)?,
            player2,
            score2: validate_score("score2", self.score2)?,
            recorded_at: crate::utils::current_timestamp(),
        })
    }
}

fn validate_player(field: &str, name: &str) -> Result<PlayerId> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RatingError::invalid_match(format!("{} must not be empty", field)).into());
    }
    Ok(trimmed.to_string())
}

fn validate_score(field: &str, score: i64) -> Result<u32> {
    u32::try_from(score).map_err(|_| {
        anyhow::Error::from(RatingError::invalid_match(format!(
            "{} must be a non-negative integer no larger than {}, got {}",
            field,
            u32::MAX,
            score
        )))
    })
}

/// One completed game between two players; never mutated once logged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub player1: PlayerId,
    pub score1: u32,
    pub player2: PlayerId,
    pub score2: u32,
    pub recorded_at: DateTime<Utc>,
}

impl MatchRecord {
    /// Score difference from player1's point of view
    pub fn margin(&self) -> i64 {
        i64::from(self.score1) - i64::from(self.score2)
    }

    pub fn is_draw(&self) -> bool {
        self.score1 == self.score2
    }

    pub fn winner(&self) -> Option<&str> {
        match self.margin() {
            m if m > 0 => Some(&self.player1),
            m if m < 0 => Some(&self.player2),
            _ => None,
        }
    }

    pub fn loser(&self) -> Option<&str> {
        match self.margin() {
            m if m > 0 => Some(&self.player2),
            m if m < 0 => Some(&self.player1),
            _ => None,
        }
    }

    pub fn involves(&self, player: &str) -> bool {
        self.player1 == player || self.player2 == player
    }

    /// The other participant, if `player` took part
    pub fn opponent_of(&self, player: &str) -> Option<&str> {
        if self.player1 == player {
            Some(&self.player2)
        } else if self.player2 == player {
            Some(&self.player1)
        } else {
            None
        }
    }
}

/// A player's current rating under one algorithm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub player: PlayerId,
    pub rating: f64,
}

impl Standing {
    pub fn new(player: impl Into<PlayerId>, rating: f64) -> Self {
        Self {
            player: player.into(),
            rating,
        }
    }
}

/// Per-algorithm results keyed by algorithm name, kept in registration order
#[derive(Debug, Clone, PartialEq)]
pub struct BySystem<T> {
    entries: Vec<(String, T)>,
}

impl<T> BySystem<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, system: impl Into<String>, value: T) {
        self.entries.push((system.into(), value));
    }

    pub fn get(&self, system: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(name, _)| name == system)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn systems(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for BySystem<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<&str> for BySystem<T> {
    type Output = T;

    fn index(&self, system: &str) -> &T {
        match self.get(system) {
            Some(value) => value,
            None => panic!("no rating system named {:?}", system),
        }
    }
}

impl<T> FromIterator<(String, T)> for BySystem<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<T: Serialize> Serialize for BySystem<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
