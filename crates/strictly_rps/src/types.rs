//! Core domain types for rock/paper/scissors.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// One of the three throws a player can make.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Throw {
    /// Blunts scissors.
    Rock,
    /// Covers rock.
    Paper,
    /// Cuts paper.
    Scissors,
}

impl Throw {
    /// Parses a move token, ignoring surrounding whitespace and case.
    ///
    /// Returns `None` for anything other than `rock`, `paper`, or `scissors`.
    #[instrument]
    pub fn parse(text: &str) -> Option<Self> {
        text.parse().ok()
    }

    /// Returns true if this throw defeats `other`.
    pub fn beats(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Throw::Rock, Throw::Scissors)
                | (Throw::Scissors, Throw::Paper)
                | (Throw::Paper, Throw::Rock)
        )
    }
}

impl FromStr for Throw {
    type Err = ParseThrowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rock" => Ok(Throw::Rock),
            "paper" => Ok(Throw::Paper),
            "scissors" => Ok(Throw::Scissors),
            _ => Err(ParseThrowError {
                token: s.trim().to_string(),
            }),
        }
    }
}

/// A token that is not one of the three throws.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Invalid move: {:?}", token)]
pub struct ParseThrowError {
    /// The rejected token, trimmed.
    pub token: String,
}

/// Result of a single exchange from one player's point of view.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Outcome {
    /// This player's throw beat the opponent's.
    Win,
    /// The opponent's throw beat this player's.
    Lose,
    /// Both players threw the same thing.
    Draw,
}

impl Outcome {
    /// Returns the outcome the opponent sees.
    pub fn complement(self) -> Self {
        match self {
            Outcome::Win => Outcome::Lose,
            Outcome::Lose => Outcome::Win,
            Outcome::Draw => Outcome::Draw,
        }
    }
}
