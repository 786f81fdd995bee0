//! Outcome table for rock/paper/scissors.

use super::types::{Outcome, Throw};
use tracing::instrument;

/// Decides the outcome of `mine` against `theirs`.
///
/// Total over all nine ordered pairs. Equal throws draw, otherwise the
/// cyclic dominance rock > scissors > paper > rock decides.
#[instrument]
pub fn outcome_for(mine: Throw, theirs: Throw) -> Outcome {
    use Throw::*;

    match (mine, theirs) {
        (Rock, Rock) | (Paper, Paper) | (Scissors, Scissors) => Outcome::Draw,
        (Rock, Scissors) | (Scissors, Paper) | (Paper, Rock) => Outcome::Win,
        (Rock, Paper) | (Paper, Scissors) | (Scissors, Rock) => Outcome::Lose,
    }
}
