//! Outcome resolution strategies.
//!
//! The directory only depends on [`OutcomeResolver`]; each game type supplies
//! its own implementation.

use crate::session::{PlayerId, SessionId};
use derive_getters::Getters;
use derive_new::new;
use std::fmt::{Debug, Display};
use strictly_rps::{Outcome, Throw, outcome_for};
use tracing::{debug, instrument};

/// One participant's view of a resolved round.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct RoundResult<M, O> {
    /// Who this result is for.
    player: PlayerId,
    /// How the round went for them.
    outcome: O,
    /// What their opponent threw.
    opponent_move: M,
    /// The session the round was played in.
    session_id: SessionId,
}

/// Maps a completed round to one result per participant.
pub trait OutcomeResolver {
    /// A single player's move.
    type Move: Clone + Debug + Display + Send;
    /// A single player's result.
    type Outcome: Clone + Debug + Display + Send;

    /// Resolves a two-player round.
    ///
    /// The returned results are in the same order as the arguments.
    fn resolve(
        &self,
        session_id: &SessionId,
        first: (&PlayerId, &Self::Move),
        second: (&PlayerId, &Self::Move),
    ) -> [RoundResult<Self::Move, Self::Outcome>; 2];
}

/// Rock/paper/scissors.
#[derive(Debug, Clone, Copy, Default)]
pub struct RockPaperScissors;

impl OutcomeResolver for RockPaperScissors {
    type Move = Throw;
    type Outcome = Outcome;

    #[instrument(skip(self))]
    fn resolve(
        &self,
        session_id: &SessionId,
        first: (&PlayerId, &Throw),
        second: (&PlayerId, &Throw),
    ) -> [RoundResult<Throw, Outcome>; 2] {
        let (first_player, first_throw) = first;
        let (second_player, second_throw) = second;
        let first_outcome = outcome_for(*first_throw, *second_throw);
        let second_outcome = outcome_for(*second_throw, *first_throw);
        debug!(%first_outcome, %second_outcome, "Round resolved");

        [
            RoundResult::new(
                first_player.clone(),
                first_outcome,
                *second_throw,
                session_id.clone(),
            ),
            RoundResult::new(
                second_player.clone(),
                second_outcome,
                *first_throw,
                session_id.clone(),
            ),
        ]
    }
}
