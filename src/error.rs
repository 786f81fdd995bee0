//! Error types for the session engine and its collaborators.

use crate::session::PlayerId;
use derive_more::{Display, Error};
use tracing::instrument;

/// A transition a session refused to make.
///
/// These are expected during normal play (late moves, disconnect races) and
/// never abort the process.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SessionError {
    /// The player holds no seat in the session.
    #[display("Player {} is not seated in this game", player)]
    NotAParticipant {
        /// The player that tried to act.
        player: PlayerId,
    },
    /// Moves are only accepted while the round is running.
    #[display("The game has not started yet")]
    NotInProgress,
    /// The session is already running.
    #[display("The game is already in progress")]
    AlreadyStarted,
    /// Every seat is taken.
    #[display("The game is full")]
    Full,
    /// The session is terminal.
    #[display("The game has ended")]
    Ended,
}

/// A message could not be delivered to a player.
#[derive(Debug, Clone, Display, Error)]
#[display("Notify error: {} at {}:{}", message, file, line)]
pub struct NotifyError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl NotifyError {
    /// Creates a new notify error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// The directory's indices disagree with each other.
///
/// Indicates a bug in the directory, never a client mistake.
#[derive(Debug, Clone, Display, Error)]
#[display("Invariant violation: {}", message)]
pub struct InvariantViolation {
    /// What was inconsistent.
    pub message: String,
}
