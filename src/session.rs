//! Game session entity.
//!
//! A [`Session`] is plain state: who is seated, what they have thrown this
//! round, and which phase the game is in. It knows nothing about transport,
//! notification, or other sessions; the directory drives every transition.

use crate::error::SessionError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Unique identifier for a game session.
pub type SessionId = String;

/// Unique identifier for a player (one per connection).
pub type PlayerId = String;

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Phase {
    /// Fewer participants than seats.
    WaitingForPlayers,
    /// Every seat is filled but the round has not been started.
    ReadyToStart,
    /// Moves are being collected.
    InProgress,
    /// Terminal. No further mutation is accepted.
    Ended,
}

/// One game instance between up to `capacity` participants.
#[derive(Debug, Clone)]
pub struct Session<M> {
    id: SessionId,
    capacity: usize,
    /// Seat order is join order.
    participants: Vec<PlayerId>,
    moves: HashMap<PlayerId, M>,
    phase: Phase,
}

impl<M> Session<M> {
    /// Creates an empty session waiting for players.
    #[instrument]
    pub fn new(id: SessionId, capacity: usize) -> Self {
        debug!(session_id = %id, capacity, "Creating session");
        Self {
            id,
            capacity,
            participants: Vec::with_capacity(capacity),
            moves: HashMap::new(),
            phase: Phase::WaitingForPlayers,
        }
    }

    /// Returns the session id.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns the number of seats.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the seated participants in join order.
    pub fn participants(&self) -> &[PlayerId] {
        &self.participants
    }

    /// Returns true if `player` holds a seat.
    pub fn contains(&self, player: &str) -> bool {
        self.participants.iter().any(|p| p == player)
    }

    /// Returns true if nobody is seated.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Returns true if every seat is taken.
    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.capacity
    }

    /// Returns the number of moves submitted this round.
    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    /// Returns the move `player` submitted this round, if any.
    pub fn move_of(&self, player: &str) -> Option<&M> {
        self.moves.get(player)
    }

    /// Returns true if the session can be started.
    pub fn is_ready_to_start(&self) -> bool {
        self.participants.len() == self.capacity
            && !matches!(self.phase, Phase::InProgress | Phase::Ended)
    }

    /// Seats a participant.
    ///
    /// Seating someone already seated is a no-op.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn add_participant(&mut self, player: PlayerId) -> Result<(), SessionError> {
        match self.phase {
            Phase::Ended => return Err(SessionError::Ended),
            Phase::InProgress => return Err(SessionError::AlreadyStarted),
            Phase::WaitingForPlayers | Phase::ReadyToStart => {}
        }

        if self.contains(&player) {
            debug!(player_id = %player, "Participant already seated");
            return Ok(());
        }

        if self.is_full() {
            return Err(SessionError::Full);
        }

        self.participants.push(player);
        if self.participants.len() == self.capacity {
            self.phase = Phase::ReadyToStart;
        }

        debug!(seated = self.participants.len(), phase = %self.phase, "Participant seated");
        Ok(())
    }

    /// Unseats a participant and discards their pending move.
    ///
    /// Returns false if the player was not seated.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn remove_participant(&mut self, player: &str) -> bool {
        let Some(index) = self.participants.iter().position(|p| p == player) else {
            debug!(player_id = player, "Participant not seated");
            return false;
        };

        self.participants.remove(index);
        self.moves.remove(player);

        if self.phase == Phase::ReadyToStart {
            self.phase = Phase::WaitingForPlayers;
        }

        debug!(seated = self.participants.len(), phase = %self.phase, "Participant removed");
        true
    }

    /// Records `player`'s move for this round, replacing any earlier one.
    ///
    /// Returns the replaced move, if there was one.
    #[instrument(skip(self, mv), fields(session_id = %self.id))]
    pub fn submit_move(&mut self, player: &str, mv: M) -> Result<Option<M>, SessionError> {
        if self.phase == Phase::Ended {
            return Err(SessionError::Ended);
        }

        if !self.contains(player) {
            return Err(SessionError::NotAParticipant {
                player: player.to_string(),
            });
        }

        if self.phase != Phase::InProgress {
            return Err(SessionError::NotInProgress);
        }

        let replaced = self.moves.insert(player.to_string(), mv);
        debug!(
            player_id = player,
            overwrite = replaced.is_some(),
            moves = self.moves.len(),
            "Move recorded"
        );
        Ok(replaced)
    }

    /// Removes and returns this round's moves in seat order.
    ///
    /// Participants without a move are skipped.
    pub fn take_moves(&mut self) -> Vec<(PlayerId, M)> {
        let mut moves = std::mem::take(&mut self.moves);
        self.participants
            .iter()
            .filter_map(|p| moves.remove(p).map(|m| (p.clone(), m)))
            .collect()
    }

    /// Moves the session to [`Phase::InProgress`].
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.phase {
            Phase::InProgress => Err(SessionError::AlreadyStarted),
            Phase::Ended => Err(SessionError::Ended),
            Phase::WaitingForPlayers | Phase::ReadyToStart => {
                self.phase = Phase::InProgress;
                info!(players = ?self.participants, "Session started");
                Ok(())
            }
        }
    }

    /// Ends the session, returning whoever was still seated.
    ///
    /// Ending an ended session is a no-op and returns nothing.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn end(&mut self) -> Vec<PlayerId> {
        if self.phase == Phase::Ended {
            debug!("Session already ended");
            return Vec::new();
        }

        self.moves.clear();
        self.phase = Phase::Ended;
        info!("Session ended");
        std::mem::take(&mut self.participants)
    }

    /// Returns the first seated participant other than `player`.
    ///
    /// `None` while fewer than two participants are seated.
    pub fn opponent_of(&self, player: &str) -> Option<&PlayerId> {
        if self.participants.len() < 2 {
            return None;
        }
        self.participants.iter().find(|p| p.as_str() != player)
    }

    /// Returns true if every recorded move belongs to a seated participant.
    pub fn moves_are_seated(&self) -> bool {
        self.moves.keys().all(|p| self.contains(p))
    }
}
