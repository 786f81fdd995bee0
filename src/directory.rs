//! Session directory: owns every live session and the player index.
//!
//! All lifecycle transitions go through [`SessionDirectory`]. Lookups by an
//! unknown id are no-ops that return a sentinel, because ids routinely go
//! stale when a disconnect races a move or a resolution.
//!
//! The directory never talks to players. Each transition pushes a
//! [`LobbyEvent`] that the caller drains with
//! [`SessionDirectory::drain_events`] and delivers after releasing whatever
//! lock guards the directory.

use crate::error::{InvariantViolation, SessionError};
use crate::matchmaker::Matchmaker;
use crate::resolver::{OutcomeResolver, RoundResult};
use crate::session::{Phase, PlayerId, Session, SessionId};
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Seats per session for two-party games.
pub const SEATS_PER_SESSION: usize = 2;

/// Something players should hear about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyEvent<M, O> {
    /// A player took a seat.
    Seated {
        /// The seated player.
        player: PlayerId,
        /// Where they sit.
        session_id: SessionId,
    },
    /// A session is still short of players.
    Waiting {
        /// The waiting session.
        session_id: SessionId,
        /// Everyone seated so far.
        players: Vec<PlayerId>,
    },
    /// A session started collecting moves.
    Started {
        /// The started session.
        session_id: SessionId,
        /// Everyone seated.
        players: Vec<PlayerId>,
    },
    /// A round was resolved.
    Resolved {
        /// One result per participant, in seat order.
        results: Vec<RoundResult<M, O>>,
    },
    /// A player left a session that had already paired up.
    OpponentLeft {
        /// The abandoned session.
        session_id: SessionId,
        /// Who left.
        player: PlayerId,
        /// Who was left behind.
        remaining: Vec<PlayerId>,
    },
    /// A session was ended and removed.
    Ended {
        /// The removed session.
        session_id: SessionId,
    },
}

/// Outcome of [`SessionDirectory::submit_move`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveReceipt {
    /// The move was stored.
    Recorded {
        /// The player's session.
        session_id: SessionId,
        /// True once every seat has a move for this round.
        ready_to_resolve: bool,
    },
    /// The player holds no seat anywhere.
    NotSeated,
    /// The session refused the move.
    Rejected(SessionError),
}

/// Owns live sessions, the player index, and the matchmaking queue.
#[derive(Debug)]
pub struct SessionDirectory<R: OutcomeResolver> {
    resolver: R,
    sessions: HashMap<SessionId, Session<R::Move>>,
    player_index: HashMap<PlayerId, SessionId>,
    matchmaker: Matchmaker,
    events: Vec<LobbyEvent<R::Move, R::Outcome>>,
}

impl<R: OutcomeResolver> SessionDirectory<R> {
    /// Creates an empty directory that resolves rounds with `resolver`.
    #[instrument(skip(resolver))]
    pub fn new(resolver: R) -> Self {
        info!("Creating session directory");
        Self {
            resolver,
            sessions: HashMap::new(),
            player_index: HashMap::new(),
            matchmaker: Matchmaker::new(),
            events: Vec::new(),
        }
    }

    /// Allocates and registers an empty session.
    #[instrument(skip(self))]
    pub fn create_session(&mut self) -> SessionId {
        let id = Uuid::new_v4().to_string();
        self.sessions
            .insert(id.clone(), Session::new(id.clone(), SEATS_PER_SESSION));
        info!(session_id = %id, "Created session");
        id
    }

    /// Seats `player` in `session_id`.
    ///
    /// Refuses (returning false, changing nothing) when the session is
    /// unknown, running, ended, or full, or when the player is already seated
    /// in a different session.
    #[instrument(skip(self))]
    pub fn add_player(&mut self, player: &str, session_id: &str) -> bool {
        if let Some(current) = self.player_index.get(player) {
            if current == session_id {
                debug!("Player already seated here");
                return true;
            }
            warn!(current_session = %current, "Player already seated elsewhere");
            return false;
        }

        let Some(session) = self.sessions.get_mut(session_id) else {
            debug!("Session not found");
            return false;
        };

        if let Err(e) = session.add_participant(player.to_string()) {
            debug!(error = %e, phase = %session.phase(), "Admission refused");
            return false;
        }

        let full = session.is_full();
        self.player_index
            .insert(player.to_string(), session_id.to_string());
        if full {
            self.matchmaker.remove(session_id);
        }

        info!(full, "Player added to session");
        true
    }

    /// Unseats `player` from whatever session holds them.
    ///
    /// An emptied session is torn down. The index entry is always cleared, so
    /// calling this twice is the same as calling it once. Returns the session
    /// the player was mapped to.
    #[instrument(skip(self))]
    pub fn remove_player(&mut self, player: &str) -> Option<SessionId> {
        let Some(session_id) = self.player_index.remove(player) else {
            debug!("Player not mapped to a session");
            return None;
        };

        let emptied = match self.sessions.get_mut(&session_id) {
            Some(session) => {
                session.remove_participant(player);
                session.is_empty()
            }
            None => {
                warn!(session_id = %session_id, "Index pointed at a missing session");
                false
            }
        };
        if emptied {
            self.teardown(&session_id);
        }

        info!(session_id = %session_id, "Player removed");
        Some(session_id)
    }

    /// Starts a full session that is not already running.
    #[instrument(skip(self))]
    pub fn start_session(&mut self, session_id: &str) -> bool {
        let Some(session) = self.sessions.get_mut(session_id) else {
            debug!("Session not found");
            return false;
        };

        if !session.is_ready_to_start() {
            debug!(phase = %session.phase(), seated = session.participants().len(), "Not ready to start");
            return false;
        }

        match session.start() {
            Ok(()) => {
                self.events.push(LobbyEvent::Started {
                    session_id: session_id.to_string(),
                    players: session.participants().to_vec(),
                });
                true
            }
            Err(e) => {
                debug!(error = %e, "Start refused");
                false
            }
        }
    }

    /// Ends a session, unbinds its participants, and removes it.
    ///
    /// Unknown ids are ignored. Returns the participants that were seated.
    #[instrument(skip(self))]
    pub fn end_session(&mut self, session_id: &str) -> Vec<PlayerId> {
        let Some(mut session) = self.sessions.remove(session_id) else {
            debug!("Attempt to end a session that does not exist or has already been ended");
            return Vec::new();
        };

        let players = session.end();
        for player in &players {
            if self.player_index.get(player).map(String::as_str) == Some(session_id) {
                self.player_index.remove(player);
            }
        }
        self.matchmaker.remove(session_id);
        self.events.push(LobbyEvent::Ended {
            session_id: session_id.to_string(),
        });

        info!(players = ?players, "Session ended and cleaned up");
        players
    }

    /// Records a move for whatever session `player` sits in.
    #[instrument(skip(self, mv))]
    pub fn submit_move(&mut self, player: &str, mv: R::Move) -> MoveReceipt {
        let Some(session_id) = self.player_index.get(player).cloned() else {
            debug!("Move from unseated player");
            return MoveReceipt::NotSeated;
        };

        let Some(session) = self.sessions.get_mut(&session_id) else {
            warn!(session_id = %session_id, "Index pointed at a missing session");
            self.player_index.remove(player);
            return MoveReceipt::NotSeated;
        };

        match session.submit_move(player, mv) {
            Ok(_) => {
                let ready_to_resolve = session.move_count() == SEATS_PER_SESSION;
                debug!(session_id = %session_id, ready_to_resolve, "Move accepted");
                MoveReceipt::Recorded {
                    session_id,
                    ready_to_resolve,
                }
            }
            Err(e) => {
                debug!(session_id = %session_id, error = %e, "Move rejected");
                MoveReceipt::Rejected(e)
            }
        }
    }

    /// Resolves a round once both moves are in.
    ///
    /// Does nothing (returning `None`) for an unknown session or one with
    /// fewer than two moves. The round's moves are consumed, so a second call
    /// without new moves is also a no-op.
    #[instrument(skip(self))]
    pub fn resolve(&mut self, session_id: &str) -> Option<Vec<RoundResult<R::Move, R::Outcome>>> {
        let Some(session) = self.sessions.get_mut(session_id) else {
            debug!("Session not found");
            return None;
        };

        if session.phase() != Phase::InProgress || session.move_count() < SEATS_PER_SESSION {
            debug!(moves = session.move_count(), phase = %session.phase(), "Not ready to resolve");
            return None;
        }

        let moves = session.take_moves();
        let [(first_player, first_move), (second_player, second_move)] = moves.as_slice() else {
            warn!(moves = moves.len(), "Unexpected move count at resolution");
            return None;
        };

        let results = self
            .resolver
            .resolve(
                &session_id.to_string(),
                (first_player, first_move),
                (second_player, second_move),
            )
            .to_vec();

        info!(
            first = %first_player,
            second = %second_player,
            "Round resolved"
        );
        self.events.push(LobbyEvent::Resolved {
            results: results.clone(),
        });
        Some(results)
    }

    /// Places a new arrival using the matchmaking queue.
    ///
    /// Joins the oldest waiting session, or creates and enqueues a fresh one.
    /// A session that fills up is started immediately. Returns `None` if the
    /// player is already seated.
    #[instrument(skip(self))]
    pub fn place(&mut self, player: &str) -> Option<SessionId> {
        if let Some(current) = self.player_index.get(player) {
            warn!(session_id = %current, "Player already seated");
            return None;
        }

        while let Some(session_id) = self.matchmaker.dequeue() {
            if self.add_player(player, &session_id) {
                info!(session_id = %session_id, "Joined waiting session");
                self.announce_seat(player, &session_id);
                return Some(session_id);
            }
            warn!(session_id = %session_id, "Skipped stale waiting session");
        }

        let session_id = self.create_session();
        if !self.add_player(player, &session_id) {
            warn!(session_id = %session_id, "Could not seat player in fresh session");
            self.sessions.remove(&session_id);
            return None;
        }
        self.matchmaker.enqueue(session_id.clone());
        info!(session_id = %session_id, "Created waiting session");
        self.announce_seat(player, &session_id);
        Some(session_id)
    }

    /// Resolves a round, ends its session, and optionally re-places both
    /// players.
    #[instrument(skip(self))]
    pub fn resolve_and_rotate(
        &mut self,
        session_id: &str,
        continuous: bool,
    ) -> Option<Vec<RoundResult<R::Move, R::Outcome>>> {
        let results = self.resolve(session_id)?;
        let players = self.end_session(session_id);

        if continuous {
            for player in &players {
                self.place(player);
            }
        }

        Some(results)
    }

    /// Handles a player going away at any point in the lifecycle.
    ///
    /// A lone waiting player simply vanishes with their session. If an
    /// opponent was seated, the session is ended and the opponent is either
    /// re-placed (`continuous`) or left unseated. Safe to call repeatedly.
    #[instrument(skip(self))]
    pub fn disconnect(&mut self, player: &str, continuous: bool) -> Option<SessionId> {
        let phase = self
            .session_of(player)
            .and_then(|id| self.sessions.get(id))
            .map(Session::phase);

        let session_id = self.remove_player(player)?;

        let paired = matches!(phase, Some(Phase::ReadyToStart | Phase::InProgress));
        if paired && self.sessions.contains_key(&session_id) {
            let remaining = self.end_session(&session_id);
            self.events.push(LobbyEvent::OpponentLeft {
                session_id: session_id.clone(),
                player: player.to_string(),
                remaining: remaining.clone(),
            });

            if continuous {
                for other in &remaining {
                    self.place(other);
                }
            }
        }

        Some(session_id)
    }

    /// Returns true if the session has every seat filled and is not running.
    pub fn is_ready_to_start(&self, session_id: &str) -> bool {
        self.sessions
            .get(session_id)
            .is_some_and(Session::is_ready_to_start)
    }

    /// Returns the other participant in `player`'s session.
    pub fn opponent_of(&self, player: &str) -> Option<PlayerId> {
        let session_id = self.player_index.get(player)?;
        self.sessions.get(session_id)?.opponent_of(player).cloned()
    }

    /// Returns a session by id.
    pub fn session(&self, session_id: &str) -> Option<&Session<R::Move>> {
        self.sessions.get(session_id)
    }

    /// Returns the session `player` is seated in.
    pub fn session_of(&self, player: &str) -> Option<&SessionId> {
        self.player_index.get(player)
    }

    /// Returns the players seated in a session, in seat order.
    pub fn players_in(&self, session_id: &str) -> Vec<PlayerId> {
        self.sessions
            .get(session_id)
            .map(|s| s.participants().to_vec())
            .unwrap_or_default()
    }

    /// Returns the number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Returns the number of seated players.
    pub fn player_count(&self) -> usize {
        self.player_index.len()
    }

    /// Returns the sessions waiting for an opponent, oldest first.
    pub fn waiting_sessions(&self) -> Vec<SessionId> {
        self.matchmaker.waiting().cloned().collect()
    }

    /// Takes every event recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<LobbyEvent<R::Move, R::Outcome>> {
        std::mem::take(&mut self.events)
    }

    /// Checks that the sessions, player index, and queue agree.
    pub fn verify_invariants(&self) -> Result<(), InvariantViolation> {
        for (player, session_id) in &self.player_index {
            let seated = self
                .sessions
                .get(session_id)
                .is_some_and(|s| s.contains(player));
            if !seated {
                return Err(InvariantViolation {
                    message: format!("player {player} indexed to {session_id} but not seated there"),
                });
            }
        }

        for (session_id, session) in &self.sessions {
            if !session.moves_are_seated() {
                return Err(InvariantViolation {
                    message: format!("session {session_id} holds a move from an unseated player"),
                });
            }
            if session.phase() == Phase::Ended {
                return Err(InvariantViolation {
                    message: format!("ended session {session_id} is still registered"),
                });
            }
            for player in session.participants() {
                if self.player_index.get(player) != Some(session_id) {
                    return Err(InvariantViolation {
                        message: format!("player {player} seated in {session_id} but not indexed"),
                    });
                }
            }
        }

        for session_id in self.matchmaker.waiting() {
            match self.sessions.get(session_id) {
                Some(session) if !session.is_full() => {}
                Some(_) => {
                    return Err(InvariantViolation {
                        message: format!("full session {session_id} is still queued"),
                    });
                }
                None => {
                    return Err(InvariantViolation {
                        message: format!("queued session {session_id} does not exist"),
                    });
                }
            }
        }

        Ok(())
    }

    /// Removes an emptied session from every index.
    fn teardown(&mut self, session_id: &str) {
        if let Some(mut session) = self.sessions.remove(session_id) {
            session.end();
        }
        self.matchmaker.remove(session_id);
        self.events.push(LobbyEvent::Ended {
            session_id: session_id.to_string(),
        });
        debug!(session_id, "Empty session torn down");
    }

    /// Records the seat and either starts the session or reports it waiting.
    fn announce_seat(&mut self, player: &str, session_id: &str) {
        self.events.push(LobbyEvent::Seated {
            player: player.to_string(),
            session_id: session_id.to_string(),
        });

        if !self.start_session(session_id) {
            self.events.push(LobbyEvent::Waiting {
                session_id: session_id.to_string(),
                players: self.players_in(session_id),
            });
        }
    }
}
