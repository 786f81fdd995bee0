//! Rock/paper/scissors arena: connects players, routes their messages, and
//! tells them what happened.
//!
//! Every operation takes the directory lock, performs one logical transition,
//! drains the resulting events, and releases the lock before anything is sent.
//! A failed send is logged and otherwise ignored.

use crate::bots::BotDirectory;
use crate::command::Command;
use crate::config::ArenaConfig;
use crate::directory::{LobbyEvent, MoveReceipt, SessionDirectory};
use crate::error::SessionError;
use crate::notifier::Notifier;
use crate::resolver::OutcomeResolver;
use crate::session::SessionId;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use strictly_rps::Throw;
use tracing::{debug, error, info, instrument, warn};

/// Reply to anything that is not a recognised command.
pub const INVALID_CHOICE: &str = "Invalid choice. Please play 'rock', 'paper', or 'scissors'.";

/// Reply to a move from a player without a seat.
pub const NOT_SEATED: &str = "You are not seated in a game. Reconnect to join one.";

/// Players, sessions, and bots behind one server.
pub struct Arena<R: OutcomeResolver, N> {
    directory: Mutex<SessionDirectory<R>>,
    bots: Mutex<BotDirectory>,
    notifier: Arc<N>,
    continuous_play: bool,
}

impl<R, N> Arena<R, N>
where
    R: OutcomeResolver<Move = Throw>,
    N: Notifier,
{
    /// Creates an arena that resolves rounds with `resolver` and reaches
    /// players through `notifier`.
    #[instrument(skip(resolver, notifier))]
    pub fn new(resolver: R, notifier: Arc<N>, config: &ArenaConfig) -> Self {
        info!(continuous_play = config.continuous_play(), "Creating arena");
        Self {
            directory: Mutex::new(SessionDirectory::new(resolver)),
            bots: Mutex::new(BotDirectory::new(*config.recent_bot_limit())),
            notifier,
            continuous_play: *config.continuous_play(),
        }
    }

    /// Seats a newly connected player.
    #[instrument(skip(self))]
    pub fn handle_connect(&self, player: &str) -> Option<SessionId> {
        let (session_id, events) = self.transact(|directory| directory.place(player));
        if session_id.is_none() {
            warn!("Connected player could not be placed");
        }
        self.deliver(events);
        session_id
    }

    /// Routes one inbound text message.
    #[instrument(skip(self, text))]
    pub fn handle_message(&self, player: &str, text: &str) {
        match Command::parse(text) {
            Command::Throw(throw) => self.handle_throw(player, throw),
            Command::Register(name) => {
                self.lock_bots().register(player, &name);
                self.reply(player, &format!("Registered as {name}."));
            }
            Command::WhoIsConnected => {
                let recent = self.lock_bots().list_recent();
                self.reply(
                    player,
                    &format!("Recent Connected bots: {}", recent.join(", ")),
                );
            }
            Command::Direct { to, text } => {
                if let Err(e) = self.notifier.send_direct(player, &to, &text) {
                    warn!(to = %to, error = %e, "Direct message failed");
                    self.reply(player, &format!("Unable to reach {to}."));
                }
            }
            Command::Time => {
                let now = chrono::Local::now().format("%H:%M:%S");
                self.reply(player, &format!("The time is {now}."));
            }
            Command::Unrecognized(token) => {
                debug!(token = %token, "Unrecognized message");
                self.reply(player, INVALID_CHOICE);
            }
        }
    }

    /// Cleans up after a connection closes. Safe to call more than once.
    #[instrument(skip(self))]
    pub fn handle_disconnect(&self, player: &str) {
        let continuous = self.continuous_play;
        let (session_id, events) =
            self.transact(|directory| directory.disconnect(player, continuous));
        self.lock_bots().unregister(player);
        info!(session_id = ?session_id, "Player disconnected");
        self.deliver(events);
    }

    /// Runs `f` against the directory under its lock.
    pub fn with_directory<T>(&self, f: impl FnOnce(&SessionDirectory<R>) -> T) -> T {
        let directory = self.lock_directory();
        f(&directory)
    }

    fn handle_throw(&self, player: &str, throw: Throw) {
        let continuous = self.continuous_play;
        let (receipt, events) = self.transact(|directory| {
            let receipt = directory.submit_move(player, throw);
            if let MoveReceipt::Recorded {
                session_id,
                ready_to_resolve: true,
            } = &receipt
            {
                directory.resolve_and_rotate(session_id, continuous);
            }
            receipt
        });

        match receipt {
            MoveReceipt::Recorded {
                session_id,
                ready_to_resolve: false,
            } => self.reply(
                player,
                &format!("Game {session_id}: You played {throw}. Waiting for your opponent..."),
            ),
            MoveReceipt::Recorded { .. } => {}
            MoveReceipt::NotSeated => self.reply(player, NOT_SEATED),
            MoveReceipt::Rejected(SessionError::NotInProgress) => self.reply(
                player,
                "The game has not started yet. Waiting for an opponent...",
            ),
            MoveReceipt::Rejected(e) => self.reply(player, &e.to_string()),
        }

        self.deliver(events);
    }

    /// Runs one transition and collects its events before unlocking.
    fn transact<T>(
        &self,
        f: impl FnOnce(&mut SessionDirectory<R>) -> T,
    ) -> (T, Vec<LobbyEvent<Throw, R::Outcome>>) {
        let mut directory = self.lock_directory();
        let value = f(&mut *directory);
        let events = directory.drain_events();
        if let Err(e) = directory.verify_invariants() {
            error!(error = %e, "Session directory is inconsistent");
        }
        (value, events)
    }

    fn deliver(&self, events: Vec<LobbyEvent<Throw, R::Outcome>>) {
        for event in events {
            match event {
                LobbyEvent::Seated { player, session_id } => self.reply(
                    &player,
                    &format!("Game {session_id}: Welcome! You are Player {player}."),
                ),
                LobbyEvent::Waiting {
                    session_id,
                    players,
                } => self.notifier.send_to_all(
                    &players,
                    &format!("Game {session_id}: Waiting for more players to start the game..."),
                ),
                LobbyEvent::Started {
                    session_id,
                    players,
                } => self.notifier.send_to_all(
                    &players,
                    &format!(
                        "Game {session_id}: Game is starting. Please play 'rock', 'paper', or 'scissors'."
                    ),
                ),
                LobbyEvent::Resolved { results } => {
                    for result in results {
                        self.reply(
                            result.player(),
                            &format!(
                                "Game over. You {}. Opponent chose {}.",
                                result.outcome(),
                                result.opponent_move()
                            ),
                        );
                    }
                }
                LobbyEvent::OpponentLeft {
                    session_id,
                    player,
                    remaining,
                } => {
                    let text = if self.continuous_play {
                        format!(
                            "Game {session_id}: Player {player} has left the game. Waiting for a new opponent..."
                        )
                    } else {
                        format!(
                            "Game {session_id}: Player {player} has left the game. Reconnect to play again."
                        )
                    };
                    self.notifier.send_to_all(&remaining, &text);
                }
                LobbyEvent::Ended { session_id } => {
                    debug!(session_id = %session_id, "Session closed");
                }
            }
        }
    }

    fn reply(&self, player: &str, text: &str) {
        if let Err(e) = self.notifier.send_to(player, text) {
            warn!(player_id = player, error = %e, "Failed to notify player");
        }
    }

    fn lock_directory(&self) -> MutexGuard<'_, SessionDirectory<R>> {
        self.directory
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_bots(&self) -> MutexGuard<'_, BotDirectory> {
        self.bots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
