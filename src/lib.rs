//! Strictly Arena - anonymous two-player matchmaking
//!
//! Pairs anonymous WebSocket clients into two-seat sessions, collects one
//! move from each per round, resolves the round, and tells both players how
//! it went.
//!
//! # Architecture
//!
//! - **Session**: state of one game (seats, moves, phase)
//! - **Directory**: owns sessions, the player index, and the matchmaking queue
//! - **Resolver**: pluggable strategy turning two moves into two results
//! - **Arena**: routes player messages and delivers notifications
//! - **Server**: WebSocket transport
//!
//! # Example
//!
//! ```
//! use strictly_arena::{RockPaperScissors, SessionDirectory, Throw};
//!
//! let mut directory = SessionDirectory::new(RockPaperScissors);
//! let session = directory.place("alice").unwrap();
//! assert_eq!(directory.place("bob").as_ref(), Some(&session));
//!
//! directory.submit_move("alice", Throw::Rock);
//! directory.submit_move("bob", Throw::Scissors);
//! let results = directory.resolve(&session).unwrap();
//! assert_eq!(results[0].outcome().to_string(), "win");
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod arena;
mod bots;
mod command;
mod config;
mod directory;
mod error;
mod matchmaker;
mod notifier;
mod resolver;
mod server;
mod session;

// Crate-level exports - Session engine
pub use directory::{LobbyEvent, MoveReceipt, SEATS_PER_SESSION, SessionDirectory};
pub use matchmaker::Matchmaker;
pub use session::{Phase, PlayerId, Session, SessionId};

// Crate-level exports - Resolution
pub use resolver::{OutcomeResolver, RockPaperScissors, RoundResult};

// Crate-level exports - Messaging
pub use arena::{Arena, INVALID_CHOICE, NOT_SEATED};
pub use bots::BotDirectory;
pub use command::Command;
pub use notifier::{ConnectionRegistry, Notifier};

// Crate-level exports - Server and configuration
pub use config::{ArenaConfig, ConfigError};
pub use server::{AppState, RpsArena, router, serve};

// Crate-level exports - Errors
pub use error::{InvariantViolation, NotifyError, SessionError};

// Crate-level exports - Game types (rock/paper/scissors)
pub use strictly_rps::{Outcome, Throw, outcome_for};
