//! Inbound message grammar.

use crate::session::PlayerId;
use strictly_rps::Throw;
use tracing::instrument;
use uuid::Uuid;

const REGISTER_PREFIX: &str = "register as ";

/// A parsed inbound text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A move for the current round.
    Throw(Throw),
    /// `register as <name>`: join the bot directory.
    Register(String),
    /// `who's connected?`: list recently registered bots.
    WhoIsConnected,
    /// `@<player-id> <text>`: message another connection.
    Direct {
        /// Recipient.
        to: PlayerId,
        /// Message body.
        text: String,
    },
    /// `what's the time?`
    Time,
    /// Anything else.
    Unrecognized(String),
}

impl Command {
    /// Parses a message. Matching is case-insensitive and ignores
    /// surrounding whitespace; names and direct-message bodies keep their
    /// original case.
    #[instrument]
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        let lowered = trimmed.to_lowercase();

        if let Some(direct) = Self::parse_direct(trimmed) {
            return direct;
        }

        if lowered == "who's connected?" {
            return Command::WhoIsConnected;
        }

        if lowered == "what's the time?" {
            return Command::Time;
        }

        if let Some(name) = Self::strip_register_prefix(trimmed) {
            return Command::Register(name.to_string());
        }

        match Throw::parse(trimmed) {
            Some(throw) => Command::Throw(throw),
            None => Command::Unrecognized(trimmed.to_string()),
        }
    }

    fn strip_register_prefix(trimmed: &str) -> Option<&str> {
        let prefix = trimmed.get(..REGISTER_PREFIX.len())?;
        if !prefix.eq_ignore_ascii_case(REGISTER_PREFIX) {
            return None;
        }
        let name = trimmed.get(REGISTER_PREFIX.len()..)?.trim();
        (!name.is_empty()).then_some(name)
    }

    fn parse_direct(trimmed: &str) -> Option<Self> {
        let rest = trimmed.strip_prefix('@')?;
        let (target, body) = rest.split_once(char::is_whitespace)?;
        let to = Uuid::parse_str(target).ok()?;
        let body = body.trim();
        if body.is_empty() {
            return None;
        }
        Some(Command::Direct {
            to: to.to_string(),
            text: body.to_string(),
        })
    }
}
