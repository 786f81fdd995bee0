//! Outbound message delivery.
//!
//! [`Notifier`] is the only way the engine reaches players. The production
//! implementation, [`ConnectionRegistry`], keeps one channel per connected
//! player; the transport drains each channel into its socket.

use crate::error::NotifyError;
use crate::session::PlayerId;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, instrument, warn};

/// Delivers text to players.
///
/// Failures are reported but never roll back game state.
pub trait Notifier: Send + Sync {
    /// Sends `text` to one player.
    fn send_to(&self, player: &str, text: &str) -> Result<(), NotifyError>;

    /// Returns every player currently reachable.
    fn connected(&self) -> Vec<PlayerId>;

    /// Sends `text` to each player, logging failures.
    fn send_to_all(&self, players: &[PlayerId], text: &str) {
        for player in players {
            if let Err(e) = self.send_to(player, text) {
                warn!(player_id = %player, error = %e, "Failed to notify player");
            }
        }
    }

    /// Sends `text` to `to`, tagged with the sender's id.
    fn send_direct(&self, from: &str, to: &str, text: &str) -> Result<(), NotifyError> {
        self.send_to(to, &format!("from: {from}, message: {text}"))
    }

    /// Sends `text` to every connected player.
    fn broadcast(&self, text: &str) {
        let everyone = self.connected();
        self.send_to_all(&everyone, text);
    }
}

/// Live connections keyed by player id.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: Mutex<HashMap<PlayerId, UnboundedSender<String>>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating connection registry");
        Self::default()
    }

    /// Opens a channel for `player`, replacing any previous one.
    ///
    /// The transport owns the returned receiver and forwards everything it
    /// yields to the player's socket.
    #[instrument(skip(self))]
    pub fn register(&self, player: &str) -> UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut connections = self.lock();
        if connections.insert(player.to_string(), tx).is_some() {
            warn!("Replaced existing connection");
        }
        debug!(connections = connections.len(), "Connection added");
        rx
    }

    /// Drops `player`'s channel, which ends their writer.
    #[instrument(skip(self))]
    pub fn unregister(&self, player: &str) -> bool {
        let mut connections = self.lock();
        let removed = connections.remove(player).is_some();
        debug!(removed, connections = connections.len(), "Connection removed");
        removed
    }

    /// Returns true if `player` has an open channel.
    pub fn is_connected(&self, player: &str) -> bool {
        self.lock().contains_key(player)
    }

    /// Returns the number of open channels.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nobody is connected.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PlayerId, UnboundedSender<String>>> {
        self.connections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Notifier for ConnectionRegistry {
    #[instrument(skip(self, text))]
    fn send_to(&self, player: &str, text: &str) -> Result<(), NotifyError> {
        let connections = self.lock();
        let Some(tx) = connections.get(player) else {
            return Err(NotifyError::new(format!(
                "No connection found for player {player}"
            )));
        };

        tx.send(text.to_string()).map_err(|_| {
            NotifyError::new(format!("Connection for player {player} is closed"))
        })?;
        debug!(message = text, "Message queued");
        Ok(())
    }

    fn connected(&self) -> Vec<PlayerId> {
        self.lock().keys().cloned().collect()
    }
}
