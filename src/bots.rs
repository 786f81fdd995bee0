//! Rolling registry of named participants.

use crate::session::PlayerId;
use std::collections::{HashMap, VecDeque};
use tracing::{info, instrument};

/// Names announced with `register as <name>`, newest last.
#[derive(Debug, Clone)]
pub struct BotDirectory {
    names: HashMap<PlayerId, String>,
    recent: VecDeque<PlayerId>,
    limit: usize,
}

impl BotDirectory {
    /// Creates a directory that lists at most `limit` recent bots.
    pub fn new(limit: usize) -> Self {
        Self {
            names: HashMap::new(),
            recent: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Registers (or renames) the bot on connection `id`.
    #[instrument(skip(self))]
    pub fn register(&mut self, id: &str, name: &str) {
        self.names.insert(id.to_string(), name.to_string());
        self.recent.retain(|r| r != id);
        self.recent.push_back(id.to_string());
        while self.recent.len() > self.limit {
            self.recent.pop_front();
        }
        info!("Bot registered");
    }

    /// Forgets the bot on connection `id`, if any.
    #[instrument(skip(self))]
    pub fn unregister(&mut self, id: &str) -> Option<String> {
        let name = self.names.remove(id)?;
        self.recent.retain(|r| r != id);
        info!(name = %name, "Bot unregistered");
        Some(name)
    }

    /// Returns the registered name for connection `id`.
    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Lists recent bots as `name (id)`, oldest first.
    pub fn list_recent(&self) -> Vec<String> {
        self.recent
            .iter()
            .filter_map(|id| self.names.get(id).map(|name| format!("{name} ({id})")))
            .collect()
    }
}
