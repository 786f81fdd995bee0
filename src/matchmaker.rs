//! FIFO queue of sessions short one participant.

use crate::session::SessionId;
use std::collections::VecDeque;
use tracing::{debug, instrument};

/// Sessions waiting for an opponent, oldest first.
///
/// A session id appears at most once.
#[derive(Debug, Clone, Default)]
pub struct Matchmaker {
    waiting: VecDeque<SessionId>,
}

impl Matchmaker {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a session to the back of the queue.
    ///
    /// Returns false if it was already queued.
    #[instrument(skip(self))]
    pub fn enqueue(&mut self, session_id: SessionId) -> bool {
        if self.contains(&session_id) {
            debug!(session_id = %session_id, "Session already waiting");
            return false;
        }
        self.waiting.push_back(session_id);
        debug!(waiting = self.waiting.len(), "Session enqueued");
        true
    }

    /// Pops the oldest waiting session.
    #[instrument(skip(self))]
    pub fn dequeue(&mut self) -> Option<SessionId> {
        let next = self.waiting.pop_front();
        debug!(session_id = ?next, waiting = self.waiting.len(), "Dequeued");
        next
    }

    /// Drops a session from the queue wherever it sits.
    #[instrument(skip(self))]
    pub fn remove(&mut self, session_id: &str) -> bool {
        let before = self.waiting.len();
        self.waiting.retain(|id| id != session_id);
        before != self.waiting.len()
    }

    /// Returns true if the session is queued.
    pub fn contains(&self, session_id: &str) -> bool {
        self.waiting.iter().any(|id| id == session_id)
    }

    /// Returns the number of waiting sessions.
    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    /// Returns true if nobody is waiting.
    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }

    /// Returns the waiting sessions, oldest first.
    pub fn waiting(&self) -> impl Iterator<Item = &SessionId> {
        self.waiting.iter()
    }
}
