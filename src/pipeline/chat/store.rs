use serde::Serialize;

use crate::models::{Role, Turn};

/// Append-only conversation history for one session.
///
/// Only user and assistant turns are stored; the system instruction is
/// injected per request and never kept here. Owned by exactly one caller
/// at a time and moved through the assistant, never aliased.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConversationStore {
    turns: Vec<Turn>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one turn at the end. No capacity bound, no deduplication.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Drop every turn.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Current turns in order.
    pub fn snapshot(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Whether turns strictly alternate user, assistant, user, ...
    /// Not enforced on append; the projector relies on it and warns when it fails.
    pub fn follows_alternation(&self) -> bool {
        alternates(&self.turns)
    }
}

/// True when turns go user, assistant, user, ... from the first one.
pub(crate) fn alternates<'a>(turns: impl IntoIterator<Item = &'a Turn>) -> bool {
    turns.into_iter().enumerate().all(|(i, turn)| {
        let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
        turn.role() == expected
    })
}

impl From<Vec<Turn>> for ConversationStore {
    fn from(turns: Vec<Turn>) -> Self {
        Self { turns }
    }
}
