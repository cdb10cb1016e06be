//! Bounded per-user conversation history.

use std::collections::VecDeque;
use std::sync::Arc;

use settle_core::error::SettleError;
use settle_storage::{keys, JsonDocument, KeyValueStore};

use crate::types::ConversationTurn;

/// Rolling window of turns. Pushing past the limit evicts the oldest turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationHistory {
    turns: VecDeque<ConversationTurn>,
    limit: usize,
}

impl ConversationHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(limit.min(64)),
            limit: limit.max(1),
        }
    }

    /// Rebuild from stored turns, keeping only the newest `limit`.
    pub fn from_turns(turns: Vec<ConversationTurn>, limit: usize) -> Self {
        let mut history = Self::new(limit);
        for turn in turns {
            history.push(turn);
        }
        history
    }

    pub fn push(&mut self, turn: ConversationTurn) {
        while self.turns.len() >= self.limit {
            self.turns.pop_front();
        }
        self.turns.push_back(turn);
    }

    /// The last `n` turns, oldest first.
    pub fn recent(&self, n: usize) -> Vec<&ConversationTurn> {
        let skip = self.turns.len().saturating_sub(n);
        self.turns.iter().skip(skip).collect()
    }

    pub fn turns(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn into_vec(self) -> Vec<ConversationTurn> {
        self.turns.into()
    }
}

/// Loads and persists histories under `settlespace_chat_{user}`.
pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
    limit: usize,
}

impl HistoryStore {
    pub fn new(store: Arc<dyn KeyValueStore>, limit: usize) -> Self {
        Self { store, limit }
    }

    fn document(&self, user_id: &str) -> JsonDocument<Vec<ConversationTurn>> {
        JsonDocument::new(Arc::clone(&self.store), keys::chat_history(user_id))
    }

    pub fn load(&self, user_id: &str) -> Result<ConversationHistory, SettleError> {
        let turns = self.document(user_id).get()?.unwrap_or_default();
        Ok(ConversationHistory::from_turns(turns, self.limit))
    }

    /// Append turns and write the capped history back.
    pub fn append(
        &self,
        user_id: &str,
        turns: impl IntoIterator<Item = ConversationTurn>,
    ) -> Result<ConversationHistory, SettleError> {
        let mut history = self.load(user_id)?;
        for turn in turns {
            history.push(turn);
        }
        let stored: Vec<ConversationTurn> = history.turns().cloned().collect();
        self.document(user_id).set(&stored)?;
        Ok(history)
    }

    pub fn clear(&self, user_id: &str) -> Result<bool, SettleError> {
        self.document(user_id).clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use settle_storage::MemoryStore;

    #[test]
    fn test_push_evicts_oldest_first() {
        let mut history = ConversationHistory::new(3);
        for i in 0..5 {
            history.push(ConversationTurn::user(format!("m{}", i)));
        }
        assert_eq!(history.len(), 3);
        let texts: Vec<&str> = history.turns().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["m2", "m3", "m4"]);
    }

    #[test]
    fn test_recent_returns_tail_in_order() {
        let mut history = ConversationHistory::new(50);
        for i in 0..10 {
            history.push(ConversationTurn::user(format!("m{}", i)));
        }
        let recent: Vec<&str> = history.recent(3).iter().map(|t| t.text.as_str()).collect();
        assert_eq!(recent, vec!["m7", "m8", "m9"]);
        assert_eq!(history.recent(100).len(), 10);
    }

    #[test]
    fn test_from_turns_applies_limit() {
        let turns: Vec<_> = (0..60)
            .map(|i| ConversationTurn::assistant(format!("a{}", i)))
            .collect();
        let history = ConversationHistory::from_turns(turns, 50);
        assert_eq!(history.len(), 50);
        assert_eq!(history.turns().next().unwrap().text, "a10");
    }

    #[test]
    fn test_store_caps_at_fifty() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let histories = HistoryStore::new(Arc::clone(&store), 50);

        for i in 0..30 {
            histories
                .append(
                    "buyer-1",
                    [
                        ConversationTurn::user(format!("q{}", i)),
                        ConversationTurn::assistant(format!("a{}", i)),
                    ],
                )
                .unwrap();
        }

        let history = histories.load("buyer-1").unwrap();
        assert_eq!(history.len(), 50);
        assert_eq!(history.turns().next().unwrap().text, "q5");
        assert_eq!(history.turns().last().unwrap().text, "a29");

        let raw = store.get("settlespace_chat_buyer-1").unwrap().unwrap();
        let stored: Vec<ConversationTurn> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored.len(), 50);
    }

    #[test]
    fn test_store_histories_are_per_user() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let histories = HistoryStore::new(store, 50);
        histories
            .append("buyer-1", [ConversationTurn::user("hi")])
            .unwrap();
        assert!(histories.load("seller-1").unwrap().is_empty());
        assert!(histories.clear("buyer-1").unwrap());
        assert!(histories.load("buyer-1").unwrap().is_empty());
    }
}
