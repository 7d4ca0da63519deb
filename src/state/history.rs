use std::collections::VecDeque;

use crate::state::game::Game;

/// Number of snapshots kept for undo.
pub const UNDO_LIMIT: usize = 200;

/// Bounded stack of pre-mutation snapshots. The oldest entry is evicted once full.
#[derive(Debug, Clone)]
pub struct UndoHistory {
    entries: VecDeque<Game>,
    limit: usize,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::with_limit(UNDO_LIMIT)
    }
}

impl UndoHistory {
    /// History retaining at most `limit` snapshots.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit.min(UNDO_LIMIT)),
            limit,
        }
    }

    /// Record the state as it was before a mutation.
    pub fn push(&mut self, snapshot: Game) {
        if self.limit == 0 {
            return;
        }
        if self.entries.len() == self.limit {
            self.entries.pop_front();
        }
        self.entries.push_back(snapshot);
    }

    /// Most recent snapshot, if any.
    pub fn pop(&mut self) -> Option<Game> {
        self.entries.pop_back()
    }

    /// Number of snapshots available.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether undo has nothing to restore.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every snapshot.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labelled(label: &str) -> Game {
        let mut game = Game::new(&["Solo".to_string()]);
        game.state.round_label = label.to_string();
        game
    }

    #[test]
    fn pops_in_reverse_order() {
        let mut history = UndoHistory::default();
        history.push(labelled("first"));
        history.push(labelled("second"));
        assert_eq!(history.pop().unwrap().state.round_label, "second");
        assert_eq!(history.pop().unwrap().state.round_label, "first");
        assert!(history.pop().is_none());
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut history = UndoHistory::with_limit(2);
        history.push(labelled("a"));
        history.push(labelled("b"));
        history.push(labelled("c"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.pop().unwrap().state.round_label, "c");
        assert_eq!(history.pop().unwrap().state.round_label, "b");
        assert!(history.is_empty());
    }

    #[test]
    fn default_limit_holds_two_hundred_entries() {
        let mut history = UndoHistory::default();
        for i in 0..(UNDO_LIMIT + 5) {
            history.push(labelled(&i.to_string()));
        }
        assert_eq!(history.len(), UNDO_LIMIT);
    }
}
