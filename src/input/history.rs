//! Bounded history of recently processed keys.

use super::event::KeyEvent;
use std::collections::VecDeque;

/// Number of keys remembered.
pub const HISTORY_CAPACITY: usize = 50;

/// The most recent keys, oldest first.
///
/// Only used to detect runs of identical key presses (interval
/// acceleration). Pushing onto a full history evicts the oldest entry.
#[derive(Debug, Clone, Default)]
pub struct InputHistory {
    keys: VecDeque<KeyEvent>,
}

impl InputHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self {
            keys: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Record a processed key.
    pub fn push(&mut self, key: KeyEvent) {
        if self.keys.len() == HISTORY_CAPACITY {
            self.keys.pop_front();
        }
        self.keys.push_back(key);
    }

    /// Number of keys held.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if nothing has been recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Most recent key.
    pub fn last(&self) -> Option<&KeyEvent> {
        self.keys.back()
    }

    /// The history is full and every entry is `key`.
    pub fn is_saturated_with(&self, key: &KeyEvent) -> bool {
        self.keys.len() == HISTORY_CAPACITY && self.keys.iter().all(|k| k == key)
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_evicts_oldest() {
        let mut history = InputHistory::new();
        history.push(KeyEvent::Char(b'a'));
        for _ in 0..HISTORY_CAPACITY {
            history.push(KeyEvent::Char(b'+'));
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert!(history.is_saturated_with(&KeyEvent::Char(b'+')));
    }

    #[test]
    fn test_partial_history_is_not_saturated() {
        let mut history = InputHistory::new();
        for _ in 0..HISTORY_CAPACITY - 1 {
            history.push(KeyEvent::Char(b'+'));
        }
        assert!(!history.is_saturated_with(&KeyEvent::Char(b'+')));
        history.push(KeyEvent::Char(b'-'));
        assert!(!history.is_saturated_with(&KeyEvent::Char(b'+')));
        assert_eq!(history.last(), Some(&KeyEvent::Char(b'-')));
    }
}
