//! Best score tracking
//!
//! A single scalar persisted across sessions through a `ScoreStore`.

use crate::platform::{BEST_SCORE_KEY, ScoreStore};

/// Best score seen so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BestScore {
    value: u64,
}

impl BestScore {
    /// Read from the store; missing or unreadable values count as zero
    pub fn load<S: ScoreStore + ?Sized>(store: &S) -> Self {
        let value = store.get(BEST_SCORE_KEY).unwrap_or(0);
        log::info!("Best score: {}", value);
        Self { value }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Check if a score would beat the current best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.value
    }

    /// Record a finished run. Writes to the store only when the best improves.
    /// Returns true on a new best.
    pub fn record<S: ScoreStore + ?Sized>(&mut self, score: u64, store: &mut S) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.value = score;
        store.set(BEST_SCORE_KEY, score);
        log::info!("New best score: {}", score);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    #[test]
    fn test_absent_store_defaults_to_zero() {
        let store = MemoryStore::new();
        assert_eq!(BestScore::load(&store).value(), 0);
    }

    #[test]
    fn test_record_only_writes_improvements() {
        let mut store = MemoryStore::new();
        store.set(BEST_SCORE_KEY, 100);
        let mut best = BestScore::load(&store);
        assert_eq!(best.value(), 100);

        assert!(!best.record(100, &mut store));
        assert!(!best.record(60, &mut store));
        assert_eq!(store.get(BEST_SCORE_KEY), Some(100));

        assert!(best.record(150, &mut store));
        assert_eq!(best.value(), 150);
        assert_eq!(store.get(BEST_SCORE_KEY), Some(150));
    }
}
