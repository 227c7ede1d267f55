//! Generation-counted asset prefetch tracking.
//!
//! The core never fetches anything itself: it hands the host a batch of
//! image keys with a generation number and waits for each key to be reported
//! back. Reports carrying a stale generation (a newer question superseded
//! the batch) are ignored.

use std::collections::HashSet;

/// Outcome of reporting one asset back to the current batch.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BatchProgress {
    /// The report belonged to an older batch and was dropped.
    Stale,
    /// Accepted, but other keys are still outstanding.
    Pending,
    /// Accepted and the batch is now fully resolved.
    Complete,
}

/// Tracks the in-flight prefetch batch for the pending question.
#[derive(Debug, Default)]
pub struct AssetBatch {
    generation: u64,
    pending: HashSet<String>,
}

impl AssetBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new batch, invalidating any outstanding one. Returns the new
    /// generation; an empty `keys` list yields an immediately complete batch.
    pub fn begin(&mut self, keys: impl IntoIterator<Item = String>) -> u64 {
        self.generation += 1;
        self.pending = keys.into_iter().collect();
        self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True when nothing is outstanding.
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }

    /// Abandons the outstanding batch; any later report for it is stale.
    pub fn abort(&mut self) {
        self.generation += 1;
        self.pending.clear();
    }

    /// Records one fetched (or failed, the distinction is the caller's) key.
    /// Reports against an already-complete batch are stale: completion fires
    /// at most once per generation.
    pub fn resolve(&mut self, generation: u64, key: &str) -> BatchProgress {
        if generation != self.generation || self.pending.is_empty() {
            return BatchProgress::Stale;
        }
        self.pending.remove(key);
        if self.pending.is_empty() {
            BatchProgress::Complete
        } else {
            BatchProgress::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_batch_is_complete() {
        let mut batch = AssetBatch::new();
        batch.begin(Vec::new());
        assert!(batch.is_complete());
    }

    #[test]
    fn test_batch_completes_after_all_keys() {
        let mut batch = AssetBatch::new();
        let generation = batch.begin(vec!["a.png".into(), "b.png".into()]);
        assert_eq!(batch.resolve(generation, "a.png"), BatchProgress::Pending);
        assert_eq!(batch.resolve(generation, "b.png"), BatchProgress::Complete);
    }

    #[test]
    fn test_stale_generation_ignored() {
        let mut batch = AssetBatch::new();
        let old = batch.begin(vec!["a.png".into()]);
        let new = batch.begin(vec!["b.png".into()]);
        assert_ne!(old, new);
        assert_eq!(batch.resolve(old, "a.png"), BatchProgress::Stale);
        assert!(!batch.is_complete());
        assert_eq!(batch.resolve(new, "b.png"), BatchProgress::Complete);
    }

    #[test]
    fn test_duplicate_final_key_does_not_complete_twice() {
        let mut batch = AssetBatch::new();
        let generation = batch.begin(vec!["a.png".into()]);
        assert_eq!(batch.resolve(generation, "a.png"), BatchProgress::Complete);
        assert_eq!(batch.resolve(generation, "a.png"), BatchProgress::Stale);
    }

    #[test]
    fn test_abort_invalidates_outstanding_batch() {
        let mut batch = AssetBatch::new();
        let generation = batch.begin(vec!["a.png".into()]);
        batch.abort();
        assert_eq!(batch.resolve(generation, "a.png"), BatchProgress::Stale);
    }

    #[test]
    fn test_unknown_key_does_not_complete_early() {
        let mut batch = AssetBatch::new();
        let generation = batch.begin(vec!["a.png".into(), "b.png".into()]);
        assert_eq!(batch.resolve(generation, "c.png"), BatchProgress::Pending);
    }
}
