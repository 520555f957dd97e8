//! Ordered-map staircase with online insertion.
//!
//! Entries are kept with values strictly increasing in key order, so the
//! answer to "max value at keys `<=` q" is simply the value of the last entry
//! at or below `q`. A `put` that does not improve on that answer is dropped;
//! otherwise it removes the entries it now shadows.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::{normalize_key, Phase, RankQuery, RankQueryKind};

/// Totally ordered wrapper for finite, normalized keys.
#[derive(Debug, Clone, Copy)]
struct Key(f64);

impl Key {
    fn new(key: f64) -> Self {
        Key(normalize_key(key))
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Key {}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Balanced-tree rank-query structure backed by a [`BTreeMap`].
#[derive(Debug, Clone)]
pub struct TreeRankQuery {
    entries: BTreeMap<Key, usize>,
    phase: Phase,
}

impl TreeRankQuery {
    /// Number of entries currently on the staircase.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RankQuery for TreeRankQuery {
    const KIND: RankQueryKind = RankQueryKind::BalancedTree;

    fn with_capacity(_capacity: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            phase: Phase::Preparing,
        }
    }

    fn name(&self) -> &'static str {
        "balanced tree"
    }

    fn add_possible_key(&mut self, _key: f64) {
        assert_eq!(self.phase, Phase::Preparing, "key added after init");
    }

    fn init(&mut self) {
        assert_eq!(self.phase, Phase::Preparing, "init called twice");
        self.phase = Phase::Querying;
    }

    fn put(&mut self, key: f64, value: usize) {
        assert_eq!(self.phase, Phase::Querying, "put before init");
        let key = Key::new(key);
        if let Some((_, &best)) = self.entries.range(..=key).next_back() {
            if best >= value {
                return;
            }
        }
        loop {
            let shadowed = match self.entries.range(key..).next() {
                Some((&next, &stored)) if stored <= value => next,
                _ => break,
            };
            self.entries.remove(&shadowed);
        }
        self.entries.insert(key, value);
    }

    fn get_max_at_most(&self, key: f64) -> Option<usize> {
        assert_eq!(self.phase, Phase::Querying, "query before init");
        self.entries
            .range(..=Key::new(key))
            .next_back()
            .map(|(_, &value)| value)
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.phase = Phase::Preparing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready() -> TreeRankQuery {
        let mut rq = TreeRankQuery::with_capacity(0);
        rq.init();
        rq
    }

    #[test]
    fn test_staircase_shadowing() {
        let mut rq = ready();
        rq.put(5.0, 1);
        rq.put(7.0, 2);
        rq.put(9.0, 3);
        assert_eq!(rq.len(), 3);

        // Shadows 5.0 and 7.0 but not 9.0.
        rq.put(4.0, 2);
        assert_eq!(rq.len(), 2);
        assert_eq!(rq.get_max_at_most(3.9), None);
        assert_eq!(rq.get_max_at_most(4.0), Some(2));
        assert_eq!(rq.get_max_at_most(8.0), Some(2));
        assert_eq!(rq.get_max_at_most(9.0), Some(3));
    }

    #[test]
    fn test_useless_put_is_dropped() {
        let mut rq = ready();
        rq.put(1.0, 5);
        rq.put(2.0, 3);
        assert_eq!(rq.len(), 1);
        assert_eq!(rq.get_max_at_most(2.0), Some(5));
    }

    #[test]
    fn test_same_key_keeps_maximum() {
        let mut rq = ready();
        rq.put(-0.0, 1);
        rq.put(0.0, 4);
        rq.put(0.0, 2);
        assert_eq!(rq.len(), 1);
        assert_eq!(rq.get_max_at_most(0.0), Some(4));
        assert_eq!(rq.get_max_at_most(-0.0), Some(4));
    }

    #[test]
    fn test_clear_returns_to_preparing() {
        let mut rq = ready();
        rq.put(1.0, 1);
        rq.clear();
        assert!(rq.is_empty());
        rq.add_possible_key(3.0);
        rq.init();
        assert_eq!(rq.get_max_at_most(10.0), None);
    }

    #[test]
    #[should_panic(expected = "query before init")]
    fn test_query_while_preparing_panics() {
        let rq = TreeRankQuery::with_capacity(0);
        rq.get_max_at_most(1.0);
    }
}
