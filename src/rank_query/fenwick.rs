//! Binary-indexed (Fenwick) tree over compressed keys.
//!
//! Offline: every key must be registered before [`init`](RankQuery::init),
//! which sorts and deduplicates them. Both `put` and `get_max_at_most` are
//! O(log k) array walks over the compressed positions.
//!
//! # References
//!
//! - Fenwick (1994), "A New Data Structure for Cumulative Frequency Tables"

use super::{normalize_key, Phase, RankQuery, RankQueryKind};

/// Prefix-maximum Fenwick tree.
#[derive(Debug, Clone)]
pub struct FenwickRankQuery {
    keys: Vec<f64>,
    values: Vec<Option<usize>>,
    phase: Phase,
}

impl FenwickRankQuery {
    /// Number of registered keys; distinct after [`init`](RankQuery::init).
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if no keys are registered.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl RankQuery for FenwickRankQuery {
    const KIND: RankQueryKind = RankQueryKind::Fenwick;

    fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            phase: Phase::Preparing,
        }
    }

    fn name(&self) -> &'static str {
        "Fenwick tree"
    }

    fn add_possible_key(&mut self, key: f64) {
        assert_eq!(self.phase, Phase::Preparing, "key added after init");
        self.keys.push(normalize_key(key));
    }

    fn init(&mut self) {
        assert_eq!(self.phase, Phase::Preparing, "init called twice");
        self.keys.sort_unstable_by(f64::total_cmp);
        self.keys.dedup();
        self.values.clear();
        self.values.resize(self.keys.len(), None);
        self.phase = Phase::Querying;
    }

    fn put(&mut self, key: f64, value: usize) {
        assert_eq!(self.phase, Phase::Querying, "put before init");
        let key = normalize_key(key);
        let position = self.keys.partition_point(|&k| k < key);
        assert!(
            position < self.keys.len() && self.keys[position] == key,
            "put on unregistered key {key}"
        );

        let len = self.values.len();
        let mut j = position + 1;
        while j <= len {
            let slot = &mut self.values[j - 1];
            if *slot >= Some(value) {
                // Covering nodes further up hold at least this much already.
                break;
            }
            *slot = Some(value);
            j += j & j.wrapping_neg();
        }
    }

    fn get_max_at_most(&self, key: f64) -> Option<usize> {
        assert_eq!(self.phase, Phase::Querying, "query before init");
        let key = normalize_key(key);
        let mut j = self.keys.partition_point(|&k| k <= key);
        let mut best = None;
        while j > 0 {
            best = best.max(self.values[j - 1]);
            j &= j - 1;
        }
        best
    }

    fn clear(&mut self) {
        self.keys.clear();
        self.values.clear();
        self.phase = Phase::Preparing;
    }
}
