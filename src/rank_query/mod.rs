//! Rank-query structures: "maximum value stored at any key `<=` a query key".
//!
//! The divide-and-conquer sweep keys points by one coordinate and asks, for
//! each new point, for the best rank seen so far among points whose key does
//! not exceed its own.
//!
//! # Lifecycle
//!
//! 1. **Preparing**: [`add_possible_key`](RankQuery::add_possible_key)
//!    registers every key that may later be [`put`](RankQuery::put).
//! 2. [`init`](RankQuery::init) switches to the querying phase.
//! 3. **Querying**: any interleaving of `put` and
//!    [`get_max_at_most`](RankQuery::get_max_at_most).
//! 4. [`clear`](RankQuery::clear) discards everything and returns to
//!    preparing.
//!
//! Calling an operation in the wrong phase is a bug in the caller and panics.
//!
//! # Realizations
//!
//! - [`FenwickRankQuery`]: offline, keys compressed at `init`, array walks.
//! - [`TreeRankQuery`]: online, keys inserted into an ordered map on demand.

mod fenwick;
mod tree;

pub use fenwick::FenwickRankQuery;
pub use tree::TreeRankQuery;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Order-statistics map from a real key to the maximum value at keys `<=` it.
pub trait RankQuery {
    /// Which realization this is.
    const KIND: RankQueryKind;

    /// Creates an empty structure able to hold `capacity` distinct keys.
    fn with_capacity(capacity: usize) -> Self
    where
        Self: Sized;

    /// Human-readable name of the realization.
    fn name(&self) -> &'static str;

    /// Registers a key that may be used by a later [`put`](Self::put).
    fn add_possible_key(&mut self, key: f64);

    /// Ends the preparing phase.
    fn init(&mut self);

    /// Records `value` at `key`; the stored value becomes the maximum of the
    /// old one and `value`.
    fn put(&mut self, key: f64, value: usize);

    /// Returns the maximum value put at any key `<= key`, or `None`.
    fn get_max_at_most(&self, key: f64) -> Option<usize>;

    /// Discards all keys and values and returns to the preparing phase.
    fn clear(&mut self);
}

/// Selects a [`RankQuery`] realization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RankQueryKind {
    /// Binary-indexed tree over compressed keys.
    #[default]
    Fenwick,
    /// Ordered map staircase with online insertion.
    BalancedTree,
}

impl RankQueryKind {
    /// Display name used in algorithm names.
    pub fn name(self) -> &'static str {
        match self {
            RankQueryKind::Fenwick => "Fenwick tree",
            RankQueryKind::BalancedTree => "balanced tree",
        }
    }
}

/// Lifecycle phase shared by both realizations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Preparing,
    Querying,
}

/// Maps `-0.0` onto `0.0` so both land on one key.
#[inline]
pub(crate) fn normalize_key(key: f64) -> f64 {
    key + 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Put(i32, usize),
        Query(i32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (-20i32..20, 0usize..50).prop_map(|(k, v)| Op::Put(k, v)),
            (-25i32..25).prop_map(Op::Query),
        ]
    }

    fn run<R: RankQuery>(ops: &[Op]) -> Vec<Option<usize>> {
        let mut rq = R::with_capacity(64);
        for op in ops {
            if let Op::Put(k, _) = op {
                rq.add_possible_key(f64::from(*k) * 0.5);
            }
        }
        rq.init();
        let mut answers = Vec::new();
        for op in ops {
            match *op {
                Op::Put(k, v) => rq.put(f64::from(k) * 0.5, v),
                Op::Query(k) => answers.push(rq.get_max_at_most(f64::from(k) * 0.5)),
            }
        }
        rq.clear();
        answers
    }

    fn run_naive(ops: &[Op]) -> Vec<Option<usize>> {
        let mut stored: Vec<(f64, usize)> = Vec::new();
        let mut answers = Vec::new();
        for op in ops {
            match *op {
                Op::Put(k, v) => stored.push((f64::from(k) * 0.5, v)),
                Op::Query(k) => {
                    let q = f64::from(k) * 0.5;
                    answers.push(stored.iter().filter(|(key, _)| *key <= q).map(|&(_, v)| v).max());
                }
            }
        }
        answers
    }

    proptest! {
        #[test]
        fn test_realizations_agree(ops in proptest::collection::vec(op_strategy(), 0..60)) {
            let fenwick = run::<FenwickRankQuery>(&ops);
            let tree = run::<TreeRankQuery>(&ops);
            prop_assert_eq!(&fenwick, &tree);
            prop_assert_eq!(&fenwick, &run_naive(&ops));
        }
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(RankQueryKind::default(), RankQueryKind::Fenwick);
        assert_eq!(RankQueryKind::BalancedTree.name(), "balanced tree");
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key(-0.0).to_bits(), 0.0f64.to_bits());
        assert_eq!(normalize_key(-1.5), -1.5);
    }
}
