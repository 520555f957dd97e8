//! Divide-and-conquer non-dominated sorting.
//!
//! Splits the point set by the median of the last objective, ranks the lower
//! half, propagates its ranks into the upper half one objective down, then
//! ranks the upper half. Two objectives are handled by a sweep over a
//! [`RankQuery`](crate::rank_query::RankQuery) structure. Runs in
//! O(n log^(d-1) n) for d objectives.
//!
//! # Key Types
//!
//! - [`DivideConquerConfig`]: rank-query choice, three-way split threshold
//! - [`DivideConquerSorter`]: the engine, generic over the rank-query type
//!
//! # References
//!
//! - Jensen (2003), "Reducing the Run-time Complexity of Multiobjective EAs:
//!   The NSGA-II and Other Algorithms"
//! - Fortin, Grenier & Parizeau (2013), "Generalizing the Improved Run-time
//!   Complexity Algorithm for Non-dominated Sorting"
//! - Buzdalov & Shalyto (2014), "A Provably Asymptotically Fast Version of the
//!   Generalized Jensen Algorithm for Non-dominated Sorting"

mod config;
mod engine;

pub use config::DivideConquerConfig;
pub use engine::DivideConquerSorter;
