//! Dominance-tree non-dominated sorting.
//!
//! Every point starts as a singleton tree. Trees are merged pairwise; when a
//! node is found dominated it moves, with its subtree, under its dominator.
//! The final root chain is the first front, the merged child subtrees of its
//! members form the second, and so on.
//!
//! Three independent policies shape a run, see [`DominanceTreeConfig`]:
//! lexicographic presort, [`Insertion`] timing and [`MergeOrder`].
//!
//! # References
//!
//! - Fang, Wang, Moore & Jin (2008), "An Efficient Non-dominated Sorting
//!   Method for Evolutionary Algorithms"
//! - Buzdalov, Yakupov & Stankevich (2015), "Fast Implementation of the
//!   Steady-State NSGA-II Algorithm for Two Dimensions Based on Incremental
//!   Non-Dominated Sorting"

mod config;
mod engine;
mod forest;

pub use config::{DominanceTreeConfig, Insertion, MergeOrder};
pub use engine::DominanceTreeSorter;
