//! Non-dominated sorting engines.
//!
//! Assigns every point of a finite set its Pareto rank under minimization:
//! points dominated by nobody have rank 0, and every other point has rank
//! one more than the highest rank among its dominators.
//!
//! - **Divide-and-conquer sweep**: recursion over objectives with median
//!   splits and a rank-query sweep for two objectives.
//! - **Dominance tree**: pairwise merging of dominance trees with selectable
//!   presort, insertion and merge-order policies.
//! - **Fast non-dominated sorting**: the O(m * n²) NSGA-II procedure, used as
//!   the reference.
//!
//! All engines share one contract, [`Sorter`]: capacity is declared at
//! construction, scratch storage is allocated once, and every call validates
//! its input before touching the output.
//!
//! # Architecture
//!
//! - [`dominance`], [`presort`], [`median`], [`rank_query`]: shared building
//!   blocks
//! - [`divide_conquer`], [`dominance_tree`], [`fast_nds`]: engines
//! - [`Algorithm`], [`Sorter`], [`batch`]: public entry points
//!
//! # Example
//!
//! ```
//! use u_ndsort::Algorithm;
//!
//! let points = vec![
//!     vec![1.0, 4.0],
//!     vec![2.0, 2.0],
//!     vec![3.0, 3.0],
//!     vec![4.0, 1.0],
//! ];
//! let mut ranks = vec![0; points.len()];
//! for algorithm in Algorithm::all() {
//!     let mut sorter = algorithm.create(points.len(), 2).unwrap();
//!     sorter.sort(&points, &mut ranks).unwrap();
//!     assert_eq!(ranks, vec![0, 0, 1, 0]);
//! }
//! ```

pub mod algorithm;
pub mod batch;
pub mod divide_conquer;
pub mod dominance;
pub mod dominance_tree;
pub mod error;
pub mod fast_nds;
pub mod median;
pub mod presort;
pub mod rank_query;
pub mod sorter;

pub use algorithm::Algorithm;
pub use error::SortError;
pub use sorter::{SortEngine, Sorter};
