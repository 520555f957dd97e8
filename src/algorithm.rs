//! Algorithm registry: one value per algorithm and configuration.

use crate::divide_conquer::{DivideConquerConfig, DivideConquerSorter};
use crate::dominance_tree::{DominanceTreeConfig, DominanceTreeSorter};
use crate::error::SortError;
use crate::fast_nds::FastNonDominatedSort;
use crate::rank_query::{FenwickRankQuery, RankQueryKind, TreeRankQuery};
use crate::sorter::{SortEngine, Sorter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A non-dominated sorting algorithm together with its configuration.
///
/// Acts as the factory for [`Sorter`] instances and carries a stable display
/// name that does not require building one.
///
/// # Example
///
/// ```
/// use u_ndsort::Algorithm;
/// use u_ndsort::dominance_tree::DominanceTreeConfig;
///
/// let algorithm = Algorithm::DominanceTree(DominanceTreeConfig::default());
/// let mut sorter = algorithm.create(100, 3).unwrap();
/// assert_eq!(sorter.name(), algorithm.name());
///
/// let points = vec![vec![1.0, 2.0, 3.0], vec![2.0, 3.0, 4.0]];
/// let mut ranks = vec![0; 2];
/// sorter.sort(&points, &mut ranks).unwrap();
/// assert_eq!(ranks, vec![0, 1]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Algorithm {
    /// Pairwise dominance counting, O(m * n²).
    FastNonDominatedSort,
    /// Divide-and-conquer over objectives with a rank-query sweep.
    DivideConquer(DivideConquerConfig),
    /// Merging of dominance trees.
    DominanceTree(DominanceTreeConfig),
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::DivideConquer(DivideConquerConfig::default())
    }
}

impl Algorithm {
    /// Stable display name; equal to [`Sorter::name`] of created instances.
    pub fn name(&self) -> String {
        match self {
            Algorithm::FastNonDominatedSort => "Fast non-dominated sorting".into(),
            Algorithm::DivideConquer(config) => config.name(),
            Algorithm::DominanceTree(config) => config.name(),
        }
    }

    /// Validates the wrapped configuration.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Algorithm::FastNonDominatedSort => Ok(()),
            Algorithm::DivideConquer(config) => config.validate(),
            Algorithm::DominanceTree(config) => config.validate(),
        }
    }

    /// Builds a sorter for up to `max_points` points of up to
    /// `max_dimension` objectives. All scratch storage is allocated here.
    ///
    /// # Errors
    ///
    /// Returns [`SortError::InvalidConfig`] if the configuration is invalid.
    pub fn create(&self, max_points: usize, max_dimension: usize) -> Result<Sorter, SortError> {
        self.validate().map_err(SortError::InvalidConfig)?;
        let engine: Box<dyn SortEngine> = match *self {
            Algorithm::FastNonDominatedSort => {
                Box::new(FastNonDominatedSort::with_capacity(max_points, max_dimension))
            }
            Algorithm::DivideConquer(config) => match config.rank_query {
                RankQueryKind::Fenwick => Box::new(DivideConquerSorter::<FenwickRankQuery>::new(
                    max_points,
                    max_dimension,
                    config,
                )),
                RankQueryKind::BalancedTree => Box::new(DivideConquerSorter::<TreeRankQuery>::new(
                    max_points,
                    max_dimension,
                    config,
                )),
            },
            Algorithm::DominanceTree(config) => {
                Box::new(DominanceTreeSorter::new(max_points, max_dimension, config))
            }
        };
        Ok(Sorter::new(engine))
    }

    /// Every algorithm in every supported configuration: the reference,
    /// both divide-and-conquer rank-query realizations and all dominance-tree
    /// policy combinations.
    pub fn all() -> Vec<Algorithm> {
        let mut algorithms = vec![Algorithm::FastNonDominatedSort];
        for kind in [RankQueryKind::Fenwick, RankQueryKind::BalancedTree] {
            algorithms.push(Algorithm::DivideConquer(
                DivideConquerConfig::default().with_rank_query(kind),
            ));
        }
        algorithms.extend(
            DominanceTreeConfig::all()
                .into_iter()
                .map(Algorithm::DominanceTree),
        );
        algorithms
    }
}
