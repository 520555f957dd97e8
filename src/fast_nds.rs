//! Fast non-dominated sorting.
//!
//! The classic O(m * n²) algorithm used by NSGA-II, here both as a
//! stateless convenience function and as a reusable [`SortEngine`]. It makes
//! no assumption about point order or uniqueness, which makes it the
//! reference the faster engines are checked against.
//!
//! # Algorithm (Deb et al., 2002)
//!
//! 1. For each pair of solutions, determine dominance
//! 2. Solutions dominated by no other belong to front 0 (rank 0)
//! 3. Remove front 0, repeat to find subsequent fronts
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - IEEE Transactions on Evolutionary Computation, 6(2), 182-197

use crate::dominance::{dominance_cmp, Dominance};
use crate::sorter::SortEngine;

/// Result of non-dominated sorting.
///
/// Each element of `ranks` corresponds to the Pareto rank of the solution
/// at the same index. Rank 0 is the Pareto front (non-dominated solutions).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NondominatedSortResult {
    /// Pareto rank for each solution (0 = front).
    pub ranks: Vec<usize>,

    /// Indices grouped by front: `fronts[0]` contains rank-0 indices, etc.
    pub fronts: Vec<Vec<usize>>,
}

/// Fast non-dominated sorting of a set of objective vectors.
///
/// All objectives are **minimized**. Identical solutions do not dominate
/// each other and share a rank.
///
/// # Example
///
/// ```
/// use u_ndsort::fast_nds::non_dominated_sort;
///
/// let objectives = vec![
///     vec![1.0, 5.0],  // Solution A
///     vec![3.0, 3.0],  // Solution B
///     vec![5.0, 1.0],  // Solution C
///     vec![4.0, 4.0],  // Solution D, dominated by B
/// ];
///
/// let result = non_dominated_sort(&objectives);
/// assert_eq!(result.ranks, vec![0, 0, 0, 1]);
/// assert_eq!(result.fronts, vec![vec![0, 1, 2], vec![3]]);
/// ```
pub fn non_dominated_sort(objectives: &[Vec<f64>]) -> NondominatedSortResult {
    let n = objectives.len();
    let mut ranks = vec![0usize; n];
    if n > 0 {
        let mut engine = FastNonDominatedSort::with_capacity(n, objectives[0].len());
        engine.rank(objectives, &mut ranks, n);
    }
    let fronts = fronts_from_ranks(&ranks);
    NondominatedSortResult { ranks, fronts }
}

/// Groups point indices by rank, in increasing index order within a front.
pub fn fronts_from_ranks(ranks: &[usize]) -> Vec<Vec<usize>> {
    let front_count = ranks.iter().max().map_or(0, |&r| r + 1);
    let mut fronts = vec![Vec::new(); front_count];
    for (i, &r) in ranks.iter().enumerate() {
        fronts[r].push(i);
    }
    fronts
}

/// Reusable engine for fast non-dominated sorting.
///
/// Domination lists keep their allocations between calls.
#[derive(Debug, Clone)]
pub struct FastNonDominatedSort {
    max_points: usize,
    max_dimension: usize,
    domination_count: Vec<usize>,
    dominated_by: Vec<Vec<usize>>,
    current: Vec<usize>,
    next: Vec<usize>,
}

impl FastNonDominatedSort {
    /// Creates an engine for up to `max_points` points of up to
    /// `max_dimension` objectives.
    pub fn with_capacity(max_points: usize, max_dimension: usize) -> Self {
        Self {
            max_points,
            max_dimension,
            domination_count: Vec::with_capacity(max_points),
            dominated_by: vec![Vec::new(); max_points],
            current: Vec::with_capacity(max_points),
            next: Vec::with_capacity(max_points),
        }
    }
}

impl SortEngine for FastNonDominatedSort {
    fn name(&self) -> String {
        "Fast non-dominated sorting".into()
    }

    fn max_points(&self) -> usize {
        self.max_points
    }

    fn max_dimension(&self) -> usize {
        self.max_dimension
    }

    fn rank(&mut self, objectives: &[Vec<f64>], ranks: &mut [usize], max_rank: usize) {
        let n = objectives.len();
        assert!(
            n <= self.max_points && objectives[0].len() <= self.max_dimension,
            "fast non-dominated sorting capacity exceeded"
        );
        self.domination_count.clear();
        self.domination_count.resize(n, 0);
        for list in &mut self.dominated_by[..n] {
            list.clear();
        }
        self.current.clear();

        // Compute dominance relationships
        for i in 0..n {
            for j in (i + 1)..n {
                match dominance_cmp(&objectives[i], &objectives[j]) {
                    Dominance::Dominates => {
                        // i dominates j
                        self.dominated_by[i].push(j);
                        self.domination_count[j] += 1;
                    }
                    Dominance::Dominated => {
                        // j dominates i
                        self.dominated_by[j].push(i);
                        self.domination_count[i] += 1;
                    }
                    Dominance::Incomparable | Dominance::Equal => {}
                }
            }

            if self.domination_count[i] == 0 {
                self.current.push(i);
            }
        }

        let beyond_cap = max_rank.saturating_add(1);
        ranks.fill(beyond_cap);

        // Build subsequent fronts
        let mut front = 0usize;
        while !self.current.is_empty() && front <= max_rank {
            self.next.clear();
            for &i in &self.current {
                ranks[i] = front;
                for &j in &self.dominated_by[i] {
                    self.domination_count[j] -= 1;
                    if self.domination_count[j] == 0 {
                        self.next.push(j);
                    }
                }
            }
            std::mem::swap(&mut self.current, &mut self.next);
            front += 1;
        }
    }
}
