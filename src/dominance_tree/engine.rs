//! Dominance-tree sorting engine.

use super::config::DominanceTreeConfig;
use super::forest::Forest;
use crate::presort::Presort;
use crate::sorter::SortEngine;

/// Non-dominated sorting by merging dominance trees.
///
/// With presort, duplicate points share one node and their rank. Without
/// it, every point gets its own node.
#[derive(Debug, Clone)]
pub struct DominanceTreeSorter {
    config: DominanceTreeConfig,
    max_points: usize,
    max_dimension: usize,
    presort: Option<Presort>,
    forest: Forest,
    ranks: Vec<usize>,
}

impl DominanceTreeSorter {
    /// Creates an engine for up to `max_points` points of dimension up to
    /// `max_dimension`.
    pub fn new(max_points: usize, max_dimension: usize, config: DominanceTreeConfig) -> Self {
        let presort = config.presort.then(|| Presort::with_capacity(max_points));
        let ranks = if config.presort { vec![0; max_points] } else { Vec::new() };
        Self {
            config,
            max_points,
            max_dimension,
            presort,
            forest: Forest::new(
                max_points,
                max_dimension,
                config.presort,
                config.insertion,
                config.merge_order,
            ),
            ranks,
        }
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &DominanceTreeConfig {
        &self.config
    }
}

impl SortEngine for DominanceTreeSorter {
    fn name(&self) -> String {
        self.config.name()
    }

    fn max_points(&self) -> usize {
        self.max_points
    }

    fn max_dimension(&self) -> usize {
        self.max_dimension
    }

    fn rank(&mut self, points: &[Vec<f64>], ranks: &mut [usize], max_rank: usize) {
        let dim = points[0].len();
        match &mut self.presort {
            Some(presort) => {
                let unique = presort.run(points);
                self.forest.reset(unique, dim);
                for (node, &original) in presort.sorted().iter().enumerate() {
                    self.forest.set_point(node, &points[original]);
                }
                self.forest.rank(&mut self.ranks, max_rank);
                for (r, &rep) in ranks.iter_mut().zip(presort.representative()) {
                    *r = self.ranks[rep];
                }
            }
            None => {
                self.forest.reset(points.len(), dim);
                for (node, point) in points.iter().enumerate() {
                    self.forest.set_point(node, point);
                }
                self.forest.rank(ranks, max_rank);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dominance_tree::MergeOrder;
    use crate::fast_nds::non_dominated_sort;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_points(rng: &mut StdRng, n: usize, dim: usize, distinct: i32) -> Vec<Vec<f64>> {
        (0..n)
            .map(|_| (0..dim).map(|_| rng.random_range(0..distinct) as f64).collect())
            .collect()
    }

    #[test]
    fn test_every_configuration_matches_reference() {
        let mut rng = StdRng::seed_from_u64(7);
        let sets: Vec<Vec<Vec<f64>>> = vec![
            random_points(&mut rng, 60, 2, 5),
            random_points(&mut rng, 80, 3, 100),
            random_points(&mut rng, 50, 4, 3),
            random_points(&mut rng, 40, 1, 8),
        ];
        for config in DominanceTreeConfig::all() {
            let mut engine = DominanceTreeSorter::new(80, 4, config);
            for points in &sets {
                let mut ranks = vec![0; points.len()];
                engine.rank(points, &mut ranks, points.len());
                assert_eq!(ranks, non_dominated_sort(points).ranks, "{}", config.name());
            }
        }
    }

    #[test]
    fn test_duplicates_share_rank_without_presort() {
        let config = DominanceTreeConfig::default().with_presort(false);
        let mut engine = DominanceTreeSorter::new(4, 2, config);
        let points = vec![vec![1.0, 1.0], vec![2.0, 2.0], vec![1.0, 1.0], vec![2.0, 2.0]];
        let mut ranks = vec![0; 4];
        engine.rank(&points, &mut ranks, 4);
        assert_eq!(ranks, vec![0, 1, 0, 1]);
    }

    /// Ranks `(i, i)` for `i < n` on a thread with a 512 KiB stack.
    fn rank_chain_on_small_stack(config: DominanceTreeConfig, n: usize) -> Vec<usize> {
        std::thread::Builder::new()
            .stack_size(512 * 1024)
            .spawn(move || {
                let chain: Vec<Vec<f64>> = (0..n).map(|i| vec![i as f64, i as f64]).collect();
                let mut engine = DominanceTreeSorter::new(n, 2, config);
                let mut ranks = vec![0; n];
                engine.rank(&chain, &mut ranks, n);
                ranks
            })
            .unwrap()
            .join()
            .unwrap()
    }

    #[test]
    fn test_long_chain_does_not_grow_stack() {
        for config in DominanceTreeConfig::all() {
            // Sequential merging of a chain is quadratic; keep it shorter.
            let n = match config.merge_order {
                MergeOrder::Recursive => 100_000,
                MergeOrder::Sequential => 3_000,
            };
            let ranks = rank_chain_on_small_stack(config, n);
            assert!(
                ranks.iter().enumerate().all(|(i, &r)| r == i),
                "{}",
                config.name()
            );
        }
    }

    #[test]
    #[should_panic(expected = "capacity exceeded")]
    fn test_rank_beyond_capacity_panics() {
        let mut engine = DominanceTreeSorter::new(2, 2, DominanceTreeConfig::default());
        let points = vec![vec![0.0, 0.0]; 3];
        let mut ranks = vec![0; 3];
        engine.rank(&points, &mut ranks, 3);
    }

    #[test]
    fn test_capped_ranks_exceed_cap() {
        let chain: Vec<Vec<f64>> = (0..6).map(|i| vec![f64::from(i), f64::from(i)]).collect();
        for config in DominanceTreeConfig::all() {
            let mut engine = DominanceTreeSorter::new(6, 2, config);
            let mut ranks = vec![0; 6];
            engine.rank(&chain, &mut ranks, 2);
            assert_eq!(&ranks[..3], &[0, 1, 2]);
            assert!(ranks[3..].iter().all(|&r| r > 2), "{}", config.name());
        }
    }
}
