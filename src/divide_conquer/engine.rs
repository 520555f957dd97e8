//! Recursive divide-and-conquer over objectives with a 2-objective sweep.
//!
//! Points are presorted and deduplicated first, then copied into a flat
//! buffer in lexicographic order. From then on a point is identified by its
//! position in that order, and a lower position can dominate a higher one
//! but never the reverse.
//!
//! Every range of the working permutation is kept sorted by position between
//! recursive calls; splits are stable and the halves are merged back by
//! position before returning.

use super::config::DivideConquerConfig;
use crate::median::destructive_median;
use crate::presort::Presort;
use crate::rank_query::RankQuery;
use crate::sorter::SortEngine;

/// Up to this many good x weak pairs are compared directly.
const BRUTE_FORCE_PAIRS: usize = 16;

/// Divide-and-conquer non-dominated sorting engine, generic over the
/// rank-query structure used by the sweep.
#[derive(Debug, Clone)]
pub struct DivideConquerSorter<R: RankQuery> {
    config: DivideConquerConfig,
    max_points: usize,
    max_dimension: usize,
    presort: Presort,
    /// Unique points in lexicographic order, row-major.
    coords: Vec<f64>,
    dim: usize,
    /// Rank of each unique point.
    ranks: Vec<usize>,
    /// Working permutation of unique positions.
    indices: Vec<usize>,
    scratch: Vec<usize>,
    medians: Vec<f64>,
    /// Smallest coordinate-1 value of each front (2-D binary search).
    front_bounds: Vec<f64>,
    rank_query: R,
}

impl<R: RankQuery> DivideConquerSorter<R> {
    /// Creates an engine for up to `max_points` points of dimension up to
    /// `max_dimension`. The rank-query choice in `config` is overridden by
    /// `R`.
    pub fn new(max_points: usize, max_dimension: usize, config: DivideConquerConfig) -> Self {
        Self {
            config: DivideConquerConfig {
                rank_query: R::KIND,
                ..config
            },
            max_points,
            max_dimension,
            presort: Presort::with_capacity(max_points),
            coords: vec![0.0; max_points * max_dimension],
            dim: 0,
            ranks: vec![0; max_points],
            indices: vec![0; max_points],
            scratch: vec![0; max_points],
            medians: vec![0.0; max_points],
            front_bounds: Vec::with_capacity(max_points),
            rank_query: R::with_capacity(max_points),
        }
    }

    #[inline]
    fn value(&self, point: usize, objective: usize) -> f64 {
        self.coords[point * self.dim + objective]
    }

    /// `good[k] <= weak[k]` for every `k` in `0..=obj`.
    fn dominates_up_to(&self, good: usize, weak: usize, obj: usize) -> bool {
        let g = &self.coords[good * self.dim..good * self.dim + obj + 1];
        let w = &self.coords[weak * self.dim..weak * self.dim + obj + 1];
        g.iter().zip(w).all(|(a, b)| a <= b)
    }

    #[inline]
    fn raise(&mut self, weak: usize, good: usize) {
        let candidate = self.ranks[good] + 1;
        if self.ranks[weak] < candidate {
            self.ranks[weak] = candidate;
        }
    }

    fn value_range(&self, from: usize, until: usize, obj: usize) -> (f64, f64) {
        self.indices[from..until]
            .iter()
            .map(|&p| self.value(p, obj))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Counts values below and equal to `median` in a range.
    fn count_around(&self, from: usize, until: usize, obj: usize, median: f64) -> (usize, usize) {
        let mut less = 0;
        let mut equal = 0;
        for &p in &self.indices[from..until] {
            let v = self.value(p, obj);
            if v < median {
                less += 1;
            } else if v == median {
                equal += 1;
            }
        }
        (less, equal)
    }

    /// Copies coordinate `obj` of a range into the median buffer at `offset`.
    fn collect_values(&mut self, from: usize, until: usize, offset: usize, obj: usize) -> usize {
        let dim = self.dim;
        for (slot, &p) in self.medians[offset..]
            .iter_mut()
            .zip(&self.indices[from..until])
        {
            *slot = self.coords[p * dim + obj];
        }
        offset + (until - from)
    }

    /// Stable partition of a range: `< median` (and `== median` when
    /// `ties_left`) first. Returns the absolute split position.
    fn split_two(&mut self, from: usize, until: usize, obj: usize, median: f64, ties_left: bool) -> usize {
        let dim = self.dim;
        let mut write = from;
        let mut moved = 0;
        for k in from..until {
            let p = self.indices[k];
            let v = self.coords[p * dim + obj];
            if v < median || (ties_left && v == median) {
                self.indices[write] = p;
                write += 1;
            } else {
                self.scratch[moved] = p;
                moved += 1;
            }
        }
        self.indices[write..until].copy_from_slice(&self.scratch[..moved]);
        write
    }

    /// Stable three-way partition of a range around `median`.
    ///
    /// Returns `(m1, m2)`: `[from, m1)` is below, `[m1, m2)` equal and
    /// `[m2, until)` above the median.
    fn split_three(&mut self, from: usize, until: usize, obj: usize, median: f64) -> (usize, usize) {
        let dim = self.dim;
        let mut write = from;
        let mut moved = 0;
        for k in from..until {
            let p = self.indices[k];
            if self.coords[p * dim + obj] < median {
                self.indices[write] = p;
                write += 1;
            } else {
                self.scratch[moved] = p;
                moved += 1;
            }
        }
        let m1 = write;
        let mut greater = 0;
        for t in 0..moved {
            let p = self.scratch[t];
            if self.coords[p * dim + obj] == median {
                self.indices[write] = p;
                write += 1;
            } else {
                self.scratch[greater] = p;
                greater += 1;
            }
        }
        self.indices[write..until].copy_from_slice(&self.scratch[..greater]);
        (m1, write)
    }

    /// Stable merge of the sorted ranges `[from, mid)` and `[mid, until)`.
    fn merge(&mut self, from: usize, mid: usize, until: usize) {
        if from == mid || mid == until {
            return;
        }
        let indices = &mut self.indices[from..until];
        let split = mid - from;
        debug_assert!(indices[..split].windows(2).all(|w| w[0] < w[1]));
        debug_assert!(indices[split..].windows(2).all(|w| w[0] < w[1]));
        if indices[split - 1] < indices[split] {
            return;
        }
        let scratch = &mut self.scratch[..until - from];
        let (mut i, mut j) = (0, split);
        for slot in scratch.iter_mut() {
            if j == indices.len() || (i < split && indices[i] < indices[j]) {
                *slot = indices[i];
                i += 1;
            } else {
                *slot = indices[j];
                j += 1;
            }
        }
        indices.copy_from_slice(scratch);
    }

    /// Ranks the points of `[from, until)` among themselves on objectives
    /// `0..=obj`. All of them are equal above `obj`.
    fn solve(&mut self, from: usize, until: usize, obj: usize) {
        let n = until - from;
        if n < 2 {
            return;
        }
        if n == 2 {
            let (good, weak) = (self.indices[from], self.indices[from + 1]);
            if self.dominates_up_to(good, weak, obj) {
                self.raise(weak, good);
            }
            return;
        }
        if obj == 1 {
            self.sweep(from, until);
            return;
        }

        let (min, max) = self.value_range(from, until, obj);
        if min == max {
            self.solve(from, until, obj - 1);
            return;
        }

        let count = self.collect_values(from, until, 0, obj);
        let median = destructive_median(&mut self.medians[..count]);
        let (less, equal) = self.count_around(from, until, obj, median);
        let greater = n - less - equal;

        if equal as f64 > self.config.three_way_threshold * n as f64 {
            let (m1, m2) = self.split_three(from, until, obj, median);
            self.solve(from, m1, obj);
            self.solve_against(from, m1, m1, m2, obj - 1);
            self.solve(m1, m2, obj - 1);
            self.merge(from, m1, m2);
            self.solve_against(from, m2, m2, until, obj - 1);
            self.solve(m2, until, obj);
            self.merge(from, m2, until);
        } else {
            // Ties join the smaller side; neither side can end up empty
            // because the range holds at least two distinct values.
            let mid = self.split_two(from, until, obj, median, less <= greater);
            self.solve(from, mid, obj);
            self.solve_against(from, mid, mid, until, obj - 1);
            self.solve(mid, until, obj);
            self.merge(from, mid, until);
        }
    }

    /// Raises ranks of `[wf, wu)` by the points of `[gf, gu)` dominating them
    /// on objectives `0..=obj`. Every good point is `<=` every weak point
    /// above `obj`; good ranks are final and left untouched.
    ///
    /// Splits both sets around the median of their union on `obj`, three
    /// ways when the median band is heavy and two ways otherwise, using the
    /// same threshold as [`solve`](Self::solve).
    fn solve_against(&mut self, gf: usize, gu: usize, wf: usize, wu: usize, obj: usize) {
        if gf == gu || wf == wu {
            return;
        }
        if self.indices[gf] > self.indices[wu - 1] {
            // Every good point comes after every weak point.
            return;
        }
        let (gn, wn) = (gu - gf, wu - wf);
        if gn == 1 || wn == 1 || gn * wn <= BRUTE_FORCE_PAIRS {
            self.brute_force_against(gf, gu, wf, wu, obj);
            return;
        }
        if obj == 1 {
            self.sweep_against(gf, gu, wf, wu);
            return;
        }

        let (good_min, good_max) = self.value_range(gf, gu, obj);
        let (weak_min, weak_max) = self.value_range(wf, wu, obj);
        if good_min > weak_max {
            return;
        }
        if good_max <= weak_min {
            self.solve_against(gf, gu, wf, wu, obj - 1);
            return;
        }

        let count = self.collect_values(gf, gu, 0, obj);
        let count = self.collect_values(wf, wu, count, obj);
        let median = destructive_median(&mut self.medians[..count]);
        let (good_less, good_equal) = self.count_around(gf, gu, obj, median);
        let (weak_less, weak_equal) = self.count_around(wf, wu, obj, median);
        let equal = good_equal + weak_equal;
        let less = good_less + weak_less;
        let greater = count - less - equal;

        if equal as f64 > self.config.three_way_threshold * count as f64 {
            let (g1, g2) = self.split_three(gf, gu, obj, median);
            let (w1, w2) = self.split_three(wf, wu, obj, median);

            self.solve_against(gf, g1, wf, w1, obj);
            self.solve_against(g2, gu, w2, wu, obj);

            // Below or at the median against at or above it, except
            // below against below and above against above.
            self.merge(gf, g1, g2);
            self.merge(w1, w2, wu);
            self.solve_against(gf, g2, w1, wu, obj - 1);

            self.merge(gf, g2, gu);
            self.merge(wf, w1, wu);
        } else {
            // One tie side for both sets keeps (good right, weak left) pairs
            // strictly apart on `obj`.
            let ties_left = less <= greater;
            let gm = self.split_two(gf, gu, obj, median, ties_left);
            let wm = self.split_two(wf, wu, obj, median, ties_left);

            self.solve_against(gf, gm, wf, wm, obj);
            self.solve_against(gf, gm, wm, wu, obj - 1);
            self.solve_against(gm, gu, wm, wu, obj);

            self.merge(gf, gm, gu);
            self.merge(wf, wm, wu);
        }
    }

    fn brute_force_against(&mut self, gf: usize, gu: usize, wf: usize, wu: usize, obj: usize) {
        for w in wf..wu {
            let weak = self.indices[w];
            for g in gf..gu {
                let good = self.indices[g];
                if good > weak {
                    break;
                }
                if self.dominates_up_to(good, weak, obj) {
                    self.raise(weak, good);
                }
            }
        }
    }

    /// Two-objective base case of [`solve`](Self::solve).
    fn sweep(&mut self, from: usize, until: usize) {
        for k in from..until {
            let key = self.value(self.indices[k], 1);
            self.rank_query.add_possible_key(key);
        }
        self.rank_query.init();
        for k in from..until {
            let p = self.indices[k];
            let key = self.value(p, 1);
            if let Some(best) = self.rank_query.get_max_at_most(key) {
                if self.ranks[p] <= best {
                    self.ranks[p] = best + 1;
                }
            }
            self.rank_query.put(key, self.ranks[p]);
        }
        self.rank_query.clear();
    }

    /// Two-objective base case of [`solve_against`](Self::solve_against).
    fn sweep_against(&mut self, gf: usize, gu: usize, wf: usize, wu: usize) {
        for g in gf..gu {
            let key = self.value(self.indices[g], 1);
            self.rank_query.add_possible_key(key);
        }
        self.rank_query.init();

        let mut g = gf;
        let mut previous = None;
        for w in wf..wu {
            let weak = self.indices[w];
            assert!(
                previous < Some(weak),
                "weak point {weak} out of position order in sweep"
            );
            previous = Some(weak);

            while g < gu && self.indices[g] < weak {
                let good = self.indices[g];
                self.rank_query.put(self.value(good, 1), self.ranks[good]);
                g += 1;
            }
            if let Some(best) = self.rank_query.get_max_at_most(self.value(weak, 1)) {
                if self.ranks[weak] <= best {
                    self.ranks[weak] = best + 1;
                }
            }
        }
        self.rank_query.clear();
    }

    /// Two-objective ranking from scratch: binary search for the first front
    /// whose lowest coordinate-1 value exceeds the point's own.
    fn sweep_binary_search(&mut self, unique: usize) {
        self.front_bounds.clear();
        for p in 0..unique {
            let y = self.value(p, 1);
            let front = self.front_bounds.partition_point(|&bound| bound <= y);
            if front == self.front_bounds.len() {
                self.front_bounds.push(y);
            } else {
                self.front_bounds[front] = y;
            }
            self.ranks[p] = front;
        }
    }
}

impl<R: RankQuery + Send> SortEngine for DivideConquerSorter<R> {
    fn name(&self) -> String {
        self.config.name()
    }

    fn max_points(&self) -> usize {
        self.max_points
    }

    fn max_dimension(&self) -> usize {
        self.max_dimension
    }

    fn rank(&mut self, points: &[Vec<f64>], ranks: &mut [usize], _max_rank: usize) {
        let dim = points[0].len();
        assert!(
            dim <= self.max_dimension,
            "divide-and-conquer dimension capacity exceeded"
        );
        let unique = self.presort.run(points);
        self.dim = dim;
        for (position, &original) in self.presort.sorted().iter().enumerate() {
            self.coords[position * dim..(position + 1) * dim].copy_from_slice(&points[original]);
        }
        self.ranks[..unique].fill(0);
        for (position, slot) in self.indices[..unique].iter_mut().enumerate() {
            *slot = position;
        }
        log::trace!("divide-and-conquer: {unique} unique of {} points", points.len());

        if dim == 1 {
            // Unique one-dimensional points form a chain.
            for (position, r) in self.ranks[..unique].iter_mut().enumerate() {
                *r = position;
            }
        } else if dim == 2 && self.config.binary_search_2d {
            self.sweep_binary_search(unique);
        } else {
            self.solve(0, unique, dim - 1);
        }

        for (r, &rep) in ranks.iter_mut().zip(self.presort.representative()) {
            *r = self.ranks[rep];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fast_nds::non_dominated_sort;
    use crate::rank_query::{FenwickRankQuery, TreeRankQuery};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn run<R: RankQuery + Send>(config: DivideConquerConfig, points: &[Vec<f64>]) -> Vec<usize> {
        let dim = points.first().map_or(1, Vec::len);
        let mut engine = DivideConquerSorter::<R>::new(points.len(), dim, config);
        let mut ranks = vec![0; points.len()];
        engine.rank(points, &mut ranks, points.len());
        ranks
    }

    fn random_points(rng: &mut StdRng, n: usize, dim: usize, distinct: i32) -> Vec<Vec<f64>> {
        (0..n)
            .map(|_| (0..dim).map(|_| rng.random_range(0..distinct) as f64).collect())
            .collect()
    }

    fn configs() -> Vec<DivideConquerConfig> {
        vec![
            DivideConquerConfig::default(),
            DivideConquerConfig::default().with_binary_search_2d(false),
            DivideConquerConfig::default().with_three_way_threshold(0.0),
            DivideConquerConfig::default().with_three_way_threshold(1.0),
        ]
    }

    #[test]
    fn test_matches_reference_random() {
        let mut rng = StdRng::seed_from_u64(42);
        for dim in 1..=5 {
            for (n, distinct) in [(3, 10), (20, 4), (100, 1000), (150, 3)] {
                let points = random_points(&mut rng, n, dim, distinct);
                let expected = non_dominated_sort(&points).ranks;
                for config in configs() {
                    assert_eq!(
                        run::<FenwickRankQuery>(config, &points),
                        expected,
                        "fenwick, dim {dim}, n {n}, {config:?}"
                    );
                    assert_eq!(
                        run::<TreeRankQuery>(config, &points),
                        expected,
                        "tree, dim {dim}, n {n}, {config:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_heavy_ties_across_halves() {
        let mut rng = StdRng::seed_from_u64(11);
        for dim in [3, 4, 5] {
            for distinct in [2, 3] {
                let points = random_points(&mut rng, 300, dim, distinct);
                let expected = non_dominated_sort(&points).ranks;
                for threshold in [0.0, 0.2, 0.5, 1.0] {
                    let config = DivideConquerConfig::default().with_three_way_threshold(threshold);
                    assert_eq!(
                        run::<FenwickRankQuery>(config, &points),
                        expected,
                        "dim {dim}, distinct {distinct}, threshold {threshold}"
                    );
                    assert_eq!(
                        run::<TreeRankQuery>(config, &points),
                        expected,
                        "dim {dim}, distinct {distinct}, threshold {threshold}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_chain_and_antichain() {
        let chain: Vec<Vec<f64>> = (0..30).map(|i| vec![f64::from(i); 4]).collect();
        let ranks = run::<FenwickRankQuery>(DivideConquerConfig::default(), &chain);
        assert_eq!(ranks, (0..30).collect::<Vec<_>>());

        let antichain: Vec<Vec<f64>> = (0..30)
            .map(|i| vec![f64::from(i), f64::from(30 - i), 1.0])
            .collect();
        let ranks = run::<TreeRankQuery>(DivideConquerConfig::default(), &antichain);
        assert!(ranks.iter().all(|&r| r == 0));
    }

    #[test]
    fn test_binary_search_2d_fronts() {
        let points = vec![
            vec![1.0, 5.0],
            vec![2.0, 2.0],
            vec![3.0, 3.0],
            vec![3.0, 1.0],
            vec![4.0, 4.0],
            vec![1.0, 5.0],
        ];
        let ranks = run::<FenwickRankQuery>(DivideConquerConfig::default(), &points);
        assert_eq!(ranks, vec![0, 0, 1, 0, 2, 0]);
    }

    #[test]
    fn test_name_follows_rank_query_type() {
        let engine = DivideConquerSorter::<TreeRankQuery>::new(4, 3, DivideConquerConfig::default());
        assert!(engine.name().contains("balanced tree"));
    }

    #[test]
    fn test_reuse_across_calls() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut engine =
            DivideConquerSorter::<FenwickRankQuery>::new(80, 4, DivideConquerConfig::default());
        for (n, dim) in [(80, 4), (10, 3), (55, 2), (1, 4)] {
            let points = random_points(&mut rng, n, dim, 6);
            let mut ranks = vec![0; n];
            engine.rank(&points, &mut ranks, n);
            assert_eq!(ranks, non_dominated_sort(&points).ranks);
        }
    }
}
