//! Lexicographic presort and deduplication of point indices.
//!
//! Points are ordered by coordinate 0, ties by coordinate 1, and so on. The
//! sort partitions each coordinate three-way and only descends into the next
//! coordinate inside runs of equal values, so the per-coordinate partition
//! work is never repeated by a full comparator.
//!
//! After sorting, runs of identical points collapse to one representative.
//! Engines rank the representatives only and copy each rank back to the
//! original points, which gives identical points identical ranks.

use std::cmp::Ordering;

/// Below this length a range is finished by insertion sort.
const INSERTION_SORT_THRESHOLD: usize = 12;

/// Compares two points lexicographically starting at coordinate `from`.
pub fn lexicographic_cmp(a: &[f64], b: &[f64], from: usize) -> Ordering {
    for (&va, &vb) in a[from..].iter().zip(b[from..].iter()) {
        if va < vb {
            return Ordering::Less;
        }
        if vb < va {
            return Ordering::Greater;
        }
    }
    Ordering::Equal
}

/// Sorts `indices` by the lexicographic order of the points they refer to.
///
/// `scratch` must be at least as long as `indices`; its contents are
/// overwritten.
///
/// # Example
///
/// ```
/// use u_ndsort::presort::lexicographic_sort;
///
/// let points = vec![vec![2.0, 1.0], vec![1.0, 5.0], vec![1.0, 2.0]];
/// let mut indices = vec![0, 1, 2];
/// let mut scratch = vec![0.0; 3];
/// lexicographic_sort(&points, &mut indices, &mut scratch);
/// assert_eq!(indices, vec![2, 1, 0]);
/// ```
pub fn lexicographic_sort(points: &[Vec<f64>], indices: &mut [usize], scratch: &mut [f64]) {
    assert!(
        scratch.len() >= indices.len(),
        "scratch of length {} cannot hold {} values",
        scratch.len(),
        indices.len()
    );
    let Some(&first) = indices.first() else {
        return;
    };
    let dim = points[first].len();
    if dim == 0 {
        return;
    }
    let len = indices.len();
    sort_by_coordinate(points, indices, &mut scratch[..len], 0, dim);
}

fn sort_by_coordinate(
    points: &[Vec<f64>],
    indices: &mut [usize],
    values: &mut [f64],
    coordinate: usize,
    dim: usize,
) {
    for (v, &i) in values.iter_mut().zip(indices.iter()) {
        *v = points[i][coordinate];
    }
    sort_runs(points, indices, values, coordinate, dim);
}

fn sort_runs(
    points: &[Vec<f64>],
    indices: &mut [usize],
    values: &mut [f64],
    coordinate: usize,
    dim: usize,
) {
    let len = indices.len();
    if len <= 1 {
        return;
    }
    if len <= INSERTION_SORT_THRESHOLD {
        insertion_sort(points, indices, coordinate);
        return;
    }

    let pivot = {
        let (a, b, c) = (values[0], values[len / 2], values[len - 1]);
        if a < b {
            if b < c {
                b
            } else if a < c {
                c
            } else {
                a
            }
        } else if a < c {
            a
        } else if b < c {
            c
        } else {
            b
        }
    };

    let mut lt = 0;
    let mut i = 0;
    let mut gt = len;
    while i < gt {
        let v = values[i];
        if v < pivot {
            values.swap(lt, i);
            indices.swap(lt, i);
            lt += 1;
            i += 1;
        } else if pivot < v {
            gt -= 1;
            values.swap(i, gt);
            indices.swap(i, gt);
        } else {
            i += 1;
        }
    }

    sort_runs(points, &mut indices[..lt], &mut values[..lt], coordinate, dim);
    sort_runs(points, &mut indices[gt..], &mut values[gt..], coordinate, dim);
    if coordinate + 1 < dim && gt - lt > 1 {
        sort_by_coordinate(
            points,
            &mut indices[lt..gt],
            &mut values[lt..gt],
            coordinate + 1,
            dim,
        );
    }
}

fn insertion_sort(points: &[Vec<f64>], indices: &mut [usize], coordinate: usize) {
    for i in 1..indices.len() {
        let current = indices[i];
        let mut j = i;
        while j > 0
            && lexicographic_cmp(&points[indices[j - 1]], &points[current], coordinate)
                == Ordering::Greater
        {
            indices[j] = indices[j - 1];
            j -= 1;
        }
        indices[j] = current;
    }
}

/// Reusable presort workspace: sorted order plus representative mapping.
///
/// All buffers are allocated once for `max_points` and reused by every call.
#[derive(Debug, Clone)]
pub struct Presort {
    order: Vec<usize>,
    values: Vec<f64>,
    representative: Vec<usize>,
    unique: usize,
}

impl Presort {
    /// Creates a workspace able to handle up to `max_points` points.
    pub fn with_capacity(max_points: usize) -> Self {
        Self {
            order: Vec::with_capacity(max_points),
            values: vec![0.0; max_points],
            representative: Vec::with_capacity(max_points),
            unique: 0,
        }
    }

    /// Sorts and deduplicates `points`, returning the number of unique points.
    ///
    /// # Panics
    ///
    /// Panics if `points` holds more points than the workspace capacity.
    pub fn run(&mut self, points: &[Vec<f64>]) -> usize {
        let n = points.len();
        assert!(n <= self.values.len(), "presort capacity exceeded");

        self.order.clear();
        self.order.extend(0..n);
        lexicographic_sort(points, &mut self.order, &mut self.values[..n]);

        self.representative.clear();
        self.representative.resize(n, 0);
        let mut unique = 0;
        for i in 0..n {
            let index = self.order[i];
            if unique > 0 && points[self.order[unique - 1]] == points[index] {
                self.representative[index] = unique - 1;
            } else {
                self.order[unique] = index;
                self.representative[index] = unique;
                unique += 1;
            }
        }
        self.unique = unique;
        unique
    }

    /// Original indices of the unique points, in lexicographic order.
    pub fn sorted(&self) -> &[usize] {
        &self.order[..self.unique]
    }

    /// For every original point, the position of its representative in
    /// [`sorted`](Self::sorted).
    pub fn representative(&self) -> &[usize] {
        &self.representative
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_points(rng: &mut StdRng, n: usize, dim: usize, distinct: i32) -> Vec<Vec<f64>> {
        (0..n)
            .map(|_| (0..dim).map(|_| rng.random_range(0..distinct) as f64).collect())
            .collect()
    }

    fn assert_lex_sorted(points: &[Vec<f64>], indices: &[usize]) {
        for w in indices.windows(2) {
            assert_ne!(
                lexicographic_cmp(&points[w[0]], &points[w[1]], 0),
                Ordering::Greater,
                "{:?} before {:?}",
                points[w[0]],
                points[w[1]]
            );
        }
    }

    #[test]
    fn test_lexicographic_cmp() {
        assert_eq!(lexicographic_cmp(&[1.0, 2.0], &[1.0, 3.0], 0), Ordering::Less);
        assert_eq!(lexicographic_cmp(&[2.0, 0.0], &[1.0, 3.0], 0), Ordering::Greater);
        assert_eq!(lexicographic_cmp(&[2.0, 3.0], &[1.0, 3.0], 1), Ordering::Equal);
    }

    #[test]
    fn test_sort_random_with_ties() {
        let mut rng = StdRng::seed_from_u64(42);
        for (n, dim, distinct) in [(5, 2, 3), (40, 3, 2), (200, 4, 3), (300, 2, 1000)] {
            let points = random_points(&mut rng, n, dim, distinct);
            let mut indices: Vec<usize> = (0..n).collect();
            let mut scratch = vec![0.0; n];
            lexicographic_sort(&points, &mut indices, &mut scratch);
            assert_lex_sorted(&points, &indices);

            let mut seen = indices.clone();
            seen.sort_unstable();
            assert_eq!(seen, (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_sort_empty_and_zero_dimension() {
        let points: Vec<Vec<f64>> = vec![vec![], vec![]];
        let mut indices = vec![1, 0];
        let mut scratch = vec![0.0; 2];
        lexicographic_sort(&points, &mut indices, &mut scratch);
        assert_eq!(indices, vec![1, 0]);

        let mut empty: Vec<usize> = Vec::new();
        lexicographic_sort(&points, &mut empty, &mut scratch);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_presort_deduplicates() {
        let points = vec![
            vec![2.0, 2.0],
            vec![1.0, 3.0],
            vec![2.0, 2.0],
            vec![0.0, 5.0],
            vec![1.0, 3.0],
            vec![-0.0, 5.0],
        ];
        let mut presort = Presort::with_capacity(8);
        let unique = presort.run(&points);
        assert_eq!(unique, 3);

        let sorted = presort.sorted();
        assert_eq!(points[sorted[0]], vec![0.0, 5.0]);
        assert_eq!(points[sorted[1]], vec![1.0, 3.0]);
        assert_eq!(points[sorted[2]], vec![2.0, 2.0]);

        let rep = presort.representative();
        assert_eq!(rep[0], rep[2]);
        assert_eq!(rep[1], rep[4]);
        assert_eq!(rep[3], rep[5]);
        assert_eq!(rep[0], 2);
        assert_eq!(rep[3], 0);
    }

    #[test]
    fn test_presort_reuse() {
        let mut presort = Presort::with_capacity(10);
        let first = vec![vec![3.0], vec![1.0], vec![2.0]];
        assert_eq!(presort.run(&first), 3);
        assert_eq!(presort.sorted(), &[1, 2, 0]);

        let second = vec![vec![1.0], vec![1.0]];
        assert_eq!(presort.run(&second), 1);
        assert_eq!(presort.representative(), &[0, 0]);
    }
}
