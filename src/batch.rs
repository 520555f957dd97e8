//! Ranking many independent point sets.
//!
//! With the `parallel` feature, sets are distributed over the rayon thread
//! pool and every worker builds its own [`Sorter`](crate::Sorter). Without
//! it, a single sorter sized for the largest set is reused.

use crate::algorithm::Algorithm;
use crate::error::SortError;

/// Ranks every point set in `sets` with `algorithm`.
///
/// Returns one rank vector per set, in input order.
///
/// # Errors
///
/// Returns the first [`SortError`] met: an invalid configuration or a set
/// failing validation.
///
/// # Example
///
/// ```
/// use u_ndsort::{batch::sort_batch, Algorithm};
///
/// let sets = vec![
///     vec![vec![0.0, 0.0], vec![1.0, 1.0]],
///     vec![vec![0.0, 1.0], vec![1.0, 0.0]],
/// ];
/// let ranks = sort_batch(&Algorithm::default(), &sets).unwrap();
/// assert_eq!(ranks, vec![vec![0, 1], vec![0, 0]]);
/// ```
pub fn sort_batch(
    algorithm: &Algorithm,
    sets: &[Vec<Vec<f64>>],
) -> Result<Vec<Vec<usize>>, SortError> {
    algorithm.validate().map_err(SortError::InvalidConfig)?;
    let max_points = sets.iter().map(Vec::len).max().unwrap_or(0);
    let max_dimension = sets
        .iter()
        .flat_map(|set| set.first())
        .map(Vec::len)
        .max()
        .unwrap_or(0);
    log::debug!(
        "batch of {} sets with {}: up to {max_points} points of dimension {max_dimension}",
        sets.len(),
        algorithm.name()
    );

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        sets.par_iter()
            .map_init(
                || algorithm.create(max_points, max_dimension),
                |sorter, points| {
                    let sorter = sorter.as_mut().map_err(|e| e.clone())?;
                    let mut ranks = vec![0; points.len()];
                    sorter.sort(points, &mut ranks)?;
                    Ok(ranks)
                },
            )
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        let mut sorter = algorithm.create(max_points, max_dimension)?;
        let mut results = Vec::with_capacity(sets.len());
        for points in sets {
            let mut ranks = vec![0; points.len()];
            sorter.sort(points, &mut ranks)?;
            results.push(ranks);
        }
        sorter.close();
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fast_nds::non_dominated_sort;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_batch_matches_individual_sorts() {
        let mut rng = StdRng::seed_from_u64(11);
        let sets: Vec<Vec<Vec<f64>>> = (0..12)
            .map(|k| {
                let n = 5 + k * 7;
                (0..n)
                    .map(|_| (0..3).map(|_| rng.random_range(0..6) as f64).collect())
                    .collect()
            })
            .collect();
        for algorithm in Algorithm::all() {
            let ranks = sort_batch(&algorithm, &sets).unwrap();
            assert_eq!(ranks.len(), sets.len());
            for (points, got) in sets.iter().zip(&ranks) {
                assert_eq!(got, &non_dominated_sort(points).ranks, "{}", algorithm.name());
            }
        }
    }

    #[test]
    fn test_empty_batch() {
        let ranks = sort_batch(&Algorithm::default(), &[]).unwrap();
        assert!(ranks.is_empty());
    }

    #[test]
    fn test_batch_reports_bad_set() {
        let sets = vec![
            vec![vec![0.0, 1.0]],
            vec![vec![0.0, 1.0], vec![f64::NAN, 0.0]],
        ];
        let err = sort_batch(&Algorithm::default(), &sets).unwrap_err();
        assert_eq!(err, SortError::NonFiniteCoordinate { index: 1, coordinate: 0 });
    }
}
