//! The sorting contract shared by every engine.
//!
//! [`Sorter`] owns one engine plus its declared capacity. It validates input,
//! runs the engine and clamps the resulting ranks to the caller's cap. An
//! engine only ever sees well-formed input: at least one point, a common
//! dimension between 1 and the capacity, finite coordinates.

use crate::error::SortError;

/// A non-dominated sorting algorithm working on validated input.
///
/// Implementations own all their scratch storage, sized at construction for
/// the capacity they report through [`max_points`](Self::max_points) and
/// [`max_dimension`](Self::max_dimension), and reuse it across calls.
///
/// # Contract
///
/// `rank` receives `n >= 1` points of a common dimension `d >= 1` and must
/// write, for every point, its exact rank if that rank is at most
/// `max_rank`, and any value above `max_rank` otherwise. Engines may stop
/// early once every remaining point is known to exceed the cap.
pub trait SortEngine: Send {
    /// Stable display name of the algorithm and its configuration.
    fn name(&self) -> String;

    /// Largest point count `rank` accepts.
    fn max_points(&self) -> usize;

    /// Largest dimension `rank` accepts.
    fn max_dimension(&self) -> usize;

    /// Writes the rank of every point into `ranks`.
    fn rank(&mut self, points: &[Vec<f64>], ranks: &mut [usize], max_rank: usize);
}

/// A reusable, capacity-bounded non-dominated sorter.
///
/// Created by [`Algorithm::create`](crate::Algorithm::create). A sorter is
/// `Send` but sort calls take `&mut self`, so one instance serves one thread
/// at a time while separate instances run fully in parallel.
///
/// # Example
///
/// ```
/// use u_ndsort::Algorithm;
///
/// let mut sorter = Algorithm::default().create(10, 2).unwrap();
/// let points = vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![0.0, 2.0]];
/// let mut ranks = vec![0; 3];
/// sorter.sort(&points, &mut ranks).unwrap();
/// assert_eq!(ranks, vec![0, 1, 1]);
/// sorter.close();
/// ```
pub struct Sorter {
    engine: Box<dyn SortEngine>,
    name: String,
    max_points: usize,
    max_dimension: usize,
}

impl Sorter {
    /// Wraps an engine. Input is validated against the capacity the engine
    /// reports, so the engine never sees more than it was sized for.
    pub fn new(engine: Box<dyn SortEngine>) -> Self {
        let name = engine.name();
        let max_points = engine.max_points();
        let max_dimension = engine.max_dimension();
        log::debug!(
            "created sorter '{name}' for up to {max_points} points of dimension {max_dimension}"
        );
        Self {
            engine,
            name,
            max_points,
            max_dimension,
        }
    }

    /// Display name of the wrapped algorithm.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Maximum number of points per call.
    pub fn max_points(&self) -> usize {
        self.max_points
    }

    /// Maximum dimension per call.
    pub fn max_dimension(&self) -> usize {
        self.max_dimension
    }

    /// Computes the rank of every point.
    ///
    /// Equivalent to [`sort_with_max_rank`](Self::sort_with_max_rank) with
    /// `max_rank = points.len()`, which never clamps.
    pub fn sort(&mut self, points: &[Vec<f64>], ranks: &mut [usize]) -> Result<(), SortError> {
        self.sort_with_max_rank(points, ranks, points.len())
    }

    /// Computes ranks, reporting every rank above `max_rank` as
    /// `max_rank + 1`.
    ///
    /// # Errors
    ///
    /// Returns a [`SortError`] without touching `ranks` if the lengths
    /// differ, the capacity is exceeded, dimensions are inconsistent or a
    /// coordinate is not finite.
    pub fn sort_with_max_rank(
        &mut self,
        points: &[Vec<f64>],
        ranks: &mut [usize],
        max_rank: usize,
    ) -> Result<(), SortError> {
        let dim = validate_input(points, ranks.len(), self.max_points, self.max_dimension)?;
        let n = points.len();
        if n == 0 {
            return Ok(());
        }
        log::trace!("{}: sorting {n} points of dimension {dim}, max rank {max_rank}", self.name);

        if dim == 0 {
            // All points coincide.
            ranks.fill(0);
            return Ok(());
        }

        self.engine.rank(points, ranks, max_rank);

        let cap = max_rank.saturating_add(1);
        for r in ranks.iter_mut() {
            if *r > cap {
                *r = cap;
            }
        }
        Ok(())
    }

    /// Releases the scratch storage. Consuming `self` rules out any further
    /// use of the instance.
    pub fn close(self) {
        log::debug!("closed sorter '{}'", self.name);
    }
}

impl std::fmt::Debug for Sorter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sorter")
            .field("name", &self.name)
            .field("max_points", &self.max_points)
            .field("max_dimension", &self.max_dimension)
            .finish()
    }
}

/// Checks the sort preconditions and returns the common dimension.
pub(crate) fn validate_input(
    points: &[Vec<f64>],
    ranks_len: usize,
    max_points: usize,
    max_dimension: usize,
) -> Result<usize, SortError> {
    if points.len() != ranks_len {
        return Err(SortError::LengthMismatch {
            points: points.len(),
            ranks: ranks_len,
        });
    }
    if points.len() > max_points {
        return Err(SortError::TooManyPoints {
            got: points.len(),
            max: max_points,
        });
    }
    let Some(first) = points.first() else {
        return Ok(0);
    };
    let dim = first.len();
    if dim > max_dimension {
        return Err(SortError::DimensionTooLarge {
            got: dim,
            max: max_dimension,
        });
    }
    for (index, point) in points.iter().enumerate() {
        if point.len() != dim {
            return Err(SortError::InconsistentDimension {
                index,
                expected: dim,
                got: point.len(),
            });
        }
        if let Some(coordinate) = point.iter().position(|v| !v.is_finite()) {
            return Err(SortError::NonFiniteCoordinate { index, coordinate });
        }
    }
    Ok(dim)
}
