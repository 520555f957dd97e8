//! Pareto dominance primitive.
//!
//! All objectives are **minimized**: lower values are better. Point `a`
//! weakly dominates `b` when `a[i] <= b[i]` for every objective, and strictly
//! dominates it when, in addition, the two points differ.

/// Outcome of comparing two objective vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dominance {
    /// Left strictly dominates right.
    Dominates,
    /// Right strictly dominates left.
    Dominated,
    /// Neither dominates the other.
    Incomparable,
    /// Both vectors are identical.
    Equal,
}

impl Dominance {
    /// Returns the outcome seen from the other operand.
    pub fn reverse(self) -> Self {
        match self {
            Dominance::Dominates => Dominance::Dominated,
            Dominance::Dominated => Dominance::Dominates,
            other => other,
        }
    }
}

/// Compares two solutions for Pareto dominance in a single pass.
///
/// Stops as soon as both "left is better somewhere" and "right is better
/// somewhere" have been observed.
///
/// # Example
///
/// ```
/// use u_ndsort::dominance::{dominance_cmp, Dominance};
///
/// assert_eq!(dominance_cmp(&[1.0, 2.0], &[2.0, 2.0]), Dominance::Dominates);
/// assert_eq!(dominance_cmp(&[1.0, 3.0], &[2.0, 2.0]), Dominance::Incomparable);
/// assert_eq!(dominance_cmp(&[2.0, 2.0], &[2.0, 2.0]), Dominance::Equal);
/// ```
pub fn dominance_cmp(a: &[f64], b: &[f64]) -> Dominance {
    debug_assert_eq!(a.len(), b.len());
    let mut a_better_in_some = false;
    let mut b_better_in_some = false;

    for (&va, &vb) in a.iter().zip(b.iter()) {
        if va < vb {
            a_better_in_some = true;
            if b_better_in_some {
                return Dominance::Incomparable;
            }
        } else if vb < va {
            b_better_in_some = true;
            if a_better_in_some {
                return Dominance::Incomparable;
            }
        }
    }

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::Dominates,
        (false, true) => Dominance::Dominated,
        (false, false) => Dominance::Equal,
        (true, true) => Dominance::Incomparable,
    }
}

/// Returns `true` if `a[i] <= b[i]` for every coordinate.
#[inline]
pub fn weakly_dominates(a: &[f64], b: &[f64]) -> bool {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).all(|(&va, &vb)| va <= vb)
}

/// Returns `true` if `a` weakly dominates `b` and the two differ.
pub fn strictly_dominates(a: &[f64], b: &[f64]) -> bool {
    dominance_cmp(a, b) == Dominance::Dominates
}
