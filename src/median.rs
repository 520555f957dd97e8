//! Destructive selection of order statistics.
//!
//! [`select_kth`] rearranges a slice in place so that position `k` holds the
//! k-th smallest value. Nothing else about the final order is guaranteed,
//! which is why the operation is called *destructive*: callers copy the
//! values they care about into a scratch slice first.
//!
//! # Algorithm
//!
//! Quickselect with a median-of-three pivot and a Hoare two-way partition.
//! When a two-way pass fails to shrink the active range by at least a quarter
//! (the usual symptom of many values equal to the pivot) a three-way pass
//! (less / equal / greater) settles every pivot-equal value at once.
//! Ranges of at most three elements are finished with compare-exchanges.
//!
//! Expected O(n), allocation free.
//!
//! # References
//!
//! - Hoare (1961), "Algorithm 65: Find"
//! - Bentley & McIlroy (1993), "Engineering a Sort Function"

/// Sorts `values[i]` and `values[j]` into ascending order.
#[inline]
fn compare_exchange(values: &mut [f64], i: usize, j: usize) {
    if values[j] < values[i] {
        values.swap(i, j);
    }
}

/// Rearranges first, middle and last so that the middle holds their median.
///
/// Afterwards `values[from] <= pivot <= values[until - 1]`, which bounds the
/// inner scans of the Hoare partition.
fn median_of_three(values: &mut [f64], from: usize, until: usize) -> f64 {
    let mid = from + (until - from) / 2;
    let last = until - 1;
    compare_exchange(values, from, mid);
    compare_exchange(values, mid, last);
    compare_exchange(values, from, mid);
    values[mid]
}

/// Three-way partition of `values[from..until]` around `pivot`.
///
/// Returns `(lt, gt)` such that `[from, lt)` is below the pivot,
/// `[lt, gt)` equals it and `[gt, until)` is above it.
fn partition_three_way(values: &mut [f64], from: usize, until: usize, pivot: f64) -> (usize, usize) {
    let mut lt = from;
    let mut i = from;
    let mut gt = until;
    while i < gt {
        let v = values[i];
        if v < pivot {
            values.swap(lt, i);
            lt += 1;
            i += 1;
        } else if pivot < v {
            gt -= 1;
            values.swap(i, gt);
        } else {
            i += 1;
        }
    }
    (lt, gt)
}

/// Returns the k-th smallest value of `values`, rearranging it in place.
///
/// On return `values[k]` holds that value, every element before `k` is not
/// greater and every element after `k` is not smaller.
///
/// # Panics
///
/// Panics if `k >= values.len()`.
///
/// # Example
///
/// ```
/// use u_ndsort::median::select_kth;
///
/// let mut values = vec![5.0, 1.0, 4.0, 2.0, 3.0];
/// assert_eq!(select_kth(&mut values, 1), 2.0);
/// assert_eq!(values[1], 2.0);
/// ```
pub fn select_kth(values: &mut [f64], k: usize) -> f64 {
    assert!(
        k < values.len(),
        "order statistic {k} out of range for {} values",
        values.len()
    );

    let mut from = 0usize;
    let mut until = values.len();
    loop {
        let len = until - from;
        if len <= 3 {
            if len >= 2 {
                compare_exchange(values, from, from + 1);
            }
            if len == 3 {
                compare_exchange(values, from + 1, from + 2);
                compare_exchange(values, from, from + 1);
            }
            return values[k];
        }

        let pivot = median_of_three(values, from, until);

        // Hoare partition with signed cursors: `r` may step just below `from`.
        let mut l = from as isize;
        let mut r = until as isize - 1;
        while l <= r {
            while values[l as usize] < pivot {
                l += 1;
            }
            while pivot < values[r as usize] {
                r -= 1;
            }
            if l <= r {
                values.swap(l as usize, r as usize);
                l += 1;
                r -= 1;
            }
        }

        let ki = k as isize;
        if ki <= r {
            until = r as usize + 1;
        } else if ki >= l {
            from = l as usize;
        } else {
            // Strictly between the cursors: equal to the pivot.
            return values[k];
        }

        if (until - from) * 4 > len * 3 {
            let pivot = median_of_three(values, from, until);
            let (lt, gt) = partition_three_way(values, from, until, pivot);
            if k < lt {
                until = lt;
            } else if k >= gt {
                from = gt;
            } else {
                return values[k];
            }
        }
    }
}

/// Returns the median of `values`, rearranging it in place.
///
/// The selected order statistic is `len / 2`, i.e. the upper median for an
/// even length.
///
/// # Panics
///
/// Panics if `values` is empty.
pub fn destructive_median(values: &mut [f64]) -> f64 {
    let k = values.len() / 2;
    select_kth(values, k)
}
