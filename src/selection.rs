//! Order-statistic selection
//!
//! [`select`] finds the k-th smallest value of a slice in expected linear
//! time using Hoare-partition quickselect. It runs on every counter
//! rebalance, so it works purely in place and never allocates.

use crate::error::{Result, SketchError};
use core::cmp::Ordering;

/// Return the value at index `k` of the ascending sort of `sequence`
///
/// The slice is partially reordered in place; callers must treat its
/// order as scrambled afterwards. Values themselves are never modified.
///
/// # Errors
///
/// Returns [`SketchError::SelectionOutOfRange`] if `sequence` is empty or
/// `k >= sequence.len()`. The slice is left untouched in that case.
///
/// # Example
///
/// ```
/// use freqsketch::select;
///
/// let mut values = [9, 1, 7, 3, 5];
/// assert_eq!(select(&mut values, 0).unwrap(), 1);
/// assert_eq!(select(&mut values, 2).unwrap(), 5);
/// assert!(select(&mut values, 5).is_err());
/// ```
pub fn select<T: Ord + Copy>(sequence: &mut [T], k: usize) -> Result<T> {
    if k >= sequence.len() {
        return Err(SketchError::SelectionOutOfRange {
            k,
            len: sequence.len(),
        });
    }
    Ok(quickselect(sequence, k))
}

/// Quickselect without bounds validation
///
/// Requires `k < sequence.len()`.
pub(crate) fn quickselect<T: Ord + Copy>(sequence: &mut [T], k: usize) -> T {
    debug_assert!(k < sequence.len());

    let mut lo = 0;
    let mut hi = sequence.len() - 1;

    while hi > lo {
        let idx = partition(sequence, lo, hi);
        match idx.cmp(&k) {
            Ordering::Equal => return sequence[idx],
            // idx > k >= 0, so idx - 1 cannot underflow
            Ordering::Greater => hi = idx - 1,
            Ordering::Less => lo = idx + 1,
        }
    }

    sequence[k]
}

/// Partition `seq[lo..=hi]` around `seq[lo]` and return the pivot's final index
///
/// Both scans stop on elements equal to the pivot, which keeps runs of
/// duplicates split evenly instead of degrading to quadratic time.
fn partition<T: Ord + Copy>(seq: &mut [T], lo: usize, hi: usize) -> usize {
    let pivot = seq[lo];
    let mut i = lo;
    let mut j = hi + 1;

    loop {
        loop {
            i += 1;
            if i == hi || seq[i] >= pivot {
                break;
            }
        }

        loop {
            j -= 1;
            if j == lo || seq[j] <= pivot {
                break;
            }
        }

        if i >= j {
            break;
        }

        seq.swap(i, j);
    }

    seq.swap(lo, j);
    j
}
