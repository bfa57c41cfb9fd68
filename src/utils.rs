//! This is the general Utils module, which contains functions that are used by multiple algorithms and there is not a
//! better place to put them as of yet.

use ndarray::Array1;

/// Sorts `indices` in place so that their `scores` are in strictly decreasing order.
///
/// This is a partition based quick sort. The pivot is the last element of each range and only
/// elements scoring strictly above the pivot move in front of it, so among equal scores the
/// relative order is whatever the partitioning produces; it is deterministic for a given input.
/// NaN scores compare false against everything and end up behind the pivot of their range.
///
/// Example:
/// ``` rust
/// use qpso_mkp::utils::sort_by_utility;
///
/// let mut idx = vec![0, 1, 2, 3];
/// sort_by_utility(&mut idx, &[5.0, 1.0, 9.0, 3.0]);
/// assert_eq!(idx, vec![2, 0, 3, 1]);
/// ```
pub fn sort_by_utility(indices: &mut [usize], scores: &[f64]) {
    let mut lo = 0;
    let mut up = indices.len();

    // recurse into the smaller side and loop on the larger one to keep the stack shallow
    while up - lo > 1 {
        let p = lo + partition(&mut indices[lo..up], scores);
        if p - lo < up - p - 1 {
            sort_by_utility(&mut indices[lo..p], scores);
            lo = p + 1;
        } else {
            sort_by_utility(&mut indices[p + 1..up], scores);
            up = p;
        }
    }
}

fn partition(indices: &mut [usize], scores: &[f64]) -> usize {
    let last = indices.len() - 1;
    let pivot = scores[indices[last]];
    let mut i = 0;

    for k in 0..last {
        if scores[indices[k]] > pivot {
            indices.swap(k, i);
            i += 1;
        }
    }

    indices.swap(i, last);
    i
}

/// Given a permutation mapping position -> value, return the one mapping value -> position.
pub fn invert_permutation(order: &[usize]) -> Vec<usize> {
    let mut inverse = vec![0; order.len()];
    for (position, &index) in order.iter().enumerate() {
        inverse[index] = position;
    }
    inverse
}

/// Computes the hamming distance two points.
pub fn calculate_hamming_distance(x_0: &Array1<usize>, x_1: &Array1<usize>) -> usize {
    x_0.iter().zip(x_1.iter()).filter(|(a, b)| a != b).count()
}
