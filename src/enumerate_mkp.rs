use crate::mkp::MkpInstance;
use ndarray::Array1;

/// Largest instance [`enumerate_solve`] will be asked to handle, 2^24 subsets.
pub const MAX_ENUMERATION_ITEMS: usize = 24;

/// Enumerate all possible binary solutions and keep the best feasible one. Only meant for tiny
/// instances, as a reference for the heuristics.
///
/// # Panics
///
/// Will panic if the instance has more than [`MAX_ENUMERATION_ITEMS`] items.
pub fn enumerate_solve(instance: &MkpInstance) -> (i64, Array1<usize>) {
    let num_vars = instance.num_items();
    assert!(
        num_vars <= MAX_ENUMERATION_ITEMS,
        "too many items to enumerate: {num_vars}"
    );

    // the empty knapsack is always feasible
    let mut best_obj = 0;
    let mut best_solution = Array1::<usize>::zeros(num_vars);
    let mut solution = Array1::<usize>::zeros(num_vars);

    for i in 0..(1usize << num_vars) {
        for j in 0..num_vars {
            solution[j] = (i >> j) & 1;
        }

        if !instance.is_feasible(&solution) {
            continue;
        }

        let obj = instance.eval(&solution);
        if obj > best_obj {
            best_obj = obj;
            best_solution.clone_from(&solution);
        }
    }

    (best_obj, best_solution)
}
