//! This module contains the move primitives shared by repair and local search.
//!
//! These include:
//! - dropping an item
//! - adding an item if it fits
//! - the drop then add greedy repair
//!
//! Everything works in working order, where a lower index means a higher utility: drops scan
//! from the back, adds scan from the front.

use crate::mkp::MkpInstance;
use ndarray::Array1;

/// A decision vector together with its remaining capacity and value, kept in sync by the moves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub x: Array1<usize>,
    pub remaining: Array1<i64>,
    pub value: i64,
}

impl Candidate {
    /// Builds the candidate for `x`, which may be infeasible.
    pub fn new(instance: &MkpInstance, x: Array1<usize>) -> Self {
        let remaining = instance.remaining_capacity(&x);
        let value = instance.eval(&x);
        Self {
            x,
            remaining,
            value,
        }
    }

    /// The empty knapsack.
    pub fn empty(instance: &MkpInstance) -> Self {
        Self {
            x: Array1::zeros(instance.num_items()),
            remaining: instance.capacities.clone(),
            value: 0,
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.remaining.iter().all(|&r| r >= 0)
    }

    /// Forces item k in without a capacity check, the caller is responsible for repairing.
    pub fn force_add(&mut self, instance: &MkpInstance, k: usize) {
        self.x[k] = 1;
        self.remaining -= &instance.weights.column(k);
        self.value += instance.profits[k];
    }
}

/// Removes item k if it is selected and reports whether the candidate is now feasible. Returns
/// false when k was not selected.
pub fn drop_item(instance: &MkpInstance, k: usize, candidate: &mut Candidate) -> bool {
    if candidate.x[k] == 0 {
        return false;
    }

    candidate.x[k] = 0;
    candidate.remaining += &instance.weights.column(k);
    candidate.value -= instance.profits[k];

    candidate.is_feasible()
}

/// Adds item k if it is not selected and fits in the remaining capacity of every dimension.
pub fn add_item(instance: &MkpInstance, k: usize, candidate: &mut Candidate) {
    if candidate.x[k] == 1 {
        return;
    }

    let fits = instance
        .weights
        .column(k)
        .iter()
        .zip(candidate.remaining.iter())
        .all(|(&w, &r)| w <= r);

    if fits {
        candidate.x[k] = 1;
        candidate.remaining -= &instance.weights.column(k);
        candidate.value += instance.profits[k];
    }
}

/// Drops selected items from the lowest utility end, skipping `keep`, until the candidate is
/// feasible. Returns whether feasibility was restored.
pub fn drop_pass(instance: &MkpInstance, candidate: &mut Candidate, keep: Option<usize>) -> bool {
    if candidate.is_feasible() {
        return true;
    }

    for k in (0..instance.num_items()).rev() {
        if Some(k) != keep && drop_item(instance, k, candidate) {
            return true;
        }
    }

    candidate.is_feasible()
}

/// Adds every item, skipping `skip`, that still fits, from the highest utility end.
pub fn add_pass(instance: &MkpInstance, candidate: &mut Candidate, skip: Option<usize>) {
    for k in 0..instance.num_items() {
        if Some(k) != skip {
            add_item(instance, k, candidate);
        }
    }
}

/// Greedy repair: drop until feasible, then fill. The result is always feasible for an instance
/// with non-negative capacities.
///
/// Example:
/// ``` rust
/// use qpso_mkp::mkp::MkpInstance;
/// use qpso_mkp::local_search_utils::repair;
/// use ndarray::array;
///
/// let p = MkpInstance::from_vec(vec![4, 5, 3], vec![vec![3, 3, 2]], vec![5], 0).unwrap();
/// let c = repair(&p, array![1, 1, 1]);
/// assert!(c.is_feasible());
/// ```
pub fn repair(instance: &MkpInstance, x: Array1<usize>) -> Candidate {
    let mut candidate = Candidate::new(instance, x);
    drop_pass(instance, &mut candidate, None);
    add_pass(instance, &mut candidate, None);
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{make_repair_instance, make_test_prng};
    use ndarray::array;

    #[test]
    fn repair_scenario() {
        let p = make_repair_instance();
        let c = repair(&p, array![1, 1, 1]);

        // item 2 and then item 1 are dropped, item 2 fits back in
        assert_eq!(c.x, array![1, 0, 1]);
        assert_eq!(c.value, 7);
        assert_eq!(c.remaining, array![0]);
        assert!(p.check_solution(&c.x, c.value));
    }

    #[test]
    fn repair_fills_empty_vector() {
        let p = make_repair_instance();
        let c = repair(&p, array![0, 0, 0]);

        assert_eq!(c.x, array![1, 0, 1]);
        assert_eq!(c.value, 7);
    }

    #[test]
    fn drop_reports_feasibility() {
        let p = make_repair_instance();
        let mut c = Candidate::new(&p, array![1, 1, 1]);

        assert!(!drop_item(&p, 2, &mut c));
        assert_eq!(c.value, 9);
        assert!(drop_item(&p, 1, &mut c));
        assert_eq!(c.remaining, array![2]);
        // not selected any more
        assert!(!drop_item(&p, 1, &mut c));
        assert_eq!(c.value, 4);
    }

    #[test]
    fn add_respects_capacity() {
        let p = make_repair_instance();
        let mut c = Candidate::new(&p, array![1, 0, 0]);

        add_item(&p, 1, &mut c);
        assert_eq!(c.x, array![1, 0, 0]);

        add_item(&p, 2, &mut c);
        assert_eq!(c.x, array![1, 0, 1]);
        assert_eq!(c.value, 7);

        // already selected is a no-op
        add_item(&p, 2, &mut c);
        assert_eq!(c.value, 7);
    }

    #[test]
    fn repair_is_always_feasible() {
        let mut prng = make_test_prng();
        for _ in 0..50 {
            let p = MkpInstance::make_random_uncorrelated(
                3,
                30,
                (20, 120),
                (1, 40),
                (0, 25),
                &mut prng,
            )
            .unwrap();
            let x: Array1<usize> = (0..30).map(|_| usize::from(prng.gen_f64() < 0.6)).collect();

            let c = repair(&p, x);
            assert!(p.check_solution(&c.x, c.value));
            assert_eq!(c.remaining, p.remaining_capacity(&c.x));
        }
    }
}
