//! # Best improvement local search over single item flips
//!
//! Every item is flipped in turn on a copy of the current candidate. Flipping an item out is
//! followed by an add pass over the other items; flipping an item in is followed, if needed, by a
//! drop pass over the other items. A running best is kept across the whole sweep and only raised
//! by strictly better neighbours; after the sweep the last running best becomes the current
//! candidate and the next sweep starts. The search stops after a sweep without improvement.

use crate::local_search_utils::{add_pass, drop_pass, Candidate};
use crate::mkp::MkpInstance;

/// Neighbour of `current` obtained by flipping item j, or None if the flip cannot be made
/// feasible.
pub fn flip_neighbour(instance: &MkpInstance, current: &Candidate, j: usize) -> Option<Candidate> {
    let mut neighbour = current.clone();

    if neighbour.x[j] == 1 {
        neighbour.x[j] = 0;
        neighbour.remaining += &instance.weights.column(j);
        neighbour.value -= instance.profits[j];
        add_pass(instance, &mut neighbour, Some(j));
        Some(neighbour)
    } else {
        neighbour.force_add(instance, j);
        // item j alone can overflow a dimension, such a move is discarded
        drop_pass(instance, &mut neighbour, Some(j)).then_some(neighbour)
    }
}

/// Performs one sweep over all items and returns the last strictly improving neighbour, if any.
pub fn one_sweep(instance: &MkpInstance, current: &Candidate) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    let mut best_value = current.value;

    for j in 0..instance.num_items() {
        if let Some(neighbour) = flip_neighbour(instance, current, j) {
            if neighbour.value > best_value {
                best_value = neighbour.value;
                best = Some(neighbour);
            }
        }
    }

    best
}

/// Given a feasible candidate, run sweeps until none improves. The value strictly increases with
/// every applied sweep and is bounded by the total profit, so this terminates.
pub fn local_search(instance: &MkpInstance, candidate: Candidate) -> Candidate {
    let mut current = candidate;

    while let Some(next) = one_sweep(instance, &current) {
        current = next;
    }

    current
}

/// Same as [`local_search`] but also returns how many sweeps improved the candidate.
pub fn local_search_with_sweeps(instance: &MkpInstance, candidate: Candidate) -> (Candidate, usize) {
    let mut current = candidate;
    let mut sweeps = 0;

    while let Some(next) = one_sweep(instance, &current) {
        current = next;
        sweeps += 1;
    }

    (current, sweeps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumerate_mkp::enumerate_solve;
    use crate::local_search_utils::repair;
    use crate::tests::{make_repair_instance, make_small_instance, make_test_prng};
    use ndarray::{array, Array1};

    #[test]
    fn finds_small_optimum() {
        let p = make_small_instance();
        let start = repair(&p, array![1, 0, 0]);
        // repair gives {0, 1} with value 30
        assert_eq!(start.value, 30);

        let c = local_search(&p, start);
        assert_eq!(c.value, 35);
        assert_eq!(c.x, array![0, 1, 1]);
        assert!(p.check_solution(&c.x, c.value));
    }

    #[test]
    fn repair_scenario_is_locally_optimal() {
        let p = make_repair_instance();
        let start = repair(&p, array![1, 1, 1]);
        let c = local_search(&p, start.clone());

        // dropping item 0 from {0, 2} lets item 1 in
        assert_eq!(c.value, 8);
        assert_eq!(c.x, array![0, 1, 1]);
    }

    #[test]
    fn oversized_item_never_enters() {
        // item 0 alone is heavier than the knapsack
        let p = MkpInstance::from_vec(vec![100, 1], vec![vec![10, 1]], vec![5], 0).unwrap();
        let c = local_search(&p, repair(&p, array![0, 0]));

        assert_eq!(c.x, array![0, 1]);
        assert!(p.check_solution(&c.x, c.value));
    }

    #[test]
    fn keeps_last_running_best_of_sweep() {
        // from {} every single add improves, the sweep keeps raising the running best and the
        // applied move is the best of the sweep, not the first improving one
        let p = MkpInstance::from_vec(vec![3, 5, 9], vec![vec![4, 4, 4]], vec![4], 0).unwrap();
        let start = Candidate::empty(&p);

        let next = one_sweep(&p, &start).unwrap();
        assert_eq!(next.x, array![0, 0, 1]);
        assert!(one_sweep(&p, &next).is_none());
    }

    #[test]
    fn improves_monotonically_and_stays_feasible() {
        let mut prng = make_test_prng();
        for _ in 0..20 {
            let p = MkpInstance::make_random_uncorrelated(
                4,
                40,
                (50, 200),
                (1, 60),
                (1, 30),
                &mut prng,
            )
            .unwrap();
            let x: Array1<usize> = (0..40).map(|_| usize::from(prng.gen_f64() < 0.5)).collect();
            let start = repair(&p, x);

            let mut current = start.clone();
            let mut sweeps = 0;
            while let Some(next) = one_sweep(&p, &current) {
                assert!(next.value > current.value);
                assert!(p.check_solution(&next.x, next.value));
                assert_eq!(next.remaining, p.remaining_capacity(&next.x));
                current = next;
                sweeps += 1;
            }

            let (c, counted) = local_search_with_sweeps(&p, start);
            assert_eq!(c, current);
            assert_eq!(counted, sweeps);
            assert!(c.value <= p.total_profit());
        }
    }

    #[test]
    fn never_beats_enumeration() {
        let mut prng = make_test_prng();
        for _ in 0..10 {
            let p = MkpInstance::make_random_uncorrelated(
                2,
                10,
                (10, 40),
                (1, 20),
                (1, 15),
                &mut prng,
            )
            .unwrap();
            let (best, _) = enumerate_solve(&p);
            let c = local_search(&p, repair(&p, Array1::zeros(10)));
            assert!(c.value <= best);
        }
    }
}
