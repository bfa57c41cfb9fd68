//! LP based preprocessing.
//!
//! The items are reordered by decreasing utility, where the utility of an item is its profit
//! divided by its weights priced at the shadow prices of the capacity constraints. Repair and
//! local search scan items in this order, so the order steers the whole search.

use crate::errors::MkpResult;
use crate::lp_solvers::RelaxationSolver;
use crate::mkp::MkpInstance;
use crate::utils::{invert_permutation, sort_by_utility};
use ndarray::{Array1, Array2};

/// Floor applied to the dual priced weight of an item before dividing by it. Items that use no
/// priced resource get a utility proportional to their profit that ranks above every normally
/// priced item.
pub const MIN_SURROGATE_WEIGHT: f64 = 1E-9;

/// An instance reindexed by utility rank.
#[derive(Clone, Debug)]
pub struct WorkingInstance {
    /// the reordered copy, item j here is item `order[j]` of the original
    pub instance: MkpInstance,
    /// working index -> original index
    pub order: Vec<usize>,
    /// original index -> working index
    pub position: Vec<usize>,
}

impl WorkingInstance {
    /// Builds the reordered copy of `instance` given the working -> original order.
    pub fn from_order(instance: &MkpInstance, order: Vec<usize>) -> Self {
        let num_items = instance.num_items();
        let num_dims = instance.num_dims();

        let mut profits = Array1::<i64>::zeros(num_items);
        let mut weights = Array2::<i64>::zeros((num_dims, num_items));
        for (j, &k) in order.iter().enumerate() {
            profits[j] = instance.profits[k];
            weights.column_mut(j).assign(&instance.weights.column(k));
        }

        let working = MkpInstance {
            profits,
            weights,
            capacities: instance.capacities.clone(),
            known_optimum: instance.known_optimum,
        };

        Self {
            instance: working,
            position: invert_permutation(&order),
            order,
        }
    }

    /// Maps a vector in working order back to original item order.
    pub fn to_original(&self, x: &Array1<usize>) -> Array1<usize> {
        let mut original = Array1::<usize>::zeros(x.len());
        for (j, &k) in self.order.iter().enumerate() {
            original[k] = x[j];
        }
        original
    }

    /// Maps a vector in original order into working order.
    pub fn to_working(&self, x: &Array1<usize>) -> Array1<usize> {
        let mut working = Array1::<usize>::zeros(x.len());
        for (k, &j) in self.position.iter().enumerate() {
            working[j] = x[k];
        }
        working
    }
}

/// Utility of each item given the constraint duals.
pub fn compute_utilities(instance: &MkpInstance, duals: &Array1<f64>) -> Vec<f64> {
    (0..instance.num_items())
        .map(|j| {
            let surrogate: f64 = duals
                .iter()
                .zip(instance.weights.column(j).iter())
                .map(|(&lambda, &w)| lambda * w as f64)
                .sum();
            instance.profits[j] as f64 / surrogate.max(MIN_SURROGATE_WEIGHT)
        })
        .collect()
}

/// This is the main entry point for preprocessing: solve the relaxation, rank the items and
/// return the reordered instance. Any relaxation failure is returned to the caller.
pub fn reorder_by_lp_utility<S: RelaxationSolver>(
    instance: &MkpInstance,
    lp_solver: &S,
) -> MkpResult<WorkingInstance> {
    let relaxation = lp_solver.solve_relaxation(instance)?;
    let utilities = compute_utilities(instance, &relaxation.duals);

    let mut order: Vec<usize> = (0..instance.num_items()).collect();
    sort_by_utility(&mut order, &utilities);

    Ok(WorkingInstance::from_order(instance, order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MkpError;
    use crate::lp_solvers::clarabel_lp::ClarabelLPSolver;
    use crate::lp_solvers::RelaxationResult;
    use crate::tests::{make_small_instance, make_test_prng};
    use ndarray::array;

    /// relaxation stub returning fixed duals, or a fixed failure
    struct FixedDuals(Option<Array1<f64>>);

    impl RelaxationSolver for FixedDuals {
        fn solve_relaxation(&self, instance: &MkpInstance) -> MkpResult<RelaxationResult> {
            match &self.0 {
                Some(duals) => Ok(RelaxationResult {
                    x: Array1::zeros(instance.num_items()),
                    duals: duals.clone(),
                    objective: 0.0,
                }),
                None => Err(MkpError::RelaxationInfeasible),
            }
        }
    }

    #[test]
    fn utilities_use_dual_prices() {
        let p = make_small_instance();
        let u = compute_utilities(&p, &array![1.0, 2.0]);

        // surrogate weights are 5, 4 and 7
        assert!((u[0] - 2.0).abs() < 1e-12);
        assert!((u[1] - 5.0).abs() < 1e-12);
        assert!((u[2] - 15.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn zero_priced_items_rank_first() {
        let p = make_small_instance();
        let u = compute_utilities(&p, &array![0.0, 0.0]);

        assert!(u.iter().all(|v| v.is_finite()));
        assert!(u[1] > u[2] && u[2] > u[0]);
    }

    #[test]
    fn reorder_with_fixed_duals() {
        let p = make_small_instance();
        let w = reorder_by_lp_utility(&p, &FixedDuals(Some(array![1.0, 2.0]))).unwrap();

        assert_eq!(w.order, vec![1, 2, 0]);
        assert_eq!(w.position, vec![2, 0, 1]);
        assert_eq!(w.instance.profits, array![20, 15, 10]);
        assert_eq!(w.instance.weights.row(0), array![2, 1, 1]);
        assert_eq!(w.instance.weights.row(1), array![1, 3, 2]);
        assert_eq!(w.instance.capacities, p.capacities);
    }

    #[test]
    fn relaxation_failure_aborts() {
        let p = make_small_instance();
        let err = reorder_by_lp_utility(&p, &FixedDuals(None)).unwrap_err();
        assert!(matches!(err, MkpError::RelaxationInfeasible));
    }

    #[test]
    fn permutation_round_trip() {
        let mut prng = make_test_prng();
        let p = MkpInstance::make_random_uncorrelated(4, 60, (200, 400), (1, 50), (1, 30), &mut prng)
            .unwrap();
        let w = reorder_by_lp_utility(&p, &ClarabelLPSolver::default()).unwrap();

        let mut seen = w.order.clone();
        seen.sort_unstable();
        assert_eq!(seen, (0..60).collect::<Vec<usize>>());

        // every working column is the original column it claims to be
        for (j, &k) in w.order.iter().enumerate() {
            assert_eq!(w.instance.profits[j], p.profits[k]);
            assert_eq!(w.instance.weights.column(j), p.weights.column(k));
        }

        let x: Array1<usize> = (0..60).map(|k| k % 3 % 2).collect();
        assert_eq!(w.to_original(&w.to_working(&x)), x);
        assert_eq!(w.instance.eval(&w.to_working(&x)), p.eval(&x));
    }
}
