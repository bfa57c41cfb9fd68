use crate::errors::{MkpError, MkpResult};
use crate::lp_solvers::{RelaxationResult, RelaxationSolver};
use crate::mkp::MkpInstance;
use clarabel::algebra::CscMatrix;
use clarabel::solver::{DefaultSettings, DefaultSolver, IPSolver, NonnegativeConeT, SolverStatus};
use ndarray::Array1;
use sprs::{CsMat, TriMat};

/// LP relaxation through the Clarabel interior point solver.
///
/// Clarabel minimizes, so the profits are negated; the capacity rows come first in the
/// constraint matrix, followed by the x <= 1 and -x <= 0 bounds, which puts the shadow prices
/// of the capacities at the front of the dual vector.
#[derive(Clone)]
pub struct ClarabelLPSolver {
    pub max_iterations: u32,
    pub time_limit: f64,
}

impl ClarabelLPSolver {
    pub const fn new(max_iterations: u32, time_limit: f64) -> Self {
        Self {
            max_iterations,
            time_limit,
        }
    }

    pub fn make_cb_form(p0: &CsMat<f64>) -> CscMatrix {
        let (t, y, u) = p0.to_csc().into_raw_storage();
        CscMatrix::new(p0.rows(), p0.cols(), t, y, u)
    }

    /// Builds the stacked constraint matrix [W; I; -I] and its right hand side [c; 1; 0].
    pub fn make_constraints(instance: &MkpInstance) -> (CsMat<f64>, Vec<f64>) {
        let num_dims = instance.num_dims();
        let num_items = instance.num_items();
        let num_rows = num_dims + 2 * num_items;

        let mut a = TriMat::new((num_rows, num_items));
        let mut b = vec![0.0; num_rows];

        for i in 0..num_dims {
            for j in 0..num_items {
                let w = instance.weights[[i, j]];
                if w != 0 {
                    a.add_triplet(i, j, w as f64);
                }
            }
            b[i] = instance.capacities[i] as f64;
        }

        for j in 0..num_items {
            let offset = num_dims + 2 * j;
            a.add_triplet(offset, j, 1.0);
            a.add_triplet(offset + 1, j, -1.0);
            b[offset] = 1.0;
        }

        (a.to_csc(), b)
    }
}

impl Default for ClarabelLPSolver {
    fn default() -> Self {
        Self::new(200, f64::INFINITY)
    }
}

impl RelaxationSolver for ClarabelLPSolver {
    fn solve_relaxation(&self, instance: &MkpInstance) -> MkpResult<RelaxationResult> {
        let num_dims = instance.num_dims();
        let num_items = instance.num_items();

        let settings = DefaultSettings {
            verbose: false,
            max_iter: self.max_iterations,
            time_limit: self.time_limit,
            ..Default::default()
        };

        // pure LP, the quadratic term is empty
        let p = Self::make_cb_form(&CsMat::zero((num_items, num_items)));
        let q: Vec<f64> = instance.profits.iter().map(|&v| -(v as f64)).collect();

        let (a, b) = Self::make_constraints(instance);
        let a_clara = Self::make_cb_form(&a);

        let cones = [NonnegativeConeT(b.len())];

        let mut solver = DefaultSolver::new(&p, &q, &a_clara, &b, &cones, settings);

        solver.solve();

        match solver.solution.status {
            SolverStatus::Solved | SolverStatus::AlmostSolved => {}
            SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => {
                return Err(MkpError::RelaxationInfeasible);
            }
            SolverStatus::DualInfeasible | SolverStatus::AlmostDualInfeasible => {
                return Err(MkpError::RelaxationUnbounded);
            }
            SolverStatus::MaxIterations | SolverStatus::MaxTime => {
                return Err(MkpError::RelaxationIterationLimit);
            }
            status => return Err(MkpError::RelaxationFailed(format!("{status:?}"))),
        }

        let x = Array1::from_iter(solver.solution.x.iter().copied());
        let duals = Array1::from_iter(solver.solution.z.iter().take(num_dims).copied());

        Ok(RelaxationResult {
            x,
            duals,
            objective: -solver.solution.obj_val,
        })
    }
}
