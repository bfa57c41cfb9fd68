//! Solvers for the continuous relaxation of an MKP instance.
//!
//! The preprocessor only needs the constraint duals, so any LP backend that can produce them can
//! sit behind [`RelaxationSolver`].

pub mod clarabel_lp;

use crate::errors::MkpResult;
use crate::mkp::MkpInstance;
use ndarray::Array1;

/// Primal and dual solution of the relaxation max p'x s.t. Wx <= c, 0 <= x <= 1.
#[derive(Clone, Debug)]
pub struct RelaxationResult {
    /// primal values, one per item
    pub x: Array1<f64>,
    /// shadow price of each capacity constraint
    pub duals: Array1<f64>,
    /// objective value of the relaxation, in profit units
    pub objective: f64,
}

pub trait RelaxationSolver {
    /// Solves the relaxation to optimality or reports why it could not.
    fn solve_relaxation(&self, instance: &MkpInstance) -> MkpResult<RelaxationResult>;
}
