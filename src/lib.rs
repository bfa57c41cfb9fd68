//! # qpso_mkp
//!
//! A hybrid quantum particle swarm heuristic for the Multidimensional Knapsack Problem. Items
//! are ranked through the shadow prices of the LP relaxation, then a swarm of quantum amplitude
//! vectors is sampled, and every sample is repaired and polished by a best improvement local
//! search.
//!
//! Example:
//! ``` rust
//! use qpso_mkp::mkp::MkpInstance;
//! use qpso_mkp::qpso::QpsoSolver;
//! use qpso_mkp::runner::make_prng;
//! use qpso_mkp::solver_options::QpsoOptions;
//!
//! let p = MkpInstance::from_vec(
//!     vec![10, 20, 15],
//!     vec![vec![1, 2, 1], vec![2, 1, 3]],
//!     vec![3, 4],
//!     35,
//! ).unwrap();
//!
//! let mut options = QpsoOptions::new();
//! options.verbose = 0;
//! options.max_generations = 50;
//!
//! let mut solver = QpsoSolver::new(&p, options).unwrap();
//! let result = solver.solve(&mut make_prng(198_671));
//! assert_eq!(result.value, 35);
//! ```

pub mod enumerate_mkp;
pub mod errors;
pub mod initial_points;
pub mod local_search;
pub mod local_search_utils;
pub mod lp_solvers;
pub mod mkp;
pub mod preprocess;
pub mod qpso;
pub mod qpsologger;
pub mod runner;
pub mod solver_options;
pub mod utils;
