//! Repeated independent runs over one or more instances.
//!
//! A master generator seeded with the configured seed hands out one sub seed per run, and every
//! run starts from a fresh generator built from its sub seed. Runs therefore do not depend on
//! each other or on anything drawn before the instance was started.

use crate::errors::MkpResult;
use crate::mkp::MkpInstance;
use crate::qpso::QpsoSolver;
use crate::qpsologger::SolverOutputLogger;
use crate::solver_options::QpsoOptions;
use log::{info, warn};
use ndarray::Array1;
use smolprng::{JsfLarge, PRNG};
use std::path::{Path, PathBuf};

/// Aggregate over all runs of one instance.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub best: i64,
    pub average: f64,
    pub total_ms: u128,
    pub average_ms: f64,
    /// number of runs that reached the known optimum
    pub optimum_hits: usize,
    /// best value of every run, in run order
    pub values: Vec<i64>,
    /// best solution over all runs, in original item order
    pub best_solution: Array1<usize>,
}

pub fn make_prng(seed: u64) -> PRNG<JsfLarge> {
    PRNG {
        generator: JsfLarge::from(seed),
    }
}

/// Draws the sub seed of every run from the master seed.
pub fn draw_sub_seeds(seed: u64, runs: usize) -> Vec<u64> {
    let mut master = make_prng(seed);
    (0..runs).map(|_| master.gen_u64()).collect()
}

/// Preprocesses the instance once and performs `options.runs` independent solves.
pub fn solve_instance(instance: &MkpInstance, options: &QpsoOptions) -> MkpResult<RunSummary> {
    let mut solver = QpsoSolver::new(instance, options.clone())?;
    let logger = solver.solver_logger.clone();
    logger.output_header(&solver, options);

    let mut values = Vec::with_capacity(options.runs);
    let mut total_ms = 0;
    let mut optimum_hits = 0;
    let mut best = i64::MIN;
    let mut best_solution = Array1::zeros(instance.num_items());

    for (run, sub_seed) in draw_sub_seeds(options.seed, options.runs).into_iter().enumerate() {
        let mut prng = make_prng(sub_seed);
        let result = solver.solve(&mut prng);
        logger.output_run(run, &solver, &result, options);

        total_ms += result.elapsed_ms;
        if result.optimum_reached {
            optimum_hits += 1;
        }
        if result.value > best {
            best = result.value;
            best_solution = result.solution.clone();
        }
        values.push(result.value);
    }

    let runs = values.len() as f64;
    let summary = RunSummary {
        best,
        average: values.iter().sum::<i64>() as f64 / runs,
        total_ms,
        average_ms: total_ms as f64 / runs,
        optimum_hits,
        values,
        best_solution,
    };

    logger.output_summary(&summary);
    Ok(summary)
}

/// Reads and solves one instance file.
pub fn solve_file<P: AsRef<Path>>(path: P, options: &QpsoOptions) -> MkpResult<RunSummary> {
    let path = path.as_ref();
    let instance = MkpInstance::read_from_file(path)?;

    let logger = SolverOutputLogger::new(options.verbose);
    logger.output_instance(&path.display().to_string(), &instance, options.seed);

    solve_instance(&instance, options)
}

/// Solves every file in turn. A file that cannot be read or preprocessed is reported and
/// skipped, the remaining files are still solved.
pub fn solve_files<P: AsRef<Path>>(
    paths: &[P],
    options: &QpsoOptions,
) -> MkpResult<Vec<(PathBuf, MkpResult<RunSummary>)>> {
    options.validate()?;

    let mut results = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        let result = solve_file(path, options);
        match &result {
            Ok(summary) => info!("{}: best {}", path.display(), summary.best),
            Err(e) => warn!("skipping {}: {e}", path.display()),
        }
        results.push((path.to_path_buf(), result));
    }

    Ok(results)
}
