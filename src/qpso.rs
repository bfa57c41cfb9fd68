//! Hybrid quantum particle swarm optimisation for the MKP.
//!
//! Each particle carries a vector of quantum amplitudes. Every generation the amplitudes are
//! pulled towards the particle's personal best and the swarm's global best, collapsed into a
//! binary point, and the point is repaired and polished by local search before it competes
//! with the bests. Items live in LP utility order for the whole solve; results are mapped back to
//! the caller's item order at the end.

use crate::errors::MkpResult;
use crate::initial_points::{attractor, collapse, generate_random_particle};
use crate::local_search::local_search;
use crate::local_search_utils::{repair, Candidate};
use crate::lp_solvers::clarabel_lp::ClarabelLPSolver;
use crate::lp_solvers::RelaxationSolver;
use crate::mkp::{MkpAlgorithm, MkpInstance};
use crate::preprocess::{reorder_by_lp_utility, WorkingInstance};
use crate::qpsologger::SolverOutputLogger;
use crate::solver_options::{LocalSearchPolicy, QpsoOptions};
use crate::utils::calculate_hamming_distance;
use log::{debug, error};
use ndarray::Array1;
use rayon::prelude::*;
use smolprng::{Algorithm, PRNG};
use std::time::Instant;

/// One member of the swarm.
#[derive(Clone, Debug)]
pub struct Particle {
    /// probability of leaving each item out
    pub amplitudes: Array1<f64>,
    /// personal best point, in working order
    pub best: Array1<usize>,
    pub best_value: i64,
}

/// Result of one independent solve.
#[derive(Clone, Debug)]
pub struct QpsoResult {
    /// best point in the caller's item order
    pub solution: Array1<usize>,
    /// best point in LP utility order
    pub working_solution: Array1<usize>,
    pub value: i64,
    pub elapsed_ms: u128,
    /// the value matches the known optimum of the instance
    pub optimum_reached: bool,
}

/// Struct for the QPSO Solver
pub struct QpsoSolver {
    pub working: WorkingInstance,
    pub options: QpsoOptions,
    pub particles: Vec<Particle>,
    pub best_solution: Array1<usize>,
    pub best_solution_value: i64,
    pub generation: usize,
    /// global best value after initialization and after every generation
    pub history: Vec<i64>,
    pub solver_logger: SolverOutputLogger,
}

impl QpsoSolver {
    /// Creates a new solver, ordering the items through the Clarabel LP relaxation.
    pub fn new(instance: &MkpInstance, options: QpsoOptions) -> MkpResult<Self> {
        let lp_solver = ClarabelLPSolver::new(options.lp_max_iterations, options.lp_time_limit);
        Self::with_relaxation_solver(instance, options, &lp_solver)
    }

    /// Creates a new solver with a caller supplied relaxation solver. A relaxation failure is
    /// returned and no search takes place.
    pub fn with_relaxation_solver<S: RelaxationSolver>(
        instance: &MkpInstance,
        options: QpsoOptions,
        lp_solver: &S,
    ) -> MkpResult<Self> {
        options.validate()?;
        options.validate_instance(instance)?;

        let working = reorder_by_lp_utility(instance, lp_solver)?;
        Self::from_working(working, options)
    }

    /// Creates a new solver over an already ordered instance.
    pub fn from_working(working: WorkingInstance, options: QpsoOptions) -> MkpResult<Self> {
        options.validate()?;
        options.validate_instance(&working.instance)?;

        let num_x = working.instance.num_items();
        let output_level = options.verbose;

        Ok(Self {
            working,
            options,
            particles: Vec::new(),
            best_solution: Array1::zeros(num_x),
            best_solution_value: i64::MIN,
            generation: 0,
            history: Vec::new(),
            solver_logger: SolverOutputLogger::new(output_level),
        })
    }

    /// Runs one independent solve: initialization followed by the full generation budget.
    pub fn solve<T: Algorithm>(&mut self, prng: &mut PRNG<T>) -> QpsoResult {
        let time_start = Instant::now();

        self.initialize(prng);
        while self.generation < self.options.max_generations {
            self.step(prng);
        }

        let elapsed_ms = time_start.elapsed().as_millis();

        if !self
            .working
            .instance
            .check_solution(&self.best_solution, self.best_solution_value)
        {
            error!(
                "incumbent failed verification, claimed value {}",
                self.best_solution_value
            );
        }

        let known_optimum = self.working.instance.known_optimum;

        QpsoResult {
            solution: self.working.to_original(&self.best_solution),
            working_solution: self.best_solution.clone(),
            value: self.best_solution_value,
            elapsed_ms,
            optimum_reached: known_optimum > 0 && self.best_solution_value == known_optimum,
        }
    }

    /// Resets the swarm: random amplitudes, their collapsed points, evaluation and bests.
    pub fn initialize<T: Algorithm>(&mut self, prng: &mut PRNG<T>) {
        let num_x = self.working.instance.num_items();

        self.best_solution = Array1::zeros(num_x);
        self.best_solution_value = i64::MIN;
        self.generation = 0;
        self.history.clear();

        let mut points = Vec::with_capacity(self.options.population_size);
        self.particles = (0..self.options.population_size)
            .map(|_| {
                let (amplitudes, x) = generate_random_particle(num_x, prng);
                points.push(x);
                Particle {
                    amplitudes,
                    best: Array1::zeros(num_x),
                    best_value: i64::MIN,
                }
            })
            .collect();

        self.evaluate_and_update(points);
        self.history.push(self.best_solution_value);
    }

    /// One generation: move every particle's amplitudes, collapse, evaluate, update bests.
    pub fn step<T: Algorithm>(&mut self, prng: &mut PRNG<T>) {
        let alpha = self.options.alpha;
        let epsilon_1 = self.options.epsilon_1;
        let epsilon_2 = self.options.epsilon_2;
        let epsilon_3 = self.options.epsilon_3();

        // every particle sees the same global best during a generation
        let global_attractor = attractor(&self.best_solution, alpha);

        let points: Vec<Array1<usize>> = self
            .particles
            .iter_mut()
            .map(|particle| {
                let personal_attractor = attractor(&particle.best, alpha);
                for j in 0..particle.amplitudes.len() {
                    particle.amplitudes[j] = epsilon_1 * particle.amplitudes[j]
                        + epsilon_2 * personal_attractor[j]
                        + epsilon_3 * global_attractor[j];
                }
                collapse(&particle.amplitudes, prng)
            })
            .collect();

        self.evaluate_and_update(points);
        self.generation += 1;
        self.history.push(self.best_solution_value);

        if log::log_enabled!(log::Level::Debug) {
            let spread: usize = self
                .particles
                .iter()
                .map(|p| calculate_hamming_distance(&p.best, &self.best_solution))
                .sum();
            debug!(
                "generation {}: best {} total distance to personal bests {}",
                self.generation, self.best_solution_value, spread
            );
        }
    }

    /// Evaluates one sampled point per particle, then applies the improvements in particle
    /// order. Evaluation draws no random numbers, so doing it in parallel changes nothing.
    fn evaluate_and_update(&mut self, points: Vec<Array1<usize>>) {
        let instance = &self.working.instance;
        let policy = self.options.local_search_policy;

        let improvements: Vec<Option<Candidate>> = if self.options.parallel {
            points
                .into_par_iter()
                .zip(self.particles.par_iter())
                .map(|(x, particle)| evaluate_point(instance, policy, x, particle.best_value))
                .collect()
        } else {
            points
                .into_iter()
                .zip(self.particles.iter())
                .map(|(x, particle)| evaluate_point(instance, policy, x, particle.best_value))
                .collect()
        };

        for (i, improvement) in improvements.into_iter().enumerate() {
            if let Some(candidate) = improvement {
                self.update_bests(i, candidate);
            }
        }
    }

    fn update_bests(&mut self, i: usize, candidate: Candidate) {
        if candidate.value > self.best_solution_value {
            self.best_solution.assign(&candidate.x);
            self.best_solution_value = candidate.value;
            self.solver_logger
                .output_new_best(self.generation, self.best_solution_value);
        }

        let particle = &mut self.particles[i];
        particle.best = candidate.x;
        particle.best_value = candidate.value;
    }
}

impl MkpAlgorithm for QpsoSolver {
    fn name(&self) -> &'static str {
        "hybrid quantum particle swarm optimisation algorithm"
    }

    fn invert(&self, index: usize) -> usize {
        self.working.position[index]
    }
}

/// Repairs a sampled point and polishes it by local search. Returns the candidate only if it
/// strictly beats `personal_best`.
pub fn evaluate_point(
    instance: &MkpInstance,
    policy: LocalSearchPolicy,
    x: Array1<usize>,
    personal_best: i64,
) -> Option<Candidate> {
    let candidate = repair(instance, x);

    match policy {
        LocalSearchPolicy::ImprovingOnly => {
            (candidate.value > personal_best).then(|| local_search(instance, candidate))
        }
        LocalSearchPolicy::Always => {
            let candidate = local_search(instance, candidate);
            (candidate.value > personal_best).then_some(candidate)
        }
    }
}
