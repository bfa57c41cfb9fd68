use crate::mkp::{MkpAlgorithm, MkpInstance};
use crate::qpso::QpsoResult;
use crate::runner::RunSummary;
use crate::solver_options::{OutputStyle, QpsoOptions};
use ndarray::Array1;
use std::fmt::Write;

/// This is the main logic behind the solver output
///
/// It has varying levels of output, where 0 means nothing is displayed to the screen, and each
/// additional level includes everything previous
///
/// 0 - Nothing
/// 1 - Header, Run Lines, Solutions, and Summary
/// 2 - Each New Global Best
/// 3 - The Full Problem Data
///
#[derive(Clone, Debug)]
pub struct SolverOutputLogger {
    pub output_level: usize,
}

impl SolverOutputLogger {
    pub const fn new(level: usize) -> Self {
        Self {
            output_level: level,
        }
    }

    pub fn output_header<A: MkpAlgorithm>(&self, algorithm: &A, options: &QpsoOptions) {
        if self.output_level < 1 {
            return;
        }

        let version_number = env!("CARGO_PKG_VERSION");
        println!("{}", algorithm.name());
        println!("Version number {version_number}");
        println!(
            "sz = {}, mx = {}, alp = {}, ep1 = {}, ep2 = {}",
            options.population_size,
            options.max_generations,
            options.alpha,
            options.epsilon_1,
            options.epsilon_2
        );
    }

    pub fn output_instance(&self, name: &str, instance: &MkpInstance, seed: u64) {
        if self.output_level < 1 {
            return;
        }

        println!("solving {name}:");
        println!("m = {}, n = {}", instance.num_dims(), instance.num_items());
        if instance.known_optimum > 0 {
            println!("opt = {}, se = {seed}", instance.known_optimum);
        }

        if self.output_level >= 3 {
            print!("{}", format_problem(instance));
        }
    }

    pub fn output_new_best(&self, generation: usize, value: i64) {
        if self.output_level < 2 {
            return;
        }

        println!("generation {generation}: new best {value}");
    }

    pub fn output_run<A: MkpAlgorithm>(
        &self,
        run: usize,
        algorithm: &A,
        result: &QpsoResult,
        options: &QpsoOptions,
    ) {
        if self.output_level < 1 {
            return;
        }

        println!("run {}", run + 1);
        println!("{}", format_run_line(result));

        if let Some(text) = format_solution(
            algorithm,
            &result.working_solution,
            options.output_style,
            options.newline_between_outputs,
        ) {
            print!("{text}");
        }
    }

    pub fn output_summary(&self, summary: &RunSummary) {
        if self.output_level < 1 {
            return;
        }

        println!("{}", format_summary(summary));
    }
}

/// The objective line of one run, flagged when the known optimum is reached.
pub fn format_run_line(result: &QpsoResult) -> String {
    let opt = if result.optimum_reached { " (opt)" } else { "" };
    format!("z = {}{opt}, tm = {} ms", result.value, result.elapsed_ms)
}

/// The summary line over all runs of an instance.
pub fn format_summary(summary: &RunSummary) -> String {
    format!(
        "bst = {}, avg = {:.2}, tm = {}, atm = {:.2} ms",
        summary.best, summary.average, summary.total_ms, summary.average_ms
    )
}

/// Formats a solution held in the algorithm's item order, listing items in the original order.
/// Returns None for [`OutputStyle::None`].
pub fn format_solution<A: MkpAlgorithm>(
    algorithm: &A,
    x: &Array1<usize>,
    style: OutputStyle,
    newline: bool,
) -> Option<String> {
    if style == OutputStyle::None {
        return None;
    }

    let separator = if newline { "\n" } else { ", " };
    let mut entries = Vec::new();

    for i in 0..x.len() {
        let value = x[algorithm.invert(i)];
        match style {
            OutputStyle::Indices if value == 1 => entries.push(format!("{}", i + 1)),
            OutputStyle::IndicesPrefixed if value == 1 => entries.push(format!("x{}", i + 1)),
            OutputStyle::Binary => entries.push(format!("{value}")),
            OutputStyle::BinaryPrefixed => entries.push(format!("x{} = {value}", i + 1)),
            _ => {}
        }
    }

    let mut text = String::from("solution:\n");
    text.push_str(&entries.join(separator));
    // a newline ends every entry in newline mode, and the whole list otherwise
    if !entries.is_empty() || !newline {
        text.push('\n');
    }
    Some(text)
}

/// Full problem data, one dimension per line, in original item order.
pub fn format_problem(instance: &MkpInstance) -> String {
    let mut text = String::new();
    let n = instance.num_items();

    // writing into a String cannot fail
    let _ = writeln!(text, "m = {}, n = {}", instance.num_dims(), n);
    let profits: Vec<String> = (0..n)
        .map(|j| format!("p[{j}] = {}", instance.profits[j]))
        .collect();
    let _ = writeln!(text, "{}", profits.join(", "));

    for i in 0..instance.num_dims() {
        for j in 0..n {
            let _ = write!(text, "w[{i}, {j}] = {}, ", instance.weights[[i, j]]);
        }
        let _ = writeln!(text, "c[{i}] = {}", instance.capacities[i]);
    }

    text
}
