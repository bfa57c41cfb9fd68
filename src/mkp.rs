//! The Multidimensional Knapsack Problem data model.
//!
//! An instance is a set of items, each with a profit and a weight in every dimension, and a
//! capacity per dimension. Instances are immutable once built; the preprocessor makes reordered
//! copies rather than mutating the caller's data.

use crate::errors::{MkpError, MkpResult};
use ndarray::{Array1, Array2};
use smolprng::{Algorithm, PRNG};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq)]
pub struct MkpInstance {
    /// profit of each item
    pub profits: Array1<i64>,
    /// weights, one row per dimension, one column per item
    pub weights: Array2<i64>,
    /// capacity of each dimension
    pub capacities: Array1<i64>,
    /// best known objective value, zero if unknown
    pub known_optimum: i64,
}

impl MkpInstance {
    /// Builds an instance, checking that the shapes agree and that the data is non-negative.
    pub fn new(
        profits: Array1<i64>,
        weights: Array2<i64>,
        capacities: Array1<i64>,
        known_optimum: i64,
    ) -> MkpResult<Self> {
        let (num_dims, num_items) = weights.dim();

        if num_items == 0 || num_dims == 0 {
            return Err(MkpError::InvalidInstance(format!(
                "need at least one item and one dimension, got n = {num_items}, m = {num_dims}"
            )));
        }

        if profits.len() != num_items {
            return Err(MkpError::InvalidInstance(format!(
                "{} profits for {num_items} items",
                profits.len()
            )));
        }

        if capacities.len() != num_dims {
            return Err(MkpError::InvalidInstance(format!(
                "{} capacities for {num_dims} dimensions",
                capacities.len()
            )));
        }

        if profits.iter().any(|&p| p < 0) {
            return Err(MkpError::InvalidInstance("negative profit".to_string()));
        }

        if weights.iter().any(|&w| w < 0) {
            return Err(MkpError::InvalidInstance("negative weight".to_string()));
        }

        if capacities.iter().any(|&c| c < 0) {
            return Err(MkpError::InvalidInstance("negative capacity".to_string()));
        }

        // every partial sum of profits or of a weight row must fit in an i64
        if checked_total(profits.iter()).is_none() {
            return Err(MkpError::InvalidInstance(
                "total profit overflows a 64 bit integer".to_string(),
            ));
        }

        if let Some(i) = (0..num_dims).find(|&i| checked_total(weights.row(i).iter()).is_none()) {
            return Err(MkpError::InvalidInstance(format!(
                "total weight of dimension {i} overflows a 64 bit integer"
            )));
        }

        Ok(Self {
            profits,
            weights,
            capacities,
            known_optimum,
        })
    }

    /// Builds an instance from plain row vectors, mostly a convenience for tests and callers
    /// that do not work with ndarray.
    pub fn from_vec(
        profits: Vec<i64>,
        weights: Vec<Vec<i64>>,
        capacities: Vec<i64>,
        known_optimum: i64,
    ) -> MkpResult<Self> {
        let num_items = profits.len();
        let num_dims = weights.len();

        if weights.iter().any(|row| row.len() != num_items) {
            return Err(MkpError::InvalidInstance(
                "weight rows must have one entry per item".to_string(),
            ));
        }

        let flat: Vec<i64> = weights.into_iter().flatten().collect();
        let weights = Array2::from_shape_vec((num_dims, num_items), flat)
            .map_err(|e| MkpError::InvalidInstance(e.to_string()))?;

        Self::new(
            Array1::from_vec(profits),
            weights,
            Array1::from_vec(capacities),
            known_optimum,
        )
    }

    pub fn num_items(&self) -> usize {
        self.profits.len()
    }

    pub fn num_dims(&self) -> usize {
        self.capacities.len()
    }

    /// Total profit of the selected items.
    pub fn eval(&self, x: &Array1<usize>) -> i64 {
        x.iter()
            .zip(self.profits.iter())
            .filter(|&(&x_j, _)| x_j == 1)
            .map(|(_, &p)| p)
            .sum()
    }

    /// Capacity left in every dimension after packing the selected items, negative entries mark
    /// overused resources.
    pub fn remaining_capacity(&self, x: &Array1<usize>) -> Array1<i64> {
        let mut remaining = self.capacities.clone();
        for (j, &x_j) in x.iter().enumerate() {
            if x_j == 1 {
                remaining -= &self.weights.column(j);
            }
        }
        remaining
    }

    pub fn is_feasible(&self, x: &Array1<usize>) -> bool {
        self.remaining_capacity(x).iter().all(|&r| r >= 0)
    }

    /// Checks that a claimed solution is feasible and that its value is what the caller says.
    pub fn check_solution(&self, x: &Array1<usize>, value: i64) -> bool {
        x.len() == self.num_items() && self.is_feasible(x) && self.eval(x) == value
    }

    /// Upper bound on any objective value, used to bound the local search.
    pub fn total_profit(&self) -> i64 {
        self.profits.sum()
    }

    /// Parses the whitespace separated instance format: number of items, number of dimensions,
    /// known optimum, the profits, the weights dimension by dimension, and the capacities.
    pub fn parse(text: &str, path: &Path) -> MkpResult<Self> {
        let mut reader = TokenReader {
            tokens: text.split_whitespace(),
            path,
        };

        let num_items = reader.next_count("number of items")?;
        let num_dims = reader.next_count("number of dimensions")?;
        let known_optimum = reader.next_int("optimal value")?;

        if num_items == 0 || num_dims == 0 {
            return Err(MkpError::InvalidInstance(format!(
                "need at least one item and one dimension, got n = {num_items}, m = {num_dims}"
            )));
        }

        // the header counts are untrusted, storage only grows with the tokens actually read
        let mut profits = Vec::new();
        for _ in 0..num_items {
            profits.push(reader.next_int("value")?);
        }

        let mut weights = Vec::new();
        for _ in 0..num_dims {
            for _ in 0..num_items {
                weights.push(reader.next_int("weight")?);
            }
        }

        let mut capacities = Vec::new();
        for _ in 0..num_dims {
            capacities.push(reader.next_int("capacity")?);
        }

        let weights = Array2::from_shape_vec((num_dims, num_items), weights)
            .map_err(|e| MkpError::InvalidInstance(e.to_string()))?;

        Self::new(
            Array1::from_vec(profits),
            weights,
            Array1::from_vec(capacities),
            known_optimum,
        )
    }

    /// Reads an instance from a file in the format described in [`MkpInstance::parse`].
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> MkpResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Self::parse(&text, path)
    }

    /// Generates a random instance where profits and weights are drawn independently.
    pub fn make_random_uncorrelated<T: Algorithm>(
        num_dims: usize,
        num_items: usize,
        capacity_range: (i64, i64),
        profit_range: (i64, i64),
        weight_range: (i64, i64),
        prng: &mut PRNG<T>,
    ) -> MkpResult<Self> {
        let mut capacities = Array1::<i64>::zeros(num_dims);
        for i in 0..num_dims {
            capacities[i] = uniform_int(capacity_range, prng);
        }

        let mut profits = Array1::<i64>::zeros(num_items);
        let mut weights = Array2::<i64>::zeros((num_dims, num_items));
        for j in 0..num_items {
            profits[j] = uniform_int(profit_range, prng);
            for i in 0..num_dims {
                weights[[i, j]] = uniform_int(weight_range, prng);
            }
        }

        Self::new(profits, weights, capacities, 0)
    }

    /// Generates a random instance where every profit lies within `spread * base_weight` of
    /// `base_weight` and the weights are drawn from `1..=base_weight`.
    pub fn make_random_correlated<T: Algorithm>(
        num_dims: usize,
        num_items: usize,
        capacity_range: (i64, i64),
        base_weight: i64,
        spread: f64,
        prng: &mut PRNG<T>,
    ) -> MkpResult<Self> {
        let mut capacities = Array1::<i64>::zeros(num_dims);
        for i in 0..num_dims {
            capacities[i] = uniform_int(capacity_range, prng);
        }

        let profit_spread = (base_weight as f64 * spread) as i64;
        let mut profits = Array1::<i64>::zeros(num_items);
        let mut weights = Array2::<i64>::zeros((num_dims, num_items));
        for j in 0..num_items {
            profits[j] = uniform_int(
                (base_weight - profit_spread, base_weight + profit_spread),
                prng,
            );
            for i in 0..num_dims {
                weights[[i, j]] = uniform_int((1, base_weight), prng);
            }
        }

        Self::new(profits, weights, capacities, 0)
    }
}

/// What the output layer needs to know about an algorithm that may have reordered the items.
pub trait MkpAlgorithm {
    /// Human readable algorithm name.
    fn name(&self) -> &'static str;

    /// Index, in the algorithm's own item order, of original item `index`.
    fn invert(&self, index: usize) -> usize {
        index
    }
}

fn checked_total<'a, I: Iterator<Item = &'a i64>>(mut values: I) -> Option<i64> {
    values.try_fold(0i64, |total, &v| total.checked_add(v))
}

/// Draws an integer uniformly from the inclusive range.
fn uniform_int<T: Algorithm>(range: (i64, i64), prng: &mut PRNG<T>) -> i64 {
    let (lo, up) = range;
    let width = (up - lo + 1).max(1) as f64;
    (lo + (prng.gen_f64() * width) as i64).min(up.max(lo))
}

struct TokenReader<'a, I: Iterator<Item = &'a str>> {
    tokens: I,
    path: &'a Path,
}

impl<'a, I: Iterator<Item = &'a str>> TokenReader<'a, I> {
    fn next_int(&mut self, field: &str) -> MkpResult<i64> {
        self.tokens
            .next()
            .and_then(|token| token.parse::<i64>().ok())
            .ok_or_else(|| MkpError::FileFormat {
                path: PathBuf::from(self.path),
                field: field.to_string(),
            })
    }

    fn next_count(&mut self, field: &str) -> MkpResult<usize> {
        let value = self.next_int(field)?;
        usize::try_from(value).map_err(|_| MkpError::FileFormat {
            path: PathBuf::from(self.path),
            field: field.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{make_small_instance, make_test_prng};
    use ndarray::array;

    #[test]
    fn parse_reads_fields_in_order() {
        let text = "3 2 35\n10 20 15\n1 2 1\n2 1 3\n3 4\n";
        let p = MkpInstance::parse(text, Path::new("small.txt")).unwrap();

        assert_eq!(p, make_small_instance());
        assert_eq!(p.known_optimum, 35);
        assert_eq!(p.weights[[1, 2]], 3);
    }

    #[test]
    fn parse_reports_truncated_field() {
        let text = "3 2 0\n10 20 15\n1 2 1\n2 1 3\n3";
        let err = MkpInstance::parse(text, Path::new("cut.txt")).unwrap_err();

        match err {
            MkpError::FileFormat { field, .. } => assert_eq!(field, "capacity"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn parse_reports_non_numeric_token() {
        let text = "3 two 0";
        let err = MkpInstance::parse(text, Path::new("bad.txt")).unwrap_err();

        match err {
            MkpError::FileFormat { field, .. } => assert_eq!(field, "number of dimensions"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = MkpInstance::read_from_file("/definitely/not/here.mkp").unwrap_err();
        assert!(matches!(err, MkpError::Io(_)));
    }

    #[test]
    fn rejects_negative_weight() {
        let err = MkpInstance::from_vec(vec![1, 2], vec![vec![1, -1]], vec![3], 0).unwrap_err();
        assert!(matches!(err, MkpError::InvalidInstance(_)));
    }

    #[test]
    fn rejects_ragged_weights() {
        let err = MkpInstance::from_vec(vec![1, 2], vec![vec![1, 1], vec![1]], vec![3, 3], 0)
            .unwrap_err();
        assert!(matches!(err, MkpError::InvalidInstance(_)));
    }

    #[test]
    fn rejects_overflowing_sums() {
        let weight = 5_000_000_000_000_000_000;
        let err = MkpInstance::from_vec(vec![1, 1], vec![vec![weight, weight]], vec![10], 0)
            .unwrap_err();
        assert!(matches!(err, MkpError::InvalidInstance(_)));

        let err = MkpInstance::from_vec(vec![i64::MAX, 1], vec![vec![1, 1]], vec![10], 0)
            .unwrap_err();
        assert!(matches!(err, MkpError::InvalidInstance(_)));

        // one huge item on its own is fine, it simply never fits
        let p = MkpInstance::from_vec(vec![1, 1], vec![vec![weight, 1]], vec![10], 0).unwrap();
        assert!(!p.is_feasible(&array![1, 1]));
    }

    #[test]
    fn parse_rejects_overflowing_weights() {
        let text = "2 1 0\n1 1\n5000000000000000000 5000000000000000000\n10\n";
        let err = MkpInstance::parse(text, Path::new("huge.txt")).unwrap_err();
        assert!(matches!(err, MkpError::InvalidInstance(_)));
    }

    #[test]
    fn parse_huge_header_is_a_format_error() {
        let text = "4611686018427387904 1 0 1";
        let err = MkpInstance::parse(text, Path::new("huge.txt")).unwrap_err();

        match err {
            MkpError::FileFormat { field, .. } => assert_eq!(field, "value"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_empty_header() {
        let err = MkpInstance::parse("0 4611686018427387904 0", Path::new("empty.txt")).unwrap_err();
        assert!(matches!(err, MkpError::InvalidInstance(_)));
    }

    #[test]
    fn eval_and_remaining_capacity() {
        let p = make_small_instance();
        let x = array![1, 0, 1];

        assert_eq!(p.eval(&x), 25);
        assert_eq!(p.remaining_capacity(&x), array![1, -1]);
        assert!(!p.is_feasible(&x));
        assert!(p.check_solution(&array![1, 1, 0], 30));
        assert!(!p.check_solution(&array![1, 1, 0], 31));
    }

    #[test]
    fn random_instances_respect_ranges() {
        let mut prng = make_test_prng();
        let p = MkpInstance::make_random_uncorrelated(5, 40, (50, 100), (1, 30), (1, 20), &mut prng)
            .unwrap();

        assert_eq!(p.num_dims(), 5);
        assert_eq!(p.num_items(), 40);
        assert!(p.capacities.iter().all(|&c| (50..=100).contains(&c)));
        assert!(p.profits.iter().all(|&v| (1..=30).contains(&v)));
        assert!(p.weights.iter().all(|&w| (1..=20).contains(&w)));

        let q = MkpInstance::make_random_correlated(3, 25, (100, 200), 40, 0.25, &mut prng).unwrap();
        assert!(q.profits.iter().all(|&v| (30..=50).contains(&v)));
        assert!(q.weights.iter().all(|&w| (1..=40).contains(&w)));
    }
}
