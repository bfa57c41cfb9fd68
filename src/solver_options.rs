use crate::errors::{MkpError, MkpResult};
use crate::mkp::MkpInstance;

/// How a chosen solution is printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputStyle {
    /// nothing is printed
    None,
    /// 1-based indices of the selected items
    Indices,
    /// 1-based indices of the selected items as x3, x7, ...
    IndicesPrefixed,
    /// the full 0/1 vector
    Binary,
    /// the full 0/1 vector as x1 = 0, x2 = 1, ...
    BinaryPrefixed,
}

impl OutputStyle {
    /// Maps the numeric style codes 0 to 4.
    pub const fn from_code(code: usize) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Indices),
            2 => Some(Self::IndicesPrefixed),
            3 => Some(Self::Binary),
            4 => Some(Self::BinaryPrefixed),
            _ => None,
        }
    }
}

/// When a repaired candidate is polished by local search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocalSearchPolicy {
    /// only when the repaired candidate already beats the particle's personal best
    ImprovingOnly,
    /// every repaired candidate
    Always,
}

/// Options for the QPSO solver for run time
#[derive(Clone, Debug)]
pub struct QpsoOptions {
    pub population_size: usize,
    pub max_generations: usize,
    pub alpha: f64,
    pub epsilon_1: f64,
    pub epsilon_2: f64,
    pub seed: u64,
    pub runs: usize,
    pub output_style: OutputStyle,
    pub newline_between_outputs: bool,
    pub verbose: usize,
    pub parallel: bool,
    pub local_search_policy: LocalSearchPolicy,
    pub lp_max_iterations: u32,
    pub lp_time_limit: f64,
    pub max_population: usize,
    pub max_items: usize,
    pub max_dims: usize,
}

impl QpsoOptions {
    pub fn new() -> Self {
        Self {
            population_size: 20,
            max_generations: 500,
            alpha: 0.1,
            epsilon_1: 0.4,
            epsilon_2: 0.2,
            seed: 198_671,
            runs: 30,
            output_style: OutputStyle::None,
            newline_between_outputs: false,
            verbose: 1,
            parallel: false,
            local_search_policy: LocalSearchPolicy::ImprovingOnly,
            lp_max_iterations: 200,
            lp_time_limit: f64::INFINITY,
            max_population: 20,
            max_items: 2500,
            max_dims: 100,
        }
    }

    pub fn beta(&self) -> f64 {
        1.0 - self.alpha
    }

    pub fn epsilon_3(&self) -> f64 {
        1.0 - self.epsilon_1 - self.epsilon_2
    }

    /// Sets the output style from its numeric code, unknown codes are ignored.
    pub fn set_output_style(&mut self, code: Option<usize>) {
        if let Some(style) = code.and_then(OutputStyle::from_code) {
            self.output_style = style;
        }
    }

    /// Checks the parameters on their own.
    pub fn validate(&self) -> MkpResult<()> {
        if self.population_size == 0 || self.population_size > self.max_population {
            return Err(MkpError::Configuration(format!(
                "population size must be in 1..={}, got {}",
                self.max_population, self.population_size
            )));
        }

        if self.runs == 0 {
            return Err(MkpError::Configuration("at least one run is needed".to_string()));
        }

        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(MkpError::Configuration(format!(
                "alpha must be in [0, 1], got {}",
                self.alpha
            )));
        }

        if self.epsilon_1 < 0.0 || self.epsilon_2 < 0.0 {
            return Err(MkpError::Configuration(
                "epsilon 1 and epsilon 2 must be non-negative".to_string(),
            ));
        }

        // small slack so that 0.4 + 0.6 style inputs are accepted
        if self.epsilon_1 + self.epsilon_2 > 1.0 + 1E-12 {
            return Err(MkpError::Configuration(format!(
                "epsilon 1 + epsilon 2 must not exceed 1, got {}",
                self.epsilon_1 + self.epsilon_2
            )));
        }

        Ok(())
    }

    /// Checks that an instance fits the configured size limits.
    pub fn validate_instance(&self, instance: &MkpInstance) -> MkpResult<()> {
        if instance.num_items() > self.max_items {
            return Err(MkpError::InvalidInstance(format!(
                "{} items exceeds the limit of {}",
                instance.num_items(),
                self.max_items
            )));
        }

        if instance.num_dims() > self.max_dims {
            return Err(MkpError::InvalidInstance(format!(
                "{} dimensions exceeds the limit of {}",
                instance.num_dims(),
                self.max_dims
            )));
        }

        Ok(())
    }
}

impl Default for QpsoOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::make_small_instance;

    #[test]
    fn defaults_are_valid() {
        let options = QpsoOptions::new();
        assert!(options.validate().is_ok());
        assert!((options.beta() - 0.9).abs() < 1e-12);
        assert!((options.epsilon_3() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_parameters() {
        let mut options = QpsoOptions::new();
        options.population_size = 21;
        assert!(matches!(options.validate(), Err(MkpError::Configuration(_))));

        let mut options = QpsoOptions::new();
        options.epsilon_1 = 0.7;
        options.epsilon_2 = 0.5;
        assert!(options.validate().is_err());

        let mut options = QpsoOptions::new();
        options.alpha = 1.5;
        assert!(options.validate().is_err());

        let mut options = QpsoOptions::new();
        options.runs = 0;
        assert!(options.validate().is_err());
    }

    #[test]
    fn instance_limits() {
        let mut options = QpsoOptions::new();
        assert!(options.validate_instance(&make_small_instance()).is_ok());

        options.max_items = 2;
        assert!(matches!(
            options.validate_instance(&make_small_instance()),
            Err(MkpError::InvalidInstance(_))
        ));
    }

    #[test]
    fn style_codes() {
        let mut options = QpsoOptions::new();
        options.set_output_style(Some(4));
        assert_eq!(options.output_style, OutputStyle::BinaryPrefixed);
        options.set_output_style(Some(9));
        assert_eq!(options.output_style, OutputStyle::BinaryPrefixed);
        assert_eq!(OutputStyle::from_code(1), Some(OutputStyle::Indices));
    }
}
