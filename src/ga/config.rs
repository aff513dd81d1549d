//! GA configuration.
//!
//! [`GaConfig`] holds the run parameters of a [`Model`](super::Model) and the
//! two policies the evolution loop consults: the fitness ordering
//! ([`Objective`]) and the convergence predicate (target fitness,
//! generation cap, stagnation limit).

use crate::error::{GaError, Result};
use std::cmp::Ordering;

/// Which direction of fitness counts as better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Objective {
    /// Lower fitness is better. Populations sort ascending.
    #[default]
    Minimize,
    /// Higher fitness is better. Populations sort descending.
    Maximize,
}

impl Objective {
    /// Orders two fitness values best-first.
    ///
    /// Numerically equal values (including `-0.0` and `0.0`) compare equal.
    /// NaN never reaches here; it is rejected at evaluation.
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        let (a, b) = match self {
            Objective::Minimize => (a, b),
            Objective::Maximize => (b, a),
        };
        a.partial_cmp(&b).unwrap_or(Ordering::Equal)
    }

    /// Whether `candidate` is strictly better than `incumbent`.
    pub fn is_better(self, candidate: f64, incumbent: f64) -> bool {
        self.compare(candidate, incumbent) == Ordering::Less
    }

    /// The fitness of an individual that has not been evaluated yet.
    ///
    /// Never compares as better than any evaluated fitness.
    pub fn worst(self) -> f64 {
        match self {
            Objective::Minimize => f64::INFINITY,
            Objective::Maximize => f64::NEG_INFINITY,
        }
    }
}

/// Configuration for a model and its evolution run.
///
/// # Defaults
///
/// ```
/// use u_gaga::ga::{GaConfig, Objective};
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 50);
/// assert_eq!(config.mutation_rate, 10.0);
/// assert_eq!(config.objective, Objective::Minimize);
/// assert_eq!(config.target_fitness, Some(0.0));
/// assert_eq!(config.max_generations, 1000);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_gaga::ga::{GaConfig, Objective};
///
/// let config = GaConfig::default()
///     .with_population_size(16)
///     .with_mutation_rate(12.0)
///     .with_objective(Objective::Maximize)
///     .with_target_fitness(Some(9.0))
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of individuals a generation should hold.
    pub population_size: usize,

    /// Percentage (0–100) of the population touched by mutation.
    ///
    /// The engine only stores it; mutation strategies decide what it means.
    /// [`mutation_count`](Self::mutation_count) gives the usual reading.
    pub mutation_rate: f64,

    /// Fitness ordering.
    pub objective: Objective,

    /// Aggregate fitness at which the run stops. `None` disables.
    pub target_fitness: Option<f64>,

    /// Absolute distance from `target_fitness` still counted as reached.
    pub fitness_tolerance: f64,

    /// Generation number at which the run stops regardless of fitness.
    pub max_generations: u32,

    /// Number of evaluations without improvement of the best fitness
    /// before stopping.
    ///
    /// Set to 0 to disable stagnation-based termination (the default).
    pub stagnation_limit: usize,

    /// Whether every evaluated generation must hold exactly
    /// `population_size` individuals.
    ///
    /// When `false`, any non-empty population is evaluated.
    pub enforce_population_size: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            mutation_rate: 10.0,
            objective: Objective::Minimize,
            target_fitness: Some(0.0),
            fitness_tolerance: 0.0,
            max_generations: 1000,
            stagnation_limit: 0,
            enforce_population_size: true,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the mutation rate, as a percentage.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the fitness ordering.
    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }

    /// Sets the target fitness (`None` to run until another limit fires).
    pub fn with_target_fitness(mut self, target: Option<f64>) -> Self {
        self.target_fitness = target;
        self
    }

    /// Sets the tolerance around the target fitness.
    pub fn with_fitness_tolerance(mut self, tolerance: f64) -> Self {
        self.fitness_tolerance = tolerance;
        self
    }

    /// Sets the generation cap.
    pub fn with_max_generations(mut self, n: u32) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the stagnation limit (0 to disable).
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Enables or disables the exact population size check.
    pub fn with_enforce_population_size(mut self, enforce: bool) -> Self {
        self.enforce_population_size = enforce;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of mutations for a population of `len` individuals:
    /// `floor(len * mutation_rate / 100)`.
    pub fn mutation_count(&self, len: usize) -> usize {
        (len as f64 * self.mutation_rate / 100.0).floor() as usize
    }

    /// Whether `fitness` satisfies the target.
    pub fn is_target_reached(&self, fitness: f64) -> bool {
        self.target_fitness
            .is_some_and(|target| (fitness - target).abs() <= self.fitness_tolerance)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(invalid("population_size must be at least 1"));
        }
        if !self.mutation_rate.is_finite() || !(0.0..=100.0).contains(&self.mutation_rate) {
            return Err(invalid("mutation_rate must be a percentage in 0..=100"));
        }
        if let Some(target) = self.target_fitness {
            if !target.is_finite() {
                return Err(invalid("target_fitness must be finite"));
            }
        }
        if !self.fitness_tolerance.is_finite() || self.fitness_tolerance < 0.0 {
            return Err(invalid("fitness_tolerance must be finite and non-negative"));
        }
        if self.max_generations == 0 {
            return Err(invalid("max_generations must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> GaError {
    GaError::InvalidConfiguration(msg.into())
}
