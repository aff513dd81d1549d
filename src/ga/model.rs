//! Problem and algorithm descriptor.

use super::alleles::{AlleleDomain, Gene, GeneRegistry};
use super::config::{GaConfig, Objective};
use super::individual::Individual;
use super::population::Population;
use super::strategy::{Phase, Strategies};
use crate::error::{GaError, Result};
use crate::random::GaRng;

/// A genetic optimization problem: gene domains, run parameters and the
/// five strategies that drive evolution.
///
/// Individuals and populations borrow the model; it is only mutated while
/// the problem is being declared.
///
/// # Examples
///
/// ```
/// use u_gaga::ga::Model;
///
/// let mut model = Model::new();
/// model.declare_gene("x", [0i32, 1, 2]).unwrap();
/// model.declare_gene("mode", ["fast", "slow"]).unwrap();
/// model.set_population_size(16);
///
/// assert_eq!(model.gene_count(), 2);
/// assert_eq!(model.domain_of::<&str>("mode").unwrap().len(), 2);
/// assert!(model.domain_of::<i64>("x").is_err());
/// ```
#[derive(Debug, Default)]
pub struct Model {
    genes: GeneRegistry,
    config: GaConfig,
    strategies: Strategies,
}

impl Model {
    /// Creates a model with default parameters and no genes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a model with the given parameters.
    pub fn with_config(config: GaConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    // ---- genes ----

    /// Declares a gene and its legal values.
    pub fn declare_gene<T, I>(&mut self, name: impl Into<String>, values: I) -> Result<()>
    where
        T: Gene,
        I: IntoIterator<Item = T>,
    {
        self.genes.declare(name, values)
    }

    /// Legal values of `name`, checked against `T`.
    pub fn domain_of<T: Gene>(&self, name: &str) -> Result<&AlleleDomain<T>> {
        self.genes.domain_of(name)
    }

    /// Gene names in declaration order.
    pub fn gene_names(&self) -> impl ExactSizeIterator<Item = &str> + Clone + '_ {
        self.genes.names()
    }

    /// Number of declared genes.
    pub fn gene_count(&self) -> usize {
        self.genes.len()
    }

    /// Position of `name` in declaration order.
    pub fn gene_index(&self, name: &str) -> Result<usize> {
        self.genes.index_of(name)
    }

    /// The underlying registry.
    pub fn genes(&self) -> &GeneRegistry {
        &self.genes
    }

    // ---- parameters ----

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut GaConfig {
        &mut self.config
    }

    pub fn population_size(&self) -> usize {
        self.config.population_size
    }

    /// Sets the population size. Zero is accepted here and rejected when
    /// evolution starts.
    pub fn set_population_size(&mut self, n: usize) {
        self.config.population_size = n;
    }

    pub fn mutation_rate(&self) -> f64 {
        self.config.mutation_rate
    }

    /// Sets the mutation rate, as a percentage.
    pub fn set_mutation_rate(&mut self, rate: f64) {
        self.config.mutation_rate = rate;
    }

    pub fn objective(&self) -> Objective {
        self.config.objective
    }

    // ---- strategies ----

    /// Registers the fitness strategy, replacing any previous one.
    pub fn register_fitness_strategy<F>(&mut self, f: F)
    where
        F: Fn(&Individual<'_>) -> Result<f64> + Send + Sync + 'static,
    {
        self.strategies.fitness = Some(Box::new(f));
    }

    /// Registers the strategy that fills generation 0.
    pub fn register_initialization_strategy<F>(&mut self, f: F)
    where
        F: Fn(&mut Population<'_>, &mut GaRng) -> Result<()> + Send + Sync + 'static,
    {
        self.strategies.initialization = Some(Box::new(f));
    }

    /// Registers the selection strategy.
    pub fn register_selection_strategy<F>(&mut self, f: F)
    where
        F: Fn(&mut Population<'_>, &mut GaRng) -> Result<()> + Send + Sync + 'static,
    {
        self.strategies.selection = Some(Box::new(f));
    }

    /// Registers the crossover strategy.
    pub fn register_crossover_strategy<F>(&mut self, f: F)
    where
        F: Fn(&mut Population<'_>, &mut GaRng) -> Result<()> + Send + Sync + 'static,
    {
        self.strategies.crossover = Some(Box::new(f));
    }

    /// Registers the mutation strategy.
    pub fn register_mutation_strategy<F>(&mut self, f: F)
    where
        F: Fn(&mut Population<'_>, &mut GaRng) -> Result<()> + Send + Sync + 'static,
    {
        self.strategies.mutation = Some(Box::new(f));
    }

    /// The registered strategies.
    pub fn strategies(&self) -> &Strategies {
        &self.strategies
    }

    /// Whether a strategy is registered for `phase`.
    pub fn has_strategy(&self, phase: Phase) -> bool {
        self.strategies.is_registered(phase)
    }

    /// Checks everything a run needs before any individual is created:
    /// the parameters, at least one gene, and all five strategies.
    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;
        if self.genes.is_empty() {
            return Err(GaError::InvalidConfiguration(
                "model declares no genes".into(),
            ));
        }
        self.strategies.ensure_complete()
    }
}
