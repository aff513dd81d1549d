//! GA evolutionary loop execution.
//!
//! [`Evolution`] is the state machine of one run:
//!
//! ```text
//! Uninitialized → Evaluated
//!     → (Selected → Recombined → Mutated → Evaluated)*
//!     → Converged
//! ```
//!
//! Each [`step`](Evolution::step) performs exactly one transition by invoking
//! the matching strategy of the model. [`Algorithm`] owns a model and runs
//! an evolution to completion.

use super::individual::Individual;
use super::model::Model;
use super::population::Population;
use super::report::{Reporter, TracingReporter};
use super::strategy::Phase;
use crate::error::{GaError, Result};
use crate::random::{rng_from_seed, GaRng};
use tracing::{debug, info, trace, warn};

/// Where a run currently is in the evolution protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvolutionState {
    /// No population exists yet.
    Uninitialized,
    /// The population has been scored and reported.
    Evaluated,
    /// Selection ran and the generation counter advanced.
    Selected,
    /// Crossover ran.
    Recombined,
    /// Mutation ran; the population awaits evaluation.
    Mutated,
    /// A termination condition fired. Terminal.
    Converged,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// The aggregate fitness hit the configured target.
    TargetReached,
    /// The generation counter reached `max_generations`.
    GenerationLimit,
    /// The best fitness did not improve for `stagnation_limit` evaluations.
    Stagnation,
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct EvolutionResult<'m> {
    /// The best individual seen across all evaluated generations.
    pub best: Individual<'m>,

    /// Best fitness value (same as `best.fitness()`).
    pub best_fitness: f64,

    /// The population as of the last evaluation.
    pub population: Population<'m>,

    /// Generation number at termination.
    pub generations: u32,

    /// Which condition stopped the run.
    pub termination: Termination,

    /// Aggregate fitness after each evaluation, generation 0 first.
    pub fitness_history: Vec<f64>,
}

/// One evolution run, advanced a transition at a time.
///
/// Owns the population and the random source for the run; borrows the
/// model.
///
/// ```
/// use u_gaga::ga::{operators, Evolution, EvolutionState, Model, NoReport};
///
/// let mut model = Model::new();
/// model.declare_gene("bit", [0u8, 1]).unwrap();
/// model.set_population_size(4);
/// model.register_fitness_strategy(|ind| Ok(f64::from(1 - ind.get_gene::<u8>("bit")?)));
/// model.register_initialization_strategy(operators::random_initialization);
/// model.register_selection_strategy(operators::truncation_selection);
/// model.register_crossover_strategy(operators::one_point_crossover);
/// model.register_mutation_strategy(operators::random_reset_mutation);
///
/// let mut evolution = Evolution::new(&model).unwrap();
/// assert_eq!(evolution.state(), EvolutionState::Uninitialized);
/// let state = evolution.step(&mut NoReport).unwrap();
/// assert!(matches!(state, EvolutionState::Evaluated | EvolutionState::Converged));
/// assert_eq!(evolution.population().size(), 4);
/// ```
pub struct Evolution<'m> {
    model: &'m Model,
    population: Population<'m>,
    rng: GaRng,
    state: EvolutionState,
    best: Option<Individual<'m>>,
    stagnation_counter: usize,
    termination: Option<Termination>,
    fitness_history: Vec<f64>,
}

impl<'m> Evolution<'m> {
    /// Prepares a run, seeding the random source from the model's config.
    ///
    /// Fails before anything is created if the model is misconfigured:
    /// invalid parameters, no genes, or a missing strategy.
    pub fn new(model: &'m Model) -> Result<Self> {
        Self::with_rng(model, rng_from_seed(model.config().seed))
    }

    /// Prepares a run with an explicit random source.
    pub fn with_rng(model: &'m Model, rng: GaRng) -> Result<Self> {
        model.validate()?;
        Ok(Self {
            model,
            population: Population::new(model, 0),
            rng,
            state: EvolutionState::Uninitialized,
            best: None,
            stagnation_counter: 0,
            termination: None,
            fitness_history: Vec::new(),
        })
    }

    pub fn state(&self) -> EvolutionState {
        self.state
    }

    pub fn population(&self) -> &Population<'m> {
        &self.population
    }

    /// Set once the run has converged.
    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    pub fn is_converged(&self) -> bool {
        self.state == EvolutionState::Converged
    }

    /// Performs one transition and returns the new state.
    ///
    /// Evaluations are followed by a report and the convergence check.
    /// Stepping a converged run is a no-op.
    pub fn step<R: Reporter + ?Sized>(&mut self, reporter: &mut R) -> Result<EvolutionState> {
        let next = match self.state {
            EvolutionState::Uninitialized => {
                self.apply(Phase::Initialization)?;
                self.evaluate(reporter)?
            }
            EvolutionState::Evaluated => {
                self.apply(Phase::Selection)?;
                self.population.increase_generation();
                EvolutionState::Selected
            }
            EvolutionState::Selected => {
                self.apply(Phase::Crossover)?;
                EvolutionState::Recombined
            }
            EvolutionState::Recombined => {
                self.apply(Phase::Mutation)?;
                EvolutionState::Mutated
            }
            EvolutionState::Mutated => self.evaluate(reporter)?,
            EvolutionState::Converged => EvolutionState::Converged,
        };
        if next != self.state {
            debug!(
                from = ?self.state,
                to = ?next,
                generation = self.population.generation(),
                "state transition"
            );
        }
        self.state = next;
        Ok(next)
    }

    /// Steps until converged and returns the result.
    pub fn run<R: Reporter + ?Sized>(mut self, reporter: &mut R) -> Result<EvolutionResult<'m>> {
        while !self.is_converged() {
            self.step(reporter)?;
        }
        self.into_result()
    }

    /// Runs the strategy registered for `phase` on the population.
    fn apply(&mut self, phase: Phase) -> Result<()> {
        let model = self.model;
        let strategy = model.strategies().population(phase)?;
        let before = self.population.size();
        strategy(&mut self.population, &mut self.rng)?;
        trace!(
            %phase,
            generation = self.population.generation(),
            before,
            after = self.population.size(),
            "strategy applied"
        );
        Ok(())
    }

    fn evaluate<R: Reporter + ?Sized>(&mut self, reporter: &mut R) -> Result<EvolutionState> {
        self.check_population_size()?;
        self.population.compute_fitness()?;
        reporter.report(&self.population);

        let fitness = self.population.fitness();
        self.fitness_history.push(fitness);

        let objective = self.model.objective();
        let improved = self
            .best
            .as_ref()
            .map_or(true, |best| objective.is_better(fitness, best.fitness()));
        if improved {
            self.best = self.population.best().cloned();
            self.stagnation_counter = 0;
        } else {
            self.stagnation_counter += 1;
        }

        match self.convergence(fitness) {
            Some(termination) => {
                self.termination = Some(termination);
                self.log_termination(termination, fitness);
                Ok(EvolutionState::Converged)
            }
            None => Ok(EvolutionState::Evaluated),
        }
    }

    fn convergence(&self, fitness: f64) -> Option<Termination> {
        let config = self.model.config();
        if config.is_target_reached(fitness) {
            Some(Termination::TargetReached)
        } else if self.population.generation() >= config.max_generations {
            Some(Termination::GenerationLimit)
        } else if config.stagnation_limit > 0 && self.stagnation_counter >= config.stagnation_limit
        {
            Some(Termination::Stagnation)
        } else {
            None
        }
    }

    fn check_population_size(&self) -> Result<()> {
        let config = self.model.config();
        let actual = self.population.size();
        if actual == 0 || (config.enforce_population_size && actual != config.population_size) {
            return Err(GaError::PopulationSize {
                expected: config.population_size,
                actual,
                generation: self.population.generation(),
            });
        }
        Ok(())
    }

    fn log_termination(&self, termination: Termination, fitness: f64) {
        let generation = self.population.generation();
        let has_target = self.model.config().target_fitness.is_some();
        if termination == Termination::GenerationLimit && has_target {
            warn!(generation, fitness, "generation limit reached before target fitness");
        }
        info!(?termination, generation, fitness, "evolution converged");
    }

    fn into_result(self) -> Result<EvolutionResult<'m>> {
        let (Some(termination), Some(best)) = (self.termination, self.best) else {
            return Err(GaError::InvalidConfiguration(
                "evolution has not converged".into(),
            ));
        };
        Ok(EvolutionResult {
            best_fitness: best.fitness(),
            best,
            generations: self.population.generation(),
            population: self.population,
            termination,
            fitness_history: self.fitness_history,
        })
    }
}

/// Owns a model and runs evolutions against it.
///
/// # Usage
///
/// ```ignore
/// let algorithm = Algorithm::new(model);
/// let result = algorithm.evolve()?;
/// println!("best fitness {} after {} generations", result.best_fitness, result.generations);
/// ```
#[derive(Debug, Default)]
pub struct Algorithm {
    model: Model,
}

impl Algorithm {
    pub fn new(model: Model) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Mutable access for declaring the problem before a run.
    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    pub fn into_model(self) -> Model {
        self.model
    }

    /// Runs to convergence, reporting each generation through `tracing`.
    pub fn evolve(&self) -> Result<EvolutionResult<'_>> {
        self.evolve_with(&mut TracingReporter)
    }

    /// Runs to convergence with a custom reporter.
    pub fn evolve_with<R: Reporter + ?Sized>(
        &self,
        reporter: &mut R,
    ) -> Result<EvolutionResult<'_>> {
        self.evolution()?.run(reporter)
    }

    /// A fresh stepper over this algorithm's model.
    pub fn evolution(&self) -> Result<Evolution<'_>> {
        Evolution::new(&self.model)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::report::NoReport;
    use crate::ga::{operators, GaConfig, Objective};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    // ---- x + y + z over {0, 1, 2}: fitness 6 - sum, optimum at 2,2,2 ----

    fn xyz_model(config: GaConfig) -> Model {
        let mut model = Model::with_config(config);
        for name in ["x", "y", "z"] {
            model.declare_gene(name, [0i32, 1, 2]).unwrap();
        }
        model.register_fitness_strategy(|ind| {
            let sum = ind.get_gene::<i32>("x")?
                + ind.get_gene::<i32>("y")?
                + ind.get_gene::<i32>("z")?;
            Ok(f64::from(6 - sum))
        });
        model.register_initialization_strategy(operators::random_initialization);
        model.register_selection_strategy(operators::truncation_selection);
        model.register_crossover_strategy(operators::one_point_crossover);
        model.register_mutation_strategy(operators::random_reset_mutation);
        model
    }

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    fn keep(_: &mut Population<'_>, _: &mut GaRng) -> Result<()> {
        Ok(())
    }

    fn fill_with(population: &mut Population<'_>, value: i32) -> Result<()> {
        for _ in 0..population.model().population_size() {
            let mut ind = population.spawn();
            for name in ["x", "y", "z"] {
                ind.set_gene(name, value)?;
            }
            population.add_individual(ind);
        }
        Ok(())
    }

    #[test]
    fn test_xyz_converges_to_zero() {
        let model = xyz_model(GaConfig::default().with_population_size(16).with_seed(42));
        let algorithm = Algorithm::new(model);
        let result = algorithm.evolve_with(&mut NoReport).unwrap();

        assert_eq!(result.termination, Termination::TargetReached);
        assert_eq!(result.best_fitness, 0.0);
        assert_eq!(result.population.fitness(), 0.0);
        assert_eq!(result.generations, result.population.generation());
        for name in ["x", "y", "z"] {
            assert_eq!(*result.best.get_gene::<i32>(name).unwrap(), 2);
        }
        assert_eq!(
            result.fitness_history.len(),
            result.generations as usize + 1
        );
    }

    #[test]
    fn test_optimum_in_generation_zero_skips_selection() {
        let selections = counter();
        let mut model = xyz_model(GaConfig::default().with_population_size(16));
        model.register_initialization_strategy(|pop, _| fill_with(pop, 2));
        let seen = selections.clone();
        model.register_selection_strategy(move |_, _| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let mut evolution = Evolution::new(&model).unwrap();
        assert_eq!(
            evolution.step(&mut NoReport).unwrap(),
            EvolutionState::Converged
        );
        assert_eq!(evolution.termination(), Some(Termination::TargetReached));

        let result = evolution.run(&mut NoReport).unwrap();
        assert_eq!(result.generations, 0);
        assert_eq!(result.best_fitness, 0.0);
        assert_eq!(selections.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_state_sequence() {
        let mut model = xyz_model(GaConfig::default().with_population_size(4).with_seed(1));
        model.register_initialization_strategy(|pop, _| fill_with(pop, 0));
        model.register_selection_strategy(keep);
        model.register_crossover_strategy(keep);
        model.register_mutation_strategy(keep);

        let mut evolution = Evolution::new(&model).unwrap();
        let mut states = vec![evolution.state()];
        let mut generations = vec![evolution.population().generation()];
        for _ in 0..5 {
            states.push(evolution.step(&mut NoReport).unwrap());
            generations.push(evolution.population().generation());
        }
        assert_eq!(
            states,
            vec![
                EvolutionState::Uninitialized,
                EvolutionState::Evaluated,
                EvolutionState::Selected,
                EvolutionState::Recombined,
                EvolutionState::Mutated,
                EvolutionState::Evaluated,
            ]
        );
        assert_eq!(generations, vec![0, 0, 1, 1, 1, 1]);
    }

    #[test]
    fn test_generation_limit() {
        let mut model = xyz_model(
            GaConfig::default()
                .with_population_size(4)
                .with_max_generations(5),
        );
        model.register_initialization_strategy(|pop, _| fill_with(pop, 0));
        model.register_selection_strategy(keep);
        model.register_crossover_strategy(keep);
        model.register_mutation_strategy(keep);

        let algorithm = Algorithm::new(model);
        let result = algorithm.evolve_with(&mut NoReport).unwrap();
        assert_eq!(result.termination, Termination::GenerationLimit);
        assert_eq!(result.generations, 5);
        assert_eq!(result.fitness_history, vec![6.0; 6]);
    }

    #[test]
    fn test_stagnation_limit() {
        let mut model = xyz_model(
            GaConfig::default()
                .with_population_size(4)
                .with_target_fitness(None)
                .with_stagnation_limit(3),
        );
        model.register_initialization_strategy(|pop, _| fill_with(pop, 1));
        model.register_selection_strategy(keep);
        model.register_crossover_strategy(keep);
        model.register_mutation_strategy(keep);

        let algorithm = Algorithm::new(model);

        let result = algorithm.evolve_with(&mut NoReport).unwrap();
        assert_eq!(result.termination, Termination::Stagnation);
        assert_eq!(result.generations, 3);
    }

    #[test]
    fn test_missing_fitness_fails_before_initialization() {
        let inits = counter();
        let mut model = Model::with_config(GaConfig::default().with_population_size(4));
        model.declare_gene("x", [0i32, 1]).unwrap();
        let seen = inits.clone();
        model.register_initialization_strategy(move |_, _| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        model.register_selection_strategy(keep);
        model.register_crossover_strategy(keep);
        model.register_mutation_strategy(keep);

        let algorithm = Algorithm::new(model);
        assert_eq!(
            algorithm.evolve_with(&mut NoReport).unwrap_err(),
            GaError::MissingStrategy(Phase::Fitness)
        );
        assert_eq!(inits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_zero_population_size_fails_fast() {
        let mut model = xyz_model(GaConfig::default());
        model.set_population_size(0);
        assert!(matches!(
            Evolution::new(&model).err(),
            Some(GaError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_population_size_enforced() {
        let mut model = xyz_model(GaConfig::default().with_population_size(8).with_seed(5));
        model.register_initialization_strategy(|pop, _| fill_with(pop, 0));
        model.register_crossover_strategy(keep);

        let algorithm = Algorithm::new(model);

        let err = algorithm.evolve_with(&mut NoReport).unwrap_err();
        assert_eq!(
            err,
            GaError::PopulationSize {
                expected: 8,
                actual: 4,
                generation: 1,
            }
        );
    }

    #[test]
    fn test_population_size_tolerated() {
        let mut model = xyz_model(
            GaConfig::default()
                .with_population_size(8)
                .with_enforce_population_size(false)
                .with_target_fitness(None)
                .with_max_generations(3),
        );
        model.register_initialization_strategy(|pop, _| fill_with(pop, 1));
        model.register_selection_strategy(|pop, _| pop.remove_trailing(1));

        let algorithm = Algorithm::new(model);

        let result = algorithm.evolve_with(&mut NoReport).unwrap();
        assert_eq!(result.termination, Termination::GenerationLimit);
        assert_eq!(result.generations, 3);
    }

    #[test]
    fn test_empty_population_rejected() {
        let mut model = xyz_model(
            GaConfig::default()
                .with_population_size(8)
                .with_enforce_population_size(false),
        );
        model.register_initialization_strategy(keep);
        let algorithm = Algorithm::new(model);
        let err = algorithm.evolve_with(&mut NoReport).unwrap_err();
        assert!(matches!(err, GaError::PopulationSize { actual: 0, .. }));
    }

    #[test]
    fn test_strategy_error_aborts_run() {
        let mut model = xyz_model(GaConfig::default().with_population_size(8).with_seed(9));
        model.register_initialization_strategy(|pop, _| fill_with(pop, 0));
        model.register_mutation_strategy(|pop, _| pop.get_individual_mut(0)?.set_gene("x", 7i32));

        let algorithm = Algorithm::new(model);

        let err = algorithm.evolve_with(&mut NoReport).unwrap_err();
        assert_eq!(
            err,
            GaError::IllegalAllele {
                gene: "x".into(),
                value: "7".into(),
            }
        );
    }

    #[test]
    fn test_same_seed_same_run() {
        let config = GaConfig::default()
            .with_population_size(16)
            .with_target_fitness(None)
            .with_max_generations(20)
            .with_seed(123);
        let a = Algorithm::new(xyz_model(config.clone()));
        let b = Algorithm::new(xyz_model(config));
        let ra = a.evolve_with(&mut NoReport).unwrap();
        let rb = b.evolve_with(&mut NoReport).unwrap();
        assert_eq!(ra.fitness_history, rb.fitness_history);
        assert_eq!(ra.population.snapshot(), rb.population.snapshot());
    }

    #[test]
    fn test_reporter_sees_every_evaluation() {
        let model = xyz_model(
            GaConfig::default()
                .with_population_size(16)
                .with_target_fitness(None)
                .with_max_generations(10)
                .with_seed(7),
        );
        let algorithm = Algorithm::new(model);
        let mut seen = Vec::new();
        let result = algorithm
            .evolve_with(&mut |pop: &Population<'_>| seen.push((pop.generation(), pop.fitness())))
            .unwrap();
        assert_eq!(seen.len(), result.fitness_history.len());
        assert_eq!(seen.first().map(|s| s.0), Some(0));
        assert_eq!(seen.last().map(|s| s.0), Some(10));
        for (recorded, (_, reported)) in result.fitness_history.iter().zip(&seen) {
            assert_eq!(recorded, reported);
        }
    }

    #[test]
    fn test_best_is_never_lost() {
        let model = xyz_model(
            GaConfig::default()
                .with_population_size(16)
                .with_mutation_rate(50.0)
                .with_target_fitness(None)
                .with_max_generations(30)
                .with_seed(11),
        );
        let algorithm = Algorithm::new(model);
        let result = algorithm.evolve_with(&mut NoReport).unwrap();
        let best_seen = result
            .fitness_history
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);
        assert_eq!(result.best_fitness, best_seen);
    }

    #[test]
    fn test_maximize_with_target() {
        let mut model = xyz_model(
            GaConfig::default()
                .with_population_size(16)
                .with_objective(Objective::Maximize)
                .with_target_fitness(Some(6.0))
                .with_seed(3),
        );
        model.register_fitness_strategy(|ind| {
            let sum = ind.get_gene::<i32>("x")?
                + ind.get_gene::<i32>("y")?
                + ind.get_gene::<i32>("z")?;
            Ok(f64::from(sum))
        });

        let algorithm = Algorithm::new(model);

        let result = algorithm.evolve_with(&mut NoReport).unwrap();
        assert_eq!(result.termination, Termination::TargetReached);
        assert_eq!(result.best_fitness, 6.0);
        for pair in result.population.individuals().windows(2) {
            assert!(pair[0].fitness() >= pair[1].fitness());
        }
    }
}
