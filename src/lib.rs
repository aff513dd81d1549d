//! Generic genetic algorithm engine.
//!
//! A problem is declared as a set of named genes, each with a finite domain
//! of legal values (alleles) of any value type. The caller supplies five
//! strategies (fitness, initialization, selection, crossover, mutation) and
//! the engine drives generations forward until a convergence policy fires.
//!
//! - [`ga::Model`]: gene domains, run parameters, registered strategies
//! - [`ga::Individual`] / [`ga::Population`]: candidate solutions built on the model
//! - [`ga::Algorithm`]: the evolution loop
//!
//! Genes of different value types live side by side in one model. Values are
//! type-erased in storage and checked against the declared type on every
//! typed access, so a mismatch is a [`GaError::TypeMismatch`] rather than a
//! crash.
//!
//! ```
//! use u_gaga::ga::{operators, Algorithm, GaConfig, Model, Termination};
//!
//! let mut model = Model::with_config(GaConfig::default().with_population_size(16).with_seed(3));
//! for name in ["x", "y", "z"] {
//!     model.declare_gene(name, [0i32, 1, 2]).unwrap();
//! }
//! model.register_fitness_strategy(|ind| {
//!     let sum = ind.get_gene::<i32>("x")? + ind.get_gene::<i32>("y")? + ind.get_gene::<i32>("z")?;
//!     Ok(f64::from(6 - sum))
//! });
//! model.register_initialization_strategy(operators::random_initialization);
//! model.register_selection_strategy(operators::truncation_selection);
//! model.register_crossover_strategy(operators::one_point_crossover);
//! model.register_mutation_strategy(operators::random_reset_mutation);
//!
//! let algorithm = Algorithm::new(model);
//! let result = algorithm.evolve().unwrap();
//! assert!(result.generations <= 1000);
//! if result.termination == Termination::TargetReached {
//!     assert_eq!(result.best_fitness, 0.0);
//! }
//! ```

pub mod error;
pub mod ga;
pub mod random;

pub use error::{GaError, Result};
