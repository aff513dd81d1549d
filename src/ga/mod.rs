//! Genetic Algorithm framework.
//!
//! A generic, domain-agnostic GA engine. A [`Model`] declares named genes
//! with finite domains of legal values (alleles) and registers five
//! strategies; the engine runs the evolutionary loop over [`Population`]s
//! of [`Individual`]s without knowing what the genes mean.
//!
//! # Key Types
//!
//! - [`Model`]: gene domains, run parameters ([`GaConfig`]) and strategies
//! - [`Individual`]: one candidate solution, a value per gene plus fitness
//! - [`Population`]: one generation, sorted best-first after evaluation
//! - [`Evolution`]: the state machine of one run, advanced step by step
//! - [`Algorithm`]: owns a model and runs it to an [`EvolutionResult`]
//!
//! # Strategies
//!
//! - fitness: `Fn(&Individual<'_>) -> Result<f64>`
//! - initialization, selection, crossover, mutation:
//!   `Fn(&mut Population<'_>, &mut GaRng) -> Result<()>`
//!
//! Stock implementations of the population strategies live in
//! [`operators`].
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod alleles;
mod config;
mod individual;
mod model;
pub mod operators;
mod population;
mod report;
mod runner;
mod strategy;

pub use alleles::{Allele, AlleleDomain, Gene, GeneRegistry};
pub use config::{GaConfig, Objective};
pub use individual::Individual;
pub use model::Model;
pub use population::Population;
pub use report::{GenerationSnapshot, IndividualSnapshot, NoReport, Reporter, TracingReporter};
pub use runner::{Algorithm, Evolution, EvolutionResult, EvolutionState, Termination};
pub use strategy::{FitnessStrategy, Phase, PopulationStrategy, Strategies};
