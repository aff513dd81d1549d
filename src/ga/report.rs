//! Per-generation reporting.
//!
//! After every evaluation the evolution loop hands the population to a
//! [`Reporter`]. Presentation is up to the reporter: [`TracingReporter`]
//! writes structured log events, closures can collect
//! [`GenerationSnapshot`]s, and [`NoReport`] discards everything.

use super::population::Population;
use tracing::{debug, info};

/// Receives each evaluated generation.
pub trait Reporter {
    fn report(&mut self, population: &Population<'_>);
}

impl<F> Reporter for F
where
    F: FnMut(&Population<'_>),
{
    fn report(&mut self, population: &Population<'_>) {
        self(population)
    }
}

/// Emits one `info` event per generation and one `debug` event per
/// individual.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, population: &Population<'_>) {
        info!(
            generation = population.generation(),
            fitness = population.fitness(),
            size = population.size(),
            "generation evaluated"
        );
        for (rank, individual) in population.iter().enumerate() {
            debug!(
                generation = population.generation(),
                rank,
                fitness = individual.fitness(),
                genes = ?individual,
                "individual"
            );
        }
    }
}

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReport;

impl Reporter for NoReport {
    fn report(&mut self, _population: &Population<'_>) {}
}

/// An owned, printable copy of one individual.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndividualSnapshot {
    /// `(gene name, Debug rendering)` in declaration order; `None` for unset genes.
    pub genes: Vec<(String, Option<String>)>,
    pub fitness: f64,
}

/// An owned, printable copy of one generation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationSnapshot {
    pub generation: u32,
    pub fitness: f64,
    pub individuals: Vec<IndividualSnapshot>,
}

impl Population<'_> {
    /// Copies the generation number, aggregate fitness and every
    /// individual's genes and fitness into an owned value.
    pub fn snapshot(&self) -> GenerationSnapshot {
        GenerationSnapshot {
            generation: self.generation(),
            fitness: self.fitness(),
            individuals: self
                .iter()
                .map(|ind| IndividualSnapshot {
                    genes: ind
                        .genes()
                        .map(|(name, value)| (name.to_string(), value.map(|v| format!("{v:?}"))))
                        .collect(),
                    fitness: ind.fitness(),
                })
                .collect(),
        }
    }
}
