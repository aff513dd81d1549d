//! Strategy slots.
//!
//! A model carries one callable per [`Phase`]. The fitness strategy maps an
//! individual to a real number; the four population strategies mutate a
//! population in place. All of them receive their context explicitly: the
//! individual or population (which reach the model through
//! [`Individual::model`] / [`Population::model`]) and, for population
//! strategies, the run's random source.

use super::individual::Individual;
use super::population::Population;
use crate::error::{GaError, Result};
use crate::random::GaRng;
use std::fmt;

/// One phase of the evolution protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Fitness,
    Initialization,
    Selection,
    Crossover,
    Mutation,
}

impl Phase {
    /// All phases, in the order [`Strategies::ensure_complete`] checks them.
    pub const ALL: [Phase; 5] = [
        Phase::Fitness,
        Phase::Initialization,
        Phase::Selection,
        Phase::Crossover,
        Phase::Mutation,
    ];

    /// Lower-case name used in messages and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Fitness => "fitness",
            Phase::Initialization => "initialization",
            Phase::Selection => "selection",
            Phase::Crossover => "crossover",
            Phase::Mutation => "mutation",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fitness strategy: scores one individual.
pub type FitnessStrategy = Box<dyn Fn(&Individual<'_>) -> Result<f64> + Send + Sync>;

/// Initialization, selection, crossover or mutation strategy.
pub type PopulationStrategy =
    Box<dyn Fn(&mut Population<'_>, &mut GaRng) -> Result<()> + Send + Sync>;

/// The five strategy slots of a model.
#[derive(Default)]
pub struct Strategies {
    pub(crate) fitness: Option<FitnessStrategy>,
    pub(crate) initialization: Option<PopulationStrategy>,
    pub(crate) selection: Option<PopulationStrategy>,
    pub(crate) crossover: Option<PopulationStrategy>,
    pub(crate) mutation: Option<PopulationStrategy>,
}

impl Strategies {
    /// Whether the slot for `phase` is filled.
    pub fn is_registered(&self, phase: Phase) -> bool {
        match phase {
            Phase::Fitness => self.fitness.is_some(),
            _ => self.population_slot(phase).is_some(),
        }
    }

    /// The fitness strategy.
    pub fn fitness(&self) -> Result<&FitnessStrategy> {
        self.fitness
            .as_ref()
            .ok_or(GaError::MissingStrategy(Phase::Fitness))
    }

    /// The population strategy for `phase`.
    ///
    /// `Phase::Fitness` has no population strategy and always reports
    /// [`GaError::MissingStrategy`]; use [`fitness`](Self::fitness).
    pub fn population(&self, phase: Phase) -> Result<&PopulationStrategy> {
        self.population_slot(phase)
            .ok_or(GaError::MissingStrategy(phase))
    }

    /// Fails with the first empty slot, in [`Phase::ALL`] order.
    pub fn ensure_complete(&self) -> Result<()> {
        match Phase::ALL.into_iter().find(|p| !self.is_registered(*p)) {
            Some(phase) => Err(GaError::MissingStrategy(phase)),
            None => Ok(()),
        }
    }

    fn population_slot(&self, phase: Phase) -> Option<&PopulationStrategy> {
        match phase {
            Phase::Fitness => None,
            Phase::Initialization => self.initialization.as_ref(),
            Phase::Selection => self.selection.as_ref(),
            Phase::Crossover => self.crossover.as_ref(),
            Phase::Mutation => self.mutation.as_ref(),
        }
    }
}

impl fmt::Debug for Strategies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registered: Vec<Phase> = Phase::ALL
            .into_iter()
            .filter(|p| self.is_registered(*p))
            .collect();
        f.debug_struct("Strategies")
            .field("registered", &registered)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut Population<'_>, _: &mut GaRng) -> Result<()> {
        Ok(())
    }

    fn zero(_: &Individual<'_>) -> Result<f64> {
        Ok(0.0)
    }

    #[test]
    fn test_empty_reports_fitness_first() {
        let s = Strategies::default();
        assert_eq!(
            s.ensure_complete(),
            Err(GaError::MissingStrategy(Phase::Fitness))
        );
        for phase in Phase::ALL {
            assert!(!s.is_registered(phase));
        }
    }

    #[test]
    fn test_ensure_complete_names_missing_slot() {
        let mut s = Strategies::default();
        s.fitness = Some(Box::new(zero));
        s.initialization = Some(Box::new(noop));
        s.selection = Some(Box::new(noop));
        s.mutation = Some(Box::new(noop));
        assert_eq!(
            s.ensure_complete(),
            Err(GaError::MissingStrategy(Phase::Crossover))
        );
        s.crossover = Some(Box::new(noop));
        assert!(s.ensure_complete().is_ok());
        assert!(s.population(Phase::Selection).is_ok());
        assert!(s.population(Phase::Fitness).is_err());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Initialization.to_string(), "initialization");
        assert_eq!(format!("{:?}", Strategies::default()), "Strategies { registered: [] }");
    }
}
