//! Error type shared by the whole engine.
//!
//! Every variant is a contract violation by the caller or by one of the
//! registered strategies. Nothing here is retried; errors surface at the
//! offending call and abort the current run.

use crate::ga::Phase;
use thiserror::Error;

/// Errors raised by the gene registry, individuals, populations and the
/// evolution loop.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GaError {
    /// A gene with this name was already declared.
    #[error("gene `{name}` is already declared")]
    DuplicateGene { name: String },

    /// No gene with this name was declared.
    #[error("gene `{name}` is not declared")]
    UnknownGene { name: String },

    /// A typed access used a value type other than the declared one.
    #[error("gene `{gene}` holds `{declared}` values, accessed as `{requested}`")]
    TypeMismatch {
        gene: String,
        declared: &'static str,
        requested: &'static str,
    },

    /// The value is not a member of the gene's allele domain.
    #[error("`{value}` is not a legal allele of gene `{gene}`")]
    IllegalAllele { gene: String, value: String },

    /// The gene was read before any value was assigned to it.
    #[error("gene `{gene}` has no value assigned")]
    UnsetGene { gene: String },

    /// Indexed or truncating access past the end of a population.
    #[error("index {index} out of range for population of size {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A strategy slot is empty at evolve time.
    #[error("no {0} strategy registered")]
    MissingStrategy(Phase),

    /// Parameters or declarations that cannot produce a valid run.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The strategies left the population at a size the engine refuses to evaluate.
    #[error("generation {generation}: population holds {actual} individuals, expected {expected}")]
    PopulationSize {
        expected: usize,
        actual: usize,
        generation: u32,
    },

    /// The fitness strategy returned NaN.
    #[error("fitness strategy returned NaN")]
    NanFitness,
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, GaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_gene() {
        let err = GaError::TypeMismatch {
            gene: "x".into(),
            declared: "i32",
            requested: "u8",
        };
        assert_eq!(err.to_string(), "gene `x` holds `i32` values, accessed as `u8`");

        let err = GaError::IllegalAllele {
            gene: "colour".into(),
            value: "Purple".into(),
        };
        assert!(err.to_string().contains("colour"));
    }

    #[test]
    fn test_missing_strategy_names_phase() {
        let err = GaError::MissingStrategy(Phase::Fitness);
        assert_eq!(err.to_string(), "no fitness strategy registered");
    }
}
