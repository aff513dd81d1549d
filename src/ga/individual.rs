//! One candidate solution.

use super::alleles::{Allele, Gene};
use super::model::Model;
use crate::error::{GaError, Result};
use rand::RngCore;
use std::fmt;

/// A chromosome (gene name → allele) plus its cached fitness.
///
/// Every write goes through the model's domain check, so an individual can
/// only ever hold legal alleles. Genes start unset; reading one before it is
/// assigned is a [`GaError::UnsetGene`].
///
/// # Examples
///
/// ```
/// use u_gaga::ga::{Individual, Model};
/// use u_gaga::GaError;
///
/// let mut model = Model::new();
/// model.declare_gene("x", [0i32, 1, 2]).unwrap();
///
/// let mut ind = Individual::new(&model);
/// ind.set_gene("x", 2i32).unwrap();
/// assert_eq!(*ind.get_gene::<i32>("x").unwrap(), 2);
/// assert!(matches!(ind.set_gene("x", 3i32), Err(GaError::IllegalAllele { .. })));
/// assert!(matches!(ind.get_gene::<u8>("x"), Err(GaError::TypeMismatch { .. })));
/// ```
#[derive(Clone)]
pub struct Individual<'m> {
    model: &'m Model,
    chromosome: Vec<Option<Box<dyn Allele>>>,
    fitness: f64,
    evaluated: bool,
}

impl<'m> Individual<'m> {
    /// Creates an individual with every gene unset.
    pub fn new(model: &'m Model) -> Self {
        Self {
            model,
            chromosome: (0..model.gene_count()).map(|_| None).collect(),
            fitness: model.objective().worst(),
            evaluated: false,
        }
    }

    /// The model this individual is built against.
    pub fn model(&self) -> &'m Model {
        self.model
    }

    /// Assigns `value` to gene `name`, overwriting any previous value.
    ///
    /// Fails with [`GaError::UnknownGene`], [`GaError::TypeMismatch`] or
    /// [`GaError::IllegalAllele`]; on failure the chromosome is unchanged.
    pub fn set_gene<T: Gene>(&mut self, name: &str, value: T) -> Result<()> {
        let index = self.model.gene_index(name)?;
        let domain = self.model.domain_of::<T>(name)?;
        if !domain.contains(&value) {
            return Err(GaError::IllegalAllele {
                gene: name.into(),
                value: format!("{value:?}"),
            });
        }
        self.chromosome[index] = Some(Box::new(value));
        Ok(())
    }

    /// Reads the value of gene `name` as `T`.
    pub fn get_gene<T: Gene>(&self, name: &str) -> Result<&T> {
        let index = self.model.gene_index(name)?;
        self.model.domain_of::<T>(name)?;
        let value = self.chromosome[index]
            .as_deref()
            .ok_or_else(|| GaError::UnsetGene { gene: name.into() })?;
        value
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| GaError::TypeMismatch {
                gene: name.into(),
                declared: value.type_name(),
                requested: std::any::type_name::<T>(),
            })
    }

    /// Reads the value of gene `name` without naming its type.
    pub fn allele(&self, name: &str) -> Result<&dyn Allele> {
        let index = self.model.gene_index(name)?;
        self.chromosome[index]
            .as_deref()
            .ok_or_else(|| GaError::UnsetGene { gene: name.into() })
    }

    /// Copies gene `name` from `other`, checked against this individual's
    /// model.
    ///
    /// Lets crossover strategies recombine chromosomes without knowing
    /// each gene's value type.
    pub fn copy_gene_from(&mut self, other: &Individual<'_>, name: &str) -> Result<()> {
        let index = self.model.gene_index(name)?;
        let value = other.allele(name)?;
        self.model.genes().check_erased(index, value)?;
        self.chromosome[index] = Some(value.clone_allele());
        Ok(())
    }

    /// Assigns a random legal allele to gene `name`.
    ///
    /// Draws only from the declared domain, every member of which passes
    /// the membership check (see [`GeneRegistry::declare`]).
    ///
    /// [`GeneRegistry::declare`]: super::GeneRegistry::declare
    pub fn randomize_gene<R: RngCore>(&mut self, name: &str, rng: &mut R) -> Result<()> {
        let index = self.model.gene_index(name)?;
        self.chromosome[index] = Some(self.model.genes().sample_erased(index, rng));
        Ok(())
    }

    /// Assigns a random legal allele to every gene.
    pub fn randomize<R: RngCore>(&mut self, rng: &mut R) {
        let genes = self.model.genes();
        for (index, slot) in self.chromosome.iter_mut().enumerate() {
            *slot = Some(genes.sample_erased(index, rng));
        }
    }

    /// Whether gene `name` has a value.
    pub fn is_set(&self, name: &str) -> bool {
        self.model
            .gene_index(name)
            .is_ok_and(|i| self.chromosome[i].is_some())
    }

    /// Whether every declared gene has a value.
    pub fn is_complete(&self) -> bool {
        self.chromosome.iter().all(Option::is_some)
    }

    /// Genes in declaration order with their current values.
    pub fn genes(&self) -> impl Iterator<Item = (&'m str, Option<&(dyn Allele + 'static)>)> + '_ {
        self.model
            .gene_names()
            .zip(self.chromosome.iter().map(|slot| slot.as_deref()))
    }

    /// Runs the model's fitness strategy and caches the result.
    pub fn compute_fitness(&mut self) -> Result<f64> {
        let fitness = (self.model.strategies().fitness()?)(&*self)?;
        if fitness.is_nan() {
            return Err(GaError::NanFitness);
        }
        self.fitness = fitness;
        self.evaluated = true;
        Ok(fitness)
    }

    /// The fitness cached by the last [`compute_fitness`](Self::compute_fitness).
    ///
    /// Before the first evaluation this is the objective's worst value, so
    /// an unevaluated individual never ranks as best.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Whether fitness has been computed at least once.
    pub fn is_evaluated(&self) -> bool {
        self.evaluated
    }
}

impl fmt::Debug for Individual<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Individual")
            .field("genes", &DebugGenes(self))
            .field("fitness", &self.fitness)
            .finish()
    }
}

struct DebugGenes<'a, 'm>(&'a Individual<'m>);

impl fmt::Debug for DebugGenes<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.genes()).finish()
    }
}
