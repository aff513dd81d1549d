//! Gene domains and type-erased allele storage.
//!
//! Each gene is declared once with an ordered, non-empty list of legal
//! values of a single type `T`. The registry stores the domains behind a
//! trait object and remembers `T`; typed accessors downcast and report a
//! [`GaError::TypeMismatch`] when the caller names a different type.

use crate::error::{GaError, Result};
use rand::{Rng, RngCore};
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// Value types usable as alleles.
///
/// Blanket-implemented for every `'static` type that is `Clone`,
/// `PartialEq` and `Debug`. Equality is what domain membership is checked
/// against; `Debug` is used when reporting populations.
pub trait Gene: Any + Clone + PartialEq + fmt::Debug + Send + Sync {}

impl<T> Gene for T where T: Any + Clone + PartialEq + fmt::Debug + Send + Sync {}

/// A type-erased allele value held in a chromosome.
pub trait Allele: Any + fmt::Debug + Send + Sync {
    /// Upcast used for typed reads.
    fn as_any(&self) -> &dyn Any;

    /// Clones into a new box.
    fn clone_allele(&self) -> Box<dyn Allele>;

    /// Name of the concrete value type.
    fn type_name(&self) -> &'static str;
}

impl<T: Gene> Allele for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_allele(&self) -> Box<dyn Allele> {
        Box::new(self.clone())
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }
}

impl Clone for Box<dyn Allele> {
    fn clone(&self) -> Self {
        (**self).clone_allele()
    }
}

/// The ordered set of legal values for one gene.
#[derive(Debug, Clone, PartialEq)]
pub struct AlleleDomain<T> {
    values: Vec<T>,
}

impl<T: Gene> AlleleDomain<T> {
    /// Legal values in declaration order.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Number of legal values. Never zero.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; empty domains are rejected at declaration.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether `value` is a legal allele.
    pub fn contains(&self, value: &T) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// Picks a legal value uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &T {
        &self.values[rng.random_range(0..self.values.len())]
    }
}

/// Domain operations that do not need the value type.
trait ErasedDomain: fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn value_type(&self) -> &'static str;

    fn value_type_id(&self) -> TypeId;

    fn len(&self) -> usize;

    fn contains(&self, value: &dyn Allele) -> bool;

    fn sample(&self, rng: &mut dyn RngCore) -> Box<dyn Allele>;
}

impl<T: Gene> ErasedDomain for AlleleDomain<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn value_type(&self) -> &'static str {
        type_name::<T>()
    }

    fn value_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn contains(&self, value: &dyn Allele) -> bool {
        value
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|v| AlleleDomain::contains(self, v))
    }

    fn sample(&self, mut rng: &mut dyn RngCore) -> Box<dyn Allele> {
        Box::new(self.choose(&mut rng).clone())
    }
}

#[derive(Debug)]
struct GeneEntry {
    name: String,
    domain: Box<dyn ErasedDomain>,
}

/// Gene name → allele domain, in declaration order.
///
/// Names are unique and a gene's value type never changes once declared.
/// Iteration order is insertion order, so strategies that combine
/// [`names`](GeneRegistry::names) with indexed random draws are reproducible.
#[derive(Debug, Default)]
pub struct GeneRegistry {
    entries: Vec<GeneEntry>,
    index: HashMap<String, usize>,
}

impl GeneRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a new gene with its legal values.
    ///
    /// Fails with [`GaError::DuplicateGene`] if the name is taken (the
    /// existing declaration is kept) and with
    /// [`GaError::InvalidConfiguration`] if `values` is empty or holds a
    /// value that is not equal to itself (such as `f64::NAN`), since
    /// membership could never be confirmed for it.
    pub fn declare<T, I>(&mut self, name: impl Into<String>, values: I) -> Result<()>
    where
        T: Gene,
        I: IntoIterator<Item = T>,
    {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(GaError::DuplicateGene { name });
        }
        let values: Vec<T> = values.into_iter().collect();
        if values.is_empty() {
            return Err(GaError::InvalidConfiguration(format!(
                "gene `{name}` declared with an empty allele domain"
            )));
        }
        if let Some(value) = values.iter().find(|v| *v != *v) {
            return Err(GaError::InvalidConfiguration(format!(
                "gene `{name}` declares {value:?}, which is not equal to itself"
            )));
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push(GeneEntry {
            name,
            domain: Box::new(AlleleDomain { values }),
        });
        Ok(())
    }

    /// Returns the domain of `name`, checked against `T`.
    pub fn domain_of<T: Gene>(&self, name: &str) -> Result<&AlleleDomain<T>> {
        let entry = self.entry(name)?;
        entry
            .domain
            .as_any()
            .downcast_ref::<AlleleDomain<T>>()
            .ok_or_else(|| GaError::TypeMismatch {
                gene: entry.name.clone(),
                declared: entry.domain.value_type(),
                requested: type_name::<T>(),
            })
    }

    /// Position of `name` in declaration order.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| GaError::UnknownGene { name: name.into() })
    }

    /// Gene names in declaration order.
    pub fn names(&self) -> impl ExactSizeIterator<Item = &str> + Clone + '_ {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Name of the gene at `index`, if any.
    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.name.as_str())
    }

    /// Number of declared genes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no gene has been declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name of the value type `name` was declared with.
    pub fn value_type(&self, name: &str) -> Result<&'static str> {
        Ok(self.entry(name)?.domain.value_type())
    }

    /// Number of legal values of `name`.
    pub fn domain_len(&self, name: &str) -> Result<usize> {
        Ok(self.entry(name)?.domain.len())
    }

    /// Checks an erased value against the domain at `index`.
    pub(crate) fn check_erased(&self, index: usize, value: &dyn Allele) -> Result<()> {
        let entry = &self.entries[index];
        if entry.domain.value_type_id() != value.as_any().type_id() {
            return Err(GaError::TypeMismatch {
                gene: entry.name.clone(),
                declared: entry.domain.value_type(),
                requested: value.type_name(),
            });
        }
        if !entry.domain.contains(value) {
            return Err(GaError::IllegalAllele {
                gene: entry.name.clone(),
                value: format!("{value:?}"),
            });
        }
        Ok(())
    }

    /// Draws a random legal value for the gene at `index`.
    pub(crate) fn sample_erased(&self, index: usize, rng: &mut dyn RngCore) -> Box<dyn Allele> {
        self.entries[index].domain.sample(rng)
    }

    fn entry(&self, name: &str) -> Result<&GeneEntry> {
        let index = self.index_of(name)?;
        Ok(&self.entries[index])
    }
}
