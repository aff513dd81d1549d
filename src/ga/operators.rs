//! Stock population strategies.
//!
//! Ready-made strategies for any model, working on chromosomes through the
//! gene registry so they never need to know the gene types. Each has the
//! signature `fn(&mut Population<'_>, &mut GaRng) -> Result<()>` and can be
//! passed straight to the `register_*_strategy` methods of [`Model`].
//!
//! - [`random_initialization`]: fill generation 0 with random individuals
//! - [`truncation_selection`]: drop the weaker half of a sorted population
//! - [`one_point_crossover`]: refill from adjacent pairs with a single cut
//! - [`random_reset_mutation`]: reset random genes to random legal alleles
//!
//! [`Model`]: super::Model

use super::population::Population;
use crate::error::Result;
use crate::random::GaRng;
use rand::Rng;

// ============================================================================
// Initialization
// ============================================================================

/// Adds fully randomized individuals until the population reaches the
/// model's population size.
pub fn random_initialization(population: &mut Population<'_>, rng: &mut GaRng) -> Result<()> {
    let target = population.model().population_size();
    while population.size() < target {
        let mut individual = population.spawn();
        individual.randomize(rng);
        population.add_individual(individual);
    }
    Ok(())
}

// ============================================================================
// Selection
// ============================================================================

/// Removes `population_size / 2` individuals from the tail.
///
/// The population is sorted best-first after evaluation, so the survivors
/// are the better half. Never removes more than are present.
pub fn truncation_selection(population: &mut Population<'_>, _rng: &mut GaRng) -> Result<()> {
    let k = (population.model().population_size() / 2).min(population.size());
    population.remove_trailing(k)
}

// ============================================================================
// Crossover
// ============================================================================

/// Refills the population to its configured size with one-point crossover
/// children.
///
/// Parents are taken as adjacent pairs `(0, 1), (2, 3), ...` of the current
/// survivors, cycling when more children are needed. For each pair a cut
/// is drawn in `1..gene_count`; the first child takes the genes before the
/// cut from the first parent and the rest from the second, the second
/// child the reverse. A lone survivor is paired with itself. An empty
/// population is left empty.
pub fn one_point_crossover(population: &mut Population<'_>, rng: &mut GaRng) -> Result<()> {
    let model = population.model();
    let target = model.population_size();
    let parents = population.size();
    if parents == 0 {
        return Ok(());
    }

    let genes: Vec<&str> = model.gene_names().collect();
    let pairs = (parents / 2).max(1);
    let mut pair = 0;

    while population.size() < target {
        let a = (2 * pair) % parents;
        let b = (2 * pair + 1) % parents;
        pair = (pair + 1) % pairs;

        let cut = if genes.len() > 1 {
            rng.random_range(1..genes.len())
        } else {
            0
        };

        let (first, second) = {
            let p1 = population.get_individual(a)?;
            let p2 = population.get_individual(b)?;
            let mut c1 = population.spawn();
            let mut c2 = population.spawn();
            for (i, name) in genes.iter().enumerate() {
                let (left, right) = if i < cut { (p1, p2) } else { (p2, p1) };
                c1.copy_gene_from(left, name)?;
                c2.copy_gene_from(right, name)?;
            }
            (c1, c2)
        };

        population.add_individual(first);
        if population.size() < target {
            population.add_individual(second);
        }
    }
    Ok(())
}

// ============================================================================
// Mutation
// ============================================================================

/// Resets `mutation_count(size)` randomly chosen genes of randomly chosen
/// individuals to random legal alleles.
///
/// An individual may be hit more than once, and a reset may draw the value
/// it already had.
pub fn random_reset_mutation(population: &mut Population<'_>, rng: &mut GaRng) -> Result<()> {
    let model = population.model();
    let size = population.size();
    let gene_count = model.gene_count();
    if size == 0 || gene_count == 0 {
        return Ok(());
    }

    for _ in 0..model.config().mutation_count(size) {
        let index = rng.random_range(0..size);
        if let Some(name) = model.genes().name_at(rng.random_range(0..gene_count)) {
            population.get_individual_mut(index)?.randomize_gene(name, rng)?;
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
