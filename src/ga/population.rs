//! One generation of individuals.

use super::individual::Individual;
use super::model::Model;
use crate::error::{GaError, Result};
use std::fmt;

/// An ordered collection of individuals for one generation.
///
/// After [`compute_fitness`](Population::compute_fitness) the individuals are
/// sorted best-first by the model's [`Objective`](super::Objective)
/// (ascending fitness for minimization), so index 0 is the best and
/// [`remove_trailing`](Population::remove_trailing) drops the weakest.
#[derive(Clone)]
pub struct Population<'m> {
    model: &'m Model,
    generation: u32,
    individuals: Vec<Individual<'m>>,
    fitness: f64,
}

impl<'m> Population<'m> {
    /// Creates an empty population at `generation`.
    pub fn new(model: &'m Model, generation: u32) -> Self {
        Self {
            model,
            generation,
            individuals: Vec::with_capacity(model.population_size()),
            fitness: model.objective().worst(),
        }
    }

    /// The model this population is built against.
    pub fn model(&self) -> &'m Model {
        self.model
    }

    /// A fresh individual with every gene unset, built against the same model.
    pub fn spawn(&self) -> Individual<'m> {
        Individual::new(self.model)
    }

    /// Appends an individual. Duplicates are allowed.
    pub fn add_individual(&mut self, individual: Individual<'m>) {
        self.individuals.push(individual);
    }

    pub fn get_individual(&self, index: usize) -> Result<&Individual<'m>> {
        let len = self.individuals.len();
        self.individuals
            .get(index)
            .ok_or(GaError::IndexOutOfRange { index, len })
    }

    pub fn get_individual_mut(&mut self, index: usize) -> Result<&mut Individual<'m>> {
        let len = self.individuals.len();
        self.individuals
            .get_mut(index)
            .ok_or(GaError::IndexOutOfRange { index, len })
    }

    /// Drops the last `k` individuals, keeping the first `size() - k` in order.
    pub fn remove_trailing(&mut self, k: usize) -> Result<()> {
        let len = self.individuals.len();
        if k > len {
            return Err(GaError::IndexOutOfRange { index: k, len });
        }
        self.individuals.truncate(len - k);
        Ok(())
    }

    /// Evaluates every member, stable-sorts best-first and caches the best
    /// fitness as the population's fitness.
    ///
    /// Ties keep their relative order. An empty population caches the
    /// objective's worst value.
    pub fn compute_fitness(&mut self) -> Result<()> {
        for individual in &mut self.individuals {
            individual.compute_fitness()?;
        }
        let objective = self.model.objective();
        self.individuals
            .sort_by(|a, b| objective.compare(a.fitness(), b.fitness()));
        self.fitness = self
            .individuals
            .first()
            .map_or(objective.worst(), Individual::fitness);
        Ok(())
    }

    /// Best fitness as of the last [`compute_fitness`](Self::compute_fitness).
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// The first individual; the best one after `compute_fitness`.
    pub fn best(&self) -> Option<&Individual<'m>> {
        self.individuals.first()
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Advances the generation counter by one.
    pub fn increase_generation(&mut self) {
        self.generation += 1;
    }

    pub fn size(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn individuals(&self) -> &[Individual<'m>] {
        &self.individuals
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Individual<'m>> {
        self.individuals.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Individual<'m>> {
        self.individuals.iter_mut()
    }
}

impl fmt::Debug for Population<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Population")
            .field("generation", &self.generation)
            .field("fitness", &self.fitness)
            .field("individuals", &self.individuals)
            .finish()
    }
}

impl<'a, 'm> IntoIterator for &'a Population<'m> {
    type Item = &'a Individual<'m>;
    type IntoIter = std::slice::Iter<'a, Individual<'m>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::{GaConfig, Objective};
    use proptest::prelude::*;

    /// `v` in 0..10 scored as `v`, `tag` carried along to observe order.
    fn model(objective: Objective) -> Model {
        let mut model = Model::with_config(GaConfig::default().with_objective(objective));
        model.declare_gene("v", 0i32..10).unwrap();
        model.declare_gene("tag", 0usize..100).unwrap();
        model.register_fitness_strategy(|ind| Ok(f64::from(*ind.get_gene::<i32>("v")?)));
        model
    }

    fn populate<'m>(model: &'m Model, values: &[i32]) -> Population<'m> {
        let mut pop = Population::new(model, 0);
        for (tag, &v) in values.iter().enumerate() {
            let mut ind = pop.spawn();
            ind.set_gene("v", v).unwrap();
            ind.set_gene("tag", tag).unwrap();
            pop.add_individual(ind);
        }
        pop
    }

    fn tags(pop: &Population<'_>) -> Vec<usize> {
        pop.iter()
            .map(|ind| *ind.get_gene::<usize>("tag").unwrap())
            .collect()
    }

    #[test]
    fn test_compute_fitness_sorts_ascending() {
        let model = model(Objective::Minimize);
        let mut pop = populate(&model, &[5, 2, 9, 0, 7]);
        pop.compute_fitness().unwrap();

        let fitness: Vec<f64> = pop.iter().map(Individual::fitness).collect();
        assert_eq!(fitness, vec![0.0, 2.0, 5.0, 7.0, 9.0]);
        assert_eq!(pop.fitness(), 0.0);
        assert_eq!(pop.fitness(), pop.get_individual(0).unwrap().fitness());
    }

    #[test]
    fn test_compute_fitness_is_stable() {
        let model = model(Objective::Minimize);
        let mut pop = populate(&model, &[3, 1, 3, 1, 3]);
        pop.compute_fitness().unwrap();
        assert_eq!(tags(&pop), vec![1, 3, 0, 2, 4]);
    }

    #[test]
    fn test_signed_zero_ties_keep_order() {
        let mut model = Model::new();
        model.declare_gene("v", 0i32..10).unwrap();
        model.declare_gene("tag", 0usize..100).unwrap();
        // odd tags score -0.0, even tags 0.0
        model.register_fitness_strategy(|ind| {
            let tag = *ind.get_gene::<usize>("tag")?;
            Ok(if tag % 2 == 1 { -0.0 } else { 0.0 })
        });
        let mut pop = populate(&model, &[0, 0, 0, 0]);
        pop.compute_fitness().unwrap();
        assert_eq!(tags(&pop), vec![0, 1, 2, 3]);
        assert_eq!(pop.fitness(), 0.0);
    }

    #[test]
    fn test_maximize_sorts_descending() {
        let model = model(Objective::Maximize);
        let mut pop = populate(&model, &[5, 2, 9, 0, 7]);
        pop.compute_fitness().unwrap();
        assert_eq!(pop.fitness(), 9.0);
        assert_eq!(tags(&pop), vec![2, 4, 0, 1, 3]);
    }

    #[test]
    fn test_empty_population_fitness() {
        let model = model(Objective::Minimize);
        let mut pop = Population::new(&model, 0);
        pop.compute_fitness().unwrap();
        assert_eq!(pop.fitness(), f64::INFINITY);
        assert!(pop.best().is_none());
    }

    #[test]
    fn test_fitness_error_propagates() {
        let model = model(Objective::Minimize);
        let mut pop = populate(&model, &[1, 2]);
        pop.add_individual(pop.spawn());
        assert_eq!(
            pop.compute_fitness(),
            Err(GaError::UnsetGene { gene: "v".into() })
        );
    }

    #[test]
    fn test_get_individual_out_of_range() {
        let model = model(Objective::Minimize);
        let mut pop = populate(&model, &[1, 2, 3]);
        assert!(pop.get_individual(2).is_ok());
        assert_eq!(
            pop.get_individual(3).unwrap_err(),
            GaError::IndexOutOfRange { index: 3, len: 3 }
        );
        assert!(pop.get_individual_mut(3).is_err());
    }

    #[test]
    fn test_remove_trailing() {
        let model = model(Objective::Minimize);
        let mut pop = populate(&model, &[4, 3, 2, 1]);
        pop.remove_trailing(0).unwrap();
        assert_eq!(pop.size(), 4);
        pop.remove_trailing(3).unwrap();
        assert_eq!(tags(&pop), vec![0]);
        assert_eq!(
            pop.remove_trailing(2),
            Err(GaError::IndexOutOfRange { index: 2, len: 1 })
        );
        assert_eq!(pop.size(), 1);
        pop.remove_trailing(1).unwrap();
        assert!(pop.is_empty());
    }

    #[test]
    fn test_duplicates_allowed() {
        let model = model(Objective::Minimize);
        let mut pop = populate(&model, &[1]);
        let clone = pop.get_individual(0).unwrap().clone();
        pop.add_individual(clone);
        assert_eq!(pop.size(), 2);
    }

    #[test]
    fn test_generation_counter() {
        let model = model(Objective::Minimize);
        let mut pop = Population::new(&model, 3);
        for _ in 0..5 {
            pop.increase_generation();
        }
        assert_eq!(pop.generation(), 8);
        pop.compute_fitness().unwrap();
        pop.remove_trailing(0).unwrap();
        assert_eq!(pop.generation(), 8);
    }

    proptest! {
        #[test]
        fn prop_sorted_and_aggregate(values in proptest::collection::vec(0i32..10, 1..40)) {
            let model = model(Objective::Minimize);
            let mut pop = populate(&model, &values);
            pop.compute_fitness().unwrap();
            for pair in pop.individuals().windows(2) {
                prop_assert!(pair[0].fitness() <= pair[1].fitness());
            }
            prop_assert_eq!(pop.fitness(), pop.get_individual(0).unwrap().fitness());
            let min = values.iter().copied().min().unwrap();
            prop_assert_eq!(pop.fitness(), f64::from(min));
        }

        #[test]
        fn prop_truncation_keeps_prefix(
            values in proptest::collection::vec(0i32..10, 0..30),
            k in 0usize..35,
        ) {
            let model = model(Objective::Minimize);
            let mut pop = populate(&model, &values);
            let before = tags(&pop);
            let result = pop.remove_trailing(k);
            if k > values.len() {
                prop_assert!(result.is_err());
                prop_assert_eq!(tags(&pop), before);
            } else {
                prop_assert!(result.is_ok());
                prop_assert_eq!(tags(&pop), before[..values.len() - k].to_vec());
            }
        }

        #[test]
        fn prop_generation_monotone(start in 0u32..1000, n in 0u32..200) {
            let model = model(Objective::Minimize);
            let mut pop = Population::new(&model, start);
            for _ in 0..n {
                pop.increase_generation();
            }
            prop_assert_eq!(pop.generation(), start + n);
        }
    }
}
