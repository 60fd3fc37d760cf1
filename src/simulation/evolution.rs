//! Evolution of car controllers between generations.
//!
//! One call to [`EvolutionEngine::evolve`] turns the finished generation into
//! the next one: fitness-proportional parent selection, one elite carried over,
//! one crossover child per unordered parent pair, then mutated clones.

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use tracing::{debug, warn};

use super::brain::Brain;
use super::car::{Car, Origin};
use super::params::Params;

/// Genetic operators configured from the simulation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionEngine {
    /// Parents sampled per generation (with replacement).
    pub parent_count: usize,
    /// Mutated clones appended per generation.
    pub mutation_count: usize,
    /// Mutation amount for weight matrices.
    pub weight_mutation: f32,
    /// Mutation amount for bias vectors.
    pub bias_mutation: f32,
    /// Lower bound on the per-row standard deviation.
    pub std_floor: f32,
}

impl EvolutionEngine {
    /// Creates an engine from the simulation parameters.
    pub fn new(params: &Params) -> Self {
        Self {
            parent_count: params.parent_count,
            mutation_count: params.mutation_count,
            weight_mutation: params.weight_mutation,
            bias_mutation: params.bias_mutation,
            std_floor: params.mutation_std_floor,
        }
    }

    /// Produces the next generation from a finished one.
    ///
    /// The result is `[elite, parents.., offspring.., mutants..]`, every car
    /// reset to its start pose. The input is left untouched. An empty input
    /// yields an empty generation.
    pub fn evolve<R: Rng + ?Sized>(&self, cars: &[Car], rng: &mut R) -> Vec<Car> {
        let ranked = rank_by_fitness(cars);
        let Some(&best) = ranked.last() else {
            warn!("cannot evolve an empty population");
            return Vec::new();
        };

        let mut elite = best.clone();
        elite.origin = Origin::Elite;

        let parents: Vec<Car> = self
            .select_parents(&ranked, rng)
            .into_iter()
            .map(|i| {
                let mut parent = ranked[i].clone();
                parent.origin = Origin::Parent;
                parent
            })
            .collect();

        let offspring = self.breed(&parents, rng);

        let mut next = Vec::with_capacity(1 + parents.len() + offspring.len() + self.mutation_count);
        next.push(elite);
        next.extend(parents);
        next.extend(offspring);

        let assembled = next.len();
        for _ in 0..self.mutation_count {
            let source = &next[rng.random_range(0..assembled)];
            let mutant = self.mutate(source, rng);
            next.push(mutant);
        }

        for car in &mut next {
            car.reset();
        }

        debug!(size = next.len(), "next generation assembled");
        next
    }

    /// Samples `parent_count` indices into `ranked`, with replacement, with
    /// probability proportional to distance traveled.
    ///
    /// Falls back to uniform sampling when no car has positive fitness.
    pub fn select_parents<R: Rng + ?Sized>(&self, ranked: &[&Car], rng: &mut R) -> Vec<usize> {
        if ranked.is_empty() {
            return Vec::new();
        }
        match WeightedIndex::new(ranked.iter().map(|car| car.distance_traveled())) {
            Ok(dist) => (0..self.parent_count).map(|_| dist.sample(rng)).collect(),
            Err(err) => {
                warn!(%err, "fitness distribution unusable, selecting parents uniformly");
                (0..self.parent_count)
                    .map(|_| rng.random_range(0..ranked.len()))
                    .collect()
            }
        }
    }

    /// Creates one crossover child for every unordered pair of parents.
    pub fn breed<R: Rng + ?Sized>(&self, parents: &[Car], rng: &mut R) -> Vec<Car> {
        let mut offspring = Vec::with_capacity(parents.len() * parents.len().saturating_sub(1) / 2);
        for (a, first) in parents.iter().enumerate() {
            for second in &parents[a + 1..] {
                let brain = Brain::crossover(&first.brain, &second.brain, rng);
                offspring.push(Car::new(first.start(), brain, Origin::Offspring));
            }
        }
        offspring
    }

    /// Returns a mutated copy of `car`; the original is left untouched.
    pub fn mutate<R: Rng + ?Sized>(&self, car: &Car, rng: &mut R) -> Car {
        let mut brain = car.brain.clone();
        brain.mutate(self.weight_mutation, self.bias_mutation, self.std_floor, rng);
        Car::new(car.start(), brain, Origin::Mutant)
    }
}

/// Sorts cars ascending by distance traveled; the best car comes last.
pub fn rank_by_fitness(cars: &[Car]) -> Vec<&Car> {
    let mut ranked: Vec<&Car> = cars.iter().collect();
    ranked.sort_by(|a, b| a.distance_traveled().total_cmp(&b.distance_traveled()));
    ranked
}
