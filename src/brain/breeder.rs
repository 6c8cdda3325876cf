//! Population source for training.
//!
//! The training loop treats reproduction as a black box: it asks the breeder
//! for the current generation, reports one fitness value per controller, and
//! asks for the next generation. `ElitistBreeder` is a plain
//! mutation-only implementation so the harness can train without an external
//! NEAT library.

use super::network::FeedForwardNetwork;
use rand::{Rng, RngCore};

pub trait Breeder {
    /// Controllers to evaluate this generation, in evaluation order.
    fn population(&self) -> &[FeedForwardNetwork];

    /// Replace the population using one fitness value per controller.
    fn advance(&mut self, fitness: &[f64], rng: &mut dyn RngCore);
}

/// Keep the top `elite` controllers unchanged and refill the population with
/// mutated copies of them.
#[derive(Debug, Clone)]
pub struct ElitistBreeder {
    population: Vec<FeedForwardNetwork>,
    elite: usize,
    mutation_rate: f64,
    mutation_power: f64,
}

impl ElitistBreeder {
    pub fn new<R: Rng + ?Sized>(
        size: usize,
        hidden: &[usize],
        elite: usize,
        mutation_rate: f64,
        mutation_power: f64,
        rng: &mut R,
    ) -> Self {
        Self {
            population: (0..size)
                .map(|_| FeedForwardNetwork::random(hidden, rng))
                .collect(),
            elite: elite.clamp(1, size.max(1)),
            mutation_rate,
            mutation_power,
        }
    }

    fn mutate(&self, network: &mut FeedForwardNetwork, rng: &mut dyn RngCore) {
        for param in network.parameters_mut() {
            if rng.gen_bool(self.mutation_rate) {
                *param += rng.gen_range(-self.mutation_power..=self.mutation_power);
            }
        }
    }
}

impl Breeder for ElitistBreeder {
    fn population(&self) -> &[FeedForwardNetwork] {
        &self.population
    }

    fn advance(&mut self, fitness: &[f64], rng: &mut dyn RngCore) {
        debug_assert_eq!(fitness.len(), self.population.len());
        if self.population.is_empty() {
            return;
        }

        let mut ranked: Vec<usize> = (0..self.population.len()).collect();
        ranked.sort_by(|&a, &b| {
            let fa = fitness.get(a).copied().unwrap_or(f64::NEG_INFINITY);
            let fb = fitness.get(b).copied().unwrap_or(f64::NEG_INFINITY);
            fb.total_cmp(&fa)
        });

        let elites: Vec<FeedForwardNetwork> = ranked
            .iter()
            .take(self.elite)
            .map(|&i| self.population[i].clone())
            .collect();

        let mut next = elites.clone();
        while next.len() < self.population.len() {
            let parent = &elites[rng.gen_range(0..elites.len())];
            let mut child = parent.clone();
            self.mutate(&mut child, rng);
            next.push(child);
        }
        self.population = next;
    }
}
