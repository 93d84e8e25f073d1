use super::gene::{Gene, GeneField};
use super::genome::Genome;
use crate::config::LayoutConfig;
use crate::error::Result;
use rand::Rng;

/// Probability that a mutation replaces a whole gene instead of nudging one
/// of its fields.
pub const REPLACE_PROBABILITY: f64 = 0.1;

/// A genome plus its lazily computed fitness.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    genome: Genome,
    fitness: Option<f64>,
}

impl Individual {
    pub fn new(genome: Genome) -> Self {
        Self { genome, fitness: None }
    }

    /// `size` random genes, sorted by (x, y).
    pub fn random<R: Rng + ?Sized>(size: usize, layout: &LayoutConfig, rng: &mut R) -> Self {
        let mut genome: Genome = (0..size).map(|_| Gene::random(layout, rng)).collect();
        genome.sort_by_key(|gene| (gene.x, gene.y));
        Self::new(genome)
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    pub fn into_genome(self) -> Genome {
        self.genome
    }

    pub fn len(&self) -> usize {
        self.genome.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genome.is_empty()
    }

    /// Cached fitness, `None` until evaluated or after a mutation.
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    /// Return the cached fitness, evaluating `fitness_fn` only on a cache miss.
    ///
    /// A failed evaluation leaves the cache empty.
    pub fn fitness_with<F>(&mut self, fitness_fn: F) -> Result<f64>
    where
        F: FnOnce(&Genome) -> Result<f64>,
    {
        if let Some(fitness) = self.fitness {
            return Ok(fitness);
        }
        let fitness = fitness_fn(&self.genome)?;
        self.fitness = Some(fitness);
        Ok(fitness)
    }

    /// Apply `count` independent point mutations. Always drops the cached
    /// fitness.
    pub fn mutate<R: Rng + ?Sized>(&mut self, count: usize, layout: &LayoutConfig, rng: &mut R) {
        assert!(!self.genome.is_empty(), "cannot mutate an empty genome");
        self.fitness = None;
        for _ in 0..count {
            let index = rng.gen_range(0..self.genome.len());
            if rng.gen::<f64>() < REPLACE_PROBABILITY {
                self.genome[index] = Gene::random(layout, rng);
            } else {
                let field = GeneField::random(rng);
                self.genome[index].perturb(field, layout, rng);
            }
        }
    }
}
