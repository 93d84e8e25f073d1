use crate::config::{ConfigSection, EvolutionConfig, LayoutConfig};
use crate::engines::evaluation::FitnessFunction;
use crate::engines::generation::{
    genome::Genome,
    individual::Individual,
    operators::{alternative_seed, breed_offspring, rank, ranking_fitness, select_survivors},
};
use crate::error::{GlobeError, Result};
use crate::types::{GenerationStats, RunMode, RunSummary, Termination};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Mutation rate growth per stagnant generation.
pub const MUTATION_RATE_GROWTH: f64 = 1.05;
/// Consecutive stagnant generations after which the run gives up.
pub const STAGNATION_LIMIT: usize = 10;

pub trait ProgressCallback {
    fn on_generation_complete(&mut self, stats: &GenerationStats);
    fn on_stagnation(&mut self, _generation: usize, _stagnation_count: usize) {}
    /// `seed` holds the current survivors carried into the phase, empty when
    /// it starts from scratch.
    fn on_alternative_breed_start(&mut self, _generation: usize, _seed: &[Individual]) {}
    fn on_alternative_breed_complete(&mut self, _generation: usize, _survivors: usize) {}
}

/// Generational search with elitism, stagnation detection and
/// alternative breeding.
///
/// Stagnation means the worst survivor's fitness equals the previous
/// generation's. Each stagnant generation raises the mutation rate by 5%;
/// the first three also breed an extra sub-population whose survivors join
/// the current ones. Any change of the worst survivor resets both the
/// stagnation counter and the mutation rate to their starting values.
pub struct EvolutionEngine<F: FitnessFunction> {
    config: EvolutionConfig,
    layout: LayoutConfig,
    fitness: F,
    rng: StdRng,
    mutation_rate: f64,
    generation: usize,
    winner: Option<(Genome, f64)>,
    offspring_bred: usize,
    cancelled: Arc<AtomicBool>,
}

impl<F: FitnessFunction> EvolutionEngine<F> {
    /// Fails when either configuration does not validate.
    pub fn new(config: EvolutionConfig, layout: LayoutConfig, fitness: F) -> Result<Self> {
        config.validate()?;
        layout.validate()?;
        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            mutation_rate: config.mutation_rate,
            config,
            layout,
            fitness,
            rng,
            generation: 0,
            winner: None,
            offspring_bred: 0,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Raising the flag stops the run after the current generation.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Best genome of the last completed generation.
    pub fn winner(&self) -> Option<&Genome> {
        self.winner.as_ref().map(|(genome, _)| genome)
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    pub fn fitness_function(&self) -> &F {
        &self.fitness
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Run the evolution process
    pub fn run<C: ProgressCallback>(&mut self, callback: &mut C) -> Result<RunSummary> {
        let size = self.config.size_of_generation;
        let mut population = self.random_population(size);
        self.winner = population
            .first()
            .map(|individual| (individual.genome().clone(), f64::NEG_INFINITY));
        self.generation = 0;
        self.offspring_bred = 0;
        self.mutation_rate = self.config.mutation_rate;

        let mut baseline: Option<f64> = None;
        let mut stagnation_count = 0;

        info!(
            "Starting evolution: {} individuals x {} genes, {} generations",
            size, self.config.size_of_genom, self.config.tournament_size
        );

        let termination = loop {
            let started = Instant::now();
            self.evaluate_population(&mut population, RunMode::Normal)?;
            rank(&mut population);
            if let Some(best) = population.first() {
                self.winner = Some((best.genome().clone(), ranking_fitness(best)));
            }

            let stats = self.collect_stats(&population, RunMode::Normal, started);
            let mut survivors = select_survivors(population, self.config.num_survivors());
            callback.on_generation_complete(&stats);

            if self.generation >= self.config.tournament_size {
                break Termination::GenerationBudget;
            }
            if self.is_cancelled() {
                info!("Cancelled after generation {}", self.generation);
                break Termination::Cancelled;
            }

            let worst = stats.worst_survivor;
            if baseline == Some(worst) {
                stagnation_count += 1;
                self.mutation_rate *= MUTATION_RATE_GROWTH;
                callback.on_stagnation(self.generation, stagnation_count);
                if stagnation_count >= STAGNATION_LIMIT {
                    warn!("Terminating after {} stagnant generations", stagnation_count);
                    break Termination::Stagnation;
                }
                if stagnation_count <= 3 {
                    warn!(
                        "Stagnation ({}) detected, developing a new breed to mix in",
                        stagnation_count
                    );
                    let seed = if stagnation_count == 1 {
                        Vec::new()
                    } else {
                        alternative_seed(&survivors, &mut self.rng)
                    };
                    callback.on_alternative_breed_start(self.generation, &seed);
                    let target = stats.best_survivor;
                    let extra = self.alternative_breed(target, seed, callback)?;
                    callback.on_alternative_breed_complete(self.generation, extra.len());
                    survivors.extend(extra);
                }
            } else {
                baseline = Some(worst);
                stagnation_count = 0;
                self.mutation_rate = self.config.mutation_rate;
            }

            population = self.next_generation(survivors);
            self.generation += 1;
        };

        let (winner, best_fitness) = self
            .winner
            .clone()
            .unwrap_or_else(|| (Genome::new(), f64::NEG_INFINITY));

        Ok(RunSummary {
            winner,
            best_fitness,
            generations: self.generation,
            offspring_bred: self.offspring_bred,
            termination,
        })
    }

    /// Nested search from `seed` topped up with random individuals. Stops at
    /// the generation budget, once its best reaches `target_fitness`, or when
    /// its own worst survivor stagnates. Returns its survivors.
    fn alternative_breed<C: ProgressCallback>(
        &mut self,
        target_fitness: f64,
        mut population: Vec<Individual>,
        callback: &mut C,
    ) -> Result<Vec<Individual>> {
        let missing = self.config.size_of_generation.saturating_sub(population.len());
        population.extend(self.random_population(missing));
        let mut last_worst: Option<f64> = None;

        loop {
            self.generation += 1;
            let started = Instant::now();
            self.evaluate_population(&mut population, RunMode::Alternative)?;
            rank(&mut population);

            let stats = self.collect_stats(&population, RunMode::Alternative, started);
            let survivors = select_survivors(population, self.config.num_survivors());
            callback.on_generation_complete(&stats);

            if self.generation >= self.config.tournament_size
                || stats.best_survivor >= target_fitness
                || last_worst == Some(stats.worst_survivor)
                || self.is_cancelled()
            {
                info!("Ending alternative breeding phase at generation {}", self.generation);
                return Ok(survivors);
            }
            last_worst = Some(stats.worst_survivor);

            population = self.next_generation(survivors);
        }
    }

    /// Breed, mutate the offspring, then append the unchanged survivors.
    fn next_generation(&mut self, survivors: Vec<Individual>) -> Vec<Individual> {
        let missing = self.config.size_of_generation.saturating_sub(survivors.len());
        let mut offspring = breed_offspring(&survivors, self.config.max_parents, missing, &mut self.rng);
        self.offspring_bred += offspring.len();

        if !offspring.is_empty() {
            let mutations = (offspring.len() as f64 * self.mutation_rate) as usize;
            for _ in 0..mutations {
                let index = self.rng.gen_range(0..offspring.len());
                offspring[index].mutate(1, &self.layout, &mut self.rng);
            }
        }

        offspring.extend(survivors);
        offspring
    }

    fn evaluate_population(&mut self, population: &mut [Individual], mode: RunMode) -> Result<()> {
        let generation = self.generation;
        let fitness = &mut self.fitness;
        for individual in population.iter_mut() {
            individual
                .fitness_with(|genome| fitness.evaluate(genome))
                .map_err(|e| GlobeError::Evaluation {
                    generation,
                    mode,
                    source: Box::new(e),
                })?;
        }
        Ok(())
    }

    fn random_population(&mut self, count: usize) -> Vec<Individual> {
        (0..count)
            .map(|_| Individual::random(self.config.size_of_genom, &self.layout, &mut self.rng))
            .collect()
    }

    fn collect_stats(&self, ranked: &[Individual], mode: RunMode, started: Instant) -> GenerationStats {
        let scores: Vec<f64> = ranked
            .iter()
            .map(ranking_fitness)
            .collect();
        let survivor_count = self.config.num_survivors().min(scores.len());
        let mean = |values: &[f64]| {
            if values.is_empty() {
                0.0
            } else {
                values.iter().sum::<f64>() / values.len() as f64
            }
        };

        GenerationStats {
            generation: self.generation,
            mode,
            best_survivor: scores.first().copied().unwrap_or(f64::NEG_INFINITY),
            worst_survivor: survivor_count
                .checked_sub(1)
                .map(|last| scores[last])
                .unwrap_or(f64::NEG_INFINITY),
            mean_survivors: mean(&scores[..survivor_count]),
            mean_population: mean(&scores),
            population_size: scores.len(),
            survivor_count,
            duration: started.elapsed(),
        }
    }
}
