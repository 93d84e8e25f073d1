use super::individual::Individual;
use rand::seq::SliceRandom;
use rand::Rng;

/// N-way crossover.
///
/// Every parent but the last contributes `floor(L / N)` of its genes, drawn
/// without replacement; the last parent fills the child up to exactly `L`.
/// Genes are copied unchanged.
///
/// # Panics
///
/// With fewer than two parents or parents of different genome length.
pub fn breed<R: Rng + ?Sized>(parents: &[&Individual], rng: &mut R) -> Individual {
    assert!(parents.len() >= 2, "crossover needs at least 2 parents, got {}", parents.len());
    let length = parents[0].len();
    assert!(
        parents.iter().all(|parent| parent.len() == length),
        "all parents must share genome length {}",
        length
    );

    let genes_per_parent = length / parents.len();
    let mut child = Vec::with_capacity(length);
    for (i, parent) in parents.iter().enumerate() {
        let count = if i + 1 < parents.len() {
            genes_per_parent
        } else {
            length - child.len()
        };
        child.extend(parent.genome().choose_multiple(rng, count).copied());
    }
    Individual::new(child)
}

/// Fitness used for ordering. Unevaluated individuals and NaN scores count
/// as negative infinity.
pub fn ranking_fitness(individual: &Individual) -> f64 {
    match individual.fitness() {
        Some(fitness) if !fitness.is_nan() => fitness,
        _ => f64::NEG_INFINITY,
    }
}

/// Stable descending sort by cached fitness. Unevaluated individuals and
/// NaN scores sink to the end.
pub fn rank(population: &mut [Individual]) {
    population.sort_by(|a, b| ranking_fitness(b).total_cmp(&ranking_fitness(a)));
}

/// Keep the first `count` individuals of a ranked population.
pub fn select_survivors(mut ranked: Vec<Individual>, count: usize) -> Vec<Individual> {
    ranked.truncate(count);
    ranked
}

/// Breed children from random parent groups until `target` children exist.
pub fn breed_offspring<R: Rng + ?Sized>(
    survivors: &[Individual],
    max_parents: usize,
    target: usize,
    rng: &mut R,
) -> Vec<Individual> {
    let parent_count = max_parents.min(survivors.len());
    let mut offspring = Vec::with_capacity(target);
    while offspring.len() < target {
        let parents: Vec<&Individual> = survivors.choose_multiple(rng, parent_count).collect();
        offspring.push(breed(&parents, rng));
    }
    offspring
}

/// Seed for an alternative breeding phase: `(len - 1) / 2` survivors drawn
/// without replacement from all but the first, best ranked one.
pub fn alternative_seed<R: Rng + ?Sized>(survivors: &[Individual], rng: &mut R) -> Vec<Individual> {
    let rest = survivors.get(1..).unwrap_or_default();
    let count = survivors.len().saturating_sub(1) / 2;
    rest.choose_multiple(rng, count).cloned().collect()
}
