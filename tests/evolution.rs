use globeclock::config::{EvolutionConfig, LayoutConfig};
use globeclock::engines::generation::{
    EvolutionEngine, Gene, Genome, Individual, ProgressCallback, SilentProgressCallback,
};
use globeclock::error::{GlobeError, Result};
use globeclock::types::{GenerationStats, RunMode, Termination};
use std::cell::{Cell, RefCell};
use globeclock::data::{load_genome, save_genome};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn config(size: usize, survivor_rate: f64, tournament_size: usize) -> EvolutionConfig {
    EvolutionConfig {
        size_of_genom: 12,
        size_of_generation: size,
        survivor_rate,
        mutation_rate: 0.5,
        max_parents: 3,
        tournament_size,
        random_seed: Some(42),
    }
}

/// Deterministic score: rewards high digits and headings near zero.
fn digit_score(genome: &Genome) -> f64 {
    genome
        .iter()
        .map(|gene: &Gene| gene.digit as f64 - (gene.heading as f64 / 360.0))
        .sum::<f64>()
        / genome.len() as f64
}

/// Records every report it receives.
#[derive(Default)]
struct RecordingCallback {
    generations: Vec<(usize, RunMode, f64)>,
    stagnations: Vec<usize>,
    seed_sizes: Vec<usize>,
}

impl ProgressCallback for RecordingCallback {
    fn on_generation_complete(&mut self, stats: &GenerationStats) {
        self.generations.push((stats.generation, stats.mode, stats.best_survivor));
    }

    fn on_stagnation(&mut self, _generation: usize, stagnation_count: usize) {
        self.stagnations.push(stagnation_count);
    }

    fn on_alternative_breed_start(&mut self, _generation: usize, seed: &[Individual]) {
        self.seed_sizes.push(seed.len());
    }
}

#[test]
fn test_zero_budget_returns_best_of_initial_population() {
    let calls = Cell::new(0);
    let fitness = |genome: &Genome| -> Result<f64> {
        calls.set(calls.get() + 1);
        Ok(digit_score(genome))
    };
    let mut engine = EvolutionEngine::new(config(20, 0.5, 0), LayoutConfig::default(), fitness).unwrap();
    let mut callback = RecordingCallback::default();

    let summary = engine.run(&mut callback).unwrap();

    assert_eq!(summary.termination, Termination::GenerationBudget);
    assert_eq!(summary.generations, 0);
    assert_eq!(summary.offspring_bred, 0);
    assert_eq!(calls.get(), 20);
    assert_eq!(callback.generations.len(), 1);
    assert_eq!(summary.winner.len(), 12);
    assert_eq!(summary.best_fitness, digit_score(&summary.winner));
    assert_eq!(callback.generations[0].2, summary.best_fitness);
}

#[test]
fn test_full_survival_breeds_nothing() {
    let calls = Cell::new(0);
    let fitness = |genome: &Genome| -> Result<f64> {
        calls.set(calls.get() + 1);
        Ok(digit_score(genome))
    };
    let mut engine = EvolutionEngine::new(config(8, 1.0, 1), LayoutConfig::default(), fitness).unwrap();

    let summary = engine.run(&mut SilentProgressCallback).unwrap();

    assert_eq!(summary.generations, 1);
    assert_eq!(summary.offspring_bred, 0);
    // the second generation reuses every cached fitness
    assert_eq!(calls.get(), 8);
}

#[test]
fn test_best_fitness_never_decreases_between_normal_generations() {
    let fitness = |genome: &Genome| -> Result<f64> { Ok(digit_score(genome)) };
    let mut engine = EvolutionEngine::new(config(30, 0.3, 25), LayoutConfig::default(), fitness).unwrap();
    let mut callback = RecordingCallback::default();

    let summary = engine.run(&mut callback).unwrap();

    let normal: Vec<f64> = callback
        .generations
        .iter()
        .filter(|(_, mode, _)| *mode == RunMode::Normal)
        .map(|(_, _, best)| *best)
        .collect();
    assert!(normal.windows(2).all(|pair| pair[1] >= pair[0]), "{:?}", normal);
    assert_eq!(summary.best_fitness, *normal.last().unwrap());
    assert!(summary.offspring_bred > 0);
    assert!(summary.winner.iter().all(|gene| gene.is_within(&LayoutConfig::default())));
}

#[test]
fn test_constant_fitness_stagnates_and_terminates() {
    let fitness = |_: &Genome| -> Result<f64> { Ok(1.0) };
    let mut engine = EvolutionEngine::new(config(10, 0.5, 1000), LayoutConfig::default(), fitness).unwrap();
    let mut callback = RecordingCallback::default();

    let summary = engine.run(&mut callback).unwrap();

    assert_eq!(summary.termination, Termination::Stagnation);
    assert_eq!(callback.stagnations, (1..=10).collect::<Vec<_>>());
    // three alternative breeding phases of one generation each
    let alternative = callback
        .generations
        .iter()
        .filter(|(_, mode, _)| *mode == RunMode::Alternative)
        .count();
    assert_eq!(alternative, 3);
    // fresh start, then half of the four non-best survivors twice
    assert_eq!(callback.seed_sizes, vec![0, 2, 2]);
    assert_eq!(summary.generations, 13);
    let expected_rate = 0.5 * 1.05f64.powi(10);
    assert!((engine.mutation_rate() - expected_rate).abs() < 1e-12);
}

#[test]
fn test_alternative_generations_count_against_budget() {
    let fitness = |_: &Genome| -> Result<f64> { Ok(1.0) };
    let mut engine = EvolutionEngine::new(config(10, 0.5, 4), LayoutConfig::default(), fitness).unwrap();
    let mut callback = RecordingCallback::default();

    let summary = engine.run(&mut callback).unwrap();

    assert_eq!(summary.termination, Termination::GenerationBudget);
    let numbers: Vec<usize> = callback.generations.iter().map(|(g, _, _)| *g).collect();
    assert_eq!(numbers, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(callback.generations[2].1, RunMode::Alternative);
    assert_eq!(callback.generations[4].1, RunMode::Alternative);
    assert_eq!(summary.generations, 5);
}

#[test]
fn test_same_seed_gives_same_winner() {
    let run = || {
        let fitness = |genome: &Genome| -> Result<f64> { Ok(digit_score(genome)) };
        let mut engine = EvolutionEngine::new(config(16, 0.5, 6), LayoutConfig::default(), fitness).unwrap();
        engine.run(&mut SilentProgressCallback).unwrap()
    };

    let first = run();
    let second = run();
    assert_eq!(first.winner, second.winner);
    assert_eq!(first.best_fitness, second.best_fitness);
}

#[test]
fn test_evaluation_failure_reports_generation() {
    let calls = Cell::new(0);
    let fitness = |genome: &Genome| -> Result<f64> {
        calls.set(calls.get() + 1);
        if calls.get() > 10 {
            return Err(GlobeError::Configuration("renderer gone".to_string()));
        }
        Ok(digit_score(genome))
    };
    let mut engine = EvolutionEngine::new(config(10, 0.5, 50), LayoutConfig::default(), fitness).unwrap();

    let err = engine.run(&mut SilentProgressCallback).unwrap_err();

    assert!(
        matches!(err, GlobeError::Evaluation { generation: 1, mode: RunMode::Normal, .. }),
        "{:?}",
        err
    );
    // the first generation's best is still available
    assert_eq!(engine.winner().map(|w| w.len()), Some(12));
}

#[test]
fn test_cancel_stops_after_current_generation() {
    let fitness = |genome: &Genome| -> Result<f64> { Ok(digit_score(genome)) };
    let mut engine = EvolutionEngine::new(config(10, 0.5, 50), LayoutConfig::default(), fitness).unwrap();
    engine.cancel_handle().store(true, Ordering::Relaxed);

    let summary = engine.run(&mut SilentProgressCallback).unwrap();

    assert_eq!(summary.termination, Termination::Cancelled);
    assert_eq!(summary.generations, 0);
    assert_eq!(summary.winner.len(), 12);
}

/// Remembers the genomes carried into each alternative breeding phase.
#[derive(Default)]
struct SeedCallback {
    seeds: Vec<Vec<Genome>>,
}

impl ProgressCallback for SeedCallback {
    fn on_generation_complete(&mut self, _stats: &GenerationStats) {}

    fn on_alternative_breed_start(&mut self, _generation: usize, seed: &[Individual]) {
        self.seeds.push(seed.iter().map(|i| i.genome().clone()).collect());
    }
}

#[test]
fn test_seeded_alternative_breeding_leaves_out_the_best() {
    // the first genome evaluated stays on top, everything else ties
    let leader: RefCell<Option<Genome>> = RefCell::new(None);
    let fitness = |genome: &Genome| -> Result<f64> {
        let mut leader = leader.borrow_mut();
        match leader.as_ref() {
            None => {
                *leader = Some(genome.clone());
                Ok(1.0)
            }
            Some(best) if best == genome => Ok(1.0),
            Some(_) => Ok(0.25),
        }
    };
    let mut engine = EvolutionEngine::new(config(12, 0.75, 1000), LayoutConfig::default(), fitness).unwrap();
    let mut callback = SeedCallback::default();

    engine.run(&mut callback).unwrap();

    let best = leader.borrow().clone().unwrap();
    assert_eq!(engine.winner(), Some(&best));
    assert_eq!(callback.seeds.len(), 3);
    assert!(callback.seeds[0].is_empty());
    for seed in &callback.seeds[1..] {
        // 9 survivors: half of the 8 below the best
        assert_eq!(seed.len(), 4);
        assert!(!seed.contains(&best));
    }
}

#[test]
fn test_nan_fitness_ranks_last_instead_of_aborting() {
    let fitness = |genome: &Genome| -> Result<f64> {
        if genome.iter().filter(|gene| gene.digit == 3).count() > 1 {
            Ok(f64::NAN)
        } else {
            Ok(digit_score(genome))
        }
    };
    let mut engine = EvolutionEngine::new(config(20, 0.5, 10), LayoutConfig::default(), fitness).unwrap();

    let summary = engine.run(&mut SilentProgressCallback).unwrap();

    assert_eq!(summary.winner.len(), 12);
    assert!(!summary.best_fitness.is_nan());
}

#[test]
fn test_invalid_configuration_is_rejected_on_construction() {
    let fitness = |genome: &Genome| -> Result<f64> { Ok(digit_score(genome)) };
    let result = EvolutionEngine::new(config(10, 0.1, 5), LayoutConfig::default(), fitness);
    assert!(matches!(result, Err(GlobeError::Configuration(_))));

    let layout = LayoutConfig { quantization: 7, ..LayoutConfig::default() };
    let result = EvolutionEngine::new(config(10, 0.5, 5), layout, fitness);
    assert!(matches!(result, Err(GlobeError::Configuration(_))));
}

/// Raises the cancel flag once a given generation has completed, the way
/// an interrupt handler would from another thread.
struct InterruptAt {
    generation: usize,
    flag: Arc<AtomicBool>,
    raised_at: Option<usize>,
}

impl ProgressCallback for InterruptAt {
    fn on_generation_complete(&mut self, stats: &GenerationStats) {
        if stats.mode == RunMode::Normal && stats.generation >= self.generation && self.raised_at.is_none() {
            self.flag.store(true, Ordering::Relaxed);
            self.raised_at = Some(stats.generation);
        }
    }
}

#[test]
fn test_interrupted_run_still_yields_a_savable_winner() {
    let fitness = |genome: &Genome| -> Result<f64> { Ok(digit_score(genome)) };
    let mut engine = EvolutionEngine::new(config(10, 0.5, 5000), LayoutConfig::default(), fitness).unwrap();
    let mut callback = InterruptAt {
        generation: 2,
        flag: engine.cancel_handle(),
        raised_at: None,
    };

    let summary = engine.run(&mut callback).unwrap();

    assert_eq!(summary.termination, Termination::Cancelled);
    // the generation that saw the flag raised is the last one
    assert_eq!(Some(summary.generations), callback.raised_at);
    let path = std::env::temp_dir().join(format!("globeclock-interrupted-{}.json", std::process::id()));
    save_genome(&path, &summary.winner).unwrap();
    let loaded = load_genome(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(loaded, summary.winner);
}
