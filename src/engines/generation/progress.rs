use super::evolution_engine::ProgressCallback;
use crate::types::{GenerationStats, RunMode};

/// Prints one table row per generation, repeating the header every
/// `header_interval` generations.
pub struct ConsoleProgressCallback {
    header_interval: usize,
}

impl ConsoleProgressCallback {
    pub fn new() -> Self {
        Self { header_interval: 25 }
    }
}

impl Default for ConsoleProgressCallback {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_complete(&mut self, stats: &GenerationStats) {
        if stats.generation % self.header_interval == 0 {
            println!("=============================================================");
            println!("           best     worst   average   average");
            println!("    #  survivor  survivor survivors       all  duration");
        }
        let marker = match stats.mode {
            RunMode::Normal => ' ',
            RunMode::Alternative => '*',
        };
        println!(
            "{:5}{:10.5}{:10.5}{:10.5}{:10.5}{:10.3}{}",
            stats.generation,
            stats.best_survivor,
            stats.worst_survivor,
            stats.mean_survivors,
            stats.mean_population,
            stats.duration.as_secs_f64(),
            marker
        );
    }

    fn on_stagnation(&mut self, generation: usize, stagnation_count: usize) {
        log::debug!("Generation {}: stagnation count {}", generation, stagnation_count);
    }

    fn on_alternative_breed_complete(&mut self, generation: usize, survivors: usize) {
        log::info!(
            "Generation {}: mixing {} alternative survivors into the breed",
            generation, survivors
        );
    }
}

/// Discards all progress reports.
pub struct SilentProgressCallback;

impl ProgressCallback for SilentProgressCallback {
    fn on_generation_complete(&mut self, _stats: &GenerationStats) {}
}
