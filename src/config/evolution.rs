use super::manager::SettingsSource;
use super::traits::ConfigSection;
use crate::error::GlobeError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Genes per individual, i.e. number of placed digits.
    pub size_of_genom: usize,
    /// Individuals competing in one generation.
    pub size_of_generation: usize,
    /// Share of the ranked generation that survives and parents the next one.
    pub survivor_rate: f64,
    /// Offspring mutations per generation, relative to the offspring count.
    pub mutation_rate: f64,
    /// Parents recombined into one child. Must be at least 2.
    pub max_parents: usize,
    /// Generation budget.
    pub tournament_size: usize,
    pub random_seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            size_of_genom: 220,
            size_of_generation: 400,
            survivor_rate: 0.8,
            mutation_rate: 0.7,
            max_parents: 3,
            tournament_size: 5000,
            random_seed: None,
        }
    }
}

impl EvolutionConfig {
    /// Size of the survivor cut, `floor(size_of_generation * survivor_rate)`.
    pub fn num_survivors(&self) -> usize {
        (self.size_of_generation as f64 * self.survivor_rate) as usize
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), GlobeError> {
        if self.size_of_genom == 0 {
            return Err(GlobeError::Configuration(
                "Genome size must be at least 1".to_string()
            ));
        }
        if self.size_of_generation == 0 {
            return Err(GlobeError::Configuration(
                "Generation size must be at least 1".to_string()
            ));
        }
        if self.survivor_rate <= 0.0 || self.survivor_rate > 1.0 {
            return Err(GlobeError::Configuration(
                "Survivor rate must be in (0, 1]".to_string()
            ));
        }
        let survivors = self.num_survivors();
        if survivors == 0 {
            return Err(GlobeError::Configuration(format!(
                "Survivor rate {} leaves no survivors out of {}",
                self.survivor_rate, self.size_of_generation
            )));
        }
        if survivors < self.size_of_generation && survivors < 2 {
            return Err(GlobeError::Configuration(
                "At least two survivors are needed to breed offspring".to_string()
            ));
        }
        if self.mutation_rate < 0.0 {
            return Err(GlobeError::Configuration(
                "Mutation rate must not be negative".to_string()
            ));
        }
        if self.max_parents < 2 {
            return Err(GlobeError::Configuration(
                "Crossover needs at least 2 parents".to_string()
            ));
        }
        Ok(())
    }

    fn from_source(source: &SettingsSource) -> Self {
        let defaults = Self::default();
        let section = Self::section_name();
        Self {
            size_of_genom: source.value(section, "size_of_genom", defaults.size_of_genom),
            size_of_generation: source.value(section, "size_of_generation", defaults.size_of_generation),
            survivor_rate: source.value(section, "survivor_rate", defaults.survivor_rate),
            mutation_rate: source.value(section, "mutation_rate", defaults.mutation_rate),
            max_parents: source.value(section, "max_parents", defaults.max_parents),
            tournament_size: source.value(section, "tournament_size", defaults.tournament_size),
            random_seed: source.optional(section, "random_seed"),
        }
    }
}
