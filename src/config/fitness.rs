use super::manager::SettingsSource;
use super::traits::ConfigSection;
use crate::error::GlobeError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessConfig {
    pub fitness_image_path: String,
    /// Target masks, the i-th one compared against hour i.
    pub fitness_images: Vec<String>,
    /// Weight of lit pixels leaking outside the target shape.
    pub fitness_function_factor: f64,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            fitness_image_path: "img/".to_string(),
            fitness_images: (1..=12).map(|hour| format!("h_{}.png", hour)).collect(),
            fitness_function_factor: 1.1,
        }
    }
}

impl FitnessConfig {
    pub fn target_paths(&self) -> Vec<PathBuf> {
        let base = PathBuf::from(&self.fitness_image_path);
        self.fitness_images.iter().map(|name| base.join(name)).collect()
    }
}

impl ConfigSection for FitnessConfig {
    fn section_name() -> &'static str {
        "fitness"
    }

    fn validate(&self) -> Result<(), GlobeError> {
        if self.fitness_images.is_empty() {
            return Err(GlobeError::Configuration(
                "No fitness images specified".to_string()
            ));
        }
        if self.fitness_function_factor.is_nan() || self.fitness_function_factor < 1.0 {
            return Err(GlobeError::Configuration(format!(
                "Fitness function factor must be at least 1.0, got {}",
                self.fitness_function_factor
            )));
        }
        Ok(())
    }

    fn from_source(source: &SettingsSource) -> Self {
        let defaults = Self::default();
        let section = Self::section_name();
        Self {
            fitness_image_path: source.value(section, "fitness_image_path", defaults.fitness_image_path),
            fitness_images: source.list(section, "fitness_images", defaults.fitness_images),
            fitness_function_factor: source.value(
                section,
                "fitness_function_factor",
                defaults.fitness_function_factor,
            ),
        }
    }
}
