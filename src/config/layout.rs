use super::manager::SettingsSource;
use super::traits::ConfigSection;
use crate::error::GlobeError;
use serde::{Deserialize, Serialize};

/// Placement space of the digits: a quantized ball plus the allowed glyph
/// scale range. Units are thousandths of a scene unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub radius: i32,
    pub quantization: i32,
    pub min_scale: i32,
    pub max_scale: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            radius: 15000,
            quantization: 100,
            min_scale: 600,
            max_scale: 6000,
        }
    }
}

impl LayoutConfig {
    /// Grid steps between the centre and the surface along one axis.
    pub fn steps(&self) -> i32 {
        self.radius / self.quantization
    }

    pub fn contains_position(&self, x: i32, y: i32, z: i32) -> bool {
        [x, y, z]
            .iter()
            .all(|c| (-self.radius..=self.radius).contains(c) && c % self.quantization == 0)
    }
}

impl ConfigSection for LayoutConfig {
    fn section_name() -> &'static str {
        "layout"
    }

    fn validate(&self) -> Result<(), GlobeError> {
        if self.quantization <= 0 || self.radius <= 0 {
            return Err(GlobeError::Configuration(
                "Radius and quantization must be positive".to_string()
            ));
        }
        if self.radius % self.quantization != 0 {
            return Err(GlobeError::Configuration(format!(
                "Radius {} is not a multiple of quantization {}",
                self.radius, self.quantization
            )));
        }
        if self.min_scale <= 0 || self.min_scale > self.max_scale {
            return Err(GlobeError::Configuration(format!(
                "Scale range [{}, {}] is empty or not positive",
                self.min_scale, self.max_scale
            )));
        }
        Ok(())
    }

    fn from_source(source: &SettingsSource) -> Self {
        let defaults = Self::default();
        let section = Self::section_name();
        Self {
            radius: source.value(section, "radius", defaults.radius),
            quantization: source.value(section, "quantization", defaults.quantization),
            min_scale: source.value(section, "min_scale", defaults.min_scale),
            max_scale: source.value(section, "max_scale", defaults.max_scale),
        }
    }
}
