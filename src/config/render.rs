use super::manager::SettingsSource;
use super::traits::ConfigSection;
use crate::error::GlobeError;
use serde::{Deserialize, Serialize};

/// Settings of the headless software renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Camera position on the y axis, in scene units. Negative: the camera
    /// looks along +y towards the globe centre.
    pub camera_distance: f64,
    pub frame_width: u32,
    pub frame_height: u32,
    /// Horizontal field of view in degrees.
    pub field_of_view: f64,
    /// Directory holding the glyph images `0.png` .. `9.png`.
    pub glyph_path: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            camera_distance: -60.0,
            frame_width: 128,
            frame_height: 128,
            field_of_view: 40.0,
            glyph_path: "img/".to_string(),
        }
    }
}

impl ConfigSection for RenderConfig {
    fn section_name() -> &'static str {
        "render"
    }

    fn validate(&self) -> Result<(), GlobeError> {
        if self.camera_distance >= 0.0 {
            return Err(GlobeError::Configuration(
                "Camera distance must be negative".to_string()
            ));
        }
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(GlobeError::Configuration(
                "Frame size must be positive".to_string()
            ));
        }
        if self.field_of_view <= 0.0 || self.field_of_view >= 180.0 {
            return Err(GlobeError::Configuration(
                "Field of view must be between 0 and 180 degrees".to_string()
            ));
        }
        Ok(())
    }

    fn from_source(source: &SettingsSource) -> Self {
        let defaults = Self::default();
        let section = Self::section_name();
        Self {
            camera_distance: source.value(section, "camera_distance", defaults.camera_distance),
            frame_width: source.value(section, "frame_width", defaults.frame_width),
            frame_height: source.value(section, "frame_height", defaults.frame_height),
            field_of_view: source.value(section, "field_of_view", defaults.field_of_view),
            glyph_path: source.value(section, "glyph_path", defaults.glyph_path),
        }
    }
}
