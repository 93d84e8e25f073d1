use super::manager::SettingsSource;
use crate::error::GlobeError;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), GlobeError>;

    /// Resolve every field from the layered source, falling back to the
    /// section default per field.
    fn from_source(source: &SettingsSource) -> Self;
}
