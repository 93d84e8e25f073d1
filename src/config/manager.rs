use super::{
    evolution::EvolutionConfig,
    fitness::FitnessConfig,
    layout::LayoutConfig,
    render::RenderConfig,
    traits::ConfigSection,
};
use crate::error::GlobeError;
use config::{Config, ConfigError, Environment, File, FileFormat};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::Path;

/// Settings file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "globeclock.toml";

/// Layered raw settings: process environment over an optional TOML file.
///
/// Keys are looked up flat first (`SIZE_OF_GENOM` in the environment or
/// `size_of_genom` at the top of the file), then inside their section
/// (`[evolution] size_of_genom`). Values that cannot be converted fall back
/// to the caller's default with a warning, one field at a time.
pub struct SettingsSource {
    inner: Config,
}

impl SettingsSource {
    /// Settings file (required when `path` is given) plus process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, GlobeError> {
        Self::layered(path, Environment::default())
    }

    /// Settings file overridden by the given environment source.
    pub fn layered(path: Option<&Path>, environment: Environment) -> Result<Self, GlobeError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
        };
        Self::build(Config::builder().add_source(file).add_source(environment))
    }

    /// Settings taken from a TOML document only, ignoring the environment.
    pub fn from_toml_str(contents: &str) -> Result<Self, GlobeError> {
        Self::build(Config::builder().add_source(File::from_str(contents, FileFormat::Toml)))
    }

    /// No overrides at all: every lookup yields its default.
    pub fn empty() -> Self {
        Self { inner: Config::default() }
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, GlobeError> {
        let inner = builder
            .build()
            .map_err(|e| GlobeError::Configuration(format!("Failed to load settings: {}", e)))?;
        Ok(Self { inner })
    }

    fn lookup<T: DeserializeOwned>(&self, section: &str, key: &str) -> Result<Option<T>, ConfigError> {
        for path in [key.to_string(), format!("{}.{}", section, key)] {
            match self.inner.get::<T>(&path) {
                Ok(value) => return Ok(Some(value)),
                Err(ConfigError::NotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }

    pub fn value<T>(&self, section: &str, key: &str, default: T) -> T
    where
        T: DeserializeOwned + Display + PartialEq,
    {
        let name = key.to_uppercase();
        match self.lookup::<T>(section, key) {
            Ok(Some(value)) => {
                let marker = if value == default { " (default)" } else { "" };
                info!("Using {}={}{}", name, value, marker);
                value
            }
            Ok(None) => {
                info!("Using {}={} (default)", name, default);
                default
            }
            Err(e) => {
                warn!("Could not read {} ({}). Using default {}.", name, e, default);
                default
            }
        }
    }

    pub fn optional<T>(&self, section: &str, key: &str) -> Option<T>
    where
        T: DeserializeOwned + Display,
    {
        let name = key.to_uppercase();
        match self.lookup::<T>(section, key) {
            Ok(Some(value)) => {
                info!("Using {}={}", name, value);
                Some(value)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Could not read {} ({}). Leaving it unset.", name, e);
                None
            }
        }
    }

    /// A list given either as a comma separated string or as an array.
    pub fn list(&self, section: &str, key: &str, default: Vec<String>) -> Vec<String> {
        let name = key.to_uppercase();
        let found = match self.lookup::<String>(section, key) {
            Ok(Some(joined)) => Ok(Some(split_list(&joined))),
            Ok(None) => Ok(None),
            Err(_) => self.lookup::<Vec<String>>(section, key),
        };
        match found {
            Ok(Some(items)) if !items.is_empty() => {
                info!("Using {}={}", name, items.join(","));
                items
            }
            Ok(Some(_)) => {
                warn!("{} is empty. Using default {}.", name, default.join(","));
                default
            }
            Ok(None) => {
                info!("Using {}={} (default)", name, default.join(","));
                default
            }
            Err(e) => {
                warn!("Could not read {} ({}). Using default {}.", name, e, default.join(","));
                default
            }
        }
    }
}

fn split_list(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub layout: LayoutConfig,
    pub fitness: FitnessConfig,
    pub render: RenderConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), GlobeError> {
        self.evolution.validate()?;
        self.layout.validate()?;
        self.fitness.validate()?;
        self.render.validate()?;
        Ok(())
    }

    pub fn from_source(source: &SettingsSource) -> Self {
        Self {
            evolution: EvolutionConfig::from_source(source),
            layout: LayoutConfig::from_source(source),
            fitness: FitnessConfig::from_source(source),
            render: RenderConfig::from_source(source),
        }
    }

    /// Resolve settings from file and environment, then validate them.
    pub fn load(path: Option<&Path>) -> Result<Self, GlobeError> {
        let config = Self::from_source(&SettingsSource::load(path)?);
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GlobeError> {
        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| GlobeError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| GlobeError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }
}
