use crate::engines::generation::Genome;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Degrees of scene rotation between two neighbouring clock hours.
pub const DEGREES_PER_HOUR: f64 = 30.0;

/// Rotation of the globe at which a frame is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Viewpoint {
    Degrees(f64),
    Hour(u32),
}

impl Viewpoint {
    pub fn degrees(&self) -> f64 {
        match *self {
            Viewpoint::Degrees(degrees) => degrees,
            Viewpoint::Hour(hour) => (hour % 12) as f64 * DEGREES_PER_HOUR,
        }
    }
}

impl fmt::Display for Viewpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Viewpoint::Degrees(degrees) => write!(f, "{:.1}°", degrees),
            Viewpoint::Hour(hour) => write!(f, "hour {}", hour),
        }
    }
}

/// Which loop produced a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunMode {
    Normal,
    Alternative,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Normal => write!(f, "normal"),
            RunMode::Alternative => write!(f, "alternative breeding"),
        }
    }
}

/// Per-generation summary handed to progress callbacks
#[derive(Debug, Clone)]
pub struct GenerationStats {
    pub generation: usize,
    pub mode: RunMode,
    pub best_survivor: f64,
    pub worst_survivor: f64,
    pub mean_survivors: f64,
    pub mean_population: f64,
    pub population_size: usize,
    pub survivor_count: usize,
    pub duration: Duration,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// The generation counter reached `tournament_size`.
    GenerationBudget,
    /// Too many consecutive generations without change of the worst survivor.
    Stagnation,
    /// The cancel handle was raised between two generations.
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub winner: Genome,
    pub best_fitness: f64,
    pub generations: usize,
    pub offspring_bred: usize,
    pub termination: Termination,
}
