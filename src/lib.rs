//! Evolutionary layout search for a digit globe.
//!
//! Digits are placed inside a sphere so that, seen from twelve rotations,
//! the lit glyphs form a target silhouette per rotation. The search is a
//! generational genetic algorithm (see [`engines::generation`]) scored by
//! rendering each candidate and comparing the frames against mask images
//! (see [`engines::evaluation`]).

pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod render;
pub mod types;

pub use error::{GlobeError, Result};
