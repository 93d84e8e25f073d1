pub mod gene;
pub mod genome;
pub mod individual;
pub mod operators;
pub mod evolution_engine;
pub mod progress;

pub use gene::{Gene, GeneField};
pub use genome::Genome;
pub use individual::Individual;
pub use operators::{alternative_seed, breed, rank, ranking_fitness, select_survivors};
pub use evolution_engine::{EvolutionEngine, ProgressCallback};
pub use progress::{ConsoleProgressCallback, SilentProgressCallback};
