pub mod mask;
pub mod targets;
pub mod fitness;

pub use mask::MaskImage;
pub use targets::{TargetSet, TargetView};
pub use fitness::{FitnessEvaluator, FitnessFunction, ViewScore};
