pub mod traits;
pub mod evolution;
pub mod layout;
pub mod fitness;
pub mod render;
pub mod manager;

pub use manager::{AppConfig, SettingsSource};
pub use traits::ConfigSection;
pub use evolution::EvolutionConfig;
pub use layout::LayoutConfig;
pub use fitness::FitnessConfig;
pub use render::RenderConfig;
