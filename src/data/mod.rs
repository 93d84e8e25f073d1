pub mod winner;

pub use winner::{default_winner_path, load_genome, save_genome};
