use crate::engines::generation::Genome;
use crate::error::Result;
use std::path::{Path, PathBuf};

/// `winner.<unix seconds>.json` in the working directory.
pub fn default_winner_path() -> PathBuf {
    PathBuf::from(format!("winner.{}.json", chrono::Utc::now().timestamp()))
}

/// Write `genome` as a pretty-printed JSON list of gene tuples.
pub fn save_genome<P: AsRef<Path>>(path: P, genome: &Genome) -> Result<()> {
    let json = serde_json::to_string_pretty(genome)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn load_genome<P: AsRef<Path>>(path: P) -> Result<Genome> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::Gene;

    #[test]
    fn test_gene_serializes_as_flat_tuple() {
        let genome = vec![Gene { digit: 7, x: -1200, y: 0, z: 300, scale: 2100, heading: 359 }];
        let json = serde_json::to_string(&genome).unwrap();
        assert_eq!(json, "[[7,-1200,0,300,2100,359]]");
    }

    #[test]
    fn test_out_of_range_digit_fails_to_load() {
        let result: std::result::Result<Genome, _> = serde_json::from_str("[[12,0,0,0,600,0]]");
        assert!(result.is_err());
    }

    #[test]
    fn test_default_path_has_json_extension() {
        let path = default_winner_path();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));
    }
}
