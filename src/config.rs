use std::{fs, path::Path};

use anyhow::{Context, Result};
use rand::{SeedableRng, rngs::StdRng};
use serde::Deserialize;

use crate::error::JitterError;
use crate::jitter::DistanceBand;

/// Settings for one jitter run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct JitterConfig {
    /// Minimum per-axis displacement, in the dataset's planar units.
    pub min_dist: f64,
    /// Maximum per-axis displacement, in the dataset's planar units.
    pub max_dist: f64,
    /// Seed for a reproducible run; drawn from the OS when absent.
    pub seed: Option<u64>,
}

impl Default for JitterConfig {
    fn default() -> Self {
        Self { min_dist: 1500.0, max_dist: 5000.0, seed: None }
    }
}

impl JitterConfig {
    pub fn new(min_dist: f64, max_dist: f64) -> Self {
        Self { min_dist, max_dist, seed: None }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Read a config from a JSON file such as `{"min_dist": 10, "max_dist": 20}`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Validate the distance range.
    pub fn band(&self) -> Result<DistanceBand, JitterError> {
        DistanceBand::new(self.min_dist, self.max_dist)
    }

    /// The random source for this run: seeded if `seed` is set, OS-seeded otherwise.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn parses_json_without_seed() {
        let config: JitterConfig = serde_json::from_str(r#"{"min_dist": 10, "max_dist": 20.5}"#).unwrap();
        assert_eq!(config, JitterConfig::new(10.0, 20.5));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: JitterConfig = serde_json::from_str(r#"{"max_dist": 9000}"#).unwrap();
        assert_eq!(config, JitterConfig::new(1500.0, 9000.0));
    }

    #[test]
    fn reads_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jitter.json");
        fs::write(&path, r#"{"min_dist": 1, "max_dist": 2, "seed": 99}"#).unwrap();
        assert_eq!(JitterConfig::from_json_file(&path).unwrap(), JitterConfig::new(1.0, 2.0).with_seed(99));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = JitterConfig::from_json_file(Path::new("/nonexistent/jitter.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn band_validates() {
        assert!(JitterConfig::default().band().is_ok());
        assert!(JitterConfig::new(5.0, 1.0).band().is_err());
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let config = JitterConfig::default().with_seed(1234);
        let a: u64 = config.rng().random();
        let b: u64 = config.rng().random();
        assert_eq!(a, b);
    }
}
