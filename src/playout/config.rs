//! Playout driver configuration.

use serde::{Deserialize, Serialize};

/// Playout driver configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoutConfig {
    /// Seed for the driver's RNG. `None` seeds from OS entropy.
    /// Same seed and same root produce the same playout.
    pub seed: Option<u64>,

    /// Worker threads for `play_many`.
    /// 0 uses the global rayon pool, 1 runs the playouts sequentially.
    pub fan_out: usize,
}

impl Default for PlayoutConfig {
    fn default() -> Self {
        Self {
            seed: None,
            fan_out: 0,
        }
    }
}

impl PlayoutConfig {
    /// Use a fixed seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of worker threads for batches of playouts.
    #[must_use]
    pub fn with_fan_out(mut self, fan_out: usize) -> Self {
        self.fan_out = fan_out;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlayoutConfig::default();
        assert_eq!(config.seed, None);
        assert_eq!(config.fan_out, 0);
    }

    #[test]
    fn test_builder_pattern() {
        let config = PlayoutConfig::default().with_seed(7).with_fan_out(4);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.fan_out, 4);
    }

    #[test]
    fn test_serialization() {
        let config = PlayoutConfig::default().with_seed(123);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: PlayoutConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
