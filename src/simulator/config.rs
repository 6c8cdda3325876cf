//! Training configuration.

use crate::core::error::SimError;
use serde::{Deserialize, Serialize};

/// Configuration for a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Controllers evaluated per generation
    pub population_size: usize,

    /// Generation cap (training also stops once the target score is reached)
    pub generations: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Hidden layer widths of every network
    pub hidden_layers: Vec<usize>,

    /// Top controllers copied unchanged into the next generation
    pub elite: usize,

    /// Probability that any single weight is perturbed
    pub mutation_rate: f64,

    /// Maximum absolute perturbation per weight
    pub mutation_power: f64,

    /// Report verbosity (0 = silent, 1 = summary, 2 = per generation)
    pub verbosity: u8,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 50,
            seed: None,
            hidden_layers: Vec::new(),
            elite: 5,
            mutation_rate: 0.3,
            mutation_power: 0.5,
            verbosity: 1,
        }
    }
}

impl TrainConfig {
    /// Small, seeded run for smoke tests
    pub fn quick(seed: u64) -> Self {
        Self {
            population_size: 10,
            generations: 5,
            seed: Some(seed),
            elite: 2,
            verbosity: 0,
            ..Default::default()
        }
    }

    /// Larger population with a hidden layer
    pub fn thorough() -> Self {
        Self {
            population_size: 150,
            generations: 200,
            hidden_layers: vec![6],
            elite: 15,
            mutation_rate: 0.2,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.population_size == 0 {
            return Err(SimError::invalid("population size must be at least 1"));
        }
        if self.generations == 0 {
            return Err(SimError::invalid("generation count must be at least 1"));
        }
        if self.elite == 0 || self.elite > self.population_size {
            return Err(SimError::invalid(
                "elite count must be between 1 and the population size",
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(SimError::invalid("mutation rate must be within [0, 1]"));
        }
        if !self.mutation_power.is_finite() || self.mutation_power < 0.0 {
            return Err(SimError::invalid(
                "mutation power must be finite and non-negative",
            ));
        }
        if self.hidden_layers.contains(&0) {
            return Err(SimError::invalid("hidden layers must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(TrainConfig::default().validate().is_ok());
        assert!(TrainConfig::quick(1).validate().is_ok());
        assert!(TrainConfig::thorough().validate().is_ok());
    }

    #[test]
    fn test_rejects_elite_above_population() {
        let config = TrainConfig {
            population_size: 4,
            elite: 5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_rejects_bad_mutation_rate() {
        let config = TrainConfig {
            mutation_rate: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        let config = TrainConfig {
            mutation_rate: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_overrides_defaults() {
        let config: TrainConfig =
            serde_json::from_str(r#"{ "population_size": 20, "seed": 7 }"#).unwrap();
        assert_eq!(config.population_size, 20);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.elite, 5);
    }
}
