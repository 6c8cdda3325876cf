//! The best controller found by a training run.

use crate::brain::network::FeedForwardNetwork;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Best controller of a training run, kept in memory for replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChampionRecord {
    pub generation: u32,
    pub fitness: f64,
    pub score: u32,
    /// Unix timestamp (seconds) of the generation that produced it.
    pub found_at: i64,
    pub network: FeedForwardNetwork,
}

impl ChampionRecord {
    pub fn new(generation: u32, fitness: f64, score: u32, network: FeedForwardNetwork) -> Self {
        Self {
            generation,
            fitness,
            score,
            found_at: Utc::now().timestamp(),
            network,
        }
    }

    pub fn found_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.found_at, 0)
    }

    /// Fresh controller built from the stored network.
    pub fn controller(&self) -> FeedForwardNetwork {
        self.network.clone()
    }

    /// One-line description for the end-of-training summary.
    pub fn summary(&self) -> String {
        let when = self
            .found_at()
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        format!(
            "Champion: generation {} (score {}, fitness {:.1}, {} parameters) at {}",
            self.generation,
            self.score,
            self.fitness,
            self.network.parameter_count(),
            when
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_controller_is_independent_copy() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let record = ChampionRecord::new(12, 187.5, 35, FeedForwardNetwork::random(&[4], &mut rng));
        let mut controller = record.controller();
        assert_eq!(controller, record.network);
        for p in controller.parameters_mut() {
            *p += 1.0;
        }
        assert_ne!(controller, record.network);
    }

    #[test]
    fn test_summary_mentions_generation_and_score() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let record = ChampionRecord::new(3, 20.25, 2, FeedForwardNetwork::random(&[], &mut rng));
        assert!(record.found_at().is_some());
        let summary = record.summary();
        assert!(summary.contains("generation 3"));
        assert!(summary.contains("score 2"));
        assert!(summary.contains("fitness 20.2") || summary.contains("fitness 20.3"));
        assert!(summary.contains("4 parameters"));
    }
}
