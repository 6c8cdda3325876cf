//! Training harness for evolving Flappy Bird controllers.
//!
//! Each generation, every controller in the breeder's population flies one bird
//! through a shared episode. Fitness is fed back to the breeder and the best
//! controller is kept as the champion. Training ends when a generation reaches
//! the target score, the generation cap is hit, or a stop is requested.
//!
//! The runner uses Episode (src/flappy/episode.rs) for all game logic, so a
//! trained controller behaves the same way in replay as it did in training.

mod champion;
mod config;
mod report;
mod runner;

pub use champion::ChampionRecord;
pub use config::TrainConfig;
pub use report::{GenerationReport, TrainingReport};
pub use runner::{replay, run_generation, run_training, TrainingOutcome};
