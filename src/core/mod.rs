//! Configuration, constants and errors shared by the simulation and the harness.

pub mod config;
pub mod constants;
pub mod error;

pub use config::{ObstacleConfig, PhysicsConfig, ScoringConfig, SimConfig};
pub use error::{ControllerFault, SimError};
