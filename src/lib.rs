//! Flappy NEAT - Flappy Bird simulation core and neuroevolution harness
//!
//! This module exposes the simulation, controllers and training runner for
//! testing and external use.

pub mod brain;
pub mod build_info;
pub mod core;
pub mod flappy;
pub mod simulator;
pub mod ui;
pub mod utils;
