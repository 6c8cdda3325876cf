//! Pipe pairs: placement, scrolling and the pass latch.

use crate::core::config::ObstacleConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A top + bottom pipe with a fixed gap between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstaclePair {
    /// Left edge of both sprites.
    pub x: f64,
    /// Bottom edge of the top pipe (where the gap starts).
    pub height: f64,
    /// Draw origin of the top sprite (`height - pipe_height`).
    pub top: f64,
    /// Draw origin of the bottom sprite (`height + gap`).
    pub bottom: f64,
    /// Latched once any agent has moved beyond `x`.
    pub passed: bool,
    pub width: u32,
    velocity: f64,
}

impl ObstaclePair {
    /// Create a pair at `x` with a uniformly random whole-pixel gap height.
    pub fn spawn<R: Rng + ?Sized>(x: f64, config: &ObstacleConfig, rng: &mut R) -> Self {
        let height = rng.gen_range(config.gap_min..config.gap_max).floor();
        Self::with_height(x, height, config)
    }

    /// Create a pair at `x` with an explicit gap height.
    pub fn with_height(x: f64, height: f64, config: &ObstacleConfig) -> Self {
        Self {
            x,
            height,
            top: height - config.pipe_height as f64,
            bottom: height + config.gap,
            passed: false,
            width: config.pipe_width,
            velocity: config.velocity,
        }
    }

    pub fn advance_tick(&mut self) {
        self.x -= self.velocity;
    }

    /// Right edge in playfield units.
    pub fn right_edge(&self) -> f64 {
        self.x + self.width as f64
    }

    /// True once the whole pair is left of `left_bound`.
    pub fn has_exited(&self, left_bound: f64) -> bool {
        self.right_edge() < left_bound
    }

    /// Latch the pair as passed once `agent_x` is beyond it.
    ///
    /// Returns true only on the call that flips the latch.
    pub fn passed_by(&mut self, agent_x: f64) -> bool {
        if !self.passed && self.x < agent_x {
            self.passed = true;
            return true;
        }
        false
    }

    pub fn gap(&self) -> f64 {
        self.bottom - self.height
    }
}
