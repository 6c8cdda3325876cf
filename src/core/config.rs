//! Simulation configuration.
//!
//! Every constant the tick loop depends on lives here so that test scenarios and
//! JSON config files can tune the game without touching the physics code.
//! `validate()` must pass before an episode is constructed.

use super::constants::*;
use super::error::SimError;
use serde::{Deserialize, Serialize};

/// Bird kinematics and tilt tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Velocity set by an impulse (negative = upward).
    pub jump_velocity: f64,
    pub gravity: f64,
    /// Ceiling on per-tick downward displacement.
    pub terminal_displacement: f64,
    /// Extra upward displacement applied while ascending.
    pub ascent_bias: f64,
    pub tilt_max: f64,
    pub tilt_min: f64,
    /// Degrees of downward tilt added per tick while diving.
    pub rotation_velocity: f64,
    /// Distance above the impulse origin that keeps the bird tilted up.
    pub tilt_hold_threshold: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            jump_velocity: JUMP_VELOCITY,
            gravity: GRAVITY,
            terminal_displacement: TERMINAL_DISPLACEMENT,
            ascent_bias: ASCENT_BIAS,
            tilt_max: TILT_MAX,
            tilt_min: TILT_MIN,
            rotation_velocity: ROTATION_VELOCITY,
            tilt_hold_threshold: TILT_HOLD_THRESHOLD,
        }
    }
}

/// Pipe pair geometry and placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    pub gap: f64,
    /// Leftward movement per tick.
    pub velocity: f64,
    /// Inclusive lower bound of the randomized gap height.
    pub gap_min: f64,
    /// Exclusive upper bound of the randomized gap height.
    pub gap_max: f64,
    pub pipe_width: u32,
    pub pipe_height: u32,
    pub first_x: f64,
    pub respawn_x: f64,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            gap: PIPE_GAP,
            velocity: PIPE_VELOCITY,
            gap_min: PIPE_GAP_MIN,
            gap_max: PIPE_GAP_MAX,
            pipe_width: PIPE_WIDTH,
            pipe_height: PIPE_HEIGHT,
            first_x: FIRST_PIPE_X,
            respawn_x: RESPAWN_PIPE_X,
        }
    }
}

/// Fitness shaping applied to each controller's accumulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub survival_reward: f64,
    pub collision_penalty: f64,
    pub pass_bonus: f64,
    /// Decisions strictly above this value trigger an impulse.
    pub jump_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            survival_reward: SURVIVAL_REWARD,
            collision_penalty: COLLISION_PENALTY,
            pass_bonus: PASS_BONUS,
            jump_threshold: JUMP_THRESHOLD,
        }
    }
}

/// Full configuration for one simulated episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub physics: PhysicsConfig,
    pub obstacles: ObstacleConfig,
    pub scoring: ScoringConfig,
    pub bird_x: f64,
    pub bird_y: f64,
    pub bird_width: u32,
    pub bird_height: u32,
    pub playfield_width: f64,
    pub floor_y: f64,
    /// Score that ends the episode as complete (None = play until exhausted).
    pub target_score: Option<u32>,
    /// Hard cap on ticks per episode (None = unbounded).
    pub max_ticks: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            obstacles: ObstacleConfig::default(),
            scoring: ScoringConfig::default(),
            bird_x: BIRD_START_X,
            bird_y: BIRD_START_Y,
            bird_width: BIRD_WIDTH,
            bird_height: BIRD_HEIGHT,
            playfield_width: PLAYFIELD_WIDTH,
            floor_y: FLOOR_Y,
            target_score: Some(TARGET_SCORE),
            max_ticks: None,
        }
    }
}

fn sprite_fits(width: u32, height: u32) -> bool {
    width > 0 && height > 0 && width <= MAX_SPRITE_SIDE && height <= MAX_SPRITE_SIDE
}

impl SimConfig {
    /// Reject constants the tick loop cannot run with.
    pub fn validate(&self) -> Result<(), SimError> {
        let p = &self.physics;
        let o = &self.obstacles;

        let finite = [
            p.jump_velocity,
            p.gravity,
            p.terminal_displacement,
            p.ascent_bias,
            p.tilt_max,
            p.tilt_min,
            p.rotation_velocity,
            p.tilt_hold_threshold,
            o.gap,
            o.velocity,
            o.gap_min,
            o.gap_max,
            o.first_x,
            o.respawn_x,
            self.bird_x,
            self.bird_y,
            self.playfield_width,
            self.floor_y,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(SimError::invalid("all constants must be finite"));
        }

        if p.gravity <= 0.0 {
            return Err(SimError::invalid("gravity must be positive"));
        }
        if p.jump_velocity >= 0.0 {
            return Err(SimError::invalid("jump velocity must be negative (upward)"));
        }
        if p.terminal_displacement <= 0.0 {
            return Err(SimError::invalid("terminal displacement must be positive"));
        }
        if p.ascent_bias < 0.0 {
            return Err(SimError::invalid("ascent bias must not be negative"));
        }
        if p.tilt_min >= p.tilt_max {
            return Err(SimError::invalid("tilt_min must be below tilt_max"));
        }
        if p.rotation_velocity <= 0.0 {
            return Err(SimError::invalid("rotation velocity must be positive"));
        }

        if o.gap <= 0.0 {
            return Err(SimError::invalid("pipe gap must be positive"));
        }
        if o.velocity <= 0.0 {
            return Err(SimError::invalid("pipe velocity must be positive"));
        }
        if o.gap_min < 0.0 || o.gap_min >= o.gap_max {
            return Err(SimError::invalid(
                "gap height range must be non-negative and non-empty",
            ));
        }
        if !sprite_fits(o.pipe_width, o.pipe_height) {
            return Err(SimError::invalid(format!(
                "pipe sprite sides must be within 1..={MAX_SPRITE_SIDE}"
            )));
        }

        if !sprite_fits(self.bird_width, self.bird_height) {
            return Err(SimError::invalid(format!(
                "bird sprite sides must be within 1..={MAX_SPRITE_SIDE}"
            )));
        }
        if self.playfield_width <= 0.0 || self.floor_y <= 0.0 {
            return Err(SimError::invalid("playfield must have positive extent"));
        }
        if self.bird_y < 0.0 || self.bird_y + self.bird_height as f64 > self.floor_y {
            return Err(SimError::invalid("bird must start inside the playfield"));
        }
        if self.target_score == Some(0) {
            return Err(SimError::invalid("target score must be at least 1"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_defaults_match_constants() {
        let config = SimConfig::default();
        assert!((config.physics.jump_velocity - (-10.5)).abs() < f64::EPSILON);
        assert!((config.obstacles.gap - 200.0).abs() < f64::EPSILON);
        assert_eq!(config.target_score, Some(35));
        assert!(config.max_ticks.is_none());
    }

    #[test]
    fn test_rejects_non_positive_gap() {
        let mut config = SimConfig::default();
        config.obstacles.gap = 0.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, SimError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_rejects_negative_velocity() {
        let mut config = SimConfig::default();
        config.obstacles.velocity = -5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_upward_gravity() {
        let mut config = SimConfig::default();
        config.physics.gravity = -3.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_gap_range() {
        let mut config = SimConfig::default();
        config.obstacles.gap_min = 300.0;
        config.obstacles.gap_max = 300.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_nan() {
        let mut config = SimConfig::default();
        config.physics.ascent_bias = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_sprites() {
        let mut config = SimConfig::default();
        config.obstacles.pipe_width = 70_000;
        config.obstacles.pipe_height = 70_000;
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidConfiguration(_))
        ));

        let config = SimConfig {
            bird_width: MAX_SPRITE_SIDE + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.obstacles.pipe_width = MAX_SPRITE_SIDE;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bird_below_floor() {
        let config = SimConfig {
            bird_y: 790.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimConfig =
            serde_json::from_str(r#"{ "obstacles": { "gap": 180.0 }, "target_score": 10 }"#)
                .unwrap();
        assert!((config.obstacles.gap - 180.0).abs() < f64::EPSILON);
        assert!((config.obstacles.velocity - PIPE_VELOCITY).abs() < f64::EPSILON);
        assert_eq!(config.target_score, Some(10));
        assert!((config.physics.gravity - GRAVITY).abs() < f64::EPSILON);
    }
}
