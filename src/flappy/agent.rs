//! Bird kinematics and tilt.
//!
//! Motion is a function of frames elapsed since the last impulse rather than an
//! integrated velocity: every impulse restarts the parabola from the current
//! height.

use crate::core::config::PhysicsConfig;
use crate::core::constants::{DIVE_TILT, WING_ANIMATION_TICKS};
use serde::{Deserialize, Serialize};

/// A single controllable bird.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Horizontal position (fixed for the agent's lifetime).
    pub x: f64,
    /// Vertical position of the sprite's top edge. Row 0 = top of the playfield.
    pub y: f64,
    /// Velocity at the moment of the last impulse (negative = upward).
    pub velocity: f64,
    /// Frames elapsed since the last impulse.
    pub frames_since_impulse: u32,
    /// Tilt in degrees, positive = nose up.
    pub tilt: f64,
    /// Height the last impulse was applied from.
    pub impulse_origin: f64,
    /// Wing animation counter, wrapping every four wing phases.
    #[serde(default)]
    pub wing_ticks: u64,
}

impl Agent {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            velocity: 0.0,
            frames_since_impulse: 0,
            tilt: 0.0,
            impulse_origin: y,
            wing_ticks: 0,
        }
    }

    /// Flap: override velocity and restart the trajectory from here.
    pub fn apply_impulse(&mut self, physics: &PhysicsConfig) {
        self.velocity = physics.jump_velocity;
        self.frames_since_impulse = 0;
        self.impulse_origin = self.y;
    }

    /// Advance one frame. Returns the displacement applied to `y`.
    pub fn advance_tick(&mut self, physics: &PhysicsConfig) -> f64 {
        self.frames_since_impulse += 1;
        let t = self.frames_since_impulse as f64;

        // Clamp before moving so fall speed is bounded exactly at the ceiling.
        let mut displacement =
            (self.velocity * t + 0.5 * physics.gravity * t * t).min(physics.terminal_displacement);
        if displacement < 0.0 {
            displacement -= physics.ascent_bias;
        }
        self.y += displacement;

        if displacement < 0.0 || self.y < self.impulse_origin - physics.tilt_hold_threshold {
            self.tilt = self.tilt.max(physics.tilt_max);
        } else {
            self.tilt = (self.tilt - physics.rotation_velocity).max(physics.tilt_min);
        }
        self.advance_wings();

        displacement
    }

    fn advance_wings(&mut self) {
        self.wing_ticks += 1;
        if self.wing_ticks == WING_ANIMATION_TICKS * 4 {
            self.wing_ticks = 0;
        }
        // Diving holds the wings; the next flap cycle resumes mid-stroke.
        if self.is_diving() {
            self.wing_ticks = WING_ANIMATION_TICKS * 2;
        }
    }

    /// Position in the up, level, down, level wing cycle.
    pub fn wing_phase(&self) -> u64 {
        (self.wing_ticks / WING_ANIMATION_TICKS) % 4
    }

    pub fn is_diving(&self) -> bool {
        self.tilt <= DIVE_TILT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn physics() -> PhysicsConfig {
        PhysicsConfig::default()
    }

    #[test]
    fn test_new_agent_defaults() {
        let agent = Agent::new(230.0, 350.0);
        assert_eq!(agent.frames_since_impulse, 0);
        assert!((agent.velocity).abs() < f64::EPSILON);
        assert!((agent.tilt).abs() < f64::EPSILON);
        assert!((agent.impulse_origin - 350.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_free_fall_follows_parabola() {
        let p = physics();
        let mut agent = Agent::new(230.0, 350.0);
        let d1 = agent.advance_tick(&p);
        let d2 = agent.advance_tick(&p);
        let d3 = agent.advance_tick(&p);
        assert!((d1 - 1.5).abs() < 1e-9);
        assert!((d2 - 6.0).abs() < 1e-9);
        assert!((d3 - 13.5).abs() < 1e-9);
        assert!((agent.y - 371.0).abs() < 1e-9);
    }

    #[test]
    fn test_displacement_clamped_at_terminal() {
        let p = physics();
        let mut agent = Agent::new(230.0, 100.0);
        for _ in 0..3 {
            agent.advance_tick(&p);
        }
        let before = agent.y;
        let d = agent.advance_tick(&p);
        assert!((d - p.terminal_displacement).abs() < f64::EPSILON);
        assert!((agent.y - before - p.terminal_displacement).abs() < 1e-9);
    }

    #[test]
    fn test_impulse_resets_trajectory() {
        let p = physics();
        let mut agent = Agent::new(230.0, 350.0);
        agent.advance_tick(&p);
        agent.advance_tick(&p);
        agent.apply_impulse(&p);
        assert_eq!(agent.frames_since_impulse, 0);
        assert!((agent.impulse_origin - agent.y).abs() < f64::EPSILON);

        // First frame after a flap: -10.5 + 1.5 = -9, then the ascent bias.
        let d = agent.advance_tick(&p);
        assert!((d - (-11.0)).abs() < 1e-9);
    }

    #[test]
    fn test_tilt_snaps_up_on_ascent() {
        let p = physics();
        let mut agent = Agent::new(230.0, 350.0);
        agent.tilt = -60.0;
        agent.apply_impulse(&p);
        agent.advance_tick(&p);
        assert!((agent.tilt - p.tilt_max).abs() < f64::EPSILON);
        assert!(!agent.is_diving());
    }

    #[test]
    fn test_tilt_held_above_origin_while_falling() {
        let p = physics();
        let mut agent = Agent::new(230.0, 350.0);
        agent.apply_impulse(&p);
        // Frames 1..=6 rise, frame 8 is the first with positive displacement but
        // the bird is still well above where it flapped.
        for _ in 0..8 {
            agent.advance_tick(&p);
        }
        assert!(agent.advance_tick(&p) > 0.0);
        assert!(agent.y < agent.impulse_origin - p.tilt_hold_threshold);
        assert!((agent.tilt - p.tilt_max).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tilt_dives_and_clamps() {
        let p = physics();
        let mut agent = Agent::new(230.0, 100.0);
        let mut tilts = Vec::new();
        for _ in 0..10 {
            agent.advance_tick(&p);
            tilts.push(agent.tilt);
        }
        assert!((tilts[0] - (-20.0)).abs() < f64::EPSILON);
        assert!((tilts[3] - (-80.0)).abs() < f64::EPSILON);
        // -80 - 20 would be -100; clamped at the floor of the range.
        assert!((tilts[4] - (-90.0)).abs() < f64::EPSILON);
        assert!(tilts.iter().all(|t| *t >= p.tilt_min));
    }

    #[test]
    fn test_tilt_bounded_for_mixed_sequences() {
        let p = physics();
        let mut agent = Agent::new(230.0, 400.0);
        for i in 0..300u32 {
            if i % 7 == 0 || i % 11 == 3 {
                agent.apply_impulse(&p);
            }
            agent.advance_tick(&p);
            assert!(agent.tilt <= p.tilt_max && agent.tilt >= p.tilt_min);
        }
    }

    #[test]
    fn test_wing_cycle_wraps_every_twenty_ticks() {
        let p = physics();
        let mut agent = Agent::new(230.0, 300.0);
        let mut phases = vec![agent.wing_phase()];
        for _ in 0..20 {
            agent.apply_impulse(&p);
            agent.advance_tick(&p);
            phases.push(agent.wing_phase());
        }
        assert_eq!(&phases[..5], &[0, 0, 0, 0, 0]);
        assert_eq!(phases[5], 1);
        assert_eq!(phases[10], 2);
        assert_eq!(phases[15], 3);
        assert_eq!(phases[19], 3);
        assert_eq!(phases[20], 0);
        assert_eq!(agent.wing_ticks, 0);
    }

    #[test]
    fn test_dive_parks_wing_counter() {
        let p = physics();
        let mut agent = Agent::new(230.0, 100.0);
        for _ in 0..3 {
            agent.advance_tick(&p);
        }
        assert_eq!(agent.wing_ticks, 3);
        // Fourth frame of free fall reaches -80 degrees.
        agent.advance_tick(&p);
        assert!(agent.is_diving());
        assert_eq!(agent.wing_ticks, 10);
        agent.advance_tick(&p);
        assert_eq!(agent.wing_ticks, 10);

        agent.apply_impulse(&p);
        agent.advance_tick(&p);
        assert!(!agent.is_diving());
        assert_eq!(agent.wing_ticks, 11);
        assert_eq!(agent.wing_phase(), 2);
    }
}
