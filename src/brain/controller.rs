//! The decision interface between the simulation and whatever flies the bird.

use crate::core::error::ControllerFault;

/// What a controller sees each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Agent height.
    pub y: f64,
    /// Vertical distance to the bottom edge of the relevant top pipe.
    pub top_distance: f64,
    /// Vertical distance to the top edge of the relevant bottom pipe.
    pub bottom_distance: f64,
}

impl Observation {
    pub fn new(y: f64, gap_top: f64, gap_bottom: f64) -> Self {
        Self {
            y,
            top_distance: (y - gap_top).abs(),
            bottom_distance: (y - gap_bottom).abs(),
        }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.y, self.top_distance, self.bottom_distance]
    }
}

/// Maps an observation to a decision in `[0, 1]`; values above the jump
/// threshold flap.
///
/// Implementations must be deterministic and must not block.
pub trait Controller {
    fn decide(&mut self, observation: &Observation) -> Result<f64, ControllerFault>;
}

impl<C: Controller + ?Sized> Controller for Box<C> {
    fn decide(&mut self, observation: &Observation) -> Result<f64, ControllerFault> {
        (**self).decide(observation)
    }
}

impl<C: Controller + ?Sized> Controller for &mut C {
    fn decide(&mut self, observation: &Observation) -> Result<f64, ControllerFault> {
        (**self).decide(observation)
    }
}

/// Scripted controllers for tests, benchmarks and demos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scripted {
    AlwaysFlap,
    NeverFlap,
    /// Flaps on every other decision, starting with `next`.
    Alternating { next: bool },
    /// Flaps when the bird drops below the middle of the gap.
    HoldGap,
    /// Returns a fault on every call.
    Faulty,
}

impl Controller for Scripted {
    fn decide(&mut self, observation: &Observation) -> Result<f64, ControllerFault> {
        match self {
            Self::AlwaysFlap => Ok(1.0),
            Self::NeverFlap => Ok(0.0),
            Self::Alternating { next } => {
                let flap = *next;
                *next = !*next;
                Ok(if flap { 1.0 } else { 0.0 })
            }
            Self::HoldGap => {
                // Closer to the bottom pipe than the top one: climb.
                Ok(if observation.bottom_distance < observation.top_distance {
                    1.0
                } else {
                    0.0
                })
            }
            Self::Faulty => Err(ControllerFault::Failed("scripted fault".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_distances() {
        let obs = Observation::new(350.0, 300.0, 500.0);
        assert_eq!(obs.as_array(), [350.0, 50.0, 150.0]);
        let above = Observation::new(250.0, 300.0, 500.0);
        assert!((above.top_distance - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_alternating_flips() {
        let obs = Observation::new(0.0, 0.0, 0.0);
        let mut c = Scripted::Alternating { next: true };
        let decisions: Vec<f64> = (0..4).map(|_| c.decide(&obs).unwrap()).collect();
        assert_eq!(decisions, vec![1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_hold_gap_climbs_near_bottom_pipe() {
        let mut c = Scripted::HoldGap;
        assert_eq!(c.decide(&Observation::new(480.0, 300.0, 500.0)).unwrap(), 1.0);
        assert_eq!(c.decide(&Observation::new(320.0, 300.0, 500.0)).unwrap(), 0.0);
    }

    #[test]
    fn test_boxed_controller_delegates() {
        let mut boxed: Box<dyn Controller> = Box::new(Scripted::AlwaysFlap);
        let obs = Observation::new(1.0, 2.0, 3.0);
        assert_eq!(boxed.decide(&obs).unwrap(), 1.0);
    }

    #[test]
    fn test_faulty_returns_error() {
        let mut c = Scripted::Faulty;
        assert!(c.decide(&Observation::new(0.0, 0.0, 0.0)).is_err());
    }
}
