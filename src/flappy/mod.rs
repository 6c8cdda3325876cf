//! Flappy Bird simulation core.
//!
//! A population of birds flies through scrolling pipe pairs, one controller per
//! bird. Gravity pulls every bird down each tick, controllers decide when to
//! flap, and hitting a pipe, the floor or the ceiling removes the bird from the
//! episode. Everything here is deterministic given the caller's RNG.

pub mod agent;
pub mod episode;
pub mod mask;
pub mod obstacle;
pub mod render;
pub mod roster;

pub use agent::Agent;
pub use episode::{
    relevant_obstacle_index, Elimination, Episode, EpisodeContext, EpisodeReport, EpisodeStatus,
    TickReport,
};
pub use mask::{overlaps, Mask, Sprites};
pub use obstacle::ObstaclePair;
pub use render::{FrameView, NullRenderer, RecordingRenderer, Renderer};
pub use roster::{AgentId, AgentRecord, Roster};
