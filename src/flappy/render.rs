//! The draw interface the episode pushes finished frames to.

use super::agent::Agent;
use super::obstacle::ObstaclePair;
use crate::core::error::SimError;

/// Read-only snapshot of one finished tick.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub tick: u64,
    pub generation: u32,
    pub score: u32,
    pub agents: &'a [&'a Agent],
    pub obstacles: &'a [ObstaclePair],
    /// Horizontal scroll of the floor strip, in `[0, floor_width)`.
    pub floor_offset: f64,
}

/// Receives one frame per tick after all of that tick's mutations.
pub trait Renderer {
    fn draw(&mut self, frame: &FrameView<'_>) -> Result<(), SimError>;
}

/// Discards every frame. Used for headless training.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw(&mut self, _frame: &FrameView<'_>) -> Result<(), SimError> {
        Ok(())
    }
}

/// Keeps a compact summary of every frame it is handed.
#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer {
    /// `(tick, alive agents, obstacles, score)` per drawn frame.
    pub frames: Vec<(u64, usize, usize, u32)>,
}

impl Renderer for RecordingRenderer {
    fn draw(&mut self, frame: &FrameView<'_>) -> Result<(), SimError> {
        self.frames.push((
            frame.tick,
            frame.agents.len(),
            frame.obstacles.len(),
            frame.score,
        ));
        Ok(())
    }
}
