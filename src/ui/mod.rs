//! Terminal UI: the playfield scene and the live renderer that draws it.

pub mod flappy_scene;
pub mod terminal;

pub use flappy_scene::{render_episode_over, render_flappy, wing_frame, SceneView, WingFrame};
pub use terminal::{FlapLatch, FrameClock, KeyboardController, TerminalRenderer, TerminalSession};
