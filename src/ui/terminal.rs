//! Terminal front end: raw-mode session, 30 fps pacing, keyboard input and the
//! ratatui-backed [`Renderer`].

use super::flappy_scene::{render_episode_over, render_flappy, SceneView};
use crate::brain::controller::{Controller, Observation};
use crate::core::config::SimConfig;
use crate::core::constants::TICKS_PER_SECOND;
use crate::core::error::{ControllerFault, SimError};
use crate::flappy::episode::EpisodeReport;
use crate::flappy::render::{FrameView, Renderer};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::cell::Cell;
use std::io::{self, Stdout};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Fixed-rate frame pacing.
#[derive(Debug)]
pub struct FrameClock {
    interval: Duration,
    next: Instant,
}

impl FrameClock {
    pub fn new(ticks_per_second: u32) -> Self {
        Self {
            interval: Duration::from_secs(1) / ticks_per_second.max(1),
            next: Instant::now(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time left until the next frame is due, or zero if it is late.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    /// Sleep until the next frame is due. A late frame does not build up debt.
    pub fn wait(&mut self) {
        let now = Instant::now();
        let remaining = self.remaining(now);
        if remaining.is_zero() {
            self.next = now + self.interval;
        } else {
            thread::sleep(remaining);
            self.next += self.interval;
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(TICKS_PER_SECOND)
    }
}

/// Flap requests shared between the renderer (which reads keys) and the
/// keyboard controller (which consumes them).
pub type FlapLatch = Rc<Cell<bool>>;

/// Controller driven by a human pressing the flap key.
#[derive(Debug, Clone, Default)]
pub struct KeyboardController {
    latch: FlapLatch,
}

impl KeyboardController {
    pub fn new(latch: FlapLatch) -> Self {
        Self { latch }
    }
}

impl Controller for KeyboardController {
    fn decide(&mut self, _observation: &Observation) -> Result<f64, ControllerFault> {
        Ok(if self.latch.replace(false) { 1.0 } else { 0.0 })
    }
}

/// Raw-mode alternate screen, restored on drop.
pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    pub fn start() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = self.terminal.backend_mut().execute(LeaveAlternateScreen);
    }
}

/// Draws every frame to the terminal at 30 fps and turns key presses into
/// flap requests and stop signals.
pub struct TerminalRenderer {
    session: TerminalSession,
    clock: FrameClock,
    title: String,
    config: SimConfig,
    population: usize,
    flap: Option<FlapLatch>,
    stop: Arc<AtomicBool>,
}

impl TerminalRenderer {
    pub fn new(
        session: TerminalSession,
        title: impl Into<String>,
        config: SimConfig,
        stop: Arc<AtomicBool>,
    ) -> Self {
        Self {
            session,
            clock: FrameClock::default(),
            title: title.into(),
            config,
            population: 0,
            flap: None,
            stop,
        }
    }

    /// Route flap keys to a keyboard controller.
    pub fn with_flap_latch(mut self, latch: FlapLatch) -> Self {
        self.flap = Some(latch);
        self
    }

    /// Agents alive at the start of the next episode.
    pub fn set_population(&mut self, population: usize) {
        self.population = population;
    }

    fn poll_input(&mut self) -> io::Result<()> {
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => {
                        if let Some(latch) = &self.flap {
                            latch.set(true);
                        }
                    }
                    KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => {
                        self.stop.store(true, Ordering::Relaxed);
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Show the result box and block until a key is pressed.
    pub fn show_result(&mut self, report: &EpisodeReport) -> Result<(), SimError> {
        self.session
            .terminal
            .draw(|f| render_episode_over(f, f.size(), report))
            .map_err(SimError::Render)?;
        loop {
            if event::poll(Duration::from_millis(50)).map_err(SimError::Render)? {
                if let Event::Key(key) = event::read().map_err(SimError::Render)? {
                    if key.kind == KeyEventKind::Press {
                        return Ok(());
                    }
                }
            }
        }
    }
}

impl Renderer for TerminalRenderer {
    fn draw(&mut self, frame: &FrameView<'_>) -> Result<(), SimError> {
        self.poll_input().map_err(SimError::Render)?;

        let controls: &[(&str, &str)] = if self.flap.is_some() {
            &[("[Space/Up/Enter]", "Flap"), ("[Esc/Q]", "Quit")]
        } else {
            &[("[Esc/Q]", "Stop")]
        };
        let view = SceneView {
            title: &self.title,
            frame,
            config: &self.config,
            population: self.population.max(frame.agents.len()),
            controls,
        };
        self.session
            .terminal
            .draw(|f| render_flappy(f, f.size(), &view))
            .map_err(SimError::Render)?;

        self.clock.wait();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_clock_interval() {
        let clock = FrameClock::new(30);
        assert_eq!(clock.interval(), Duration::from_secs(1) / 30);
        assert_eq!(FrameClock::new(0).interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_frame_clock_paces_frames() {
        let mut clock = FrameClock::new(100);
        let start = Instant::now();
        clock.wait();
        clock.wait();
        clock.wait();
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_keyboard_controller_consumes_latch() {
        let latch = FlapLatch::default();
        let mut controller = KeyboardController::new(latch.clone());
        let obs = Observation::new(0.0, 0.0, 0.0);
        assert_eq!(controller.decide(&obs).unwrap(), 0.0);
        latch.set(true);
        assert_eq!(controller.decide(&obs).unwrap(), 1.0);
        assert_eq!(controller.decide(&obs).unwrap(), 0.0);
        assert!(!latch.get());
    }
}
