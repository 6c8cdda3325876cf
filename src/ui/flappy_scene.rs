//! UI rendering for the Flappy Bird playfield.

use crate::core::config::SimConfig;
use crate::core::constants::PIPE_LIP_HEIGHT;
use crate::flappy::agent::Agent;
use crate::flappy::episode::{EpisodeReport, EpisodeStatus};
use crate::flappy::render::FrameView;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Tilt at or below which the wings stay folded.

/// Width of one floor stripe in playfield units.
const FLOOR_STRIPE: f64 = 24.0;

/// Wing position for the flap animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WingFrame {
    Up,
    Level,
    Down,
    /// Nose-down dive.
    Folded,
}

impl WingFrame {
    fn glyph(self) -> &'static str {
        match self {
            WingFrame::Up => "▴",
            WingFrame::Level => "►",
            WingFrame::Down => "▾",
            WingFrame::Folded => "▼",
        }
    }
}

/// Wings cycle up, level, down, level on the agent's own counter.
pub fn wing_frame(agent: &Agent) -> WingFrame {
    if agent.is_diving() {
        return WingFrame::Folded;
    }
    match agent.wing_phase() {
        0 => WingFrame::Up,
        2 => WingFrame::Down,
        _ => WingFrame::Level,
    }
}

/// Everything the scene needs besides the frame itself.
pub struct SceneView<'a> {
    pub title: &'a str,
    pub frame: &'a FrameView<'a>,
    pub config: &'a SimConfig,
    /// Agents at the start of the episode.
    pub population: usize,
    pub controls: &'a [(&'a str, &'a str)],
}

/// Render the playfield scene.
pub fn render_flappy(frame: &mut Frame, area: Rect, view: &SceneView<'_>) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" {} ", view.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Horizontal split: play area (left) | info panel (right)
    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(22)])
        .split(inner);

    // Left side: play area (top) + status bar (bottom 2 lines)
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(2)])
        .split(h_chunks[0]);

    render_play_area(frame, v_chunks[0], view);
    render_status_bar(frame, v_chunks[1], view);
    render_info_panel(frame, h_chunks[1], view);
}

#[derive(Clone, Copy)]
enum Cell {
    Sky,
    Pipe,
    Lip,
    Bird(WingFrame),
    Floor(bool),
}

fn play_area_cells(width: usize, height: usize, view: &SceneView<'_>) -> Vec<Vec<Cell>> {
    let config = view.config;
    let sky_rows = height.saturating_sub(1);
    let x_scale = width as f64 / config.playfield_width;
    let y_scale = sky_rows.max(1) as f64 / config.floor_y;
    let lip = PIPE_LIP_HEIGHT as f64;

    let mut grid = vec![vec![Cell::Sky; width]; height];

    for (display_row, row) in grid.iter_mut().enumerate().take(sky_rows) {
        let game_y = (display_row as f64 + 0.5) / y_scale;
        for (display_col, cell) in row.iter_mut().enumerate() {
            let game_x = (display_col as f64 + 0.5) / x_scale;
            for pipe in view.frame.obstacles {
                if game_x < pipe.x || game_x >= pipe.right_edge() {
                    continue;
                }
                if game_y < pipe.height - lip || game_y >= pipe.bottom + lip {
                    *cell = Cell::Pipe;
                } else if game_y < pipe.height || game_y >= pipe.bottom {
                    *cell = Cell::Lip;
                }
            }
        }
    }

    for agent in view.frame.agents {
        let cx = agent.x + config.bird_width as f64 / 2.0;
        let cy = agent.y + config.bird_height as f64 / 2.0;
        let col = (cx * x_scale).floor();
        let row = (cy * y_scale).floor();
        if col < 0.0 || row < 0.0 {
            continue;
        }
        let (col, row) = (col as usize, row as usize);
        if row < sky_rows && col < width {
            grid[row][col] = Cell::Bird(wing_frame(agent));
        }
    }

    if let Some(floor) = grid.last_mut().filter(|_| height > 1) {
        for (display_col, cell) in floor.iter_mut().enumerate() {
            let game_x = display_col as f64 / x_scale + view.frame.floor_offset;
            *cell = Cell::Floor((game_x / FLOOR_STRIPE) as u64 % 2 == 0);
        }
    }

    grid
}

/// Render the main play area with birds, pipes and the floor.
fn render_play_area(frame: &mut Frame, area: Rect, view: &SceneView<'_>) {
    let width = area.width as usize;
    let height = area.height as usize;

    if width == 0 || height == 0 {
        return;
    }

    let lines: Vec<Line> = play_area_cells(width, height, view)
        .into_iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .into_iter()
                .map(|cell| match cell {
                    Cell::Sky => Span::raw(" "),
                    Cell::Pipe => Span::styled("█", Style::default().fg(Color::Green)),
                    Cell::Lip => Span::styled("▓", Style::default().fg(Color::LightGreen)),
                    Cell::Bird(wings) => Span::styled(
                        wings.glyph(),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Cell::Floor(light) => Span::styled(
                        if light { "▒" } else { "░" },
                        Style::default().fg(Color::Rgb(222, 216, 149)),
                    ),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

/// Render the status line and the key hints below the play area.
fn render_status_bar(frame: &mut Frame, area: Rect, view: &SceneView<'_>) {
    if area.height < 1 {
        return;
    }

    let status = match view.config.target_score {
        Some(target) => format!("Score: {} / {}", view.frame.score, target),
        None => format!("Score: {}", view.frame.score),
    };
    frame.render_widget(
        Paragraph::new(status)
            .style(Style::default().fg(Color::Green))
            .alignment(Alignment::Center),
        Rect { height: 1, ..area },
    );

    if area.height >= 2 && !view.controls.is_empty() {
        let mut spans = Vec::new();
        for (i, (key, action)) in view.controls.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(*key, Style::default().fg(Color::White)));
            spans.push(Span::styled(
                format!(" {}", action),
                Style::default().fg(Color::DarkGray),
            ));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
            Rect {
                y: area.y + 1,
                height: 1,
                ..area
            },
        );
    }
}

fn stat_line(label: &str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {}: ", label), Style::default().fg(Color::DarkGray)),
        Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ])
}

/// Render the info panel on the right.
fn render_info_panel(frame: &mut Frame, area: Rect, view: &SceneView<'_>) {
    let block = Block::default()
        .title(" Info ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 2 || inner.width < 4 {
        return;
    }

    let mut lines = vec![
        stat_line("Score", view.frame.score.to_string(), Color::White),
        stat_line(
            "Alive",
            format!("{} / {}", view.frame.agents.len(), view.population),
            Color::Yellow,
        ),
    ];
    if view.frame.generation > 0 {
        lines.push(stat_line(
            "Gen",
            view.frame.generation.to_string(),
            Color::Cyan,
        ));
    }
    lines.push(stat_line("Tick", view.frame.tick.to_string(), Color::Gray));

    if let Some(target) = view.config.target_score {
        let progress = (view.frame.score as f64 / target as f64).min(1.0);
        let bar_width = (inner.width as usize).saturating_sub(4);
        let filled = (progress * bar_width as f64) as usize;
        let empty = bar_width.saturating_sub(filled);

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " Progress:",
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(vec![
            Span::raw(" "),
            Span::styled("█".repeat(filled), Style::default().fg(Color::Green)),
            Span::styled("░".repeat(empty), Style::default().fg(Color::DarkGray)),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Centered result box shown once an episode has ended.
pub fn render_episode_over(frame: &mut Frame, area: Rect, report: &EpisodeReport) {
    let (title, color, message) = match report.status {
        EpisodeStatus::EpisodeComplete => (
            "TARGET REACHED",
            Color::Green,
            format!("Passed {} pipes in {} ticks.", report.score, report.ticks),
        ),
        EpisodeStatus::AgentExhausted => (
            "CRASH!",
            Color::Red,
            format!("Passed {} pipes before crashing.", report.score),
        ),
        EpisodeStatus::TickLimit => (
            "TIME UP",
            Color::Yellow,
            format!("Passed {} pipes in {} ticks.", report.score, report.ticks),
        ),
        EpisodeStatus::Aborted => (
            "STOPPED",
            Color::Gray,
            format!("Stopped after {} pipes.", report.score),
        ),
        EpisodeStatus::Running => return,
    };

    let width = 44.min(area.width);
    let height = 7.min(area.height);
    let modal = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    frame.render_widget(Clear, modal);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    let inner = block.inner(modal);
    frame.render_widget(block, modal);

    let lines = vec![
        Line::from(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(Color::White))),
        Line::from(""),
        Line::from(Span::styled(
            "[Press any key]",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flappy::obstacle::ObstaclePair;
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_wing_cycle() {
        let mut agent = Agent::new(230.0, 350.0);
        let frames: Vec<WingFrame> = (0..20)
            .step_by(5)
            .map(|t| {
                agent.wing_ticks = t;
                wing_frame(&agent)
            })
            .collect();
        assert_eq!(
            frames,
            vec![
                WingFrame::Up,
                WingFrame::Level,
                WingFrame::Down,
                WingFrame::Level
            ]
        );
        agent.wing_ticks = 12;
        assert_eq!(wing_frame(&agent), WingFrame::Down);
    }

    #[test]
    fn test_wings_fold_in_dive() {
        let mut agent = Agent::new(230.0, 350.0);
        agent.tilt = -80.0;
        assert_eq!(wing_frame(&agent), WingFrame::Folded);
        agent.tilt = -79.0;
        assert_eq!(wing_frame(&agent), WingFrame::Up);
    }

    #[test]
    fn test_scene_draws_birds_pipes_and_panel() {
        let config = SimConfig::default();
        let agent = Agent::new(230.0, 350.0);
        let agents = [&agent];
        let obstacles = [ObstaclePair::with_height(400.0, 300.0, &config.obstacles)];
        let frame = FrameView {
            tick: 0,
            generation: 4,
            score: 2,
            agents: &agents,
            obstacles: &obstacles,
            floor_offset: 0.0,
        };
        let view = SceneView {
            title: "Training",
            frame: &frame,
            config: &config,
            population: 10,
            controls: &[("[Esc]", "Stop")],
        };

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal
            .draw(|f| render_flappy(f, f.size(), &view))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Training"));
        assert!(text.contains("1 / 10"));
        assert!(text.contains("Score: 2 / 35"));
        assert!(text.contains('▴'));
        assert!(text.contains('█'));
        assert!(text.contains('▒'));
    }

    #[test]
    fn test_episode_over_box() {
        let report = EpisodeReport {
            generation: 0,
            status: EpisodeStatus::AgentExhausted,
            ticks: 27,
            score: 0,
            fitness: vec![2.7],
            survivors: Vec::new(),
        };
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal
            .draw(|f| render_episode_over(f, f.size(), &report))
            .unwrap();
        assert!(buffer_text(&terminal).contains("CRASH!"));
    }
}
