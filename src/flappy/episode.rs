//! Population simulation loop.
//!
//! One call to [`Episode::tick`] is one logical frame. The order of the steps
//! inside a tick is observable (it decides who is alive to collect a pass
//! bonus, which obstacle a bird sees, and when pipes are pruned), so it is
//! fixed:
//!
//! 1. pick the relevant obstacle from the lead agent's position
//! 2. move every agent, pay the survival reward, ask its controller
//! 3. per obstacle: eliminate colliding agents, latch passes, flag exits, scroll
//! 4. on a pass: score, pay the pass bonus, spawn one new obstacle
//! 5. prune flagged obstacles
//! 6. eliminate agents outside the playfield
//! 7. settle the status
//!
//! Obstacle spawns and removals are deferred to steps 4-5, so every agent in a
//! tick observes the same obstacle layout.

use super::mask::{overlaps, Sprites};
use super::obstacle::ObstaclePair;
use super::render::{FrameView, Renderer};
use super::roster::{AgentId, Roster};
use crate::brain::controller::{Controller, Observation};
use crate::core::config::SimConfig;
use crate::core::constants::{FLOOR_VELOCITY, FLOOR_WIDTH};
use crate::core::error::{ControllerFault, SimError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// Episode state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodeStatus {
    Running,
    /// Every agent has been eliminated.
    AgentExhausted,
    /// The target score was reached with at least one agent alive.
    EpisodeComplete,
    /// Stopped by an external signal.
    Aborted,
    /// Reached the configured tick cap.
    TickLimit,
}

impl EpisodeStatus {
    pub fn is_terminal(self) -> bool {
        self != Self::Running
    }
}

/// Why an agent left the episode.
#[derive(Debug, Clone, PartialEq)]
pub enum Elimination {
    Collision,
    ControllerFault(ControllerFault),
    OutOfBounds,
}

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub status: EpisodeStatus,
    /// Obstacle the controllers observed this tick.
    pub relevant_obstacle: usize,
    /// A pass was scored and a new obstacle spawned.
    pub spawned: bool,
    /// `(controller, reason)` for every agent removed this tick.
    pub eliminated: Vec<(usize, Elimination)>,
}

/// Shared, read-only inputs for every episode of a training run.
#[derive(Debug, Clone)]
pub struct EpisodeContext {
    generation: u32,
    config: SimConfig,
    sprites: Sprites,
}

impl EpisodeContext {
    /// Validate `config` and build the collision masks it describes.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let sprites = Sprites::new(&config);
        Ok(Self {
            generation: 0,
            config,
            sprites,
        })
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn sprites(&self) -> &Sprites {
        &self.sprites
    }

    /// Move on to the next generation and return its number.
    pub fn advance_generation(&mut self) -> u32 {
        self.generation += 1;
        self.generation
    }
}

/// Final numbers for an episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    pub generation: u32,
    pub status: EpisodeStatus,
    pub ticks: u64,
    pub score: u32,
    /// Fitness per controller, in controller order.
    pub fitness: Vec<f64>,
    /// Controller handles still alive at the end, in assignment order.
    pub survivors: Vec<usize>,
}

impl EpisodeReport {
    /// Controller with the highest fitness (first one on ties).
    pub fn best(&self) -> Option<usize> {
        self.fitness
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, &f)| match best {
                Some((_, bf)) if bf >= f => best,
                _ => Some((i, f)),
            })
            .map(|(i, _)| i)
    }
}

/// Obstacle the birds should steer for: the second pair once the lead agent is
/// past the first pair's right edge (bounding-box check only).
pub fn relevant_obstacle_index(lead_x: Option<f64>, obstacles: &[ObstaclePair]) -> usize {
    match lead_x {
        Some(x) if obstacles.len() > 1 && x > obstacles[0].right_edge() => 1,
        _ => 0,
    }
}

fn observe(y: f64, obstacle: Option<&ObstaclePair>) -> Observation {
    match obstacle {
        Some(o) => Observation::new(y, o.height, o.bottom),
        None => Observation::new(y, y, y),
    }
}

/// One run of the simulation over a borrowed set of controllers.
pub struct Episode<'c, C> {
    ctx: &'c EpisodeContext,
    controllers: &'c mut [C],
    roster: Roster,
    obstacles: Vec<ObstaclePair>,
    score: u32,
    tick: u64,
    status: EpisodeStatus,
    /// Set when this tick's pass reached the target score.
    target_reached: bool,
}

impl<'c, C: Controller> Episode<'c, C> {
    /// Bind one agent per controller and place the first obstacle.
    pub fn new<R: Rng + ?Sized>(
        ctx: &'c EpisodeContext,
        controllers: &'c mut [C],
        rng: &mut R,
    ) -> Self {
        let obstacles = vec![ObstaclePair::spawn(
            ctx.config.obstacles.first_x,
            &ctx.config.obstacles,
            rng,
        )];
        Self::with_obstacles(ctx, controllers, obstacles)
    }

    /// Bind one agent per controller with an explicit obstacle layout.
    pub fn with_obstacles(
        ctx: &'c EpisodeContext,
        controllers: &'c mut [C],
        obstacles: Vec<ObstaclePair>,
    ) -> Self {
        let roster = Roster::spawn(controllers.len(), ctx.config.bird_x, ctx.config.bird_y);
        Self {
            ctx,
            controllers,
            roster,
            obstacles,
            score: 0,
            tick: 0,
            status: EpisodeStatus::Running,
            target_reached: false,
        }
    }

    pub fn status(&self) -> EpisodeStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn obstacles(&self) -> &[ObstaclePair] {
        &self.obstacles
    }

    /// Mark the episode aborted. Takes effect between ticks only.
    pub fn abort(&mut self) {
        if !self.status.is_terminal() {
            self.status = EpisodeStatus::Aborted;
        }
    }

    /// Advance one frame.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TickReport {
        let ctx = self.ctx;
        let config = &ctx.config;
        let mut report = TickReport {
            tick: self.tick,
            status: self.status,
            relevant_obstacle: 0,
            spawned: false,
            eliminated: Vec::new(),
        };
        if self.status.is_terminal() {
            return report;
        }
        if self.roster.is_empty() {
            self.status = EpisodeStatus::AgentExhausted;
            report.status = self.status;
            return report;
        }

        self.tick += 1;
        report.tick = self.tick;

        // 1. Relevant obstacle.
        let relevant =
            relevant_obstacle_index(self.roster.lead().map(|r| r.agent.x), &self.obstacles);
        report.relevant_obstacle = relevant;

        // 2. Move, reward, decide.
        let ids = self.roster.ids();
        let mut faulted: Vec<(AgentId, ControllerFault)> = Vec::new();
        for &id in &ids {
            let Some(record) = self.roster.get_mut(id) else {
                continue;
            };
            record.agent.advance_tick(&config.physics);
            record.fitness += config.scoring.survival_reward;

            let observation = observe(record.agent.y, self.obstacles.get(relevant));
            let Some(controller) = self.controllers.get_mut(record.controller) else {
                continue;
            };
            match controller.decide(&observation) {
                Ok(decision) if decision.is_finite() => {
                    if decision > config.scoring.jump_threshold {
                        record.agent.apply_impulse(&config.physics);
                    }
                }
                Ok(decision) => faulted.push((id, ControllerFault::NonFinite(decision))),
                Err(fault) => faulted.push((id, fault)),
            }
        }
        for (id, fault) in faulted {
            if let Some(record) = self.roster.remove(id, config.scoring.collision_penalty) {
                warn!(
                    generation = ctx.generation,
                    tick = self.tick,
                    controller = record.controller,
                    %fault,
                    "controller fault, eliminating agent"
                );
                report
                    .eliminated
                    .push((record.controller, Elimination::ControllerFault(fault)));
            }
        }

        // 3. Collisions, pass latch, exit flags, scrolling.
        let mut spawn = false;
        let mut exited = Vec::with_capacity(self.obstacles.len());
        for obstacle in self.obstacles.iter_mut() {
            let mut crashed = Vec::new();
            for id in self.roster.ids() {
                let Some(record) = self.roster.get(id) else {
                    continue;
                };
                if overlaps(&record.agent, obstacle, &ctx.sprites) {
                    crashed.push(id);
                }
                // A bird crashing into the pair still latches its pass.
                if obstacle.passed_by(record.agent.x) {
                    spawn = true;
                }
            }
            for id in crashed {
                if let Some(record) = self.roster.remove(id, config.scoring.collision_penalty) {
                    debug!(tick = self.tick, controller = record.controller, "collision");
                    report
                        .eliminated
                        .push((record.controller, Elimination::Collision));
                }
            }

            exited.push(obstacle.has_exited(0.0));
            obstacle.advance_tick();
        }

        // 4. Score and spawn.
        if spawn {
            self.score += 1;
            for record in self.roster.iter_mut() {
                record.fitness += config.scoring.pass_bonus;
            }
            self.obstacles.push(ObstaclePair::spawn(
                config.obstacles.respawn_x,
                &config.obstacles,
                rng,
            ));
            self.target_reached = config.target_score.is_some_and(|t| self.score >= t);
            report.spawned = true;
            debug!(tick = self.tick, score = self.score, "obstacle passed");
        }

        // 5. Prune obstacles flagged before they moved.
        let mut index = 0;
        self.obstacles.retain(|_| {
            let keep = !exited.get(index).copied().unwrap_or(false);
            index += 1;
            keep
        });

        // 6. Floor and ceiling.
        let bird_height = config.bird_height as f64;
        for id in self.roster.ids() {
            let out = self
                .roster
                .get(id)
                .is_some_and(|r| r.agent.y + bird_height > config.floor_y || r.agent.y < 0.0);
            if out {
                if let Some(record) = self.roster.remove(id, 0.0) {
                    debug!(tick = self.tick, controller = record.controller, "out of bounds");
                    report
                        .eliminated
                        .push((record.controller, Elimination::OutOfBounds));
                }
            }
        }

        // 7. Settle.
        self.status = if self.roster.is_empty() {
            EpisodeStatus::AgentExhausted
        } else if self.target_reached {
            EpisodeStatus::EpisodeComplete
        } else if config.max_ticks.is_some_and(|max| self.tick >= max) {
            EpisodeStatus::TickLimit
        } else {
            EpisodeStatus::Running
        };
        report.status = self.status;
        report
    }

    /// Snapshot for the renderer.
    pub fn draw<D: Renderer + ?Sized>(&self, renderer: &mut D) -> Result<(), SimError> {
        let agents: Vec<_> = self.roster.iter().map(|r| &r.agent).collect();
        let frame = FrameView {
            tick: self.tick,
            generation: self.ctx.generation,
            score: self.score,
            agents: &agents,
            obstacles: &self.obstacles,
            floor_offset: (self.tick as f64 * FLOOR_VELOCITY) % FLOOR_WIDTH,
        };
        renderer.draw(&frame)
    }

    /// Tick until a terminal status, drawing every running frame.
    ///
    /// `stop` is checked once before each tick.
    pub fn run<R: Rng + ?Sized, D: Renderer + ?Sized>(
        &mut self,
        rng: &mut R,
        renderer: &mut D,
        stop: &AtomicBool,
    ) -> Result<EpisodeStatus, SimError> {
        while !self.status.is_terminal() {
            if stop.load(Ordering::Relaxed) {
                self.abort();
                break;
            }
            let report = self.tick(rng);
            if report.status == EpisodeStatus::Running {
                self.draw(renderer)?;
            }
        }
        Ok(self.status)
    }

    pub fn report(&self) -> EpisodeReport {
        EpisodeReport {
            generation: self.ctx.generation,
            status: self.status,
            ticks: self.tick,
            score: self.score,
            fitness: self.roster.fitness(),
            survivors: self.roster.survivors(),
        }
    }
}
