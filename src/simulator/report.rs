//! Training report generation.

use crate::flappy::episode::{EpisodeReport, EpisodeStatus};
use serde::Serialize;

/// Summary of one evaluated generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    pub generation: u32,
    pub status: EpisodeStatus,
    pub ticks: u64,
    pub score: u32,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub survivors: usize,
}

impl GenerationReport {
    pub fn from_episode(episode: &EpisodeReport) -> Self {
        let count = episode.fitness.len().max(1) as f64;
        Self {
            generation: episode.generation,
            status: episode.status,
            ticks: episode.ticks,
            score: episode.score,
            best_fitness: episode
                .fitness
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max),
            mean_fitness: episode.fitness.iter().sum::<f64>() / count,
            survivors: episode.survivors.len(),
        }
    }
}

/// Aggregated results of a training run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrainingReport {
    pub generations: Vec<GenerationReport>,
    pub target_reached: bool,
    pub aborted: bool,
}

impl TrainingReport {
    pub fn best_score(&self) -> u32 {
        self.generations.iter().map(|g| g.score).max().unwrap_or(0)
    }

    pub fn best_fitness(&self) -> Option<f64> {
        self.generations
            .iter()
            .map(|g| g.best_fitness)
            .max_by(|a, b| a.total_cmp(b))
    }

    /// Human-readable summary.
    pub fn to_text(&self, verbosity: u8) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                      TRAINING REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        let outcome = if self.target_reached {
            "target reached"
        } else if self.aborted {
            "aborted"
        } else {
            "generation cap"
        };
        report.push_str(&format!(
            "  Generations: {}    Stopped: {}\n",
            self.generations.len(),
            outcome
        ));
        report.push_str(&format!("  Best Score:   {}\n", self.best_score()));
        if let Some(best) = self.best_fitness() {
            report.push_str(&format!("  Best Fitness: {:.1}\n", best));
        }

        if verbosity >= 2 && !self.generations.is_empty() {
            report.push_str("\n── GENERATIONS ──────────────────────────────────────────────────\n");
            report.push_str("  Gen    Score   Ticks    Best     Mean    Alive\n");
            report.push_str("  ───    ─────   ─────    ────     ────    ─────\n");
            for g in &self.generations {
                report.push_str(&format!(
                    "  {:4}   {:5}   {:5}   {:6.1}   {:6.1}   {:5}\n",
                    g.generation, g.score, g.ticks, g.best_fitness, g.mean_fitness, g.survivors
                ));
            }
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");
        report
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
