//! Scenario runner: single generations, full training runs and champion replay.
//!
//! Every function here drives [`Episode`] to a terminal status; none of them
//! duplicate tick logic.

use super::champion::ChampionRecord;
use super::config::TrainConfig;
use super::report::{GenerationReport, TrainingReport};
use crate::brain::breeder::Breeder;
use crate::brain::controller::Controller;
use crate::core::config::SimConfig;
use crate::core::error::SimError;
use crate::flappy::episode::{Episode, EpisodeContext, EpisodeReport, EpisodeStatus};
use crate::flappy::render::Renderer;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Bind one agent to each controller and run a single episode to its end.
pub fn run_generation<C, R, D>(
    ctx: &EpisodeContext,
    controllers: &mut [C],
    rng: &mut R,
    renderer: &mut D,
    stop: &AtomicBool,
) -> Result<EpisodeReport, SimError>
where
    C: Controller,
    R: Rng + ?Sized,
    D: Renderer + ?Sized,
{
    let mut episode = Episode::new(ctx, controllers, rng);
    episode.run(rng, renderer, stop)?;
    Ok(episode.report())
}

/// Results of [`run_training`].
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub report: TrainingReport,
    pub champion: Option<ChampionRecord>,
}

/// Evolve the breeder's population until the target score is reached, the
/// generation cap is hit, or `stop` is raised.
///
/// The champion is the lead survivor of the generation that reached the target,
/// otherwise the highest-fitness controller seen in any generation.
pub fn run_training<B, R, D>(
    train: &TrainConfig,
    sim: SimConfig,
    breeder: &mut B,
    rng: &mut R,
    renderer: &mut D,
    stop: &AtomicBool,
) -> Result<TrainingOutcome, SimError>
where
    B: Breeder + ?Sized,
    R: Rng,
    D: Renderer + ?Sized,
{
    train.validate()?;
    let mut ctx = EpisodeContext::new(sim)?;
    let mut report = TrainingReport::default();
    let mut champion: Option<ChampionRecord> = None;

    for _ in 0..train.generations {
        if stop.load(Ordering::Relaxed) {
            report.aborted = true;
            break;
        }
        let generation = ctx.advance_generation();
        let mut controllers = breeder.population().to_vec();
        let episode = run_generation(&ctx, &mut controllers, rng, renderer, stop)?;

        let completed = episode.status == EpisodeStatus::EpisodeComplete;
        let pick = if completed {
            episode.survivors.first().copied()
        } else {
            episode.best()
        };
        if let Some(index) = pick {
            let fitness = episode.fitness[index];
            let improved = completed || champion.as_ref().map_or(true, |c| fitness > c.fitness);
            if improved {
                if let Some(network) = breeder.population().get(index) {
                    champion = Some(ChampionRecord::new(
                        generation,
                        fitness,
                        episode.score,
                        network.clone(),
                    ));
                }
            }
        }

        let summary = GenerationReport::from_episode(&episode);
        info!(
            generation,
            score = summary.score,
            ticks = summary.ticks,
            best = summary.best_fitness,
            mean = summary.mean_fitness,
            alive = summary.survivors,
            "generation finished"
        );
        report.generations.push(summary);

        match episode.status {
            EpisodeStatus::EpisodeComplete => {
                report.target_reached = true;
                info!(generation, score = episode.score, "target score reached");
                break;
            }
            EpisodeStatus::Aborted => {
                report.aborted = true;
                break;
            }
            _ => breeder.advance(&episode.fitness, rng),
        }
    }

    Ok(TrainingOutcome { report, champion })
}

/// Fly a champion alone through a fresh episode.
pub fn replay<R, D>(
    record: &ChampionRecord,
    ctx: &EpisodeContext,
    rng: &mut R,
    renderer: &mut D,
    stop: &AtomicBool,
) -> Result<EpisodeReport, SimError>
where
    R: Rng + ?Sized,
    D: Renderer + ?Sized,
{
    let mut controllers = [record.controller()];
    run_generation(ctx, &mut controllers, rng, renderer, stop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::breeder::ElitistBreeder;
    use crate::brain::controller::Scripted;
    use crate::flappy::render::NullRenderer;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_run_generation_reports_every_controller() {
        let ctx = EpisodeContext::new(SimConfig::default()).unwrap();
        let mut controllers = vec![Scripted::NeverFlap, Scripted::AlwaysFlap];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let report = run_generation(
            &ctx,
            &mut controllers,
            &mut rng,
            &mut NullRenderer,
            &AtomicBool::new(false),
        )
        .unwrap();
        assert_eq!(report.fitness.len(), 2);
        assert_eq!(report.status, EpisodeStatus::AgentExhausted);
        assert!(report.survivors.is_empty());
    }

    #[test]
    fn test_training_runs_to_generation_cap() {
        let train = TrainConfig::quick(11);
        let sim = SimConfig {
            max_ticks: Some(300),
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut breeder = ElitistBreeder::new(
            train.population_size,
            &train.hidden_layers,
            train.elite,
            train.mutation_rate,
            train.mutation_power,
            &mut rng,
        );
        let outcome = run_training(
            &train,
            sim,
            &mut breeder,
            &mut rng,
            &mut NullRenderer,
            &AtomicBool::new(false),
        )
        .unwrap();

        let gens = &outcome.report.generations;
        assert!(!gens.is_empty() && gens.len() <= 5);
        let numbers: Vec<u32> = gens.iter().map(|g| g.generation).collect();
        let expected: Vec<u32> = (1..=gens.len() as u32).collect();
        assert_eq!(numbers, expected);
        assert!(!outcome.report.aborted);
        let champion = outcome.champion.unwrap();
        let best = outcome.report.best_fitness().unwrap();
        assert!(champion.fitness <= best + 1e-9);
    }

    #[test]
    fn test_training_stops_when_signalled() {
        let train = TrainConfig::quick(1);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut breeder = ElitistBreeder::new(10, &[], 2, 0.3, 0.5, &mut rng);
        let outcome = run_training(
            &train,
            SimConfig::default(),
            &mut breeder,
            &mut rng,
            &mut NullRenderer,
            &AtomicBool::new(true),
        )
        .unwrap();
        assert!(outcome.report.aborted);
        assert!(outcome.report.generations.is_empty());
        assert!(outcome.champion.is_none());
    }

    #[test]
    fn test_training_rejects_invalid_config() {
        let train = TrainConfig {
            population_size: 0,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut breeder = ElitistBreeder::new(1, &[], 1, 0.3, 0.5, &mut rng);
        let result = run_training(
            &train,
            SimConfig::default(),
            &mut breeder,
            &mut rng,
            &mut NullRenderer,
            &AtomicBool::new(false),
        );
        assert!(matches!(result, Err(SimError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_replay_is_deterministic() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let network = crate::brain::network::FeedForwardNetwork::random(&[], &mut rng);
        let record = ChampionRecord::new(1, 0.0, 0, network);
        let ctx = EpisodeContext::new(SimConfig {
            max_ticks: Some(400),
            ..Default::default()
        })
        .unwrap();

        let stop = AtomicBool::new(false);
        let a = replay(&record, &ctx, &mut ChaCha8Rng::seed_from_u64(8), &mut NullRenderer, &stop)
            .unwrap();
        let b = replay(&record, &ctx, &mut ChaCha8Rng::seed_from_u64(8), &mut NullRenderer, &stop)
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.fitness.len(), 1);
    }
}
