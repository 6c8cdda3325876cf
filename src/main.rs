//! Flappy NEAT - CLI entry point.

use clap::{Parser, Subcommand};
use flappy_neat::brain::ElitistBreeder;
use flappy_neat::build_info;
use flappy_neat::core::{SimConfig, SimError};
use flappy_neat::flappy::{EpisodeContext, EpisodeReport, EpisodeStatus, NullRenderer};
use flappy_neat::simulator::{
    replay, run_generation, run_training, ChampionRecord, TrainConfig,
};
use flappy_neat::ui::{FlapLatch, KeyboardController, TerminalRenderer, TerminalSession};
use flappy_neat::utils::persistence::{
    data_path, load_json, load_json_or_default, save_json, CONFIG_FILE, TRAIN_CONFIG_FILE,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flappy-neat")]
#[command(about = "Flappy Bird simulation with a neuroevolution training harness")]
#[command(disable_version_flag = true)]
struct Cli {
    /// Show version information
    #[arg(short = 'v', long)]
    version: bool,

    /// Simulation config (JSON). Defaults to ~/.flappy-neat/config.json
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evolve controllers until one reaches the target score
    Train {
        /// Training config (JSON). Defaults to ~/.flappy-neat/train.json
        #[arg(short, long)]
        train_config: Option<PathBuf>,

        /// Generation cap
        #[arg(short, long)]
        generations: Option<u32>,

        /// Controllers per generation
        #[arg(short, long)]
        population: Option<usize>,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Draw every generation in the terminal
        #[arg(short, long)]
        watch: bool,

        /// Watch the champion fly once training ends
        #[arg(short, long)]
        replay: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fly the bird yourself
    Play {
        /// Random seed for the pipe layout
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Write the default config files
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("{}", build_info::version_line());
        return ExitCode::SUCCESS;
    }

    let Some(command) = cli.command else {
        eprintln!("No command given. Run 'flappy-neat --help' for usage.");
        return ExitCode::FAILURE;
    };

    let interactive = match &command {
        Commands::Train { watch, replay, .. } => *watch || *replay,
        Commands::Play { .. } => true,
        Commands::Init { .. } => false,
    };
    init_tracing(interactive);

    let result = match command {
        Commands::Train {
            train_config,
            generations,
            population,
            seed,
            watch,
            replay,
            json,
        } => load_configs(cli.config.as_deref(), train_config.as_deref()).and_then(
            |(sim, mut train)| {
                if let Some(generations) = generations {
                    train.generations = generations;
                }
                if let Some(population) = population {
                    train.population_size = population;
                    train.elite = train.elite.min(population);
                }
                if seed.is_some() {
                    train.seed = seed;
                }
                train_controllers(sim, train, watch, replay, json)
            },
        ),
        Commands::Play { seed } => {
            load_sim_config(cli.config.as_deref()).and_then(|sim| play(sim, seed))
        }
        Commands::Init { force } => init(force),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr. Terminal commands stay silent unless RUST_LOG asks otherwise,
/// so log lines never tear the TUI.
fn init_tracing(interactive: bool) {
    let default = if interactive { "off" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_sim_config(path: Option<&Path>) -> Result<SimConfig, SimError> {
    match path {
        Some(path) => load_json(path),
        None => load_json_or_default(&data_path(CONFIG_FILE)?),
    }
}

fn load_configs(
    sim_path: Option<&Path>,
    train_path: Option<&Path>,
) -> Result<(SimConfig, TrainConfig), SimError> {
    let sim = load_sim_config(sim_path)?;
    let train = match train_path {
        Some(path) => load_json(path)?,
        None => load_json_or_default(&data_path(TRAIN_CONFIG_FILE)?)?,
    };
    Ok((sim, train))
}

fn rng_for(seed: Option<u64>) -> (ChaCha8Rng, u64) {
    let seed = seed.unwrap_or_else(rand::random);
    (ChaCha8Rng::seed_from_u64(seed), seed)
}

fn train_controllers(
    sim: SimConfig,
    train: TrainConfig,
    watch: bool,
    show_champion: bool,
    json: bool,
) -> Result<(), SimError> {
    train.validate()?;
    let (mut rng, seed) = rng_for(train.seed);
    info!(
        seed,
        population = train.population_size,
        generations = train.generations,
        "training started"
    );

    let mut breeder = ElitistBreeder::new(
        train.population_size,
        &train.hidden_layers,
        train.elite,
        train.mutation_rate,
        train.mutation_power,
        &mut rng,
    );
    let stop = Arc::new(AtomicBool::new(false));

    let outcome = if watch {
        let session = TerminalSession::start()?;
        let mut renderer = TerminalRenderer::new(session, "Training", sim.clone(), stop.clone());
        renderer.set_population(train.population_size);
        run_training(&train, sim.clone(), &mut breeder, &mut rng, &mut renderer, &stop)?
    } else {
        run_training(&train, sim.clone(), &mut breeder, &mut rng, &mut NullRenderer, &stop)?
    };

    if json {
        println!("{}", outcome.report.to_json());
    } else if train.verbosity > 0 {
        print!("{}", outcome.report.to_text(train.verbosity));
        println!("  Seed: {}", seed);
    }

    let Some(champion) = outcome.champion else {
        return Ok(());
    };
    info!(
        generation = champion.generation,
        score = champion.score,
        fitness = champion.fitness,
        "champion selected"
    );
    if !json && train.verbosity > 0 {
        println!("{}", champion.summary());
    }
    if show_champion && !stop.load(Ordering::Relaxed) {
        replay_champion(sim, &champion, &mut rng)?;
    }
    Ok(())
}

fn play(sim: SimConfig, seed: Option<u64>) -> Result<(), SimError> {
    let (mut rng, _) = rng_for(seed);
    let ctx = EpisodeContext::new(sim.clone())?;
    let latch = FlapLatch::default();
    let mut controllers = [KeyboardController::new(latch.clone())];
    let stop = Arc::new(AtomicBool::new(false));

    let session = TerminalSession::start()?;
    let mut renderer =
        TerminalRenderer::new(session, "Flappy Bird", sim, stop.clone()).with_flap_latch(latch);
    renderer.set_population(1);
    let report = run_generation(&ctx, &mut controllers, &mut rng, &mut renderer, &stop)?;
    finish_interactive(renderer, &report)
}

fn replay_champion(
    sim: SimConfig,
    record: &ChampionRecord,
    rng: &mut ChaCha8Rng,
) -> Result<(), SimError> {
    let ctx = EpisodeContext::new(sim.clone())?;
    let stop = Arc::new(AtomicBool::new(false));

    let title = format!("Champion (gen {})", record.generation);
    let session = TerminalSession::start()?;
    let mut renderer = TerminalRenderer::new(session, title, sim, stop.clone());
    renderer.set_population(1);
    let report = replay(record, &ctx, rng, &mut renderer, &stop)?;
    finish_interactive(renderer, &report)
}

fn finish_interactive(
    mut renderer: TerminalRenderer,
    report: &EpisodeReport,
) -> Result<(), SimError> {
    if report.status != EpisodeStatus::Aborted {
        renderer.show_result(report)?;
    }
    // Leave the alternate screen before printing.
    drop(renderer);
    println!("Score: {} ({} ticks)", report.score, report.ticks);
    Ok(())
}

fn init(force: bool) -> Result<(), SimError> {
    let files = [
        (data_path(CONFIG_FILE)?, serde_json::to_value(SimConfig::default())),
        (
            data_path(TRAIN_CONFIG_FILE)?,
            serde_json::to_value(TrainConfig::default()),
        ),
    ];
    for (path, value) in files {
        if path.exists() && !force {
            println!("Keeping existing {}", path.display());
            continue;
        }
        let value = value.map_err(|e| SimError::Persistence(e.to_string()))?;
        save_json(&path, &value)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}
