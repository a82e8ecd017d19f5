//! Klonamari main entry point.
//!
//! Runs a headless katamari session: a sphere rolls around a seeded scene,
//! rolling up whatever is light enough and shedding it again on hard hits.
//!
//! Built on:
//! - **bevy_ecs** for entity-component-system architecture
//! - **configparser** for `config.ini`
//! - **clap** for the command line
//!
//! # Main Loop
//!
//! 1. Load `config.ini` (defaults when missing), apply CLI overrides
//! 2. Build the world: resources, observers, scene
//! 3. Announce the chosen input source on the notification bus
//! 4. Step the schedule a fixed number of ticks
//! 5. Optionally print the final game model as JSON
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --input orbit --ticks 7200 --report
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use bevy_ecs::prelude::*;
use clap::{Parser, ValueEnum};
use log::{error, info, warn};

use klonamari::game::{build_schedule, reset_game, setup_world, step};
use klonamari::resources::gameconfig::GameConfig;
use klonamari::resources::gamemodel::GameModel;
use klonamari::resources::input::{IdleInput, OrbitInput, ScriptedInput, SharedInput};
use klonamari::resources::notificationbus::NotificationBus;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum InputKind {
    /// Stand still.
    Idle,
    /// Circle around the starting point.
    Orbit,
    /// Play a fixed demo path.
    Scripted,
}

impl InputKind {
    fn source(self) -> SharedInput {
        match self {
            InputKind::Idle => Arc::new(IdleInput),
            InputKind::Orbit => Arc::new(OrbitInput::default()),
            InputKind::Scripted => Arc::new(ScriptedInput::demo()),
        }
    }
}

#[derive(Parser)]
#[command(version, about = "Headless katamari simulation: roll things up, grow, shed them on hard hits.")]
struct Cli {
    /// Configuration file (default: ./config.ini).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of ticks to simulate (overrides [session] ticks).
    #[arg(long)]
    ticks: Option<u64>,

    /// Scene seed (overrides [session] seed).
    #[arg(long)]
    seed: Option<u64>,

    /// Input source driving the katamari.
    #[arg(long, value_enum, default_value_t = InputKind::Orbit)]
    input: InputKind,

    /// Start a fresh session every N ticks.
    #[arg(long, value_name = "N")]
    reset_every: Option<u64>,

    /// Print the final game model as JSON.
    #[arg(long)]
    report: bool,

    /// Write the effective configuration to the config path and exit.
    #[arg(long)]
    write_config: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GameConfig::with_path(path),
        None => GameConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        warn!("{e}; using defaults");
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(ticks) = cli.ticks {
        config.ticks = ticks;
    }

    if cli.write_config {
        if let Err(e) = config.save_to_file() {
            error!("{e}");
            std::process::exit(1);
        }
        return;
    }

    // --------------- ECS world ---------------
    let mut world = World::new();
    setup_world(&mut world, &config);
    world
        .resource_mut::<NotificationBus>()
        .input_changed
        .publish(&cli.input.source());

    let mut update = build_schedule();
    let dt = config.tick_seconds();

    // --------------- Main loop ---------------
    info!("Running {} ticks at {} Hz", config.ticks, config.tick_rate);
    for tick in 1..=config.ticks {
        step(&mut world, &mut update, dt);

        if let Some(every) = cli.reset_every
            && every > 0
            && tick % every == 0
            && tick < config.ticks
        {
            reset_game(&mut world);
        }
    }

    let model = world.resource::<GameModel>();
    info!(
        "Session over: {} collected, radius {:.3}/{:.3}, victory: {}",
        model.collected, model.radius, model.target_radius, model.victory
    );

    if cli.report {
        match serde_json::to_string_pretty(model) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!("Failed to serialize report: {e}");
                std::process::exit(1);
            }
        }
    }
}
