#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Floating Maze rounds headlessly.
//!
//! Each round is generated, then advanced with a fixed tick while an
//! autopilot walks the player toward the exit. The final grid is printed as
//! text and the round can be saved to or resumed from a JSON snapshot.

mod autopilot;
mod config;
mod render;

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use floating_maze_core::{Command, Event, RoundOutcome};
use floating_maze_generation::{MazeConfig, MazeGenerator};
use floating_maze_movement::Movement;
use floating_maze_world::{self as world, query, snapshot, World};
use log::{debug, info};

use self::{autopilot::Autopilot, config::SessionConfig, render::render};

/// Command-line arguments; explicit flags override the session file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML session file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Maze width in cells (odd, at least 5).
    #[arg(short = 'W', long)]
    width: Option<u32>,
    /// Maze height in cells (odd, at least 5).
    #[arg(short = 'H', long)]
    height: Option<u32>,
    /// Difficulty controlling how many dead ends are injected.
    #[arg(short, long)]
    difficulty: Option<u32>,
    /// Seed of the first round.
    #[arg(short, long)]
    seed: Option<u64>,
    /// Base player hop budget.
    #[arg(long)]
    move_range: Option<u32>,
    /// Number of rounds to play.
    #[arg(short, long)]
    rounds: Option<u32>,
    /// Tick limit per round.
    #[arg(long)]
    max_ticks: Option<u32>,
    /// Simulated milliseconds per tick.
    #[arg(long)]
    dt_ms: Option<u64>,
    /// Resume the round stored in this snapshot.
    #[arg(long)]
    load: Option<PathBuf>,
    /// Write the final round to this snapshot.
    #[arg(long)]
    save: Option<PathBuf>,
    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn session_config(&self) -> Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => SessionConfig::load(path)?,
            None => SessionConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(move_range) = self.move_range {
            config.move_range = move_range;
        }
        if let Some(rounds) = self.rounds {
            config.rounds = rounds;
        }
        if let Some(max_ticks) = self.max_ticks {
            config.max_ticks = max_ticks;
        }
        if let Some(dt_ms) = self.dt_ms {
            config.tick_ms = dt_ms;
        }
        Ok(config)
    }
}

/// Entry point for the Floating Maze command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
    debug!("starting with {args:?}");

    let config = args.session_config()?;
    let mut session = Session::new(&config)?;

    let mut maze_config = match &args.load {
        Some(path) => session.resume(path)?,
        None => MazeConfig::new(config.width, config.height, config.seed, config.difficulty)
            .context("invalid maze configuration")?,
    };

    let mut played = 0;
    if args.load.is_some() && query::is_round_active(&session.world) {
        let outcome = session.play_round(&config);
        report(&session.world, outcome);
        played += 1;
    }

    while played < config.rounds {
        session.start_round(maze_config)?;
        let outcome = session.play_round(&config);
        report(&session.world, outcome);
        maze_config = maze_config.next_round();
        played += 1;
    }

    if let (Some(maze), player) = (query::maze(&session.world), query::player(&session.world)) {
        print!("{}", render(maze, query::water_grid(&session.world), player));
    }

    if let Some(path) = &args.save {
        let json = snapshot::encode(&session.world).context("failed to encode snapshot")?;
        fs::write(path, json)
            .with_context(|| format!("failed to write snapshot to {}", path.display()))?;
        info!("saved round to {}", path.display());
    }

    Ok(())
}

/// World plus the systems driving it.
struct Session {
    world: World,
    movement: Movement,
    autopilot: Autopilot,
    events: Vec<Event>,
}

impl Session {
    fn new(config: &SessionConfig) -> Result<Self> {
        let mut session = Self {
            world: World::new(),
            movement: Movement::new(config.move_range),
            autopilot: Autopilot::new(config.autopilot_interval),
            events: Vec::new(),
        };
        let tuning = config.water.tuning()?;
        world::apply(
            &mut session.world,
            Command::ConfigureWater { tuning },
            &mut session.events,
        );
        world::apply(
            &mut session.world,
            Command::ConfigureMovement {
                base_range: config.move_range,
            },
            &mut session.events,
        );
        Ok(session)
    }

    /// Restores a snapshot and returns the configuration of the round after it.
    fn resume(&mut self, path: &Path) -> Result<MazeConfig> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot at {}", path.display()))?;
        snapshot::restore(&mut self.world, &json, &mut self.events)
            .with_context(|| format!("failed to restore snapshot from {}", path.display()))?;

        let (Some(maze), Some(difficulty)) =
            (query::maze(&self.world), query::difficulty(&self.world))
        else {
            anyhow::bail!("snapshot restored without a round");
        };
        let current = MazeConfig::from_parts(maze.dimensions(), query::seed(&self.world), difficulty);
        Ok(current.next_round())
    }

    fn start_round(&mut self, config: MazeConfig) -> Result<()> {
        let generated = MazeGenerator::new(config.seed())
            .generate(config)
            .context("maze generation failed")?;
        debug!(
            "solution length {}, {} spurs",
            generated.solution.len(),
            generated.spurs
        );
        world::apply(
            &mut self.world,
            generated.into_start_command(),
            &mut self.events,
        );
        self.autopilot.reset();
        Ok(())
    }

    fn play_round(&mut self, config: &SessionConfig) -> RoundOutcome {
        let dt = Duration::from_millis(config.tick_ms);
        for _ in 0..config.max_ticks {
            world::apply(&mut self.world, Command::Tick { dt }, &mut self.events);

            let intent = self
                .autopilot
                .intent(&self.world, self.movement.base_range());
            let mut commands = Vec::new();
            if let (Some(maze), Some(player)) =
                (query::maze(&self.world), query::player(&self.world))
            {
                self.movement
                    .handle(&self.events, maze, player, intent, &mut commands);
            }

            self.events.clear();
            for command in commands {
                world::apply(&mut self.world, command, &mut self.events);
            }

            if !query::is_round_active(&self.world) {
                break;
            }
        }

        query::outcome(&self.world).unwrap_or(RoundOutcome::Continue)
    }
}

fn report(world: &World, outcome: RoundOutcome) {
    let seconds = query::elapsed(world).as_secs_f64();
    match outcome {
        RoundOutcome::Won => println!("round {} won in {seconds:.2}s", query::round(world)),
        RoundOutcome::Flooded => {
            println!("round {} flooded after {seconds:.2}s", query::round(world));
        }
        RoundOutcome::Continue => {
            println!("round {} unfinished after {seconds:.2}s", query::round(world));
        }
    }
}
