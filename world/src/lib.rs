#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Floating Maze.
//!
//! The world owns the active round: its maze, the player's cell, the round
//! clock and the water simulator. Every mutation flows through [`apply`],
//! which reports what changed as [`Event`] values.

use std::time::Duration;

use floating_maze_core::{
    CellCoord, Command, Difficulty, Event, Maze, MoveError, RoundOutcome, WaterTuning,
    DEFAULT_MOVE_RANGE,
};
use floating_maze_water::{WaterPhase, WaterSimulator};
use log::{info, warn};

pub mod snapshot;

/// Represents the authoritative Floating Maze world state.
#[derive(Debug)]
pub struct World {
    water_tuning: WaterTuning,
    move_range: u32,
    round: u32,
    session: Option<Session>,
}

impl World {
    /// Creates an idle world with default water tuning and no round.
    #[must_use]
    pub fn new() -> Self {
        Self {
            water_tuning: WaterTuning::default(),
            move_range: DEFAULT_MOVE_RANGE,
            round: 0,
            session: None,
        }
    }

    fn next_round_index(&self) -> u32 {
        match self.session.as_ref().map(|session| session.outcome) {
            Some(RoundOutcome::Won) => self.round.saturating_add(1),
            Some(RoundOutcome::Continue) => self.round.max(1),
            Some(RoundOutcome::Flooded) | None => 1,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// State of the round being played.
#[derive(Debug)]
struct Session {
    maze: Maze,
    player: CellCoord,
    seed: Option<u64>,
    difficulty: Difficulty,
    elapsed: Duration,
    water: WaterSimulator,
    outcome: RoundOutcome,
}

impl Session {
    fn is_active(&self) -> bool {
        !self.outcome.is_terminal()
    }

    /// Exit takes precedence over water on the same cell.
    fn resolve_outcome(&mut self) -> RoundOutcome {
        if self.player == self.maze.exit() {
            self.outcome = RoundOutcome::Won;
        } else if self.water.grid().is_wet(self.player) {
            self.outcome = RoundOutcome::Flooded;
        }
        self.outcome
    }

    fn validate_path(&self, path: &[CellCoord], base_range: u32) -> Result<(), MoveError> {
        let Some(first) = path.first() else {
            return Err(MoveError::EmptyPath);
        };
        if *first != self.player {
            return Err(MoveError::DetachedStart);
        }
        if path.iter().any(|cell| !self.maze.is_passable(*cell)) {
            return Err(MoveError::Blocked);
        }
        if path
            .windows(2)
            .any(|pair| pair[0].direction_to(pair[1]).is_none())
        {
            return Err(MoveError::NotContiguous);
        }
        let hops = path.len() - 1;
        let range = self.maze.move_range(self.player, base_range);
        if hops > range as usize {
            return Err(MoveError::OutOfRange);
        }
        Ok(())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureWater { tuning } => {
            world.water_tuning = tuning;
        }
        Command::ConfigureMovement { base_range } => {
            world.move_range = base_range;
        }
        Command::StartRound {
            maze,
            seed,
            difficulty,
        } => {
            let round = world.next_round_index();
            let water = WaterSimulator::for_round(&maze, world.water_tuning, round, seed);
            info!(
                "round {round} started on a {}x{} maze (seed {seed:?}, difficulty {})",
                maze.width(),
                maze.height(),
                difficulty.get()
            );

            world.round = round;
            world.session = Some(Session {
                player: maze.origin(),
                maze,
                seed,
                difficulty,
                elapsed: Duration::ZERO,
                water,
                outcome: RoundOutcome::Continue,
            });
            out_events.push(Event::RoundStarted { round, seed });
        }
        Command::Tick { dt } => {
            let round = world.round;
            let Some(session) = world.session.as_mut().filter(|session| session.is_active())
            else {
                return;
            };

            session.elapsed = session.elapsed.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });

            let mut flooded = Vec::new();
            let phase = session
                .water
                .update(&session.maze, session.elapsed, dt, &mut flooded);
            if phase == WaterPhase::Released {
                out_events.push(Event::WaterReleased {
                    origin: session.water.origin(),
                });
            } else if !flooded.is_empty() {
                out_events.push(Event::CellsFlooded { cells: flooded });
            }

            finish_if_terminal(session, round, out_events);
        }
        Command::MovePlayer { path } => {
            let round = world.round;
            let base_range = world.move_range;
            let Some(session) = world.session.as_mut().filter(|session| session.is_active())
            else {
                warn!("move rejected: no active round");
                out_events.push(Event::MoveRejected {
                    reason: MoveError::RoundInactive,
                });
                return;
            };

            if let Err(reason) = session.validate_path(&path, base_range) {
                warn!("move rejected: {reason:?}");
                out_events.push(Event::MoveRejected { reason });
                return;
            }

            let from = session.player;
            let to = path.last().copied().unwrap_or(from);
            session.player = to;
            out_events.push(Event::PlayerMoved {
                from,
                to,
                steps: u32::try_from(path.len() - 1).unwrap_or(u32::MAX),
            });

            finish_if_terminal(session, round, out_events);
        }
    }
}

fn finish_if_terminal(session: &mut Session, round: u32, out_events: &mut Vec<Event>) {
    let outcome = session.resolve_outcome();
    if outcome.is_terminal() {
        info!(
            "round {round} ended {outcome:?} after {:.2}s",
            session.elapsed.as_secs_f64()
        );
        out_events.push(Event::RoundEnded { round, outcome });
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::{collections::VecDeque, time::Duration};

    use super::World;
    use floating_maze_core::{
        CellCoord, Difficulty, Maze, RoundOutcome, WaterEvent, WaterGrid, WaterParameters,
        WaterTuning,
    };

    /// Maze of the current round, if one was started.
    #[must_use]
    pub fn maze(world: &World) -> Option<&Maze> {
        world.session.as_ref().map(|session| &session.maze)
    }

    /// Cell the player occupies.
    #[must_use]
    pub fn player(world: &World) -> Option<CellCoord> {
        world.session.as_ref().map(|session| session.player)
    }

    /// One-based index of the current round; zero before the first round.
    #[must_use]
    pub fn round(world: &World) -> u32 {
        world.round
    }

    /// Outcome of the current round, if one was started.
    #[must_use]
    pub fn outcome(world: &World) -> Option<RoundOutcome> {
        world.session.as_ref().map(|session| session.outcome)
    }

    /// Reports whether a round is in progress.
    #[must_use]
    pub fn is_round_active(world: &World) -> bool {
        world.session.as_ref().is_some_and(|session| session.is_active())
    }

    /// Seed of the current round's maze.
    #[must_use]
    pub fn seed(world: &World) -> Option<u64> {
        world.session.as_ref().and_then(|session| session.seed)
    }

    /// Difficulty of the current round.
    #[must_use]
    pub fn difficulty(world: &World) -> Option<Difficulty> {
        world.session.as_ref().map(|session| session.difficulty)
    }

    /// Simulated time since the current round started.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world
            .session
            .as_ref()
            .map_or(Duration::ZERO, |session| session.elapsed)
    }

    /// Wet/dry grid of the current round.
    #[must_use]
    pub fn water_grid(world: &World) -> Option<&WaterGrid> {
        world.session.as_ref().map(|session| session.water.grid())
    }

    /// Pending water fronts of the current round.
    #[must_use]
    pub fn water_queue(world: &World) -> Option<&VecDeque<WaterEvent>> {
        world.session.as_ref().map(|session| session.water.queue())
    }

    /// Accumulated spread time and active rates of the current round.
    #[must_use]
    pub fn water_parameters(world: &World) -> Option<WaterParameters> {
        world
            .session
            .as_ref()
            .map(|session| session.water.parameters())
    }

    /// Water tuning applied to newly started rounds.
    #[must_use]
    pub fn water_tuning(world: &World) -> WaterTuning {
        world.water_tuning
    }

    /// Base hop budget that bounds player moves.
    #[must_use]
    pub fn move_range(world: &World) -> u32 {
        world.move_range
    }
}
