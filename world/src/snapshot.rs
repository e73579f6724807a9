//! JSON persistence of the active round.
//!
//! A snapshot carries everything needed to resume a round: maze, player
//! cell, seed, difficulty, elapsed round time and the full water state. The
//! water random stream is not persisted; it is reseeded from the round seed
//! on restore.

use std::{collections::VecDeque, time::Duration};

use floating_maze_core::{
    CellCoord, Difficulty, Event, Maze, RoundOutcome, WaterEvent, WaterGrid, WaterParameters,
};
use floating_maze_water::WaterSimulator;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{Session, World};

/// Serialized form of a round in progress.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateSnapshot {
    /// Cell the player occupies.
    pub player_pos: CellCoord,
    /// Maze rows using `#`, space and `E`.
    pub maze: Maze,
    /// Seed the maze was generated from, if any.
    pub seed: Option<u64>,
    /// Seconds of simulated time since the round started.
    pub time_elapsed: f64,
    /// Difficulty the maze was shaped with.
    pub difficulty: Difficulty,
    /// Wet/dry rows.
    pub water_grid: WaterGrid,
    /// Pending fronts as `[column, row, direction]` triples.
    pub water_queue: Vec<WaterEvent>,
    /// Accumulated spread time and active rates.
    pub water_parameters: WaterParameters,
    /// One-based round index.
    #[serde(default = "first_round")]
    pub round: u32,
    /// Outcome of the round at capture time.
    #[serde(default = "continuing")]
    pub outcome: RoundOutcome,
}

fn first_round() -> u32 {
    1
}

fn continuing() -> RoundOutcome {
    RoundOutcome::Continue
}

/// Failures raised while saving or restoring a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// There is no round to capture.
    #[error("no round has been started")]
    NoRound,
    /// The document is not valid snapshot JSON.
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
    /// The water grid does not match the maze.
    #[error("water grid is {water:?} but the maze is {maze:?}")]
    DimensionMismatch {
        /// Maze `(width, height)`.
        maze: (u32, u32),
        /// Water grid `(width, height)`.
        water: (u32, u32),
    },
    /// The player stands outside the grid or on a wall.
    #[error("player position {0:?} is not a passable cell")]
    PlayerOnWall(CellCoord),
    /// A queued front sits outside the grid or on a wall.
    #[error("water front at {0:?} is not a passable cell")]
    QueueOutOfBounds(CellCoord),
    /// The water grid marks a wall as wet.
    #[error("wall at {0:?} is marked wet")]
    WetWall(CellCoord),
    /// A queued front sits on a cell the water has not reached.
    #[error("water front at {0:?} is on a dry cell")]
    DryFront(CellCoord),
    /// Round indices start at one.
    #[error("round index must be at least 1")]
    ZeroRound,
    /// Elapsed time is negative or not finite.
    #[error("elapsed time {0} is not a valid duration")]
    InvalidElapsed(f64),
    /// Water parameters contain negative or non-finite values.
    #[error("water parameters {0:?} are out of range")]
    InvalidWaterParameters(WaterParameters),
}

/// Captures the current round, or `None` before the first round.
#[must_use]
pub fn capture(world: &World) -> Option<GameStateSnapshot> {
    let session = world.session.as_ref()?;
    Some(GameStateSnapshot {
        player_pos: session.player,
        maze: session.maze.clone(),
        seed: session.seed,
        time_elapsed: session.elapsed.as_secs_f64(),
        difficulty: session.difficulty,
        water_grid: session.water.grid().clone(),
        water_queue: session.water.queue().iter().copied().collect(),
        water_parameters: session.water.parameters(),
        round: world.round,
        outcome: session.outcome,
    })
}

/// Encodes the current round as pretty-printed JSON.
pub fn encode(world: &World) -> Result<String, SnapshotError> {
    let snapshot = capture(world).ok_or(SnapshotError::NoRound)?;
    Ok(serde_json::to_string_pretty(&snapshot)?)
}

/// Parses and validates a JSON snapshot without touching any world.
pub fn decode(json: &str) -> Result<GameStateSnapshot, SnapshotError> {
    parse(json).map(|(snapshot, _)| snapshot)
}

/// Replaces the world's round with the decoded snapshot.
///
/// The world is left untouched when the document is rejected. On success a
/// [`Event::RoundStarted`] is emitted for the resumed round.
pub fn restore(
    world: &mut World,
    json: &str,
    out_events: &mut Vec<Event>,
) -> Result<(), SnapshotError> {
    let (snapshot, elapsed) = match parse(json) {
        Ok(parsed) => parsed,
        Err(error) => {
            warn!("snapshot rejected: {error}");
            return Err(error);
        }
    };

    let GameStateSnapshot {
        player_pos,
        maze,
        seed,
        difficulty,
        water_grid,
        water_queue,
        water_parameters,
        round,
        outcome,
        ..
    } = snapshot;

    let water = WaterSimulator::from_parts(
        &maze,
        world.water_tuning,
        water_grid,
        VecDeque::from(water_queue),
        water_parameters,
        seed,
    );
    info!(
        "restored round {round} at {:.2}s on a {}x{} maze",
        elapsed.as_secs_f64(),
        maze.width(),
        maze.height()
    );

    world.round = round;
    world.session = Some(Session {
        maze,
        player: player_pos,
        seed,
        difficulty,
        elapsed,
        water,
        outcome,
    });
    out_events.push(Event::RoundStarted { round, seed });
    Ok(())
}

fn parse(json: &str) -> Result<(GameStateSnapshot, Duration), SnapshotError> {
    let snapshot: GameStateSnapshot = serde_json::from_str(json)?;
    let elapsed = validate(&snapshot)?;
    Ok((snapshot, elapsed))
}

fn validate(snapshot: &GameStateSnapshot) -> Result<Duration, SnapshotError> {
    let maze = &snapshot.maze;
    let maze_dimensions = (maze.width(), maze.height());
    let water_dimensions = snapshot.water_grid.dimensions();
    if maze_dimensions != water_dimensions {
        return Err(SnapshotError::DimensionMismatch {
            maze: maze_dimensions,
            water: water_dimensions,
        });
    }

    if !maze.is_passable(snapshot.player_pos) {
        return Err(SnapshotError::PlayerOnWall(snapshot.player_pos));
    }

    if let Some(front) = snapshot
        .water_queue
        .iter()
        .find(|front| !maze.is_passable(front.cell))
    {
        return Err(SnapshotError::QueueOutOfBounds(front.cell));
    }

    let water = &snapshot.water_grid;
    if let Some(cell) = water.wet_cells().find(|cell| !maze.is_passable(*cell)) {
        return Err(SnapshotError::WetWall(cell));
    }
    if let Some(front) = snapshot
        .water_queue
        .iter()
        .find(|front| !water.is_wet(front.cell))
    {
        return Err(SnapshotError::DryFront(front.cell));
    }

    if snapshot.round == 0 {
        return Err(SnapshotError::ZeroRound);
    }

    let parameters = snapshot.water_parameters;
    let in_range = |value: f64| value.is_finite() && value >= 0.0;
    if !(in_range(parameters.elapsed) && in_range(parameters.normal) && in_range(parameters.downward))
    {
        return Err(SnapshotError::InvalidWaterParameters(parameters));
    }

    Duration::try_from_secs_f64(snapshot.time_elapsed)
        .map_err(|_| SnapshotError::InvalidElapsed(snapshot.time_elapsed))
}
