#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Floating Maze engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems such as the maze generator
//! and the movement planner produce [`Command`] values, the world executes
//! those commands via its `apply` entry point, and then broadcasts [`Event`]
//! values describing what changed. Grid data ([`Maze`], [`WaterGrid`]) lives
//! here so every crate agrees on the same arena-indexed layout.

use std::time::Duration;

use serde::{Deserialize, Serialize};

mod maze;
mod water;

pub use maze::{Maze, MazeParseError, Tile};
pub use water::{
    GridShapeError, SpreadDirection, WaterEvent, WaterGrid, WaterParameters, WaterTuning,
};

/// Smallest permitted maze side length measured in cells.
pub const MIN_MAZE_SIDE: u32 = 5;

/// Hop budget granted on an ordinary corridor cell.
pub const DEFAULT_MOVE_RANGE: u32 = 20;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the water tuning applied to subsequent rounds.
    ConfigureWater {
        /// Delay and base rates used by the water simulator.
        tuning: WaterTuning,
    },
    /// Replaces the base hop budget that bounds every player move.
    ConfigureMovement {
        /// Budget before the corridor adjustment of [`Maze::move_range`].
        base_range: u32,
    },
    /// Begins a new round on a freshly generated maze.
    StartRound {
        /// Fully carved maze the round is played on.
        maze: Maze,
        /// Seed the maze was generated from, if any.
        seed: Option<u64>,
        /// Difficulty the maze was shaped with.
        difficulty: Difficulty,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the player walk along the provided path.
    MovePlayer {
        /// Contiguous cells beginning at the player's current cell.
        path: Vec<CellCoord>,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Announces that a new round began.
    RoundStarted {
        /// One-based index of the round within the current streak.
        round: u32,
        /// Seed the round's maze was generated from, if any.
        seed: Option<u64>,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Reports that the dormant water was released at its origin.
    WaterReleased {
        /// Cell that became wet first.
        origin: CellCoord,
    },
    /// Reports cells that turned wet during a tick, in discovery order.
    CellsFlooded {
        /// Newly wet cells.
        cells: Vec<CellCoord>,
    },
    /// Confirms that the player moved.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after the move.
        to: CellCoord,
        /// Number of hops walked.
        steps: u32,
    },
    /// Reports that a move request was rejected.
    MoveRejected {
        /// Specific reason the move failed.
        reason: MoveError,
    },
    /// Announces that the active round finished.
    RoundEnded {
        /// Index of the round that finished.
        round: u32,
        /// Terminal outcome of the round.
        outcome: RoundOutcome,
    },
}

/// Round status signal surfaced to adapters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundOutcome {
    /// The round is still being played.
    Continue,
    /// The player reached the exit.
    Won,
    /// Water reached the player's cell.
    Flooded,
}

impl RoundOutcome {
    /// Reports whether the outcome ends the round.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Continue)
    }
}

/// Reasons a move request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveError {
    /// No round is in progress.
    RoundInactive,
    /// The path contained no cells.
    EmptyPath,
    /// The path does not begin at the player's cell.
    DetachedStart,
    /// Two consecutive path cells are not cardinal neighbours.
    NotContiguous,
    /// The path crosses a wall or leaves the grid.
    Blocked,
    /// The path walks more hops than the move range allows.
    OutOfRange,
}

/// Cardinal directions on the maze grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// All four directions in clockwise order starting north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Reports whether travelling this way increases the row index.
    #[must_use]
    pub const fn is_downward(self) -> bool {
        matches!(self, Self::South)
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Serialized as a two element `[column, row]` array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Cell `distance` steps away in `direction`, or `None` on underflow/overflow.
    #[must_use]
    pub fn step(self, direction: Direction, distance: u32) -> Option<CellCoord> {
        match direction {
            Direction::North => self
                .row
                .checked_sub(distance)
                .map(|row| Self::new(self.column, row)),
            Direction::East => self
                .column
                .checked_add(distance)
                .map(|column| Self::new(column, self.row)),
            Direction::South => self
                .row
                .checked_add(distance)
                .map(|row| Self::new(self.column, row)),
            Direction::West => self
                .column
                .checked_sub(distance)
                .map(|column| Self::new(column, self.row)),
        }
    }

    /// Direction leading from `self` to an adjacent `to`, if they are neighbours.
    #[must_use]
    pub fn direction_to(self, to: CellCoord) -> Option<Direction> {
        let column_diff = self.column.abs_diff(to.column);
        let row_diff = self.row.abs_diff(to.row);

        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if to.column > self.column {
                Some(Direction::East)
            } else {
                Some(Direction::West)
            }
        } else if to.row > self.row {
            Some(Direction::South)
        } else {
            Some(Direction::North)
        }
    }
}

impl From<[u32; 2]> for CellCoord {
    fn from([column, row]: [u32; 2]) -> Self {
        Self::new(column, row)
    }
}

impl From<CellCoord> for [u32; 2] {
    fn from(cell: CellCoord) -> Self {
        [cell.column, cell.row]
    }
}

/// Grid axis named in configuration errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal extent.
    Width,
    /// Vertical extent.
    Height,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Width => write!(f, "width"),
            Self::Height => write!(f, "height"),
        }
    }
}

/// Rejections raised while validating round configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Carving aligns to a 2-step lattice, so both sides must be odd.
    #[error("maze {axis} must be odd, got {value}")]
    EvenDimension {
        /// Offending axis.
        axis: Axis,
        /// Requested side length.
        value: u32,
    },
    /// The requested side is below [`MIN_MAZE_SIDE`].
    #[error("maze {axis} must be at least {minimum}, got {value}")]
    DimensionTooSmall {
        /// Offending axis.
        axis: Axis,
        /// Requested side length.
        value: u32,
        /// Smallest accepted side length.
        minimum: u32,
    },
    /// Difficulty levels start at one.
    #[error("difficulty must be at least 1")]
    ZeroDifficulty,
}

/// Validated maze dimensions: both sides odd and at least [`MIN_MAZE_SIDE`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MazeDimensions {
    width: u32,
    height: u32,
}

impl MazeDimensions {
    /// Validates and wraps the provided side lengths.
    pub fn new(width: u32, height: u32) -> Result<Self, ConfigError> {
        validate_side(Axis::Width, width)?;
        validate_side(Axis::Height, height)?;
        Ok(Self { width, height })
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Cell where the player and the water both start.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        CellCoord::new(1, 1)
    }

    /// Cell holding the exit.
    #[must_use]
    pub const fn exit(&self) -> CellCoord {
        CellCoord::new(self.width - 2, self.height - 2)
    }
}

fn validate_side(axis: Axis, value: u32) -> Result<(), ConfigError> {
    if value < MIN_MAZE_SIDE {
        return Err(ConfigError::DimensionTooSmall {
            axis,
            value,
            minimum: MIN_MAZE_SIDE,
        });
    }
    if value % 2 == 0 {
        return Err(ConfigError::EvenDimension { axis, value });
    }
    Ok(())
}

/// Difficulty level controlling how many dead ends are injected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Difficulty(u32);

impl Difficulty {
    /// Difficulty used when the player does not pick one.
    pub const DEFAULT: Difficulty = Difficulty(32);

    /// Validates the provided level; zero is rejected.
    pub fn new(value: u32) -> Result<Self, ConfigError> {
        if value == 0 {
            return Err(ConfigError::ZeroDifficulty);
        }
        Ok(Self(value))
    }

    /// Retrieves the numeric level.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for Difficulty {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Difficulty> for u32 {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.0
    }
}
