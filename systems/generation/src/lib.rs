#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded maze generation system.
//!
//! A round's maze is produced in three passes: a randomized depth-first
//! carver builds a perfect maze, a breadth-first search recovers its unique
//! solution path, and a difficulty-driven injector grows dead-end spurs off
//! that path without opening a second route.

use floating_maze_core::{CellCoord, Command, ConfigError, Difficulty, Maze, MazeDimensions};
use floating_maze_navigation::solution_path;
use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

mod carver;
mod dead_ends;

pub use dead_ends::DeadEndPolicy;

/// Offset applied to the seed between consecutive rounds.
pub const ROUND_SEED_STRIDE: u64 = 11;

/// Validated parameters for a single maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MazeConfig {
    dimensions: MazeDimensions,
    seed: Option<u64>,
    difficulty: Difficulty,
}

impl MazeConfig {
    /// Validates dimensions and difficulty before any carving happens.
    pub fn new(
        width: u32,
        height: u32,
        seed: Option<u64>,
        difficulty: u32,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            dimensions: MazeDimensions::new(width, height)?,
            seed,
            difficulty: Difficulty::new(difficulty)?,
        })
    }

    /// Builds a configuration from already validated parts.
    #[must_use]
    pub const fn from_parts(
        dimensions: MazeDimensions,
        seed: Option<u64>,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            dimensions,
            seed,
            difficulty,
        }
    }

    /// Dimensions of the maze to carve.
    #[must_use]
    pub const fn dimensions(&self) -> MazeDimensions {
        self.dimensions
    }

    /// Seed feeding the generator, if any.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Difficulty shaping the dead-end pass.
    #[must_use]
    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Configuration for the following round: same shape, seed advanced by
    /// [`ROUND_SEED_STRIDE`].
    #[must_use]
    pub fn next_round(&self) -> Self {
        Self {
            seed: self
                .seed
                .map(|seed| seed.wrapping_add(ROUND_SEED_STRIDE)),
            ..*self
        }
    }
}

/// Failures that abort maze generation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// The requested configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The carver left the exit unreachable; the lattice invariant is broken.
    #[error("carved maze does not connect {origin:?} to {exit:?}")]
    Disconnected {
        /// Start cell of the search.
        origin: CellCoord,
        /// Exit cell that could not be reached.
        exit: CellCoord,
    },
}

/// Output of a generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedMaze {
    /// Final maze including injected dead ends.
    pub maze: Maze,
    /// Origin-to-exit route of the perfect maze, ordered from the origin.
    pub solution: Vec<CellCoord>,
    /// Number of anchors that produced a spur.
    pub spurs: u32,
    /// Configuration the maze was generated from.
    pub config: MazeConfig,
}

impl GeneratedMaze {
    /// Converts the result into the command that starts a round on it.
    #[must_use]
    pub fn into_start_command(self) -> Command {
        Command::StartRound {
            maze: self.maze,
            seed: self.config.seed(),
            difficulty: self.config.difficulty(),
        }
    }
}

/// Maze generator owning its random stream.
#[derive(Clone, Debug)]
pub struct MazeGenerator {
    rng: ChaCha8Rng,
}

impl MazeGenerator {
    /// Creates a generator seeded from `seed`, or from entropy when absent.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);
        Self { rng }
    }

    /// Carves a perfect maze, then injects dead ends according to the difficulty.
    pub fn generate(&mut self, config: MazeConfig) -> Result<GeneratedMaze, GenerationError> {
        let dimensions = config.dimensions();
        let mut maze = carver::carve_perfect(dimensions, &mut self.rng);

        let origin = dimensions.origin();
        let exit = dimensions.exit();
        let solution = solution_path(&maze, origin, exit);
        if solution.is_empty() {
            return Err(GenerationError::Disconnected { origin, exit });
        }

        let policy = DeadEndPolicy::for_difficulty(config.difficulty());
        let spurs = dead_ends::inject(&mut maze, policy, &solution, &mut self.rng);
        debug!(
            "generated {}x{} maze: solution length {}, {} spurs from {} attempts",
            dimensions.width(),
            dimensions.height(),
            solution.len(),
            spurs,
            policy.branch_budget().min(solution.len()),
        );

        Ok(GeneratedMaze {
            maze,
            solution,
            spurs,
            config,
        })
    }
}

/// Generates a maze for the provided configuration values.
pub fn generate(
    width: u32,
    height: u32,
    seed: Option<u64>,
    difficulty: u32,
) -> Result<GeneratedMaze, GenerationError> {
    let config = MazeConfig::new(width, height, seed, difficulty)?;
    MazeGenerator::new(seed).generate(config)
}
