//! Difficulty-driven dead-end injection.

use floating_maze_core::{CellCoord, Difficulty, Direction, Maze, Tile};
use rand::{seq::SliceRandom, Rng};

const MAX_BRANCHES: u32 = 100;
const MAX_BRANCH_LENGTH: u32 = 10;

/// Budget for the dead-end pass derived from the difficulty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeadEndPolicy {
    branch_budget: usize,
    max_branch_length: u32,
}

impl DeadEndPolicy {
    /// `min(difficulty, 100)` anchors, spurs of up to `clamp(difficulty / 10, 1, 10)` extensions.
    #[must_use]
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let level = difficulty.get();
        Self {
            branch_budget: level.min(MAX_BRANCHES) as usize,
            max_branch_length: (level / 10).clamp(1, MAX_BRANCH_LENGTH),
        }
    }

    /// Number of anchors that receive one spur attempt.
    #[must_use]
    pub const fn branch_budget(&self) -> usize {
        self.branch_budget
    }

    /// Upper bound on extensions carved after a spur's first cell.
    #[must_use]
    pub const fn max_branch_length(&self) -> u32 {
        self.max_branch_length
    }
}

/// Grows dead-end spurs off shuffled solution cells, returning how many were carved.
///
/// Each of the first `branch_budget` anchors gets exactly one attempt; an
/// anchor with no carvable neighbour simply contributes nothing. A cell is
/// only ever carved when it is a lonely wall, so its single open neighbour is
/// the cell the spur came from and the maze stays a tree.
pub(crate) fn inject<R: Rng + ?Sized>(
    maze: &mut Maze,
    policy: DeadEndPolicy,
    solution: &[CellCoord],
    rng: &mut R,
) -> u32 {
    let mut anchors: Vec<CellCoord> = solution
        .iter()
        .copied()
        .filter(|cell| maze.tile(*cell) == Some(Tile::Open) && maze.is_interior(*cell))
        .collect();
    anchors.shuffle(rng);

    let mut carved = 0;
    for anchor in anchors.into_iter().take(policy.branch_budget) {
        if carve_spur(maze, anchor, policy.max_branch_length, rng) {
            carved += 1;
        }
    }
    carved
}

fn carve_spur<R: Rng + ?Sized>(
    maze: &mut Maze,
    anchor: CellCoord,
    max_length: u32,
    rng: &mut R,
) -> bool {
    let mut directions = Direction::ALL;
    directions.shuffle(rng);

    let Some((mut heading, first)) = directions.iter().find_map(|direction| {
        anchor
            .step(*direction, 1)
            .filter(|cell| is_lonely_wall(maze, *cell))
            .map(|cell| (*direction, cell))
    }) else {
        return false;
    };
    maze.set_tile(first, Tile::Open);

    let length = rng.gen_range(1..=max_length);
    let mut current = first;
    for _ in 0..length {
        let Some(direction) = Direction::ALL
            .iter()
            .copied()
            .filter(|direction| *direction != heading.reverse())
            .collect::<Vec<_>>()
            .choose(rng)
            .copied()
        else {
            break;
        };

        let Some(next) = current
            .step(direction, 1)
            .filter(|cell| is_lonely_wall(maze, *cell))
        else {
            break;
        };

        maze.set_tile(next, Tile::Open);
        current = next;
        heading = direction;
    }

    true
}

/// Interior wall with at least three wall neighbours.
fn is_lonely_wall(maze: &Maze, cell: CellCoord) -> bool {
    maze.is_interior(cell) && maze.is_wall(cell) && maze.count_neighbors(cell, Tile::Wall) >= 3
}
