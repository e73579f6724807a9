#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Breadth-first path searches over a maze.
//!
//! Two entry points share one search: [`find_path`] honours a hop budget and
//! drives interactive player moves, while [`solution_path`] runs without a
//! budget and recovers the unique origin-to-exit route of a perfect maze.

use std::collections::VecDeque;

use floating_maze_core::{CellCoord, Maze};

/// Reusable breadth-first search workspace.
///
/// Buffers are kept between searches so per-input pathfinding does not
/// allocate once the workspace has grown to the maze size.
#[derive(Clone, Debug, Default)]
pub struct PathSearch {
    parents: Vec<Option<usize>>,
    queue: VecDeque<(CellCoord, u32)>,
}

impl PathSearch {
    /// Writes the shortest `start..=end` path with at most `max_steps` hops into `out`.
    ///
    /// `out` is cleared first and stays empty when either endpoint is outside
    /// the grid or on a wall, or when no path fits the budget. Every node at
    /// depth `max_steps` or less is explored before giving up.
    pub fn find_path(
        &mut self,
        maze: &Maze,
        start: CellCoord,
        end: CellCoord,
        max_steps: u32,
        out: &mut Vec<CellCoord>,
    ) {
        out.clear();

        if !maze.is_passable(start) || !maze.is_passable(end) {
            return;
        }

        let width = maze.width() as usize;
        let (Some(start_index), Some(end_index)) = (index(width, start), index(width, end)) else {
            return;
        };

        self.parents.clear();
        self.parents.resize(maze.dimensions().cell_count(), None);
        self.queue.clear();

        self.parents[start_index] = Some(start_index);
        self.queue.push_back((start, 0));

        let mut reached = false;
        while let Some((cell, steps)) = self.queue.pop_front() {
            if cell == end {
                reached = true;
                break;
            }

            if steps >= max_steps {
                continue;
            }

            let Some(cell_index) = index(width, cell) else {
                continue;
            };

            for (_, neighbor) in maze.neighbors(cell) {
                if !maze.is_passable(neighbor) {
                    continue;
                }

                let Some(neighbor_index) = index(width, neighbor) else {
                    continue;
                };

                if self.parents[neighbor_index].is_some() {
                    continue;
                }

                self.parents[neighbor_index] = Some(cell_index);
                self.queue.push_back((neighbor, steps + 1));
            }
        }

        if !reached {
            return;
        }

        let mut current = end_index;
        loop {
            out.push(cell_at(width, current));
            match self.parents[current] {
                Some(parent) if parent != current => current = parent,
                _ => break,
            }
        }
        out.reverse();
    }
}

/// Shortest `start..=end` path using at most `max_steps` hops, or an empty vector.
#[must_use]
pub fn find_path(maze: &Maze, start: CellCoord, end: CellCoord, max_steps: u32) -> Vec<CellCoord> {
    let mut path = Vec::new();
    PathSearch::default().find_path(maze, start, end, max_steps, &mut path);
    path
}

/// Unbounded search recovering the route between two cells.
///
/// On a perfect maze this is the unique solution path.
#[must_use]
pub fn solution_path(maze: &Maze, start: CellCoord, end: CellCoord) -> Vec<CellCoord> {
    find_path(maze, start, end, u32::MAX)
}

fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

fn cell_at(width: usize, index: usize) -> CellCoord {
    CellCoord::new((index % width) as u32, (index / width) as u32)
}
