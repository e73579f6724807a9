use floating_maze_core::CellCoord;
use floating_maze_navigation::solution_path;
use floating_maze_world::{query, World};

/// Scripted player that walks toward the exit as far as each move allows.
#[derive(Debug)]
pub(crate) struct Autopilot {
    interval: u32,
    ticks: u32,
}

impl Autopilot {
    /// Creates an autopilot acting once every `interval` ticks.
    pub(crate) fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            ticks: 0,
        }
    }

    /// Restarts the interval count for a new round.
    pub(crate) fn reset(&mut self) {
        self.ticks = 0;
    }

    /// Chooses the next target cell, or `None` when it is not yet time to move.
    ///
    /// The target is the farthest cell on the route to the exit that the
    /// current move range covers.
    pub(crate) fn intent(&mut self, world: &World, base_range: u32) -> Option<CellCoord> {
        self.ticks = self.ticks.wrapping_add(1);
        if self.ticks % self.interval != 0 {
            return None;
        }

        let maze = query::maze(world)?;
        let player = query::player(world)?;
        let route = solution_path(maze, player, maze.exit());
        let reach = usize::try_from(maze.move_range(player, base_range)).unwrap_or(usize::MAX);
        let index = reach.min(route.len().checked_sub(1)?);
        (index > 0).then(|| route[index])
    }
}
