#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player movement system that turns a target cell into a bounded move path.

use floating_maze_core::{CellCoord, Command, Event, Maze, DEFAULT_MOVE_RANGE};
use floating_maze_navigation::PathSearch;
use log::debug;

/// Pure system that reacts to world events and emits player move commands.
#[derive(Debug)]
pub struct Movement {
    base_range: u32,
    search: PathSearch,
    path: Vec<CellCoord>,
    round_active: bool,
}

impl Movement {
    /// Creates a movement system with the provided base hop budget.
    #[must_use]
    pub fn new(base_range: u32) -> Self {
        Self {
            base_range,
            search: PathSearch::default(),
            path: Vec::new(),
            round_active: true,
        }
    }

    /// Base hop budget before the corridor adjustment.
    #[must_use]
    pub const fn base_range(&self) -> u32 {
        self.base_range
    }

    /// Consumes world events and the player's intent to emit a move command.
    ///
    /// Nothing is emitted while no round is active, when the target lies
    /// beyond the current move range, or when the target is the player's cell.
    pub fn handle(
        &mut self,
        events: &[Event],
        maze: &Maze,
        player: CellCoord,
        intent: Option<CellCoord>,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::RoundStarted { .. } => self.round_active = true,
                Event::RoundEnded { .. } => self.round_active = false,
                _ => {}
            }
        }

        let Some(target) = intent else {
            return;
        };
        if !self.round_active {
            return;
        }

        let range = maze.move_range(player, self.base_range);
        self.search
            .find_path(maze, player, target, range, &mut self.path);
        if self.path.len() < 2 {
            debug!("no path from {player:?} to {target:?} within {range} hops");
            return;
        }

        out.push(Command::MovePlayer {
            path: self.path.clone(),
        });
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(DEFAULT_MOVE_RANGE)
    }
}
