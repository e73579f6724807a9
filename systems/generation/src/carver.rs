//! Randomized depth-first carver producing perfect mazes.

use floating_maze_core::{CellCoord, Direction, Maze, MazeDimensions, Tile};
use rand::{seq::SliceRandom, Rng};

/// Distance between neighbouring lattice cells.
const LATTICE_STEP: u32 = 2;

/// Pending work for one visited lattice cell: the directions not yet tried.
#[derive(Clone, Copy, Debug)]
struct Frame {
    cell: CellCoord,
    directions: [Direction; 4],
    next: usize,
}

impl Frame {
    fn shuffled<R: Rng + ?Sized>(cell: CellCoord, rng: &mut R) -> Self {
        let mut directions = Direction::ALL;
        directions.shuffle(rng);
        Self {
            cell,
            directions,
            next: 0,
        }
    }

    fn next_direction(&mut self) -> Option<Direction> {
        let direction = self.directions.get(self.next).copied()?;
        self.next += 1;
        Some(direction)
    }
}

/// Carves a spanning tree over the odd-offset lattice starting at the origin.
///
/// Every lattice cell inside the outer wall ring is opened exactly once, so
/// exactly one simple path joins any two open cells. The exit is stamped at
/// `(W-2, H-2)` afterwards.
pub(crate) fn carve_perfect<R: Rng + ?Sized>(dimensions: MazeDimensions, rng: &mut R) -> Maze {
    let mut maze = Maze::filled(dimensions);
    let origin = dimensions.origin();
    maze.set_tile(origin, Tile::Open);

    let mut stack = vec![Frame::shuffled(origin, rng)];
    while let Some(frame) = stack.last_mut() {
        let cell = frame.cell;
        let Some(direction) = frame.next_direction() else {
            let _ = stack.pop();
            continue;
        };

        let Some(neighbor) = cell.step(direction, LATTICE_STEP) else {
            continue;
        };
        if !maze.is_interior(neighbor) || !maze.is_wall(neighbor) {
            continue;
        }

        if let Some(passage) = cell.step(direction, 1) {
            maze.set_tile(passage, Tile::Open);
        }
        maze.set_tile(neighbor, Tile::Open);
        stack.push(Frame::shuffled(neighbor, rng));
    }

    maze.set_tile(dimensions.exit(), Tile::Exit);
    maze
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn every_lattice_cell_is_opened() {
        let dimensions = MazeDimensions::new(11, 9).expect("valid dimensions");
        let maze = carve_perfect(dimensions, &mut ChaCha8Rng::seed_from_u64(9));

        for row in (1..dimensions.height() - 1).step_by(2) {
            for column in (1..dimensions.width() - 1).step_by(2) {
                assert!(maze.is_passable(CellCoord::new(column, row)));
            }
        }
    }

    #[test]
    fn pillars_and_border_stay_solid() {
        let dimensions = MazeDimensions::new(9, 9).expect("valid dimensions");
        let maze = carve_perfect(dimensions, &mut ChaCha8Rng::seed_from_u64(2));

        for (cell, tile) in maze.cells() {
            let pillar = cell.column() % 2 == 0 && cell.row() % 2 == 0;
            if pillar || !maze.is_interior(cell) {
                assert_eq!(tile, Tile::Wall, "{cell:?} should be solid");
            }
        }
    }

    #[test]
    fn open_cells_form_a_tree() {
        let dimensions = MazeDimensions::new(15, 11).expect("valid dimensions");
        let maze = carve_perfect(dimensions, &mut ChaCha8Rng::seed_from_u64(77));

        let lattice_cells = ((15 - 1) / 2) * ((11 - 1) / 2);
        let passages = maze.passable_count() - lattice_cells;
        assert_eq!(passages, lattice_cells - 1);
    }
}
