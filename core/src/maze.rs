//! Dense tile grid describing a single round's maze.

use serde::{Deserialize, Serialize};

use crate::{CellCoord, ConfigError, Direction, MazeDimensions};

/// State of a single maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    /// Solid, impassable cell.
    Wall,
    /// Carved corridor cell.
    Open,
    /// The single goal cell.
    Exit,
}

impl Tile {
    /// Reports whether the player and the water may enter the tile.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Self::Wall)
    }

    /// Character used by the textual grid encoding.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Open => ' ',
            Self::Exit => 'E',
        }
    }

    /// Parses a character of the textual grid encoding.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '#' => Some(Self::Wall),
            ' ' => Some(Self::Open),
            'E' => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Errors raised while rebuilding a maze from its textual rows.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MazeParseError {
    /// The row dimensions do not describe a valid maze lattice.
    #[error(transparent)]
    InvalidDimensions(#[from] ConfigError),
    /// A row length differs from the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Index of the offending row.
        row: usize,
        /// Width established by the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A character outside the tile alphabet was found.
    #[error("unknown tile symbol {symbol:?} at ({column}, {row})")]
    UnknownTile {
        /// Column of the symbol.
        column: u32,
        /// Row of the symbol.
        row: u32,
        /// Offending character.
        symbol: char,
    },
    /// The exit is missing, duplicated, or not at `(W-2, H-2)`.
    #[error("maze must contain exactly one exit at ({column}, {row})")]
    MisplacedExit {
        /// Expected exit column.
        column: u32,
        /// Expected exit row.
        row: u32,
    },
    /// The origin cell is a wall.
    #[error("maze origin (1, 1) must be open")]
    BlockedOrigin,
}

/// Fixed-size rectangular maze stored in row-major order.
///
/// Serialized as a list of strings, one per row, using `#` for walls, a space
/// for open cells and `E` for the exit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Maze {
    dimensions: MazeDimensions,
    tiles: Vec<Tile>,
}

impl Maze {
    /// Creates a maze consisting entirely of walls.
    #[must_use]
    pub fn filled(dimensions: MazeDimensions) -> Self {
        Self {
            dimensions,
            tiles: vec![Tile::Wall; dimensions.cell_count()],
        }
    }

    /// Dimensions of the maze.
    #[must_use]
    pub const fn dimensions(&self) -> MazeDimensions {
        self.dimensions
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.dimensions.width()
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.dimensions.height()
    }

    /// Cell where the player and the water start.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.dimensions.origin()
    }

    /// Cell holding the exit.
    #[must_use]
    pub const fn exit(&self) -> CellCoord {
        self.dimensions.exit()
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width() && cell.row() < self.height()
    }

    /// Reports whether the cell lies strictly inside the outer wall ring.
    #[must_use]
    pub fn is_interior(&self, cell: CellCoord) -> bool {
        cell.column() >= 1
            && cell.row() >= 1
            && cell.column() < self.width() - 1
            && cell.row() < self.height() - 1
    }

    /// Tile stored at the cell, or `None` outside the grid.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<Tile> {
        self.index(cell).map(|index| self.tiles[index])
    }

    /// Overwrites the tile at the cell. Cells outside the grid are ignored.
    pub fn set_tile(&mut self, cell: CellCoord, tile: Tile) {
        if let Some(index) = self.index(cell) {
            self.tiles[index] = tile;
        }
    }

    /// Reports whether the cell exists and is Open or Exit.
    #[must_use]
    pub fn is_passable(&self, cell: CellCoord) -> bool {
        self.tile(cell).is_some_and(Tile::is_passable)
    }

    /// Reports whether the cell exists and is a wall.
    #[must_use]
    pub fn is_wall(&self, cell: CellCoord) -> bool {
        self.tile(cell) == Some(Tile::Wall)
    }

    /// In-bounds cardinal neighbours of the cell paired with their direction.
    pub fn neighbors(&self, cell: CellCoord) -> impl Iterator<Item = (Direction, CellCoord)> + '_ {
        Direction::ALL.into_iter().filter_map(move |direction| {
            cell.step(direction, 1)
                .filter(|neighbor| self.contains(*neighbor))
                .map(|neighbor| (direction, neighbor))
        })
    }

    /// Number of cardinal neighbours holding exactly `tile`.
    #[must_use]
    pub fn count_neighbors(&self, cell: CellCoord, tile: Tile) -> usize {
        self.neighbors(cell)
            .filter(|(_, neighbor)| self.tile(*neighbor) == Some(tile))
            .count()
    }

    /// Hop budget a player standing on `cell` may walk in one move.
    ///
    /// Only open neighbours count; the exit does not. Exactly two open
    /// neighbours halve `base`, three or more raise it by a fifth.
    #[must_use]
    pub fn move_range(&self, cell: CellCoord, base: u32) -> u32 {
        match self.count_neighbors(cell, Tile::Open) {
            2 => base / 2,
            count if count >= 3 => base.saturating_mul(6) / 5,
            _ => base,
        }
    }

    /// Iterator over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, Tile)> + '_ {
        let width = self.width();
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            let column = (index % width as usize) as u32;
            let row = (index / width as usize) as u32;
            (CellCoord::new(column, row), *tile)
        })
    }

    /// Number of passable cells.
    #[must_use]
    pub fn passable_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_passable()).count()
    }

    /// Textual encoding, one string per row.
    #[must_use]
    pub fn to_rows(&self) -> Vec<String> {
        self.tiles
            .chunks(self.width() as usize)
            .map(|row| row.iter().map(|tile| tile.symbol()).collect())
            .collect()
    }

    /// Rebuilds a maze from its textual rows, validating the lattice invariants.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, MazeParseError> {
        let expected = rows.first().map_or(0, |row| row.as_ref().chars().count());
        let width = u32::try_from(expected).unwrap_or(u32::MAX);
        let height = u32::try_from(rows.len()).unwrap_or(u32::MAX);
        let dimensions = MazeDimensions::new(width, height)?;

        let mut tiles = Vec::with_capacity(dimensions.cell_count());
        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != expected {
                return Err(MazeParseError::RaggedRow {
                    row: row_index,
                    expected,
                    found,
                });
            }
            for (column_index, symbol) in row.chars().enumerate() {
                let tile = Tile::from_symbol(symbol).ok_or(MazeParseError::UnknownTile {
                    column: column_index as u32,
                    row: row_index as u32,
                    symbol,
                })?;
                tiles.push(tile);
            }
        }

        let maze = Self { dimensions, tiles };
        let exit = maze.exit();
        let exits = maze.tiles.iter().filter(|tile| **tile == Tile::Exit).count();
        if exits != 1 || maze.tile(exit) != Some(Tile::Exit) {
            return Err(MazeParseError::MisplacedExit {
                column: exit.column(),
                row: exit.row(),
            });
        }
        if maze.tile(maze.origin()) != Some(Tile::Open) {
            return Err(MazeParseError::BlockedOrigin);
        }

        Ok(maze)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        Some(row * self.width() as usize + column)
    }
}

impl TryFrom<Vec<String>> for Maze {
    type Error = MazeParseError;

    fn try_from(rows: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

impl From<Maze> for Vec<String> {
    fn from(maze: Maze) -> Self {
        maze.to_rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: [&str; 5] = ["#####", "#   #", "### #", "#  E#", "#####"];

    #[test]
    fn rows_round_trip() {
        let maze = Maze::from_rows(&SMALL).expect("valid maze");
        assert_eq!(maze.to_rows(), SMALL);
        assert_eq!(maze.exit(), CellCoord::new(3, 3));
        assert_eq!(maze.passable_count(), 7);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let rows = ["#####", "#   #", "### #", "#  E", "#####"];
        assert_eq!(
            Maze::from_rows(&rows),
            Err(MazeParseError::RaggedRow {
                row: 3,
                expected: 5,
                found: 4
            })
        );
    }

    #[test]
    fn unknown_symbols_are_rejected() {
        let rows = ["#####", "# ? #", "### #", "#  E#", "#####"];
        assert!(matches!(
            Maze::from_rows(&rows),
            Err(MazeParseError::UnknownTile { symbol: '?', .. })
        ));
    }

    #[test]
    fn exit_must_sit_in_the_far_corner() {
        let rows = ["#####", "#E  #", "### #", "#   #", "#####"];
        assert!(matches!(
            Maze::from_rows(&rows),
            Err(MazeParseError::MisplacedExit { column: 3, row: 3 })
        ));
    }

    #[test]
    fn even_grids_are_rejected() {
        let rows = ["######", "#    #", "#### #", "#   E#", "######"];
        assert!(matches!(
            Maze::from_rows(&rows),
            Err(MazeParseError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn neighbour_counts_follow_the_grid() {
        let maze = Maze::from_rows(&SMALL).expect("valid maze");
        assert_eq!(maze.count_neighbors(CellCoord::new(2, 1), Tile::Open), 2);
        assert_eq!(maze.count_neighbors(CellCoord::new(3, 1), Tile::Wall), 2);
        assert_eq!(maze.neighbors(CellCoord::new(0, 0)).count(), 2);
    }

    #[test]
    fn move_range_follows_open_neighbour_count() {
        let maze = Maze::from_rows(&["#######", "#     #", "# # # #", "#    E#", "#######"])
            .expect("valid maze");

        assert_eq!(maze.move_range(CellCoord::new(1, 1), 20), 10, "corner");
        assert_eq!(maze.move_range(CellCoord::new(3, 1), 20), 24, "junction");
        assert_eq!(maze.move_range(CellCoord::new(5, 2), 20), 20, "dead end");
        assert_eq!(maze.move_range(CellCoord::new(1, 2), 7), 3);
    }

    #[test]
    fn move_range_on_an_isolated_cell_keeps_the_base() {
        let maze = Maze::from_rows(&[
            "#######", "#     #", "##### #", "## ## #", "##### #", "#    E#", "#######",
        ])
        .expect("valid maze");
        let isolated = CellCoord::new(2, 3);
        assert_eq!(maze.count_neighbors(isolated, Tile::Open), 0);
        assert_eq!(maze.move_range(isolated, 20), 20);
        assert_eq!(maze.move_range(CellCoord::new(0, 0), 20), 20, "corner wall");
    }

    #[test]
    fn move_range_ignores_the_exit() {
        let maze = Maze::from_rows(&SMALL).expect("valid maze");

        // (3, 2) touches (3, 1) and the exit below it.
        assert_eq!(maze.move_range(CellCoord::new(3, 2), 20), 20);
    }
}
