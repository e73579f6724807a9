//! Water contracts shared by the simulator, the world and persistence.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{CellCoord, MazeDimensions};

/// Direction class of a pending spread front.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpreadDirection {
    /// Front that arrived sideways or from below.
    Normal,
    /// Front that arrived by moving down the grid.
    Downward,
}

/// Pending spread unit held in the water queue.
///
/// Serialized as a `[column, row, direction]` triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(u32, u32, SpreadDirection)", into = "(u32, u32, SpreadDirection)")]
pub struct WaterEvent {
    /// Cell the front currently sits on.
    pub cell: CellCoord,
    /// Direction class selecting the spread rate.
    pub direction: SpreadDirection,
}

impl WaterEvent {
    /// Creates a new spread front.
    #[must_use]
    pub const fn new(cell: CellCoord, direction: SpreadDirection) -> Self {
        Self { cell, direction }
    }
}

impl From<(u32, u32, SpreadDirection)> for WaterEvent {
    fn from((column, row, direction): (u32, u32, SpreadDirection)) -> Self {
        Self::new(CellCoord::new(column, row), direction)
    }
}

impl From<WaterEvent> for (u32, u32, SpreadDirection) {
    fn from(event: WaterEvent) -> Self {
        (event.cell.column(), event.cell.row(), event.direction)
    }
}

/// Accumulated spread time and the two active spread rates (cells per second).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaterParameters {
    /// Fractional simulated time not yet consumed by dwell thresholds.
    pub elapsed: f64,
    /// Rate applied to [`SpreadDirection::Normal`] fronts.
    pub normal: f64,
    /// Rate applied to [`SpreadDirection::Downward`] fronts.
    pub downward: f64,
}

impl WaterParameters {
    /// Parameters with no accumulated time.
    #[must_use]
    pub const fn new(normal: f64, downward: f64) -> Self {
        Self {
            elapsed: 0.0,
            normal,
            downward,
        }
    }

    /// Rate associated with the direction class.
    #[must_use]
    pub const fn rate_for(&self, direction: SpreadDirection) -> f64 {
        match direction {
            SpreadDirection::Normal => self.normal,
            SpreadDirection::Downward => self.downward,
        }
    }
}

/// Tuning knobs for the water hazard.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaterTuning {
    /// Time after round start during which water stays dormant.
    pub delay: Duration,
    /// Base normal spread rate before the per-round schedule is applied.
    pub normal_rate: f64,
    /// Base downward spread rate before the per-round schedule is applied.
    pub downward_rate: f64,
}

impl Default for WaterTuning {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(5),
            normal_rate: 6.0,
            downward_rate: 10.0,
        }
    }
}

/// Errors raised while rebuilding a boolean grid from nested rows.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridShapeError {
    /// The grid has no rows or no columns.
    #[error("grid must contain at least one cell")]
    Empty,
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
}

/// Monotone wet/dry grid. Cells turn wet at most once and never dry out.
///
/// Serialized as nested rows of booleans.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<bool>>", into = "Vec<Vec<bool>>")]
pub struct WaterGrid {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl WaterGrid {
    /// Creates a completely dry grid matching the maze dimensions.
    #[must_use]
    pub fn dry(dimensions: MazeDimensions) -> Self {
        Self {
            width: dimensions.width(),
            height: dimensions.height(),
            cells: vec![false; dimensions.cell_count()],
        }
    }

    /// Provides the grid dimensions as `(width, height)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Reports whether the cell is wet. Cells outside the grid are dry.
    #[must_use]
    pub fn is_wet(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some_and(|index| self.cells[index])
    }

    /// Marks the cell wet, returning `true` when it was dry before.
    pub fn flood(&mut self, cell: CellCoord) -> bool {
        match self.index(cell) {
            Some(index) if !self.cells[index] => {
                self.cells[index] = true;
                true
            }
            _ => false,
        }
    }

    /// Number of wet cells.
    #[must_use]
    pub fn wet_count(&self) -> usize {
        self.cells.iter().filter(|wet| **wet).count()
    }

    /// Iterator over wet cells in row-major order.
    pub fn wet_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let width = self.width as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, wet)| **wet)
            .map(move |(index, _)| CellCoord::new((index % width) as u32, (index / width) as u32))
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.width && cell.row() < self.height {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.width).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

impl TryFrom<Vec<Vec<bool>>> for WaterGrid {
    type Error = GridShapeError;

    fn try_from(rows: Vec<Vec<bool>>) -> Result<Self, Self::Error> {
        let expected = rows.first().map_or(0, Vec::len);
        if expected == 0 {
            return Err(GridShapeError::Empty);
        }

        let mut cells = Vec::with_capacity(expected * rows.len());
        for (row, values) in rows.iter().enumerate() {
            if values.len() != expected {
                return Err(GridShapeError::RaggedRow {
                    row,
                    expected,
                    found: values.len(),
                });
            }
            cells.extend_from_slice(values);
        }

        Ok(Self {
            width: u32::try_from(expected).unwrap_or(u32::MAX),
            height: u32::try_from(rows.len()).unwrap_or(u32::MAX),
            cells,
        })
    }
}

impl From<WaterGrid> for Vec<Vec<bool>> {
    fn from(grid: WaterGrid) -> Self {
        grid.cells
            .chunks(grid.width as usize)
            .map(<[bool]>::to_vec)
            .collect()
    }
}
