use floating_maze_core::{CellCoord, Maze, WaterGrid};

const PLAYER: char = '@';
const WATER: char = '~';

/// Draws the maze as text: `#` walls, `E` the exit, `~` water and `@` the player.
pub(crate) fn render(maze: &Maze, water: Option<&WaterGrid>, player: Option<CellCoord>) -> String {
    let mut out = String::with_capacity(maze.dimensions().cell_count() + maze.height() as usize);
    for row in 0..maze.height() {
        for column in 0..maze.width() {
            let cell = CellCoord::new(column, row);
            let symbol = if player == Some(cell) {
                PLAYER
            } else if water.is_some_and(|grid| grid.is_wet(cell)) {
                WATER
            } else {
                maze.tile(cell).map_or('#', |tile| tile.symbol())
            };
            out.push(symbol);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlays_water_and_player_on_the_maze() {
        let maze =
            Maze::from_rows(&["#####", "#   #", "### #", "#  E#", "#####"]).expect("valid maze");
        let mut water = WaterGrid::dry(maze.dimensions());
        let _ = water.flood(CellCoord::new(1, 1));
        let _ = water.flood(CellCoord::new(2, 1));

        let text = render(&maze, Some(&water), Some(CellCoord::new(3, 2)));
        assert_eq!(text, "#####\n#~~ #\n###@#\n#  E#\n#####\n");
        assert_eq!(render(&maze, None, None), "#####\n#   #\n### #\n#  E#\n#####\n");
    }
}
