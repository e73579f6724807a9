use floating_maze_core::{CellCoord, Maze};
use floating_maze_navigation::{find_path, solution_path};

fn open_room() -> Maze {
    Maze::from_rows(&[
        "#######", "#     #", "#     #", "#     #", "#     #", "#    E#", "#######",
    ])
    .expect("valid maze")
}

fn winding() -> Maze {
    Maze::from_rows(&[
        "#######", "#   # #", "### # #", "#   # #", "# ### #", "#    E#", "#######",
    ])
    .expect("valid maze")
}

fn assert_contiguous(maze: &Maze, path: &[CellCoord]) {
    for pair in path.windows(2) {
        assert!(
            pair[0].direction_to(pair[1]).is_some(),
            "{:?} -> {:?} is not a single hop",
            pair[0],
            pair[1]
        );
    }
    assert!(path.iter().all(|cell| maze.is_passable(*cell)));
}

#[test]
fn shortest_path_is_returned_in_open_space() {
    let maze = open_room();
    let path = find_path(&maze, maze.origin(), maze.exit(), 100);

    assert_eq!(path.first(), Some(&maze.origin()));
    assert_eq!(path.last(), Some(&maze.exit()));
    assert_eq!(path.len() as u32 - 1, maze.origin().manhattan_distance(maze.exit()));
    assert_contiguous(&maze, &path);
}

#[test]
fn budget_is_inclusive_of_the_final_hop() {
    let maze = open_room();

    let exact = find_path(&maze, maze.origin(), maze.exit(), 8);
    assert_eq!(exact.len(), 9);

    let short = find_path(&maze, maze.origin(), maze.exit(), 7);
    assert!(short.is_empty(), "no 7 hop route exists");
}

#[test]
fn winding_corridor_requires_its_full_length() {
    let maze = winding();
    let full = solution_path(&maze, maze.origin(), maze.exit());
    assert_contiguous(&maze, &full);

    let hops = full.len() as u32 - 1;
    assert!(hops > maze.origin().manhattan_distance(maze.exit()));
    assert_eq!(find_path(&maze, maze.origin(), maze.exit(), hops), full);
    assert!(find_path(&maze, maze.origin(), maze.exit(), hops - 1).is_empty());
}

#[test]
fn invalid_endpoints_yield_empty_paths() {
    let maze = winding();
    let side_branch = CellCoord::new(5, 1);

    // (5, 1) only connects downward into the exit column.
    let path = find_path(&maze, maze.origin(), side_branch, 100);
    assert_contiguous(&maze, &path);
    assert_eq!(path.len(), 17);

    assert!(find_path(&maze, maze.origin(), CellCoord::new(0, 0), 100).is_empty());
    assert!(find_path(&maze, CellCoord::new(2, 2), maze.exit(), 100).is_empty());
    assert!(find_path(&maze, maze.origin(), CellCoord::new(40, 40), 100).is_empty());
}

#[test]
fn zero_budget_only_reaches_the_start() {
    let maze = open_room();
    assert_eq!(
        find_path(&maze, maze.origin(), maze.origin(), 0),
        vec![maze.origin()]
    );
    assert!(find_path(&maze, maze.origin(), CellCoord::new(2, 1), 0).is_empty());
}
