use floating_maze_core::{CellCoord, Maze, Tile};
use floating_maze_generation::{generate, DeadEndPolicy, GenerationError, MazeConfig, MazeGenerator};
use floating_maze_navigation::{find_path, solution_path};

/// Number of undirected edges between passable cells.
fn passage_edges(maze: &Maze) -> usize {
    let touching: usize = maze
        .cells()
        .filter(|(_, tile)| tile.is_passable())
        .map(|(cell, _)| {
            maze.neighbors(cell)
                .filter(|(_, neighbor)| maze.is_passable(*neighbor))
                .count()
        })
        .sum();
    touching / 2
}

fn reachable_count(maze: &Maze) -> usize {
    maze.cells()
        .filter(|(cell, tile)| {
            tile.is_passable() && !solution_path(maze, maze.origin(), *cell).is_empty()
        })
        .count()
}

fn assert_tree(maze: &Maze) {
    assert_eq!(reachable_count(maze), maze.passable_count(), "maze is disconnected");
    assert_eq!(
        passage_edges(maze) + 1,
        maze.passable_count(),
        "maze contains a cycle"
    );
}

#[test]
fn scenario_small_maze_connects_origin_and_exit() {
    let generated = generate(7, 7, Some(1), 1).expect("generation succeeds");
    let maze = &generated.maze;

    assert!(maze.is_passable(CellCoord::new(1, 1)));
    assert_eq!(maze.tile(CellCoord::new(5, 5)), Some(Tile::Exit));

    let path = find_path(maze, CellCoord::new(1, 1), CellCoord::new(5, 5), 100);
    assert_eq!(path.first(), Some(&CellCoord::new(1, 1)));
    assert_eq!(path.last(), Some(&CellCoord::new(5, 5)));
}

#[test]
fn generated_mazes_are_trees_for_every_difficulty() {
    for difficulty in [1, 5, 32, 100, 250] {
        for seed in 0..6 {
            let generated = generate(21, 15, Some(seed), difficulty).expect("generation succeeds");
            assert_tree(&generated.maze);
        }
    }
}

#[test]
fn injection_keeps_the_solution_path_intact() {
    for seed in 0..8 {
        let generated = generate(25, 19, Some(seed), 64).expect("generation succeeds");
        let maze = &generated.maze;
        let recovered = solution_path(maze, maze.origin(), maze.exit());

        assert_eq!(recovered, generated.solution, "seed {seed}");
    }
}

#[test]
fn spurs_never_exceed_the_branch_budget() {
    for difficulty in [1, 3, 40] {
        let generated = generate(31, 31, Some(5), difficulty).expect("generation succeeds");
        let policy = DeadEndPolicy::for_difficulty(generated.config.difficulty());
        assert!(generated.spurs as usize <= policy.branch_budget());
    }
}

#[test]
fn injected_spurs_each_open_exactly_one_pillar() {
    // 20 x 15 lattice cells joined by 299 passages.
    let perfect_cells = 2 * 20 * 15 - 1;

    for difficulty in [32, 64, 100] {
        for seed in 0..6 {
            let generated = generate(41, 31, Some(seed), difficulty).expect("generation succeeds");
            assert!(generated.spurs > 0, "difficulty {difficulty}, seed {seed}");
            assert_eq!(
                generated.maze.passable_count(),
                perfect_cells + generated.spurs as usize,
                "difficulty {difficulty}, seed {seed}"
            );
        }
    }
}

#[test]
fn the_same_seed_reproduces_the_same_maze() {
    let first = generate(41, 33, Some(99), 32).expect("generation succeeds");
    let second = generate(41, 33, Some(99), 32).expect("generation succeeds");
    let other = generate(41, 33, Some(100), 32).expect("generation succeeds");

    assert_eq!(first, second);
    assert_ne!(first.maze, other.maze);
}

#[test]
fn generator_advances_between_rounds() {
    let config = MazeConfig::new(15, 15, Some(8), 10).expect("valid config");
    let mut generator = MazeGenerator::new(config.seed());

    let first = generator.generate(config).expect("generation succeeds");
    let second = generator.generate(config).expect("generation succeeds");
    assert_ne!(first.maze, second.maze, "stream continues between calls");

    let next = generate(15, 15, config.next_round().seed(), 10).expect("generation succeeds");
    assert_eq!(next.config.seed(), Some(19));
    assert_tree(&next.maze);
}

#[test]
fn unseeded_generation_still_produces_valid_mazes() {
    let generated = generate(9, 9, None, 32).expect("generation succeeds");
    assert_tree(&generated.maze);
    assert_eq!(generated.config.seed(), None);
}

#[test]
fn invalid_dimensions_are_reported() {
    assert!(matches!(
        generate(3, 9, Some(1), 1),
        Err(GenerationError::Config(_))
    ));
    assert!(matches!(
        generate(9, 10, Some(1), 1),
        Err(GenerationError::Config(_))
    ));
}
