use std::{env, fs, process::Command};

fn floating_maze(args: &[&str]) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_floating-maze"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run floating-maze");

    assert!(
        output.status.success(),
        "floating-maze {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("utf-8 output")
}

#[test]
fn saved_rounds_resume_into_the_next_round() {
    let path = env::temp_dir().join(format!("floating-maze-{}.json", std::process::id()));
    let snapshot = path.to_str().expect("utf-8 temp path");

    let first = floating_maze(&[
        "--width", "11", "--height", "9", "--seed", "4", "--difficulty", "5", "--save", snapshot,
    ]);
    assert!(first.contains("round 1 won"), "{first}");
    let grid: Vec<&str> = first.lines().skip(1).collect();
    assert_eq!(grid.len(), 9);
    assert!(grid.iter().all(|row| row.len() == 11));
    assert_eq!(grid[7].chars().nth(9), Some('@'));

    let saved = fs::read_to_string(&path).expect("snapshot written");
    assert!(saved.contains("\"playerPos\""));

    let resumed = floating_maze(&["--load", snapshot, "--rounds", "1"]);
    assert!(resumed.contains("round 2 won"), "{resumed}");

    let _ = fs::remove_file(&path);
}

#[test]
fn even_dimensions_are_rejected() {
    let output = Command::new(env!("CARGO_BIN_EXE_floating-maze"))
        .args(["--width", "10", "--seed", "1"])
        .output()
        .expect("failed to run floating-maze");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("must be odd"), "{stderr}");
}
