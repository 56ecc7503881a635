use assert_cmd::prelude::*;
use std::process::Command;

#[test]
fn run_quiet_astar() {
    let output = r"UUU
Moves: 3
Pushes: 3
Expanded: 4
Frontier: 2
";

    Command::main_binary()
        .unwrap()
        .arg("--quiet")
        .arg("levels/custom/02-one-way.txt")
        .assert()
        .success()
        .stdout(output)
        .stderr("");
}

#[test]
fn run_quiet_bfs() {
    let output = r"UUU
Moves: 3
Pushes: 3
Expanded: 5
Frontier: 1
";

    Command::main_binary()
        .unwrap()
        .arg("--quiet")
        .arg("--method")
        .arg("bfs")
        .arg("levels/custom/02-one-way.txt")
        .assert()
        .success()
        .stdout(output)
        .stderr("");
}

#[test]
fn run_quiet_no_solution() {
    let output = r"No solution
Expanded: 3
Frontier: 0
";

    Command::main_binary()
        .unwrap()
        .arg("--quiet")
        .arg("levels/custom/no-solution-corner.txt")
        .assert()
        .success()
        .stdout(output)
        .stderr("");
}

#[test]
fn run_bad_method_arg() {
    // doesn't check stderr - clap's wording is not worth pinning down,
    // should be enough to test that it fails and doesn't print to stdout

    Command::main_binary()
        .unwrap()
        .arg("--method")
        .arg("nonsense")
        .arg("levels/custom/01-simplest.txt")
        .assert()
        .failure()
        .stdout("");
}
