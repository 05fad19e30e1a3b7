use assert_cmd::Command;
use predicates::prelude::predicate::str;

#[test]
fn part1_output_right_answer() {
    let mut cmd = Command::cargo_bin("part1").unwrap();
    cmd.arg("tests/data/sample.txt");

    cmd.assert().success().stdout(str::contains(" 41 "));
}

#[test]
fn part1_counts_positions_of_small_lab() {
    let mut cmd = Command::cargo_bin("part1").unwrap();
    cmd.arg("tests/data/six_by_six.txt");

    cmd.assert().success().stdout(str::contains(" 13 "));
}

#[test]
fn part1_fails_without_guard() {
    let mut cmd = Command::cargo_bin("part1").unwrap();
    cmd.arg("tests/data/no_guard.txt");

    cmd.assert().failure().stderr(str::contains("no guard"));
}

#[test]
fn part1_fails_on_missing_file() {
    let mut cmd = Command::cargo_bin("part1").unwrap();
    cmd.arg("tests/data/not_there.txt");

    cmd.assert()
        .failure()
        .stderr(str::contains("Failed to open given file"));
}
