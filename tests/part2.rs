use assert_cmd::Command;
use predicates::prelude::predicate::str;

#[test]
fn part2_output_right_answer() {
    let mut cmd = Command::cargo_bin("part2").unwrap();
    cmd.arg("tests/data/sample.txt");

    cmd.assert().success().stdout(str::contains(" 6 "));
}

#[test]
fn part2_finds_single_loop_location() {
    let mut cmd = Command::cargo_bin("part2").unwrap();
    cmd.arg("tests/data/six_by_six.txt");

    cmd.assert().success().stdout(str::contains(" 1 "));
}
