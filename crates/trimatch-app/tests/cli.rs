use assert_cmd::Command;
use predicates::prelude::*;

fn trimatch() -> Command {
    Command::cargo_bin("trimatch").unwrap()
}

#[test]
fn menu_then_quit() {
    trimatch()
        .args(["--seed", "5", "--no-delay"])
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Memory Match - 3 Card Matching"))
        .stdout(predicate::str::contains("Goodbye."));
}

#[test]
fn closed_stdin_quits_cleanly() {
    trimatch()
        .args(["--seed", "5", "--no-delay", "--mode", "ai"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Player: 0   AI: 0"))
        .stdout(predicate::str::contains("Player's Turn"));
}

#[test]
fn indivisible_grid_is_rejected() {
    trimatch()
        .args(["--rows", "4", "--cols", "4"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not divisible by 3"));
}

#[test]
fn frame_json_reports_the_final_state() {
    trimatch()
        .args(["--seed", "9", "--rows", "3", "--cols", "3", "--no-delay", "--frame-json"])
        .write_stdin("2\n1 1\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Player 1's Turn"))
        .stdout(predicate::str::contains(r#""session":"Exited""#))
        .stdout(predicate::str::contains(r#""mode":"VsPlayer""#));
}

#[test]
fn unknown_input_is_reported_and_ignored() {
    trimatch()
        .args(["--seed", "9", "--no-delay"])
        .write_stdin("banana\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unrecognised input: banana"));
}
