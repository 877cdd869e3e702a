use assert_cmd::cargo::{self};
use predicates::str::contains;

#[test]
fn prints_help() {
    let mut cmd = cargo::cargo_bin_cmd!("textfield");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(contains("--scenario"));
}

#[test]
fn scenario_is_required() {
    let mut cmd = cargo::cargo_bin_cmd!("textfield");
    cmd.assert().failure().stderr(contains("--scenario"));
}
