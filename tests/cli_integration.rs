use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn dupe_sweeper(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dupe-sweeper").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn shows_help() {
    let home = TempDir::new().unwrap();
    dupe_sweeper(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("duplicate files"));
}

#[test]
fn shows_version() {
    let home = TempDir::new().unwrap();
    dupe_sweeper(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn requires_subcommand() {
    let home = TempDir::new().unwrap();
    dupe_sweeper(&home)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn sweep_subcommand_help() {
    let home = TempDir::new().unwrap();
    dupe_sweeper(&home)
        .args(["sweep", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--purge-cache"))
        .stdout(predicate::str::contains("--min-size"));
}

#[test]
fn generates_completions() {
    let home = TempDir::new().unwrap();
    dupe_sweeper(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dupe-sweeper"));
}

#[test]
fn yes_and_dry_run_conflict() {
    let home = TempDir::new().unwrap();
    dupe_sweeper(&home)
        .args(["sweep", "--yes", "--dry-run", "."])
        .assert()
        .failure();
}

#[test]
fn invalid_config_path_fails() {
    let home = TempDir::new().unwrap();
    dupe_sweeper(&home)
        .args(["--config", "/nonexistent/path.toml", "sweep", "."])
        .assert()
        .failure();
}

#[test]
fn missing_root_fails_with_error() {
    let home = TempDir::new().unwrap();
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("does-not-exist");

    dupe_sweeper(&home)
        .args(["sweep", "--yes"])
        .arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path not found"));
}

#[test]
fn declining_dedup_is_a_no_op() {
    let home = TempDir::new().unwrap();
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("a.txt"), b"same").unwrap();
    std::fs::write(tmp.path().join("b.txt"), b"same").unwrap();

    let answers = format!("{}\nn\nn\n", tmp.path().display());
    dupe_sweeper(&home)
        .arg("sweep")
        .write_stdin(answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("No operation selected"));

    assert!(tmp.path().join("b.txt").exists());
}

#[test]
fn verbose_flag_accepted() {
    let home = TempDir::new().unwrap();
    let tmp = TempDir::new().unwrap();
    dupe_sweeper(&home)
        .args(["-vvv", "sweep", "--dry-run"])
        .arg(tmp.path())
        .assert()
        .success();
}
