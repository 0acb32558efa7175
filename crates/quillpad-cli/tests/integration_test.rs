use assert_cmd::Command;
use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::tempdir;

fn quillpad() -> Command {
    Command::new(cargo::cargo_bin!("quillpad"))
}

#[test]
fn help_lists_subcommands() {
    quillpad()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve").and(predicate::str::contains("seed")));
}

#[test]
fn missing_subcommand_is_a_usage_error() {
    quillpad().assert().failure();
}

#[test]
fn sql_prints_ddl_for_postgres() {
    quillpad()
        .args(["sql", "--backend", "postgres"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE TABLE IF NOT EXISTS \"posts\""));
}

#[test]
fn schema_prints_json_schema() {
    quillpad()
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"jwtSecret\""));
}

#[test]
fn init_writes_config_once() {
    let tmp = tempdir().unwrap();
    quillpad().arg("init").current_dir(tmp.path()).assert().success();
    assert!(tmp.path().join("quillpad.json").exists());

    quillpad()
        .arg("init")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn init_honours_config_flag() {
    let tmp = tempdir().unwrap();
    quillpad()
        .args(["--config", "site/blog.json", "init"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("blog.json"));
    assert!(tmp.path().join("site/blog.json").exists());
    assert!(!tmp.path().join("quillpad.json").exists());
}

#[test]
fn explicit_config_must_exist() {
    let tmp = tempdir().unwrap();
    quillpad()
        .args(["--config", "absent.json", "migrate"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
