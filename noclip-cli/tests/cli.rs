use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// The `noclip` binary, isolated from the user's real config
fn noclip(home: &TempDir) -> Command {
    let mut command = Command::cargo_bin("noclip").unwrap();

    command
        .env("HOME", home.path())
        .env_remove("NOCLIP_SERVER_URL");

    command
}

#[test]
fn test_missing_server_url_is_a_usage_error() {
    let home = TempDir::new().unwrap();

    noclip(&home)
        .args(["get", "alice"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No server URL configured"));
}

#[test]
fn test_commands_require_registration() {
    let home = TempDir::new().unwrap();

    noclip(&home)
        .args(["--server", "http://127.0.0.1:9", "add", "bob"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Please register first"));
}

#[test]
fn test_server_url_from_environment() {
    let home = TempDir::new().unwrap();

    noclip(&home)
        .env("NOCLIP_SERVER_URL", "http://127.0.0.1:9")
        .args(["whoami"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Please register first"));
}

#[test]
fn test_unreachable_server_is_a_runtime_error() {
    let home = TempDir::new().unwrap();

    noclip(&home)
        .args(["--server", "http://127.0.0.1:9", "register", "alice"])
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("Error:"));

    assert!(!home.path().join(".config/noclip/config").exists());
}

#[test]
fn test_unknown_command() {
    let home = TempDir::new().unwrap();

    noclip(&home).arg("paste").assert().failure();
}

#[test]
fn test_dot_names_are_rejected() {
    let home = TempDir::new().unwrap();
    let config = home.path().join(".config").join("noclip");

    std::fs::create_dir_all(&config).unwrap();
    std::fs::write(
        config.join("config"),
        "user_id=alice\napi_key=key\nserver_url=http://127.0.0.1:9\n",
    )
    .unwrap();

    noclip(&home)
        .args(["put", ".", "hello"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("\".\" is not a valid name"));

    noclip(&home)
        .args(["get", "alice", ".."])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("\"..\" is not a valid name"));
}
