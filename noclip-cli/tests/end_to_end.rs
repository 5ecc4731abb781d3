use std::{net::SocketAddr, sync::mpsc, thread};

use assert_cmd::Command;
use noclip_cli::api::{AddFriendOutcome, ApiClient, ApiError};
use noclip_collab::{Collab, SqliteDatabase};
use predicates::prelude::*;
use reqwest::StatusCode;
use tempfile::TempDir;

/// Runs a fresh server with an in-memory store on an ephemeral port
fn spawn_server() -> String {
    let (sender, receiver) = mpsc::channel::<SocketAddr>();

    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            sender.send(listener.local_addr().unwrap()).unwrap();

            let database = SqliteDatabase::in_memory().await.unwrap();
            noclip_server::serve(listener, Collab::new(database))
                .await
                .unwrap();
        });
    });

    format!("http://{}", receiver.recv().unwrap())
}

fn status_of(error: &anyhow::Error) -> Option<StatusCode> {
    error.downcast_ref::<ApiError>().map(|e| e.status)
}

#[test]
fn test_sharing_between_friends() {
    let server = spawn_server();

    let registration = ApiClient::new(&server).unwrap().register("alice").unwrap();
    assert_eq!(registration.id, "alice");
    let alice = ApiClient::new(&server)
        .unwrap()
        .with_api_key(&registration.api_key);

    let registration = ApiClient::new(&server).unwrap().register("bob").unwrap();
    let bob = ApiClient::new(&server)
        .unwrap()
        .with_api_key(&registration.api_key);

    alice.put_clip("default", "hello").unwrap();

    // Not friends yet
    let error = bob.get_clip("alice", "default").unwrap_err();
    assert_eq!(status_of(&error), Some(StatusCode::FORBIDDEN));

    assert_eq!(bob.add_friend("alice").unwrap(), AddFriendOutcome::Added);
    assert_eq!(
        alice.add_friend("bob").unwrap(),
        AddFriendOutcome::AlreadyFriends
    );

    assert_eq!(bob.get_clip("alice", "default").unwrap(), "hello");

    alice.put_clip("default", "world").unwrap();
    assert_eq!(bob.get_clip("alice", "default").unwrap(), "world");

    assert_eq!(alice.me().unwrap(), "alice");
}

#[test]
fn test_api_errors() {
    let server = spawn_server();

    let registration = ApiClient::new(&server).unwrap().register("carol").unwrap();
    let carol = ApiClient::new(&server)
        .unwrap()
        .with_api_key(&registration.api_key);

    let error = ApiClient::new(&server)
        .unwrap()
        .register("carol")
        .unwrap_err();
    assert_eq!(status_of(&error), Some(StatusCode::CONFLICT));

    let error = carol.add_friend("nobody").unwrap_err();
    assert_eq!(status_of(&error), Some(StatusCode::NOT_FOUND));

    let error = carol.add_friend("carol").unwrap_err();
    assert_eq!(status_of(&error), Some(StatusCode::BAD_REQUEST));

    let error = carol.get_clip("carol", "empty").unwrap_err();
    assert_eq!(status_of(&error), Some(StatusCode::NOT_FOUND));

    let stranger = ApiClient::new(&server).unwrap().with_api_key("wrong");
    let error = stranger.me().unwrap_err();
    assert_eq!(status_of(&error), Some(StatusCode::UNAUTHORIZED));
}

#[test]
fn test_cli_against_server() {
    let server = spawn_server();
    let home = TempDir::new().unwrap();

    let noclip = || {
        let mut command = Command::cargo_bin("noclip").unwrap();
        command
            .env("HOME", home.path())
            .env_remove("NOCLIP_SERVER_URL");
        command
    };

    noclip()
        .args(["--server", &server, "register", "dave"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered successfully"));

    let saved = std::fs::read_to_string(home.path().join(".config/noclip/config")).unwrap();
    assert!(saved.contains("user_id=dave\n"));
    assert!(saved.contains(&format!("server_url={}\n", server)));

    // The saved server URL is used from now on
    noclip()
        .args(["put", "notes", "remember the milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Content stored in bucket 'notes'"));

    noclip()
        .args(["get", "dave", "notes", "--print"])
        .assert()
        .success()
        .stdout("remember the milk");

    noclip()
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("dave on "));

    noclip()
        .args(["add", "erin"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("erin"));
}
