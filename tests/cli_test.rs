//! End-to-end tests for the apilens binary
mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::MockServer;

/// Binary with a clean environment, run from an empty directory
fn apilens(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("apilens").unwrap();
    cmd.env_clear().current_dir(dir.path());
    cmd
}

fn pointed_at(dir: &TempDir, server: &MockServer) -> Command {
    let mut cmd = apilens(dir);
    cmd.env("GROQ_API_KEY", common::API_KEY)
        .env("API_URL", format!("{}{}", server.uri(), common::DATA_PATH))
        .env(
            "APILENS_COMPLETION_ENDPOINT",
            format!("{}{}", server.uri(), common::COMPLETIONS_PATH),
        );
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    apilens(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("snapshot"));
}

#[test]
fn test_missing_credentials_exit_before_any_request() {
    let dir = TempDir::new().unwrap();
    apilens(&dir)
        .arg("snapshot")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing GROQ_API_KEY or API_URL"));
}

#[test]
fn test_invalid_headers_json_is_fatal() {
    let dir = TempDir::new().unwrap();
    apilens(&dir)
        .env("GROQ_API_KEY", "k")
        .env("API_URL", "http://127.0.0.1:9/status")
        .env("API_HEADERS", "not json")
        .arg("snapshot")
        .assert()
        .failure()
        .stderr(predicate::str::contains("API_HEADERS"));
}

#[test]
fn test_unknown_mode_is_rejected() {
    let dir = TempDir::new().unwrap();
    apilens(&dir)
        .env("GROQ_API_KEY", "k")
        .env("API_URL", "http://127.0.0.1:9/status")
        .args(["ask", "--mode", "telepathy", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("telepathy"));
}

#[test]
fn test_env_file_supplies_credentials() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("custom.env"),
        "GROQ_API_KEY=from-file\nAPI_URL=not-a-url\n",
    )
    .unwrap();

    // Credentials come from the file, so validation reaches the URL check
    apilens(&dir)
        .args(["--env-file", "custom.env", "snapshot"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API_URL"))
        .stderr(predicate::str::contains("Missing").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_snapshot_command_prints_pretty_json() {
    let server = MockServer::start().await;
    common::mount_json_source(&server, r#"{"status":"ok"}"#).await;
    let dir = TempDir::new().unwrap();

    pointed_at(&dir, &server)
        .arg("snapshot")
        .assert()
        .success()
        .stdout(predicate::str::contains("{\n  \"status\": \"ok\"\n}"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_ask_command_prints_answer() {
    let server = MockServer::start().await;
    common::mount_json_source(&server, r#"{"status":"ok"}"#).await;
    common::mount_completion(&server, "The status is ok.").await;
    let dir = TempDir::new().unwrap();

    pointed_at(&dir, &server)
        .args(["ask", "What is the status?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("The status is ok."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_piped_chat_survives_failed_turn() {
    let server = MockServer::start().await;
    common::mount_json_source(&server, r#"{"status":"ok"}"#).await;
    let dir = TempDir::new().unwrap();

    // No completion mock: every turn fails with HTTP 404, the session goes on
    pointed_at(&dir, &server)
        .args(["chat", "--mode", "tool"])
        .write_stdin("first\nsecond\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("MCP Live API Chatbot"))
        .stdout(predicate::str::contains("❌ Error").count(2))
        .stdout(predicate::str::contains("Goodbye!"));
}
