//! E2E CLI tests covering:
//! - `rdx list` output modes and client-side filtering
//! - `rdx add` / `rdx update` / `rdx delete` request shapes
//! - Error reporting: coded messages on stderr, JSON error objects, exit status
//! - Config layering (`--config`, `--api-url`, `ROLODEX_API_URL`)
//!
//! Each test runs `rdx` as a subprocess against an in-process `tiny_http`
//! server, with an isolated config file in a temp directory.

use assert_cmd::Command;
use predicates::prelude::*;
use rolodex_core::view::EMPTY_PLACEHOLDER;
use serde_json::Value;
use std::io::Read;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;
use tiny_http::{Header, Response, Server};

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    url: String,
    body: String,
}

struct FakeService {
    base: String,
    log: Arc<Mutex<Vec<Recorded>>>,
    handle: thread::JoinHandle<()>,
}

impl FakeService {
    /// Serve `replies` in order, recording every request.
    fn start(replies: Vec<(u16, &'static str)>) -> Self {
        let server = Server::http("127.0.0.1:0").expect("http server");
        let base = format!("http://{}/api", server.server_addr());
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_clone = Arc::clone(&log);
        let handle = thread::spawn(move || {
            let mut replies = replies.into_iter();
            while let Ok(Some(mut req)) = server.recv_timeout(Duration::from_millis(500)) {
                let mut body = String::new();
                let _ = req.as_reader().read_to_string(&mut body);
                log_clone.lock().expect("log").push(Recorded {
                    method: req.method().to_string(),
                    url: req.url().to_string(),
                    body,
                });
                let (status, reply) = replies.next().unwrap_or((500, ""));
                let response = Response::from_string(reply)
                    .with_status_code(status)
                    .with_header(
                        Header::from_bytes("Content-Type", "application/json").expect("header"),
                    );
                let _ = req.respond(response);
            }
        });
        Self { base, log, handle }
    }

    /// Wait for the server to go idle and return what it saw.
    fn finish(self) -> Vec<Recorded> {
        self.handle.join().expect("server thread");
        self.log.lock().expect("log").clone()
    }
}

/// Write a config file with a two-tag vocabulary and return its path.
fn write_config(dir: &Path, confirm_delete: bool) -> PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(
        &path,
        format!(
            "[tags]\nvocabulary = [\"friend\", \"work\"]\n\n[ui]\nconfirm_delete = {confirm_delete}\n"
        ),
    )
    .expect("write config");
    path
}

/// Build a Command targeting the rdx binary with an isolated environment.
fn rdx_cmd(dir: &TempDir) -> Command {
    let config = write_config(dir.path(), true);
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rdx"));
    cmd.current_dir(dir.path());
    cmd.env("ROLODEX_LOG", "error");
    cmd.env("XDG_CONFIG_HOME", dir.path());
    cmd.env("XDG_CACHE_HOME", dir.path());
    cmd.env_remove("ROLODEX_API_URL");
    cmd.env_remove("FORMAT");
    cmd.arg("--config").arg(config);
    cmd
}

fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}/api")
}

const TWO_CONTACTS: &str = r#"[
    {"id": 1, "name": "Alice", "phone": "555-0101", "email": "alice@example.com", "tags": "work"},
    {"id": 2, "name": "Bob", "phone": "555-0102", "tags": "friend,work"}
]"#;

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

#[test]
fn list_json_prints_every_contact() {
    let dir = TempDir::new().expect("tempdir");
    let service = FakeService::start(vec![(200, TWO_CONTACTS)]);

    let output = rdx_cmd(&dir)
        .args(["--api-url", &service.base, "list", "--format", "json"])
        .output()
        .expect("list should not crash");
    assert!(
        output.status.success(),
        "list failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let contacts = json.as_array().expect("array");
    assert_eq!(contacts.len(), 2);
    assert_eq!(contacts[0]["name"], "Alice");
    assert_eq!(contacts[1]["tags"], "friend,work");

    let seen = service.finish();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "GET");
    assert_eq!(seen[0].url, "/api/contacts");
}

#[test]
fn list_text_filters_by_name_and_tag() {
    let dir = TempDir::new().expect("tempdir");
    let service = FakeService::start(vec![(200, TWO_CONTACTS)]);

    rdx_cmd(&dir)
        .args(["--api-url", &service.base, "list", "--format", "text"])
        .args(["--name", "BO", "--tag", "friend"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ID\tNAME\tPHONE"))
        .stdout(predicate::str::contains("2\tBob\t555-0102"))
        .stdout(predicate::str::contains("Alice").not());

    service.finish();
}

#[test]
fn list_tag_filter_is_exact() {
    let dir = TempDir::new().expect("tempdir");
    let service = FakeService::start(vec![(200, TWO_CONTACTS)]);

    rdx_cmd(&dir)
        .args(["--api-url", &service.base, "list", "--format", "text", "--tag", "wo"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    service.finish();
}

#[test]
fn list_pretty_empty_shows_placeholder() {
    let dir = TempDir::new().expect("tempdir");
    let service = FakeService::start(vec![(200, "[]")]);

    rdx_cmd(&dir)
        .args(["--api-url", &service.base, "list", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains(EMPTY_PLACEHOLDER));

    service.finish();
}

#[test]
fn list_pretty_shows_chips() {
    let dir = TempDir::new().expect("tempdir");
    let service = FakeService::start(vec![(200, TWO_CONTACTS)]);

    rdx_cmd(&dir)
        .args(["--api-url", &service.base, "list", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bob (555-0102)"))
        .stdout(predicate::str::contains("[friend] [work]"));

    service.finish();
}

#[test]
fn api_url_from_environment() {
    let dir = TempDir::new().expect("tempdir");
    let service = FakeService::start(vec![(200, "[]")]);

    rdx_cmd(&dir)
        .env("ROLODEX_API_URL", &service.base)
        .args(["list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));

    assert_eq!(service.finish().len(), 1);
}

// ---------------------------------------------------------------------------
// add / update / delete
// ---------------------------------------------------------------------------

#[test]
fn add_posts_trimmed_fields() {
    let dir = TempDir::new().expect("tempdir");
    let service = FakeService::start(vec![(201, "{}")]);

    rdx_cmd(&dir)
        .args(["--api-url", &service.base, "add"])
        .args(["--name", "  Bob ", "--phone", "555", "--tag", "work", "--tag", "friend"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added contact 'Bob'"));

    let seen = service.finish();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "POST");
    assert_eq!(seen[0].url, "/api/contacts");
    let body: Value = serde_json::from_str(&seen[0].body).expect("json body");
    assert_eq!(body["name"], "Bob");
    assert_eq!(body["phone"], "555");
    assert_eq!(body["address"], "");
    assert_eq!(body["email"], "");
    assert_eq!(body["tags"], "friend,work");
}

#[test]
fn update_puts_to_contact_path() {
    let dir = TempDir::new().expect("tempdir");
    let service = FakeService::start(vec![(200, "{}")]);

    rdx_cmd(&dir)
        .args(["--api-url", &service.base, "-q", "update", "7"])
        .args(["--name", "Robert", "--phone", "555", "--email", "rob@example.com"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let seen = service.finish();
    assert_eq!(seen[0].method, "PUT");
    assert_eq!(seen[0].url, "/api/contacts/7");
    let body: Value = serde_json::from_str(&seen[0].body).expect("json body");
    assert_eq!(body["email"], "rob@example.com");
    assert_eq!(body["tags"], "");
}

#[test]
fn delete_with_yes_issues_delete() {
    let dir = TempDir::new().expect("tempdir");
    let service = FakeService::start(vec![(200, "")]);

    rdx_cmd(&dir)
        .args(["--api-url", &service.base, "delete", "7", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted contact 7"));

    let seen = service.finish();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "DELETE");
    assert_eq!(seen[0].url, "/api/contacts/7");
}

#[test]
fn delete_without_terminal_does_not_prompt() {
    let dir = TempDir::new().expect("tempdir");
    let service = FakeService::start(vec![(200, "")]);

    rdx_cmd(&dir)
        .args(["--api-url", &service.base, "delete", "7"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("[y/N]").not());

    assert_eq!(service.finish().len(), 1);
}

// ---------------------------------------------------------------------------
// errors
// ---------------------------------------------------------------------------

#[test]
fn rejected_add_reports_validation_code() {
    let dir = TempDir::new().expect("tempdir");
    let service = FakeService::start(vec![(400, r#"{"error": "phone required"}"#)]);

    rdx_cmd(&dir)
        .args(["--api-url", &service.base, "add", "--name", "Bob", "--phone", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E3001]"))
        .stderr(predicate::str::contains("phone required"));

    service.finish();
}

#[test]
fn rejected_add_in_json_mode_emits_error_object() {
    let dir = TempDir::new().expect("tempdir");
    let service = FakeService::start(vec![(400, r#"{"error": "phone required"}"#)]);

    let output = rdx_cmd(&dir)
        .args(["--api-url", &service.base, "--json", "add", "--name", "Bob", "--phone", ""])
        .output()
        .expect("add should not crash");
    assert!(!output.status.success());

    let json: Value = serde_json::from_slice(&output.stderr).expect("stderr JSON");
    assert_eq!(json["error"]["error_code"], "E3001");
    assert!(
        json["error"]["message"]
            .as_str()
            .expect("message")
            .contains("phone required")
    );

    service.finish();
}

#[test]
fn json_mode_stderr_is_only_the_error_object_with_default_logging() {
    let dir = TempDir::new().expect("tempdir");
    let service = FakeService::start(vec![(400, r#"{"error": "phone required"}"#)]);

    let output = rdx_cmd(&dir)
        .env_remove("ROLODEX_LOG")
        .args(["--api-url", &service.base, "--json", "add", "--name", "Bob", "--phone", ""])
        .output()
        .expect("add should not crash");
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("WARN"), "log line leaked: {stderr}");
    let json: Value = serde_json::from_slice(&output.stderr).expect("stderr JSON");
    assert_eq!(json["error"]["error_code"], "E3001");

    service.finish();
}

#[test]
fn piped_stderr_logs_carry_no_colour_codes() {
    let dir = TempDir::new().expect("tempdir");
    let service = FakeService::start(vec![(400, r#"{"error": "phone required"}"#)]);

    let output = rdx_cmd(&dir)
        .env_remove("ROLODEX_LOG")
        .args(["--api-url", &service.base, "add", "--name", "Bob", "--phone", ""])
        .output()
        .expect("add should not crash");
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("contact rejected"));
    assert!(!stderr.contains('\u{1b}'), "escape codes in: {stderr:?}");
    assert_eq!(stderr.matches("phone required").count(), 2);

    service.finish();
}

#[test]
fn failed_delete_reports_deletion_code() {
    let dir = TempDir::new().expect("tempdir");
    let service = FakeService::start(vec![(404, "")]);

    rdx_cmd(&dir)
        .args(["--api-url", &service.base, "delete", "9", "-y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E3002]"))
        .stderr(predicate::str::contains("delete failed"));

    service.finish();
}

#[test]
fn unreachable_service_reports_network_code() {
    let dir = TempDir::new().expect("tempdir");

    rdx_cmd(&dir)
        .args(["--api-url", &refused_url(), "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E2001]"))
        .stderr(predicate::str::contains("failed to load contacts"));
}

#[test]
fn invalid_api_url_is_rejected_before_any_request() {
    let dir = TempDir::new().expect("tempdir");

    rdx_cmd(&dir)
        .args(["--api-url", "ftp://example.com", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E1003]"));
}

#[test]
fn missing_config_file_is_an_error() {
    let dir = TempDir::new().expect("tempdir");

    Command::new(assert_cmd::cargo::cargo_bin!("rdx"))
        .env("ROLODEX_LOG", "error")
        .args(["--config"])
        .arg(dir.path().join("absent.toml"))
        .arg("tags")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E1001]"));
}

// ---------------------------------------------------------------------------
// tags / completions
// ---------------------------------------------------------------------------

#[test]
fn tags_prints_configured_vocabulary() {
    let dir = TempDir::new().expect("tempdir");

    rdx_cmd(&dir)
        .args(["tags", "--format", "text"])
        .assert()
        .success()
        .stdout("friend\nwork\n");
}

#[test]
fn tags_json_wraps_vocabulary() {
    let dir = TempDir::new().expect("tempdir");

    let output = rdx_cmd(&dir)
        .args(["tags", "--json"])
        .output()
        .expect("tags should not crash");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["vocabulary"], serde_json::json!(["friend", "work"]));
}

#[test]
fn completions_generate_for_bash() {
    let dir = TempDir::new().expect("tempdir");

    rdx_cmd(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rdx"));
}
