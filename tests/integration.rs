use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn inbox_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("inbox");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    fs::write(
        root.join("data.json"),
        r#"[
            {"customer_id": "C01", "client_name": "Acme", "developer_id": "D505",
             "project_details": "migration", "milestones": "phase1 done", "security": "confidential"},
            {"customer_id": "C02", "client_name": "Globex", "developer_id": "D777",
             "project_details": "storefront", "milestones": "design approved", "budget": "120k"}
        ]"#,
    )
    .unwrap();

    let config_content = format!(
        r#"[records]
path = "{}/data.json"

[index]
name = "inbox-test-index"

[server]
bind = "127.0.0.1:7878"
"#,
        root.display()
    );

    let config_path = config_dir.join("inbox.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

/// Run the binary with fake credentials so client construction
/// succeeds; no test here ever reaches the network.
fn run_inbox(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = inbox_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .env("OPENAI_API_KEY", "test-key")
        .env("PINECONE_API_KEY", "test-key")
        .env("GROQ_API_KEY", "test-key")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run inbox binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_records_lists_store_and_credentials() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_inbox(&config_path, &["records"]);
    assert!(success, "records failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("C01"));
    assert!(stdout.contains("Acme"));
    assert!(stdout.contains("D777"));
    assert!(stdout.contains("OPENAI_API_KEY"));
}

#[test]
fn test_ingest_dry_run_counts_without_services() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_inbox(&config_path, &["ingest", "--dry-run"]);
    assert!(success, "dry-run failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("ingest (dry-run)"));
    assert!(stdout.contains("records: 2"));
    assert!(stdout.contains("chunks to upsert: 2"));
}

#[test]
fn test_publish_unknown_developer_denied() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_inbox(&config_path, &["publish", "D999", "note"]);
    assert!(!success);
    assert!(stderr.contains("access denied"), "stderr={}", stderr);
}

#[test]
fn test_publish_blank_note_rejected() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) =
        run_inbox(&config_path, &["publish", "D505", "   ", "--project", "C01"]);
    assert!(!success);
    assert!(stderr.contains("must not be empty"), "stderr={}", stderr);
}

#[test]
fn test_ask_unknown_client_denied() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_inbox(&config_path, &["ask", "C99", "what is the status?"]);
    assert!(!success);
    assert!(stderr.contains("invalid access key"), "stderr={}", stderr);
}

#[test]
fn test_ask_blank_question_rejected() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_inbox(&config_path, &["ask", "C01", "  "]);
    assert!(!success);
    assert!(stderr.contains("must not be empty"), "stderr={}", stderr);
}

#[test]
fn test_missing_record_store_reported() {
    let (tmp, _) = setup_test_env();
    let config_path = tmp.path().join("config").join("broken.toml");
    fs::write(
        &config_path,
        r#"[records]
path = "/nonexistent/data.json"

[index]
name = "inbox-test-index"

[server]
bind = "127.0.0.1:7878"
"#,
    )
    .unwrap();

    let (_, stderr, success) = run_inbox(&config_path, &["records"]);
    assert!(!success);
    assert!(
        stderr.contains("Failed to read record store"),
        "stderr={}",
        stderr
    );
}

#[test]
fn test_invalid_config_rejected() {
    let (tmp, _) = setup_test_env();
    let config_path = tmp.path().join("config").join("bad.toml");
    fs::write(
        &config_path,
        r#"[records]
path = "data.json"

[index]
name = "inbox-test-index"
metric = "manhattan"

[server]
bind = "127.0.0.1:7878"
"#,
    )
    .unwrap();

    let (_, stderr, success) = run_inbox(&config_path, &["records"]);
    assert!(!success);
    assert!(stderr.contains("Unknown index metric"), "stderr={}", stderr);
}
