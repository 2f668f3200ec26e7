use axum::{extract::Query, response::Html, routing::get, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::process::Command;

fn ugapi_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_ugapi"))
}

fn store_page(store: &Value) -> String {
    let encoded = store
        .to_string()
        .replace('&', "&amp;")
        .replace('"', "&quot;");
    format!(
        "<html><body><div class=\"js-store\" data-content=\"{}\"></div></body></html>",
        encoded
    )
}

async fn mock_search(Query(params): Query<HashMap<String, String>>) -> Html<String> {
    let value = params.get("value").cloned().unwrap_or_default();
    Html(store_page(&json!({"store": {"page": {"data": {"results": [
        {"id": 1, "type": "Chords", "artist_name": "Oasis", "song_name": value},
        {"id": 2, "type": "Tab", "artist_name": "Oasis", "song_name": value}
    ]}}}})))
}

async fn mock_tab() -> Html<String> {
    Html(store_page(&json!({"store": {"page": {"data": {"tab_view": {
        "meta": {"tuning": {"name": "Standard", "value": "E A D G B E"}},
        "wiki_tab": {"content": "[ch]C[/ch] [ch]G7[/ch]"},
        "applicature": {"C": {}, "G7": {}}
    }}}}})))
}

async fn start_upstream() -> u16 {
    let app = Router::new()
        .route("/search.php", get(mock_search))
        .route("/tab/song", get(mock_tab));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    port
}

fn setup_test_env(upstream_port: u16) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let config_content = format!(
        r#"[server]
bind = "127.0.0.1:0"

[upstream]
search_url = "http://127.0.0.1:{}/search.php"
tab_hosts = ["127.0.0.1"]
"#,
        upstream_port
    );
    let config_path = tmp.path().join("ugapi.toml");
    fs::write(&config_path, config_content).unwrap();
    (tmp, config_path)
}

async fn run_ugapi(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = ugapi_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path)
        .args(args)
        .output()
        .await
        .unwrap_or_else(|e| panic!("Failed to run ugapi binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[tokio::test]
async fn test_search_prints_filtered_json() {
    let upstream = start_upstream().await;
    let (_tmp, config_path) = setup_test_env(upstream);

    let (stdout, stderr, success) =
        run_ugapi(&config_path, &["search", "live forever", "--type", "Tab"]).await;
    assert!(success, "search failed: stdout={}, stderr={}", stdout, stderr);

    let results: Value = serde_json::from_str(&stdout).unwrap();
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["type"], "Tab");
    assert_eq!(results[0]["songName"], "live forever");
}

#[tokio::test]
async fn test_tab_prints_json() {
    let upstream = start_upstream().await;
    let (_tmp, config_path) = setup_test_env(upstream);
    let url = format!("http://127.0.0.1:{}/tab/song", upstream);

    let (stdout, stderr, success) = run_ugapi(&config_path, &["tab", &url]).await;
    assert!(success, "tab failed: stdout={}, stderr={}", stdout, stderr);

    let tab: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(tab["tabBody"], "C G7");
    assert_eq!(tab["chordNames"], json!(["C", "G7"]));
    assert_eq!(tab["meta"]["tuning"], "Standard: E A D G B E");
}

#[tokio::test]
async fn test_tab_disallowed_host_fails() {
    let upstream = start_upstream().await;
    let (_tmp, config_path) = setup_test_env(upstream);

    let (stdout, stderr, success) =
        run_ugapi(&config_path, &["tab", "https://example.com/tab/x"]).await;
    assert!(!success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Error:"), "stderr={}", stderr);
}

#[tokio::test]
async fn test_missing_config_file_fails() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) =
        run_ugapi(&tmp.path().join("nope.toml"), &["search", "x"]).await;
    assert!(!success);
    assert!(stderr.contains("Failed to read config file"), "stderr={}", stderr);
}
