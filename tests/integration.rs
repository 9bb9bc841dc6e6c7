use std::fs;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn incsim_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("incsim");
    path
}

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

fn setup_test_env() -> (TempDir, PathBuf) {
    setup_test_env_with_bind("127.0.0.1:7341")
}

fn setup_test_env_with_bind(bind: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let config_content = format!(
        r#"[structured_store]
path = "{root}/data/incidents.sqlite"

[document_store]
path = "{root}/data/incident_details.sqlite"

[generation]
default_count = 3
utc_offset_hours = -5
call_window_secs = 300

[server]
bind = "{bind}"
recent_limit = 20
refresh_secs = 5
"#,
        root = root.display(),
        bind = bind,
    );

    let config_path = config_dir.join("incsim.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_incsim(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = incsim_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run incsim binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Pull incident ids out of `incsim recent` output.
fn recent_ids(config_path: &Path) -> Vec<String> {
    let (stdout, stderr, success) = run_incsim(config_path, &["recent", "--limit", "50"]);
    assert!(success, "recent failed: {}", stderr);
    stdout
        .lines()
        .filter(|l| l.starts_with("INC"))
        .filter_map(|l| l.split_whitespace().next())
        .map(|s| s.to_string())
        .collect()
}

#[test]
fn test_init_creates_both_stores() {
    let (tmp, config) = setup_test_env();
    let (stdout, stderr, success) = run_incsim(&config, &["init"]);
    assert!(success, "init failed: {}", stderr);
    assert!(stdout.contains("initialized"));
    assert!(tmp.path().join("data/incidents.sqlite").exists());
    assert!(tmp.path().join("data/incident_details.sqlite").exists());
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config) = setup_test_env();
    let (_, _, s1) = run_incsim(&config, &["init"]);
    let (_, stderr, s2) = run_incsim(&config, &["init"]);
    assert!(s1 && s2, "second init failed: {}", stderr);
}

#[test]
fn test_generate_writes_to_both_stores() {
    let (_tmp, config) = setup_test_env();
    run_incsim(&config, &["init"]);

    let (stdout, stderr, success) =
        run_incsim(&config, &["generate", "--count", "5", "--seed", "11"]);
    assert!(success, "generate failed: {}", stderr);
    assert!(stdout.contains("generated: 5"));
    assert!(stdout.contains("structured saved: 5"));
    assert!(stdout.contains("documents saved: 5"));
    assert!(stdout.contains("ok"));

    assert_eq!(recent_ids(&config).len(), 5);

    let (stats, _, ok) = run_incsim(&config, &["stats"]);
    assert!(ok);
    assert!(stats.contains("Incidents:   5"));
    assert!(stats.contains("Documents:   5"));
}

#[test]
fn test_generate_uses_default_count() {
    let (_tmp, config) = setup_test_env();
    run_incsim(&config, &["init"]);
    let (stdout, stderr, success) = run_incsim(&config, &["generate", "--seed", "3"]);
    assert!(success, "generate failed: {}", stderr);
    assert!(stdout.contains("generated: 3"));
}

#[test]
fn test_generate_requires_init() {
    let (_tmp, config) = setup_test_env();
    let (_, stderr, success) = run_incsim(&config, &["generate", "--count", "1"]);
    assert!(!success);
    assert!(stderr.contains("incsim init"), "stderr: {}", stderr);
}

#[test]
fn test_generate_dry_run_writes_nothing() {
    let (tmp, config) = setup_test_env();
    let (stdout, stderr, success) =
        run_incsim(&config, &["generate", "--count", "4", "--seed", "5", "--dry-run"]);
    assert!(success, "dry run failed: {}", stderr);
    assert!(stdout.contains("dry-run"));
    assert_eq!(stdout.lines().filter(|l| l.trim_start().starts_with("INC")).count(), 4);
    assert!(!tmp.path().join("data/incidents.sqlite").exists());
}

#[test]
fn test_generate_dry_run_is_deterministic_per_seed() {
    let (_tmp, config) = setup_test_env();
    let args = ["generate", "--count", "6", "--seed", "99", "--dry-run"];
    let ids = |out: String| -> Vec<String> {
        out.lines()
            .filter_map(|l| l.split_whitespace().next())
            .filter(|w| w.starts_with("INC"))
            .map(|s| s.to_string())
            .collect()
    };
    let (a, _, _) = run_incsim(&config, &args);
    let (b, _, _) = run_incsim(&config, &args);
    assert_eq!(ids(a), ids(b));
}

#[test]
fn test_generate_pinned_type() {
    let (_tmp, config) = setup_test_env();
    run_incsim(&config, &["init"]);
    let (_, stderr, success) = run_incsim(
        &config,
        &["generate", "--count", "3", "--seed", "8", "--type", "cardiac arrest"],
    );
    assert!(success, "generate failed: {}", stderr);

    let (stdout, _, _) = run_incsim(&config, &["recent"]);
    let rows: Vec<&str> = stdout.lines().filter(|l| l.starts_with("INC")).collect();
    assert_eq!(rows.len(), 3);
    for row in rows {
        assert!(row.contains("Cardiac Arrest"), "row: {}", row);
    }
}

#[test]
fn test_generate_unknown_type_skips_all() {
    let (_tmp, config) = setup_test_env();
    run_incsim(&config, &["init"]);
    let (stdout, _, success) = run_incsim(
        &config,
        &["generate", "--count", "2", "--type", "Alien Abduction"],
    );
    assert!(success);
    assert!(stdout.contains("generated: 0"));
    assert!(stdout.contains("skipped: 2"));
}

#[test]
fn test_get_incident_with_notes() {
    let (_tmp, config) = setup_test_env();
    run_incsim(&config, &["init"]);
    run_incsim(&config, &["generate", "--count", "2", "--seed", "21", "--notes", "4"]);

    let ids = recent_ids(&config);
    assert_eq!(ids.len(), 2);

    let (stdout, stderr, success) = run_incsim(&config, &["get", &ids[0]]);
    assert!(success, "get failed: {}", stderr);
    assert!(stdout.contains(&ids[0]));
    assert!(stdout.contains("\"emergency_details\""));
    assert!(stdout.contains("--- Notes (4) ---"));
    assert!(stdout.contains("Unit Arrival"));
    assert!(stdout.contains("(CREW"));
    // Treatment notes are high urgency and flagged.
    assert!(stdout.contains("!["));
}

#[test]
fn test_get_missing_incident() {
    let (_tmp, config) = setup_test_env();
    run_incsim(&config, &["init"]);
    let (_, stderr, success) = run_incsim(&config, &["get", "INC00000000"]);
    assert!(!success);
    assert!(stderr.contains("not found"));
}

#[test]
fn test_mapping_runs_without_config() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope.toml");
    let (stdout, _, success) = run_incsim(&missing, &["mapping"]);
    assert!(success);
    assert!(stdout.contains("caller_last_name"));
    assert!(stdout.contains("emergency_details.vital_signs.blood_pressure"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let (tmp, _) = setup_test_env();
    let bad = tmp.path().join("bad.toml");
    fs::write(
        &bad,
        "[structured_store]\npath = \"x.sqlite\"\n[document_store]\npath = \"x.sqlite\"\n",
    )
    .unwrap();
    let (_, stderr, success) = run_incsim(&bad, &["stats"]);
    assert!(!success);
    assert!(stderr.contains("must differ"));
}

// ============ Dashboard ============

struct ServerGuard(Child);

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

fn wait_for_health(base: &str) -> bool {
    let deadline = Instant::now() + Duration::from_secs(15);
    while Instant::now() < deadline {
        if let Ok(resp) = reqwest::blocking::get(format!("{}/health", base)) {
            if resp.status().is_success() {
                return true;
            }
        }
        std::thread::sleep(Duration::from_millis(100));
    }
    false
}

#[test]
fn test_dashboard_serves_api() {
    let bind = format!("127.0.0.1:{}", free_port());
    let (_tmp, config) = setup_test_env_with_bind(&bind);
    run_incsim(&config, &["init"]);
    run_incsim(&config, &["generate", "--count", "4", "--seed", "2", "--notes", "2"]);
    let ids = recent_ids(&config);

    let child = Command::new(incsim_binary())
        .arg("--config")
        .arg(config.to_str().unwrap())
        .arg("serve")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    let _guard = ServerGuard(child);

    let base = format!("http://{}", bind);
    assert!(wait_for_health(&base), "server did not become healthy");

    let recent: serde_json::Value =
        reqwest::blocking::get(format!("{}/api/incidents?limit=3", base))
            .unwrap()
            .json()
            .unwrap();
    assert_eq!(recent["total"], 4);
    assert_eq!(recent["incidents"].as_array().unwrap().len(), 3);

    let detail: serde_json::Value =
        reqwest::blocking::get(format!("{}/api/incident/{}", base, ids[0]))
            .unwrap()
            .json()
            .unwrap();
    assert_eq!(detail["document"]["incident_id"], ids[0].as_str());
    assert_eq!(detail["notes"].as_array().unwrap().len(), 2);

    let missing = reqwest::blocking::get(format!("{}/api/incident/INC00000000", base)).unwrap();
    assert_eq!(missing.status().as_u16(), 404);
    let body: serde_json::Value = missing.json().unwrap();
    assert_eq!(body["error"]["code"], "not_found");

    let bad = reqwest::blocking::get(format!("{}/api/incidents?limit=abc", base)).unwrap();
    assert_eq!(bad.status().as_u16(), 400);
    let body: serde_json::Value = bad.json().unwrap();
    assert_eq!(body["error"]["code"], "bad_request");

    let page = reqwest::blocking::get(format!("{}/", base))
        .unwrap()
        .text()
        .unwrap();
    assert!(page.contains("/api/incidents"));
    assert!(page.contains("const REFRESH_MS = 5000;"));
}
