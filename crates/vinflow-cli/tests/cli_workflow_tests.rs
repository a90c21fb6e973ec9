//! CLI integration tests
//!
//! Drive the `vinflow` binary against an on-disk database in a temp dir and
//! check the JSON it prints.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn db(&self) -> PathBuf {
        self.path().join("data").join("store.db")
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    /// Run the binary with `--db` pointing into the workspace
    fn run(&self, uid: Option<&str>, args: &[&str]) -> Output {
        let cli_bin = env!("CARGO_BIN_EXE_vinflow");
        let mut cmd = Command::new(cli_bin);
        cmd.current_dir(self.path())
            .arg("--db")
            .arg(self.db())
            .arg("--config")
            .arg(self.path().join("config.toml"));
        if let Some(uid) = uid {
            cmd.args(["--uid", uid, "--email", &format!("{}@example.com", uid)]);
        }
        cmd.args(args).output().expect("Failed to execute CLI")
    }

    fn run_json(&self, uid: Option<&str>, args: &[&str]) -> Value {
        let output = self.run(uid, args);
        assert!(
            output.status.success(),
            "command {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).unwrap()
    }

    fn seed(&self) {
        let inventory = self.write(
            "inventory.json",
            r#"[
                {"vin": "vin0000001", "car": "Golf", "location": "A"},
                {"vin": "VIN0000002", "car": "Polo", "location": "A"}
            ]"#,
        );
        let imported = self.run_json(None, &["inventory", "import", inventory.to_str().unwrap()]);
        assert_eq!(imported["imported"], 2);

        self.run_json(
            None,
            &["profile", "set", "coord-a", "--role", "branch_coordinator", "--location", "A"],
        );
        self.run_json(None, &["profile", "set", "boss", "--role", "admin"]);
    }
}

#[test]
fn test_cli_move_order_lifecycle() {
    let ws = Workspace::new();
    ws.seed();

    let rows = ws.write(
        "rows.json",
        r#"[
            {"vin": "VIN0000001", "kind": "move", "toLocation": "B"},
            {"vin": "VIN0000002", "kind": "move", "toLocation": "C", "note": "keys in glovebox"}
        ]"#,
    );
    let created = ws.run_json(
        Some("coord-a"),
        &["order", "create", rows.to_str().unwrap()],
    );
    let order_id = created["orderId"].as_str().unwrap().to_string();

    for step in ["1", "2", "3"] {
        let outcome = ws.run_json(Some("coord-a"), &["order", "step", &order_id, step]);
        assert_eq!(outcome["applied"].as_array().unwrap().len(), 2);
        assert!(outcome["excluded"].as_array().unwrap().is_empty());
    }

    let open = ws.run_json(Some("coord-a"), &["order", "list"]);
    assert_eq!(open.as_array().unwrap().len(), 1);

    let finished = ws.run_json(Some("coord-a"), &["order", "finish", &order_id]);
    assert_eq!(finished["status"], "completed");

    let progress = ws.run_json(Some("coord-a"), &["order", "progress", &order_id]);
    assert_eq!(progress["progress"], 100);

    let completed = ws.run_json(Some("coord-a"), &["order", "list", "--completed"]);
    assert_eq!(completed[0]["id"], order_id.as_str());

    let detail = ws.run_json(Some("coord-a"), &["order", "show", &order_id]);
    assert_eq!(detail["rows"][1]["location"], "C");
    assert_eq!(detail["rows"][1]["note"], "keys in glovebox");
}

#[test]
fn test_cli_reports_workflow_refusal_with_error_code() {
    let ws = Workspace::new();
    ws.seed();
    let rows = ws.write(
        "rows.json",
        r#"[{"vin": "VIN0000001", "kind": "move", "toLocation": "B"}]"#,
    );
    let created = ws.run_json(Some("boss"), &["order", "create", rows.to_str().unwrap()]);
    let order_id = created["orderId"].as_str().unwrap().to_string();

    let output = ws.run(Some("boss"), &["order", "step", &order_id, "3"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERR_PRECEDENCE_VIOLATION"), "stderr: {}", stderr);
}

#[test]
fn test_cli_without_uid_is_unauthorised() {
    let ws = Workspace::new();
    ws.seed();
    let rows = ws.write(
        "rows.json",
        r#"[{"vin": "VIN0000001", "kind": "move", "toLocation": "B"}]"#,
    );

    let output = ws.run(None, &["order", "create", rows.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_UNAUTHORISED"));
}

#[test]
fn test_cli_config_grants_shoot_creation() {
    let ws = Workspace::new();
    ws.seed();
    let rows = ws.write(
        "rows.json",
        r#"[{"vin": "VIN0000002", "kind": "shoot", "shootPlace": "Studio"}]"#,
    );

    let denied = ws.run(Some("studio"), &["order", "create", rows.to_str().unwrap()]);
    assert!(!denied.status.success());

    ws.write("config.toml", "shoot_privileged_email = \"studio@example.com\"\n");
    let created = ws.run_json(Some("studio"), &["order", "create", rows.to_str().unwrap()]);
    assert!(created["orderId"].is_string());
}

#[test]
fn test_cli_rejects_step_outside_range() {
    let ws = Workspace::new();
    let output = ws.run(Some("boss"), &["order", "step", "some-order", "4"]);
    assert!(!output.status.success());
}
