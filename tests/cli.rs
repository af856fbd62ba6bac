use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Scratch working directory with its own HOME, so no real settings leak in.
struct MorselEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl MorselEnv {
    fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        std::fs::create_dir_all(root.join("data")).unwrap();
        Self { _tmp: tmp, root }
    }

    fn morsel(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("morsel"));
        cmd.current_dir(&self.root)
            .env("HOME", &self.root)
            .env_remove("RUST_LOG");
        cmd
    }

    fn write_extract(&self, index: usize, rows: &[&str]) -> PathBuf {
        let path = self.root.join(format!("data/daily_sales_data_{index}.csv"));
        let mut content = String::from("date,region,product,quantity,price\n");
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Three 2-row extracts, one pink morsel row each.
    fn write_scenario(&self) {
        self.write_extract(0, &[
            "2021-01-01,north,pink morsel,5,$3.00",
            "2021-01-01,south,gold morsel,7,$9.99",
        ]);
        self.write_extract(1, &[
            "2021-01-20,east,pink morsel,4,$5.00",
            "2021-01-20,west,gold morsel,1,$9.99",
        ]);
        self.write_extract(2, &[
            "2021-02-01,west,magenta morsel,3,$2.00",
            "2021-02-01,north,pink morsel,10,$1.50",
        ]);
    }

    fn output(&self) -> PathBuf {
        self.root.join("output.csv")
    }
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn test_process_end_to_end() {
    let env = MorselEnv::new();
    env.write_scenario();

    env.morsel()
        .arg("process")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 3 pink morsel rows"));

    assert_eq!(
        read(&env.output()),
        "date,region,sales\n2021-01-01,north,15.0\n2021-01-20,east,20.0\n2021-02-01,north,15.0\n"
    );
}

#[test]
fn test_process_is_idempotent() {
    let env = MorselEnv::new();
    env.write_scenario();

    env.morsel().arg("process").assert().success();
    let first = std::fs::read(env.output()).unwrap();
    env.morsel().arg("process").assert().success();
    let second = std::fs::read(env.output()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_process_flag_overrides() {
    let env = MorselEnv::new();
    let input = env.write_extract(0, &[
        "2021-01-01,north,pink morsel,5,$3.00",
        "2021-01-01,south,gold morsel,2,\"$1,000.00\"",
    ]);

    env.morsel()
        .args(["process", "--product", "gold morsel", "--output", "out/gold.csv", "--input"])
        .arg(&input)
        .assert()
        .success();

    assert_eq!(
        read(&env.root.join("out/gold.csv")),
        "date,region,sales\n2021-01-01,south,2000.0\n"
    );
}

#[test]
fn test_process_missing_extract_writes_nothing() {
    let env = MorselEnv::new();
    env.write_extract(0, &["2021-01-01,north,pink morsel,5,$3.00"]);

    env.morsel()
        .arg("process")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
    assert!(!env.output().exists());
}

#[test]
fn test_process_malformed_price_aborts() {
    let env = MorselEnv::new();
    env.write_scenario();
    env.write_extract(2, &["2021-02-01,north,pink morsel,10,one fifty"]);

    env.morsel()
        .arg("process")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed price \"one fifty\""))
        .stderr(predicate::str::contains("line 2"));
    assert!(!env.output().exists());
}

#[test]
fn test_dashboard_without_dataset_fails_fast() {
    let env = MorselEnv::new();
    env.morsel()
        .arg("dashboard")
        .assert()
        .failure()
        .stderr(predicate::str::contains("morsel process"));
}

#[test]
fn test_dashboard_text_has_one_panel_per_region() {
    let env = MorselEnv::new();
    env.write_scenario();
    env.morsel().arg("process").assert().success();

    // stdout is a pipe here, so the dashboard prints the figure as text
    env.morsel()
        .arg("dashboard")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pink Morsel Sales Over Time by Region (height 600)"))
        .stdout(predicate::str::contains("Sales in North"))
        .stdout(predicate::str::contains("Sales in East"))
        .stdout(predicate::str::contains("Sales in South").not())
        .stdout(predicate::str::contains("Price Increase marked on every panel at 2021-01-15"));

    env.morsel()
        .args(["dashboard", "--region", "east"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(height 300)"))
        .stdout(predicate::str::contains("Sales in East"))
        .stdout(predicate::str::contains("Sales in North").not());
}

#[test]
fn test_dashboard_rejects_unknown_region() {
    let env = MorselEnv::new();
    env.write_scenario();
    env.morsel().arg("process").assert().success();

    env.morsel()
        .args(["dashboard", "--region", "central"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown region: central"));
}

#[test]
fn test_figure_json() {
    let env = MorselEnv::new();
    env.write_scenario();
    env.morsel().arg("process").assert().success();

    let out = env.morsel().args(["figure", "--region", "north"]).output().unwrap();
    assert!(out.status.success());
    let fig: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let panels = fig["panels"].as_array().unwrap();
    assert_eq!(panels.len(), 1);
    assert_eq!(panels[0]["title"], "Sales in North");
    assert_eq!(panels[0]["trace"]["points"].as_array().unwrap().len(), 2);
    assert_eq!(panels[0]["reference"]["date"], "2021-01-15");
    assert_eq!(fig["height"], 300);

    env.morsel()
        .args(["figure", "--minimal", "--output", "fig.json"])
        .assert()
        .success();
    let fig: serde_json::Value = serde_json::from_str(&read(&env.root.join("fig.json"))).unwrap();
    let panels = fig["panels"].as_array().unwrap();
    assert_eq!(panels.len(), 2);
    assert!(panels.iter().all(|p| p["reference"].is_null()));
}

#[test]
fn test_init_then_status() {
    let env = MorselEnv::new();
    env.write_scenario();

    env.morsel()
        .args(["init", "--reference-date", "2021-01-10", "--output", "sales.csv"])
        .assert()
        .success();
    assert!(env.root.join(".config/morsel/settings.json").exists());

    env.morsel().arg("process").assert().success();
    assert!(env.root.join("sales.csv").exists());

    env.morsel()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Price Increase on 2021-01-10"))
        .stdout(predicate::str::contains("Rows:       3"))
        .stdout(predicate::str::contains("$30.00"));
}

#[test]
fn test_init_rejects_bad_date() {
    let env = MorselEnv::new();
    env.morsel()
        .args(["init", "--reference-date", "15/01/2021"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid reference date"));
}

#[test]
fn test_demo_feeds_process_and_dashboard() {
    let env = MorselEnv::new();

    env.morsel().arg("demo").assert().success();
    env.morsel().arg("demo").assert().failure();
    env.morsel().args(["demo", "--force"]).assert().success();

    env.morsel().arg("process").assert().success();
    env.morsel()
        .arg("dashboard")
        .assert()
        .success()
        .stdout(predicate::str::contains("(height 1200)"))
        .stdout(predicate::str::contains("Sales in West"));
}
