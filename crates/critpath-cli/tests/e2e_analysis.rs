//! E2E tests for `critpath analyze`, `order`, `cycles` and `dot`.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DEMO_GRAPH: &str = r#"{
  "vertices": 5,
  "edges": [
    {"from": 0, "to": 1, "weight": 2.0},
    {"from": 1, "to": 2, "weight": 3.0},
    {"from": 2, "to": 3, "weight": 1.0},
    {"from": 3, "to": 1, "weight": 1.0},
    {"from": 0, "to": 4, "weight": 5.0}
  ],
  "labels": {"0": "Start", "1": "Task1", "2": "Task2", "3": "Task3", "4": "End"}
}"#;

const CHAIN_GRAPH: &str = r#"{
  "vertices": 4,
  "edges": [
    {"from": 0, "to": 1, "weight": 1.0},
    {"from": 1, "to": 2, "weight": 4.0},
    {"from": 0, "to": 2, "weight": 2.0},
    {"from": 2, "to": 3}
  ]
}"#;

fn critpath_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("critpath"));
    cmd.current_dir(dir);
    cmd.env("CRITPATH_LOG", "error");
    cmd.env("XDG_CONFIG_HOME", dir);
    cmd.env_remove("FORMAT");
    cmd.env_remove("CRITPATH_TIMING");
    cmd
}

fn write_graph(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, body).expect("write graph");
    path
}

fn run_json(dir: &Path, args: &[&str]) -> Value {
    let output = critpath_cmd(dir)
        .args(args)
        .args(["--format", "json"])
        .output()
        .expect("critpath should not crash");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

// ---------------------------------------------------------------------------
// analyze
// ---------------------------------------------------------------------------

#[test]
fn analyze_reports_components_and_critical_path() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir, "demo.json", DEMO_GRAPH);
    let json = run_json(dir.path(), &["analyze", graph.to_str().unwrap()]);

    assert_eq!(json["vertices"], 5);
    assert_eq!(json["edges"], 5);
    assert_eq!(json["components"].as_array().unwrap().len(), 3);
    assert_eq!(json["components"][0]["members"], serde_json::json!([3, 2, 1]));
    assert_eq!(json["components"][0]["cyclic"], true);
    assert_eq!(json["condensation"]["order"], serde_json::json!([2, 0, 1]));
    assert_eq!(json["source"], 2);
    assert_eq!(json["critical_path"]["length"], 5.0);
    assert_eq!(json["critical_path"]["members"], serde_json::json!([[0], [4]]));
    assert_eq!(
        json["longest"]["critical_path"]["vertices"],
        serde_json::json!([2, 1])
    );
    assert_eq!(json["longest"]["critical_path"]["length"], 5.0);
    assert!(json["shortest"].get("critical_path").is_none());
    assert_eq!(json["stats"]["cyclic_component_count"], 1);
    assert!(json.get("stages").is_none());
}

#[test]
fn analyze_on_dag_finds_longest_chain() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir, "chain.json", CHAIN_GRAPH);
    let json = run_json(dir.path(), &["analyze", graph.to_str().unwrap()]);

    // Every vertex is its own component, so the critical path is 0 -> 1 -> 2 -> 3.
    assert_eq!(json["critical_path"]["length"], 6.0);
    assert_eq!(
        json["critical_path"]["members"],
        serde_json::json!([[0], [1], [2], [3]])
    );

    let shortest = &json["shortest"]["targets"];
    let to_last = shortest
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["path"].as_array().unwrap().len() == 3)
        .expect("a two-edge shortest path exists");
    assert_eq!(to_last["distance"], 3.0);
}

#[test]
fn analyze_flags_skip_stages() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir, "demo.json", DEMO_GRAPH);
    let json = run_json(
        dir.path(),
        &[
            "analyze",
            graph.to_str().unwrap(),
            "--no-shortest",
            "--no-critical-path",
        ],
    );
    assert!(json.get("shortest").is_none());
    assert!(json.get("critical_path").is_none());
    // The chain from the source is part of the longest-path report.
    assert_eq!(json["longest"]["critical_path"]["length"], 5.0);
}

#[test]
fn analyze_timing_adds_stage_reports() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir, "demo.json", DEMO_GRAPH);
    let json = run_json(dir.path(), &["analyze", graph.to_str().unwrap(), "--timing"]);
    let stages: Vec<&str> = json["stages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["stage"].as_str().unwrap())
        .collect();
    assert_eq!(stages.first().copied(), Some("scc"));
    assert!(stages.contains(&"critical_path"));
}

#[test]
fn analyze_reads_local_config() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir, "demo.json", DEMO_GRAPH);
    std::fs::write(
        dir.path().join("critpath.toml"),
        "[analysis]\nsource = 0\nlongest = false\n\n[output]\nformat = \"json\"\n",
    )
    .unwrap();

    let output = critpath_cmd(dir.path())
        .args(["analyze", graph.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("config selects JSON");
    assert_eq!(json["source"], 0);
    assert!(json.get("longest").is_none());
}

#[test]
fn analyze_bad_config_reports_e3002() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir, "demo.json", DEMO_GRAPH);
    let config = dir.path().join("broken.toml");
    std::fs::write(&config, "[analysis\n").unwrap();

    critpath_cmd(dir.path())
        .args(["--config", config.to_str().unwrap(), "analyze"])
        .arg(&graph)
        .assert()
        .failure()
        .stderr(predicate::str::contains("E3002"));
}

#[test]
fn analyze_text_output() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir, "demo.json", DEMO_GRAPH);
    critpath_cmd(dir.path())
        .args(["analyze", graph.to_str().unwrap(), "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "graph vertices=5 edges=5 components=3 cyclic=1",
        ))
        .stdout(predicate::str::contains("critical_path length=5.00 path=2,1"));
}

#[test]
fn analyze_pretty_output() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir, "demo.json", DEMO_GRAPH);
    critpath_cmd(dir.path())
        .env("FORMAT", "pretty")
        .args(["analyze", graph.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Strongly connected components (3)"))
        .stdout(predicate::str::contains("Critical path"));
}

#[test]
fn analyze_missing_file_reports_e3001() {
    let dir = TempDir::new().unwrap();
    critpath_cmd(dir.path())
        .args(["analyze", "missing.json", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E3001]"));
}

#[test]
fn analyze_huge_vertex_count_reports_e3001() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir, "huge.json", r#"{"vertices": 1000000000000000000}"#);
    critpath_cmd(dir.path())
        .args(["analyze", graph.to_str().unwrap(), "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E3001]"))
        .stderr(predicate::str::contains("the limit is"));
}

#[test]
fn analyze_out_of_range_edge_reports_e1001() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(
        &dir,
        "bad.json",
        r#"{"vertices": 2, "edges": [{"from": 0, "to": 7}]}"#,
    );
    critpath_cmd(dir.path())
        .args(["analyze", graph.to_str().unwrap(), "--format", "json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"error_code\": \"E1001\""));
}

#[test]
fn analyze_invalid_source_reports_e1001() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir, "demo.json", DEMO_GRAPH);
    critpath_cmd(dir.path())
        .args([
            "analyze",
            graph.to_str().unwrap(),
            "--source",
            "9",
            "--format",
            "text",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E1001]"));
}

// ---------------------------------------------------------------------------
// order / cycles / dot
// ---------------------------------------------------------------------------

#[test]
fn order_condensed_by_default() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir, "demo.json", DEMO_GRAPH);
    let json = run_json(dir.path(), &["order", graph.to_str().unwrap()]);
    assert_eq!(json["condensed"], true);
    let members: Vec<Value> = json["steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["members"].clone())
        .collect();
    assert_eq!(
        members,
        vec![
            serde_json::json!([0]),
            serde_json::json!([3, 2, 1]),
            serde_json::json!([4])
        ]
    );
}

#[test]
fn order_raw_fails_on_cycle() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir, "demo.json", DEMO_GRAPH);
    critpath_cmd(dir.path())
        .args(["order", graph.to_str().unwrap(), "--raw", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E2002]"));
}

#[test]
fn order_raw_on_dag() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir, "chain.json", CHAIN_GRAPH);
    critpath_cmd(dir.path())
        .args(["order", graph.to_str().unwrap(), "--raw", "--format", "text"])
        .assert()
        .success()
        .stdout("0\t0\t0\n1\t1\t1\n2\t2\t2\n3\t3\t3\n");
}

#[test]
fn cycles_lists_cyclic_components() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir, "demo.json", DEMO_GRAPH);
    let json = run_json(dir.path(), &["cycles", graph.to_str().unwrap()]);
    let cycles = json["cycles"].as_array().unwrap();
    assert_eq!(cycles.len(), 1);
    assert_eq!(
        cycles[0]["labels"],
        serde_json::json!(["Task3", "Task2", "Task1"])
    );
}

#[test]
fn cycles_on_dag_reports_none() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir, "chain.json", CHAIN_GRAPH);
    critpath_cmd(dir.path())
        .args(["cycles", graph.to_str().unwrap(), "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No dependency cycles found."));
}

#[test]
fn dot_exports_condensation() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir, "demo.json", DEMO_GRAPH);
    critpath_cmd(dir.path())
        .args(["dot", graph.to_str().unwrap(), "--condensed"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("digraph {"))
        .stdout(predicate::str::contains("SCC0{Task3,Task2,Task1}"));
}
