//! Trace replay tests

use glbridge_cli::commands::{load_bridge_config, open_device, replay, DeviceKind};
use glbridge_cli::trace::Trace;
use glbridge_core::BridgeConfig;
use indicatif::ProgressBar;
use std::path::PathBuf;

fn temp_file(name: &str, content: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("glbridge-cli-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

const LIT_TRIANGLES: &str = r#"[
    {"call": "init"},
    {"call": "matrix_mode", "mode": 5889},
    {"call": "ortho", "left": -1, "right": 1, "bottom": -1, "top": 1, "near": -1, "far": 1},
    {"call": "matrix_mode", "mode": 5888},
    {"call": "enable", "cap": 2896},
    {"call": "enable", "cap": 16384},
    {"call": "light", "light": 16384, "pname": 4611, "params": [0, 0, 1, 0]},
    {"call": "enable_client_state", "array": 32884},
    {"call": "enable_client_state", "array": 32885},
    {"call": "vertex_pointer", "size": 3, "data": [0,0,0, 1,0,0, 0,1,0, 1,1,0]},
    {"call": "normal_pointer", "type": 5122, "data": [0,0,32767, 0,0,32767, 0,0,32767, 0,0,32767]},
    {"call": "draw_elements", "mode": 5, "type": 5121, "indices": [0, 1, 2, 3]},
    {"call": "push_matrix"},
    {"call": "translate", "x": 0.5, "y": 0, "z": 0},
    {"call": "draw_arrays", "mode": 6, "first": 1, "count": 3},
    {"call": "pop_matrix"},
    {"call": "shutdown"}
]"#;

#[test]
fn test_replay_from_file() {
    let path = temp_file("lit.json", LIT_TRIANGLES);
    let trace = Trace::load(&path).unwrap();
    let device = open_device(DeviceKind::Recording, None).unwrap();
    let report = replay(&trace, device, BridgeConfig::default(), &ProgressBar::hidden()).unwrap();

    assert_eq!(report.calls, 17);
    // The trace ends with shutdown.
    assert!(!report.ready);
    assert_eq!(report.draws.len(), 2);

    let strip = &report.draws[0];
    assert_eq!(strip.call, 11);
    assert_eq!(strip.indices, Some(4));
    assert_eq!(strip.vertices, 4);

    let fan = &report.draws[1];
    assert_eq!(fan.call, 14);
    assert_eq!(fan.indices, None);
    assert_eq!(fan.vertices, 3);
}

#[test]
fn test_bridge_config_file() {
    let path = temp_file("bridge.json", r#"{"scratch_vertices": 64}"#);
    let config = load_bridge_config(Some(&path)).unwrap();
    assert_eq!(config.scratch_vertices, 64);

    let bad = temp_file("bad-bridge.json", r#"{"scratch_vertices": 100000000}"#);
    assert!(load_bridge_config(Some(&bad)).is_err());
}

#[test]
fn test_report_serializes() {
    let trace = Trace::parse(
        r#"[{"call": "init"}, {"call": "draw_arrays", "mode": 1, "first": 0, "count": 2}]"#,
    )
    .unwrap();
    let device = open_device(DeviceKind::Recording, None).unwrap();
    let report = replay(&trace, device, BridgeConfig::default(), &ProgressBar::hidden()).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["draws"][0]["mode"], "Lines");
    assert_eq!(json["draws"][0]["vertices"], 2);
}
