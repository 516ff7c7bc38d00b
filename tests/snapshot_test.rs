use gpx_track_wasm::parser::parse;
use std::path::Path;

fn load_fixture(path: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{path}")).unwrap()
}

/// Compare the parsed track (renderer shape) against the expected snapshot file.
/// When `UPDATE_SNAPSHOTS=1` is set, write/overwrite the expected file instead.
fn assert_snapshot(fixture: &str, expected_path: &str) {
    let track = parse(&load_fixture(fixture)).unwrap();
    let actual = serde_json::to_value(&track).unwrap();
    let path = format!("tests/fixtures/expected/{expected_path}");

    if matches!(std::env::var("UPDATE_SNAPSHOTS").as_deref(), Ok("1")) {
        let dir = Path::new(&path).parent().unwrap();
        std::fs::create_dir_all(dir).unwrap();
        let pretty = serde_json::to_string_pretty(&actual).unwrap();
        std::fs::write(&path, pretty.as_bytes()).unwrap();
        eprintln!("Updated snapshot: {path}");
        return;
    }

    let expected_str = std::fs::read_to_string(&path).unwrap_or_else(|_| {
        panic!("Expected file not found: {path}. Run with UPDATE_SNAPSHOTS=1 to generate.")
    });
    let expected: serde_json::Value = serde_json::from_str(&expected_str)
        .unwrap_or_else(|e| panic!("Failed to parse {path}: {e}"));

    assert_eq!(
        actual, expected,
        "Snapshot mismatch for {path}.\nRun with UPDATE_SNAPSHOTS=1 to update."
    );
}

#[test]
fn snapshot_01_two_points() {
    assert_snapshot("basic/01_two_points.gpx", "basic/01_two_points.json");
}

#[test]
fn snapshot_02_no_elevation() {
    assert_snapshot("basic/02_no_elevation.gpx", "basic/02_no_elevation.json");
}

#[test]
fn snapshot_realistic_01_alpine_loop() {
    assert_snapshot(
        "realistic/01_alpine_loop.gpx",
        "realistic/01_alpine_loop.json",
    );
}
