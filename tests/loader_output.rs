use script_qc::loader::{load_inputs, load_thresholds};
use script_qc::output::write_report;
use script_qc::{compute_coverage_report, CoverageError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

fn fixture(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf, std::path::PathBuf) {
    let week = write(
        dir,
        "week.json",
        r#"{
            "practicePlans": {"Monday": {"segments": [
                {"id": "s1", "typeId": "team", "script": [
                    {"id": "r1", "playId": "p1"}, {"id": "r2", "playId": "p2"}, {"id": "r3"}
                ]}
            ]}},
            "playRepTargets": {"p1": 3, "p2": 1},
            "practiceReviews": {"Monday": {"scriptReviews": {"r1": {"rating": 4}}}}
        }"#,
    );
    let plays = write(
        dir,
        "plays.json",
        r#"{
            "p1": {"name": "Stick", "formation": "Gun", "bucketId": "pass", "conceptFamily": "Stick"},
            "p2": {"name": "Counter", "formation": "Pistol", "bucketId": "run"}
        }"#,
    );
    let setup = write(
        dir,
        "setup.json",
        r#"{
            "playBuckets": [{"id": "run", "label": "Run", "families": []},
                            {"id": "pass", "label": "Pass", "families": ["Stick"]}],
            "fieldZones": [{"id": "rz", "label": "Red Zone"}],
            "downDistanceCategories": null
        }"#,
    );
    (week, plays, setup)
}

#[test]
fn test_load_inputs_counts_documents() {
    let dir = TempDir::new().unwrap();
    let (week, plays, setup) = fixture(dir.path());

    let (inputs, report) = load_inputs(&week, &plays, &setup).unwrap();
    assert!(inputs.week.is_some());
    assert_eq!(report.days, 1);
    assert_eq!(report.segments, 1);
    assert_eq!(report.script_rows, 3);
    assert_eq!(report.plays, 2);
    assert_eq!(report.buckets, 2);
    assert_eq!(report.situations, 1);
}

#[test]
fn test_null_week_loads_as_absent() {
    let dir = TempDir::new().unwrap();
    let (_, plays, setup) = fixture(dir.path());
    let week = write(dir.path(), "empty.json", "null");

    let (inputs, report) = load_inputs(&week, &plays, &setup).unwrap();
    assert!(inputs.week.is_none());
    assert_eq!(report.script_rows, 0);
    let coverage = compute_coverage_report(inputs.week.as_ref(), &inputs.plays, &inputs.setup);
    assert!(coverage.buckets.is_empty());
}

#[test]
fn test_bad_json_names_the_file() {
    let dir = TempDir::new().unwrap();
    let (_, plays, setup) = fixture(dir.path());
    let week = write(dir.path(), "broken.json", "{\"practicePlans\": ");

    let err = load_inputs(&week, &plays, &setup).unwrap_err();
    assert!(matches!(err, CoverageError::Parse { .. }));
    assert!(err.to_string().contains("broken.json"));

    let missing = dir.path().join("nope.json");
    let err = load_inputs(&missing, &plays, &setup).unwrap_err();
    assert!(matches!(err, CoverageError::Read { .. }));
}

#[test]
fn test_thresholds_file_is_optional() {
    let dir = TempDir::new().unwrap();
    assert_eq!(load_thresholds(None).unwrap().bucket_high_deficit, 10);

    let path = write(dir.path(), "thresholds.json", r#"{"recurringIssueMedium": 2}"#);
    let t = load_thresholds(Some(path.as_path())).unwrap();
    assert_eq!(t.recurring_issue_medium, 2);
    assert_eq!(t.recurring_issue_high, 5);
}

#[test]
fn test_write_report_emits_tables_and_json() {
    let dir = TempDir::new().unwrap();
    let (week, plays, setup) = fixture(dir.path());
    let (inputs, _) = load_inputs(&week, &plays, &setup).unwrap();
    let report = compute_coverage_report(inputs.week.as_ref(), &inputs.plays, &inputs.setup);

    let out = dir.path().join("out");
    let written = write_report(&out, &report).unwrap();
    assert_eq!(written.len(), 7);
    assert!(written.iter().all(|p| p.exists()));

    let buckets = fs::read_to_string(out.join("buckets.csv")).unwrap();
    let mut lines = buckets.lines();
    assert_eq!(lines.next(), Some("Bucket,Reps,Target,Delta,Share,Status"));
    assert_eq!(lines.next(), Some("Run,1,1,0,50%,met"));
    assert_eq!(lines.next(), Some("Pass,1,3,-2,50%,partial"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("coverage_report.json")).unwrap()).unwrap();
    assert_eq!(json["summary"]["totalReps"], 2);
    assert_eq!(json["quotas"][0]["playId"], "p1");
    assert_eq!(json["quotas"][0]["qualityStatus"], "game-ready");
    assert_eq!(json["days"].as_array().unwrap().len(), 7);
}
