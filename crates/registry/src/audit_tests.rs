use super::*;
use serde_json::json;
use tempfile::TempDir;

#[test]
fn append_then_read_all_round_trips() {
    let dir = TempDir::new().expect("tempdir");
    let log = AuditLog::new(dir.path());

    log.append(&AuditRecord::new(1_000, "dispatch", json!({"project": "p1", "issue": "42"})));
    log.append(&AuditRecord::new(1_001, "model_selection", json!({"model": "model-medium"})));

    let records = log.read_all().expect("read");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].event, "dispatch");
    assert_eq!(records[0].fields["project"], "p1");
    assert_eq!(records[1].event, "model_selection");
}

#[test]
fn read_all_on_missing_file_is_empty() {
    let dir = TempDir::new().expect("tempdir");
    let log = AuditLog::new(dir.path());
    assert!(log.read_all().expect("read").is_empty());
}

#[test]
fn append_creates_workspace_directory_if_missing() {
    let dir = TempDir::new().expect("tempdir");
    let nested = dir.path().join("nested/workspace");
    let log = AuditLog::new(&nested);
    log.append(&AuditRecord::new(1, "heartbeat_tick", json!({})));
    assert_eq!(log.read_all().expect("read").len(), 1);
}
