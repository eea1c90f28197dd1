use super::*;

#[test]
fn load_with_no_override_files_falls_back_to_the_built_in_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let resolved = load(dir.path(), "p1").unwrap();
    assert_eq!(resolved.heartbeat_interval_secs, 60);
    assert!(resolved.role("developer").is_some());
}

#[test]
fn workspace_file_overrides_built_ins() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("foreman.yaml"), "heartbeat_interval_secs: 15\n").unwrap();
    let resolved = load(dir.path(), "p1").unwrap();
    assert_eq!(resolved.heartbeat_interval_secs, 15);
}

#[test]
fn project_file_overrides_workspace_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("foreman.yaml"), "heartbeat_interval_secs: 15\n").unwrap();
    std::fs::create_dir(dir.path().join("projects")).unwrap();
    std::fs::write(dir.path().join("projects").join("p1.yaml"), "heartbeat_interval_secs: 5\n").unwrap();
    let resolved = load(dir.path(), "p1").unwrap();
    assert_eq!(resolved.heartbeat_interval_secs, 5);

    // A sibling project with no file of its own still sees the workspace tier.
    let other = load(dir.path(), "p2").unwrap();
    assert_eq!(other.heartbeat_interval_secs, 15);
}

#[test]
fn project_file_can_disable_a_role() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("projects")).unwrap();
    std::fs::write(dir.path().join("projects").join("p1.yaml"), "roles:\n  architect: false\n").unwrap();
    let resolved = load(dir.path(), "p1").unwrap();
    assert!(resolved.role("architect").is_none());
    // Other built-in roles are untouched.
    assert!(resolved.role("developer").is_some());
}

#[test]
fn project_file_can_add_a_state_transition_without_replacing_the_whole_workflow() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("projects")).unwrap();
    std::fs::write(
        dir.path().join("projects").join("p1.yaml"),
        "
workflow:
  states:
    todo:
      color: '#112233'
",
    )
    .unwrap();
    let resolved = load(dir.path(), "p1").unwrap();
    assert_eq!(resolved.workflow.states["todo"].color.as_str(), "#112233");
    // The rest of the default workflow graph is intact.
    assert!(resolved.workflow.states.contains_key("doing"));
    assert_eq!(resolved.workflow.states["todo"].label.as_str(), "To Do");
}

#[test]
fn a_malformed_project_file_surfaces_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("projects")).unwrap();
    std::fs::write(dir.path().join("projects").join("p1.yaml"), "not: [valid\n").unwrap();
    let err = load(dir.path(), "p1").unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}
