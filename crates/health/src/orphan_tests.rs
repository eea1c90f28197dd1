use std::collections::HashSet;
use std::sync::Arc;

use tempfile::TempDir;

use foreman_core::{default_workflow, ExecutionMode, FakeClock, ResolvedConfig, Timeouts};
use foreman_registry::RegistryStore;
use foreman_sessions::fake::FakeSessionRegistry;
use foreman_tracker::fake::FakeIssueProvider;
use foreman_tracker::Issue;
use indexmap::IndexMap;

use super::*;
use crate::checker::HealthChecker;
use crate::types::AnomalyKind;

fn config() -> ResolvedConfig {
    ResolvedConfig {
        workflow: default_workflow(),
        roles: IndexMap::new(),
        timeouts: Timeouts::default(),
        instance_name: None,
        heartbeat_interval_secs: 60,
        max_pickups_per_tick: 5,
        project_execution: ExecutionMode::Parallel,
        role_execution: ExecutionMode::Parallel,
    }
}

fn issue(iid: &str, label: &str) -> Issue {
    Issue { iid: iid.into(), title: "t".into(), body: "b".into(), labels: vec![label.into()], assignees: Vec::new(), open: true }
}

#[tokio::test]
async fn orphaned_label_flags_issue_with_no_active_slot() {
    let dir = TempDir::new().expect("tempdir");
    let registry = Arc::new(RegistryStore::new(dir.path()));
    registry.ensure_project(foreman_core::ProjectBuilder::default().build()).unwrap();
    let provider = Arc::new(FakeIssueProvider::new());
    provider.seed_issue(issue("9", "Doing"));
    let checker = HealthChecker::new(provider.clone(), registry.clone(), FakeClock::new());

    let results = checker.scan_orphaned_labels(&config(), "p1", "developer", true).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].0.kind, AnomalyKind::OrphanedLabel);
    assert_eq!(results[0].0.issue_id.as_ref().map(|id| id.as_str()), Some("9"));
    assert!(results[0].1.fixed);
    assert_eq!(provider.labels_of(&"9".into()), vec!["To Do".to_string()]);
}

#[tokio::test]
async fn orphaned_label_skips_issue_held_by_active_slot() {
    let dir = TempDir::new().expect("tempdir");
    let registry = Arc::new(RegistryStore::new(dir.path()));
    registry.ensure_project(foreman_core::ProjectBuilder::default().build()).unwrap();
    registry
        .activate_worker(
            "p1",
            "developer",
            "medior",
            0,
            foreman_registry::Activation {
                issue_id: "9".into(),
                session_key: "agent:unknown:subagent:p1-developer-medior-cordelia".into(),
                start_time: 0,
                previous_label: Some("To Do".into()),
            },
        )
        .unwrap();
    let provider = Arc::new(FakeIssueProvider::new());
    provider.seed_issue(issue("9", "Doing"));
    let checker = HealthChecker::new(provider.clone(), registry.clone(), FakeClock::new());

    let results = checker.scan_orphaned_labels(&config(), "p1", "developer", true).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn orphaned_session_scan_deletes_untracked_subagent_keys_only() {
    let dir = TempDir::new().expect("tempdir");
    let registry = RegistryStore::new(dir.path());
    registry.ensure_project(foreman_core::ProjectBuilder::default().build()).unwrap();
    registry
        .activate_worker(
            "p1",
            "developer",
            "medior",
            0,
            foreman_registry::Activation {
                issue_id: "9".into(),
                session_key: "agent:unknown:subagent:p1-developer-medior-tracked".into(),
                start_time: 0,
                previous_label: None,
            },
        )
        .unwrap();

    let sessions = FakeSessionRegistry::new();
    let live: HashSet<foreman_core::SessionKey> = [
        "agent:unknown:subagent:p1-developer-medior-tracked".into(),
        "agent:unknown:subagent:p1-developer-medior-leftover".into(),
        "not-a-subagent-session".into(),
    ]
    .into_iter()
    .collect();

    let deleted = scan_orphaned_sessions(&sessions, &registry, &live).await.unwrap();
    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted[0].as_str(), "agent:unknown:subagent:p1-developer-medior-leftover");
}
