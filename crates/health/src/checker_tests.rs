use std::collections::HashSet;
use std::sync::Arc;

use tempfile::TempDir;

use foreman_core::{default_workflow, ExecutionMode, FakeClock, ResolvedConfig, Timeouts};
use foreman_registry::RegistryStore;
use foreman_tracker::fake::FakeIssueProvider;
use foreman_tracker::Issue;
use indexmap::IndexMap;

use super::*;
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

fn issue(iid: &str, label: &str, open: bool) -> Issue {
    Issue {
        iid: iid.into(),
        title: "t".into(),
        body: "b".into(),
        labels: vec![label.into()],
        assignees: Vec::new(),
        open,
    }
}

struct Fixture {
    _dir: TempDir,
    registry: Arc<RegistryStore>,
    provider: Arc<FakeIssueProvider>,
    clock: FakeClock,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let registry = Arc::new(RegistryStore::new(dir.path()));
        registry
            .ensure_project(foreman_core::ProjectBuilder::default().build())
            .expect("ensure project");
        Self { _dir: dir, registry, provider: Arc::new(FakeIssueProvider::new()), clock: FakeClock::new() }
    }

    fn checker(&self) -> HealthChecker<FakeIssueProvider, FakeClock> {
        HealthChecker::new(self.provider.clone(), self.registry.clone(), self.clock.clone())
    }

    fn activate(&self, issue_id: &str) {
        self.registry
            .activate_worker(
                "p1",
                "developer",
                "medior",
                0,
                foreman_registry::Activation {
                    issue_id: issue_id.into(),
                    session_key: "agent:unknown:subagent:p1-developer-medior-cordelia".into(),
                    start_time: self.clock.epoch_ms(),
                    previous_label: Some("To Do".into()),
                },
            )
            .expect("activate");
    }
}

#[tokio::test]
async fn healthy_slot_produces_no_anomaly() {
    let f = Fixture::new();
    f.provider.seed_issue(issue("1", "Doing", true));
    f.activate("1");
    let live: HashSet<_> = ["agent:unknown:subagent:p1-developer-medior-cordelia".into()].into();

    let results = f.checker().check_role(&config(), "p1", "developer", Some(&live), false).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn issue_gone_deactivates_on_auto_fix() {
    let f = Fixture::new();
    f.activate("1");
    let live = HashSet::new();

    let results = f.checker().check_role(&config(), "p1", "developer", Some(&live), true).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].0.kind, AnomalyKind::IssueGone);
    assert!(results[0].1.fixed);

    let worker = f.registry.get_worker("p1", "developer").unwrap();
    assert!(!worker["medior"][0].active);
}

#[tokio::test]
async fn label_mismatch_deactivates_without_reverting_label() {
    let f = Fixture::new();
    f.provider.seed_issue(issue("1", "To Improve", true));
    f.activate("1");
    let live = HashSet::new();

    let results = f.checker().check_role(&config(), "p1", "developer", Some(&live), true).await.unwrap();
    assert_eq!(results[0].0.kind, AnomalyKind::LabelMismatch);
    assert!(f.provider.calls().is_empty(), "external label change must not be reverted");
}

#[tokio::test]
async fn session_dead_reverts_label_and_deactivates() {
    let f = Fixture::new();
    f.provider.seed_issue(issue("1", "Doing", true));
    f.activate("1");
    f.clock.advance(std::time::Duration::from_secs(600));
    let live = HashSet::new();

    let results = f.checker().check_role(&config(), "p1", "developer", Some(&live), true).await.unwrap();
    assert_eq!(results[0].0.kind, AnomalyKind::SessionDead);
    assert!(results[0].1.fixed);
    assert_eq!(f.provider.labels_of(&"1".into()), vec!["To Do".to_string()]);

    let worker = f.registry.get_worker("p1", "developer").unwrap();
    assert!(!worker["medior"][0].active);
}

#[tokio::test]
async fn session_dead_suppressed_inside_grace_period() {
    let f = Fixture::new();
    f.provider.seed_issue(issue("1", "Doing", true));
    f.activate("1");
    let live = HashSet::new();

    let results = f.checker().check_role(&config(), "p1", "developer", Some(&live), false).await.unwrap();
    assert!(results.is_empty(), "a freshly activated slot must not be flagged dead yet");
}

#[tokio::test]
async fn session_dead_suppressed_when_liveness_unknown() {
    let f = Fixture::new();
    f.provider.seed_issue(issue("1", "Doing", true));
    f.activate("1");
    f.clock.advance(std::time::Duration::from_secs(3600));

    let results = f.checker().check_role(&config(), "p1", "developer", None, false).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn stale_worker_reverts_and_deactivates_past_threshold() {
    let f = Fixture::new();
    f.provider.seed_issue(issue("1", "Doing", true));
    f.activate("1");
    let live: HashSet<_> = ["agent:unknown:subagent:p1-developer-medior-cordelia".into()].into();
    f.clock.advance(std::time::Duration::from_secs(7 * 3600));

    let results = f.checker().check_role(&config(), "p1", "developer", Some(&live), true).await.unwrap();
    assert_eq!(results[0].0.kind, AnomalyKind::StaleWorker);
    assert!(results[0].1.fixed);
}

#[tokio::test]
async fn stuck_label_clears_issue_id_and_reverts() {
    let f = Fixture::new();
    f.provider.seed_issue(issue("1", "Doing", true));
    f.registry.update_slot("p1", "developer", "medior", 0, |s| s.issue_id = Some("1".into())).unwrap();

    let results = f.checker().check_role(&config(), "p1", "developer", None, true).await.unwrap();
    assert_eq!(results[0].0.kind, AnomalyKind::StuckLabel);
    assert!(results[0].1.fixed);
    assert_eq!(f.provider.labels_of(&"1".into()), vec!["To Do".to_string()]);

    let worker = f.registry.get_worker("p1", "developer").unwrap();
    assert!(worker["medior"][0].issue_id.is_none());
}

#[tokio::test]
async fn orphan_issue_id_just_clears_the_reference() {
    let f = Fixture::new();
    f.provider.seed_issue(issue("1", "To Do", true));
    f.registry.update_slot("p1", "developer", "medior", 0, |s| s.issue_id = Some("1".into())).unwrap();

    let results = f.checker().check_role(&config(), "p1", "developer", None, true).await.unwrap();
    assert_eq!(results[0].0.kind, AnomalyKind::OrphanIssueId);
    assert!(results[0].1.fixed);
    assert!(f.provider.calls().is_empty());
}
