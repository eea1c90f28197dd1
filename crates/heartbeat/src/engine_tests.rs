use std::sync::Arc;

use tempfile::TempDir;

use foreman_core::{ChannelBinding, Project, Provider, SystemClock};
use foreman_dispatch::attachments::NoAttachments;
use foreman_notify::fake::FakeChatAdapter;
use foreman_notify::TemplatedNotifier;
use foreman_registry::{Activation, AuditLog, RegistryStore};
use foreman_sessions::fake::FakeSessionRegistry;
use foreman_tracker::fake::FakeIssueProvider;
use foreman_tracker::Issue;

use super::HeartbeatEngine;
use crate::git::NoopGitPuller;

fn project(slug: &str) -> Project {
    Project {
        slug: slug.into(),
        name: slug.into(),
        repo: format!("/tmp/{slug}").into(),
        base_branch: "main".into(),
        deploy_branch: "main".into(),
        provider: Provider::Github,
        channels: vec![ChannelBinding { channel_id: "C1".into(), channel: "group".into(), name: "general".into(), account_id: None, events: Vec::new() }],
        workers: Default::default(),
    }
}

fn issue(iid: &str) -> Issue {
    Issue { iid: iid.into(), title: "First".into(), body: "b".into(), labels: vec!["To Do".into()], assignees: vec![], open: true }
}

#[allow(clippy::type_complexity)]
fn build_engine(
    dir: &TempDir,
    provider: FakeIssueProvider,
    sessions: FakeSessionRegistry,
) -> HeartbeatEngine<FakeIssueProvider, FakeSessionRegistry, FakeChatAdapter, NoAttachments, NoopGitPuller, SystemClock> {
    let registry = Arc::new(RegistryStore::new(dir.path()));
    let audit = Arc::new(AuditLog::new(dir.path()));
    HeartbeatEngine::new(
        Arc::new(provider),
        Arc::new(sessions),
        TemplatedNotifier::new(FakeChatAdapter::new()),
        Arc::new(NoAttachments),
        Arc::new(NoopGitPuller),
        registry,
        audit,
        SystemClock,
        dir.path(),
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn tick_picks_up_queued_work_and_writes_an_audit_record() {
    let dir = TempDir::new().expect("tempdir");
    let provider = FakeIssueProvider::new();
    provider.seed_issue(issue("1"));
    let engine = build_engine(&dir, provider, FakeSessionRegistry::new());
    let registry_for_setup = RegistryStore::new(dir.path());
    registry_for_setup.ensure_project(project("p1")).expect("ensure project");

    let summary = engine.tick().await.expect("tick");

    assert_eq!(summary.total_pickups(), 1);
    assert_eq!(summary.projects.len(), 1);

    let audit = AuditLog::new(dir.path());
    let records = audit.read_all().expect("read audit log");
    assert!(records.iter().any(|r| r.event == "heartbeat_tick"));
}

#[tokio::test(flavor = "multi_thread")]
async fn max_pickups_per_tick_breaks_the_remaining_project_loop() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("foreman.yaml"), "max_pickups_per_tick: 1\n").expect("write config");

    let provider = FakeIssueProvider::new();
    provider.seed_issue(issue("1"));
    provider.seed_issue(issue("2"));
    let engine = build_engine(&dir, provider, FakeSessionRegistry::new());
    let registry_for_setup = RegistryStore::new(dir.path());
    registry_for_setup.ensure_project(project("p1")).expect("ensure p1");
    registry_for_setup.ensure_project(project("p2")).expect("ensure p2");

    let summary = engine.tick().await.expect("tick");

    assert_eq!(summary.total_pickups(), 1);
    assert_eq!(summary.projects.len(), 2);
    assert_eq!(summary.projects[0].pickups, 1);
    assert_eq!(summary.projects[1].pickups, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn sequential_project_execution_skips_an_idle_project_once_another_has_active_work() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("foreman.yaml"), "project_execution: sequential\n").expect("write config");

    let provider = FakeIssueProvider::new();
    provider.seed_issue(issue("2"));
    let engine = build_engine(&dir, provider, FakeSessionRegistry::new());
    let registry_for_setup = RegistryStore::new(dir.path());
    registry_for_setup.ensure_project(project("p1")).expect("ensure p1");
    registry_for_setup.ensure_project(project("p2")).expect("ensure p2");
    registry_for_setup
        .activate_worker(
            "p1",
            "developer",
            "medior",
            0,
            Activation { issue_id: "99".into(), session_key: "agent:unknown:subagent:p1-developer-medior-x".into(), start_time: 0, previous_label: None },
        )
        .expect("activate p1 slot");

    let summary = engine.tick().await.expect("tick");

    assert_eq!(summary.projects_skipped(), 1);
    let p2 = summary.projects.iter().find(|p| p.project_slug.as_str() == "p2").expect("p2 summary");
    assert!(p2.skipped);
    assert_eq!(p2.pickups, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_session_registry_leaves_liveness_unknown_and_skips_the_orphan_scan() {
    let dir = TempDir::new().expect("tempdir");
    let sessions = FakeSessionRegistry::new();
    sessions.set_unknown();
    let engine = build_engine(&dir, FakeIssueProvider::new(), sessions);

    let summary = engine.tick().await.expect("tick");

    assert!(!summary.session_liveness_known);
    assert_eq!(summary.orphaned_sessions_deleted, 0);
}
