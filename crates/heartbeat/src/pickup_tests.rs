use std::sync::Arc;

use indexmap::IndexMap;
use tempfile::TempDir;

use foreman_core::{default_workflow, ChannelBinding, ExecutionMode, Project, Provider, ResolvedConfig, RoleConfig, SystemClock, Timeouts};
use foreman_dispatch::attachments::NoAttachments;
use foreman_dispatch::DispatchPipeline;
use foreman_notify::fake::FakeChatAdapter;
use foreman_notify::TemplatedNotifier;
use foreman_registry::{AuditLog, RegistryStore};
use foreman_sessions::fake::FakeSessionRegistry;
use foreman_tracker::fake::FakeIssueProvider;
use foreman_tracker::Issue;

use super::attempt_pickup_for_role;

fn config_with_roles(roles: IndexMap<smol_str::SmolStr, RoleConfig>) -> ResolvedConfig {
    ResolvedConfig {
        workflow: default_workflow(),
        roles,
        timeouts: Timeouts::default(),
        instance_name: Some("main".into()),
        heartbeat_interval_secs: 60,
        max_pickups_per_tick: 5,
        project_execution: ExecutionMode::Parallel,
        role_execution: ExecutionMode::Parallel,
    }
}

fn developer_role() -> RoleConfig {
    RoleConfig {
        enabled: true,
        levels: vec!["junior".into(), "medior".into(), "senior".into()],
        default_level: "medior".into(),
        models: IndexMap::new(),
        level_max_workers: IndexMap::new(),
    }
}

fn project() -> Project {
    Project {
        slug: "p1".into(),
        name: "P1".into(),
        repo: "/tmp/p1".into(),
        base_branch: "main".into(),
        deploy_branch: "main".into(),
        provider: Provider::Github,
        channels: vec![ChannelBinding { channel_id: "C1".into(), channel: "group".into(), name: "general".into(), account_id: None, events: Vec::new() }],
        workers: Default::default(),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn picks_up_the_oldest_issue_in_the_highest_priority_queue_state() {
    let dir = TempDir::new().expect("tempdir");
    let provider = FakeIssueProvider::new();
    provider.seed_issue(Issue { iid: "1".into(), title: "First".into(), body: "b".into(), labels: vec!["To Do".into()], assignees: vec![], open: true });
    provider.seed_issue(Issue { iid: "2".into(), title: "Second".into(), body: "b".into(), labels: vec!["To Do".into()], assignees: vec![], open: true });

    let sessions = FakeSessionRegistry::new();
    let chat = FakeChatAdapter::new();
    let notifier = TemplatedNotifier::new(chat);
    let registry = RegistryStore::new(dir.path());
    registry.ensure_project(project()).expect("ensure project");
    let registry = Arc::new(registry);
    let audit = Arc::new(AuditLog::new(dir.path()));
    let pipeline = DispatchPipeline::new(
        Arc::new(provider.clone()),
        Arc::new(sessions),
        Arc::new(NoAttachments),
        registry.clone(),
        audit,
        SystemClock,
        dir.path(),
    );

    let mut roles = IndexMap::new();
    roles.insert("developer".into(), developer_role());
    let config = config_with_roles(roles);

    let outcome = attempt_pickup_for_role(&provider, &pipeline, &notifier, &registry, &project(), &config, "developer")
        .await
        .expect("pickup")
        .expect("a pickup happened");

    assert_eq!(outcome.issue_id, "2".into());
    let labels = provider.labels_of(&"2".into());
    assert!(labels.contains(&"Doing".to_string()));
}

#[tokio::test(flavor = "multi_thread")]
async fn no_open_issues_yields_no_pickup() {
    let dir = TempDir::new().expect("tempdir");
    let provider = FakeIssueProvider::new();
    let sessions = FakeSessionRegistry::new();
    let notifier = TemplatedNotifier::new(FakeChatAdapter::new());
    let registry = RegistryStore::new(dir.path());
    registry.ensure_project(project()).expect("ensure project");
    let registry = Arc::new(registry);
    let audit = Arc::new(AuditLog::new(dir.path()));
    let pipeline = DispatchPipeline::new(
        Arc::new(provider.clone()),
        Arc::new(sessions),
        Arc::new(NoAttachments),
        registry.clone(),
        audit,
        SystemClock,
        dir.path(),
    );

    let mut roles = IndexMap::new();
    roles.insert("developer".into(), developer_role());
    let config = config_with_roles(roles);

    let outcome = attempt_pickup_for_role(&provider, &pipeline, &notifier, &registry, &project(), &config, "developer")
        .await
        .expect("pickup");

    assert!(outcome.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn sequential_role_execution_skips_a_role_with_active_work() {
    let dir = TempDir::new().expect("tempdir");
    let provider = FakeIssueProvider::new();
    provider.seed_issue(Issue { iid: "1".into(), title: "First".into(), body: "b".into(), labels: vec!["To Do".into()], assignees: vec![], open: true });

    let sessions = FakeSessionRegistry::new();
    let notifier = TemplatedNotifier::new(FakeChatAdapter::new());
    let registry = RegistryStore::new(dir.path());
    registry.ensure_project(project()).expect("ensure project");
    registry
        .activate_worker(
            "p1",
            "developer",
            "medior",
            0,
            foreman_registry::Activation { issue_id: "99".into(), session_key: "agent:unknown:subagent:p1-developer-medior-x".into(), start_time: 0, previous_label: None },
        )
        .expect("activate");
    let registry = Arc::new(registry);
    let audit = Arc::new(AuditLog::new(dir.path()));
    let pipeline = DispatchPipeline::new(
        Arc::new(provider.clone()),
        Arc::new(sessions),
        Arc::new(NoAttachments),
        registry.clone(),
        audit,
        SystemClock,
        dir.path(),
    );

    let mut roles = IndexMap::new();
    roles.insert("developer".into(), developer_role());
    let mut config = config_with_roles(roles);
    config.role_execution = ExecutionMode::Sequential;

    let outcome = attempt_pickup_for_role(&provider, &pipeline, &notifier, &registry, &project(), &config, "developer")
        .await
        .expect("pickup");

    assert!(outcome.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn unconfigured_role_yields_no_pickup() {
    let dir = TempDir::new().expect("tempdir");
    let provider = FakeIssueProvider::new();
    let sessions = FakeSessionRegistry::new();
    let notifier = TemplatedNotifier::new(FakeChatAdapter::new());
    let registry = RegistryStore::new(dir.path());
    registry.ensure_project(project()).expect("ensure project");
    let registry = Arc::new(registry);
    let audit = Arc::new(AuditLog::new(dir.path()));
    let pipeline = DispatchPipeline::new(
        Arc::new(provider.clone()),
        Arc::new(sessions),
        Arc::new(NoAttachments),
        registry.clone(),
        audit,
        SystemClock,
        dir.path(),
    );

    let config = config_with_roles(IndexMap::new());

    let outcome = attempt_pickup_for_role(&provider, &pipeline, &notifier, &registry, &project(), &config, "developer")
        .await
        .expect("pickup");

    assert!(outcome.is_none());
}
