//! The per-tick orchestrator (§4.7): health pass, review pass, and pickup
//! pass for every project, in registry declaration order, followed by a
//! single once-per-tick orphaned-session sweep and a `heartbeat_tick`
//! audit record.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio_util::sync::CancellationToken;

use foreman_config::ConfigError;
use foreman_core::workflow::RoleId;
use foreman_core::{Clock, ExecutionMode, Project, ProjectSlug, ResolvedConfig, RoleConfig};
use foreman_dispatch::attachments::AttachmentProvider;
use foreman_dispatch::DispatchPipeline;
use foreman_health::HealthChecker;
use foreman_notify::{ChatAdapter, TemplatedNotifier};
use foreman_registry::{AuditLog, AuditRecord, RegistryError, RegistryStore};
use foreman_sessions::SessionRegistry;
use foreman_tracker::IssueProvider;
use indexmap::IndexMap;

use crate::error::HeartbeatError;
use crate::git::GitPuller;
use crate::pickup::attempt_pickup_for_role;
use crate::review::run_review_pass;
use crate::slot_alloc::role_has_active_work;
use crate::summary::{ProjectTickSummary, TickSummary};

pub struct HeartbeatEngine<P, S, A, AT, G, C> {
    provider: Arc<P>,
    sessions: Arc<S>,
    notifier: TemplatedNotifier<A>,
    git_puller: Arc<G>,
    registry: Arc<RegistryStore>,
    audit: Arc<AuditLog>,
    clock: C,
    workspace: PathBuf,
    pipeline: DispatchPipeline<P, S, AT, C>,
    health: HealthChecker<P, C>,
}

impl<P, S, A, AT, G, C> HeartbeatEngine<P, S, A, AT, G, C>
where
    P: IssueProvider + Send + Sync + 'static,
    S: SessionRegistry + Send + Sync + 'static,
    A: ChatAdapter,
    AT: AttachmentProvider + Send + Sync + 'static,
    G: GitPuller + Send + Sync + 'static,
    C: Clock + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        provider: Arc<P>,
        sessions: Arc<S>,
        notifier: TemplatedNotifier<A>,
        attachments: Arc<AT>,
        git_puller: Arc<G>,
        registry: Arc<RegistryStore>,
        audit: Arc<AuditLog>,
        clock: C,
        workspace: impl Into<PathBuf>,
    ) -> Self {
        let workspace = workspace.into();
        let pipeline = DispatchPipeline::new(
            provider.clone(),
            sessions.clone(),
            attachments,
            registry.clone(),
            audit.clone(),
            clock.clone(),
            workspace.clone(),
        );
        let health = HealthChecker::new(provider.clone(), registry.clone(), clock.clone());
        Self { provider, sessions, notifier, git_puller, registry, audit, clock, workspace, pipeline, health }
    }

    /// Run one heartbeat tick to completion (§4.7). A project whose config
    /// fails to load is logged and skipped entirely; every other
    /// per-project or per-issue failure is caught by the callee and folded
    /// into the tick's counts rather than aborting the tick.
    pub async fn tick(&self) -> Result<TickSummary, HeartbeatError> {
        let live_keys = self.sessions.list_live_session_keys().await;

        let projects: Vec<Project> = self.registry.read()?.projects.values().cloned().collect();

        let mut project_summaries = Vec::with_capacity(projects.len());
        let mut running_pickups: u32 = 0;
        let mut any_project_active = false;

        for project in projects {
            let slug = project.slug.clone();

            let config = match foreman_config::load(&self.workspace, slug.as_str()) {
                Ok(config) => config,
                Err(err) => {
                    log_config_error(&slug, &err);
                    continue;
                }
            };

            let mut summary =
                ProjectTickSummary { project_slug: slug.as_str().into(), ..Default::default() };

            let roles: Vec<RoleId> = config.roles.iter().filter(|(_, rc)| rc.enabled).map(|(r, _)| r.clone()).collect();

            for role in &roles {
                self.run_health_pass_for_role(&config, slug.as_str(), role, live_keys.as_ref(), &mut summary).await;
            }

            match run_review_pass(self.provider.as_ref(), self.git_puller.as_ref(), &self.notifier, &project, &config).await
            {
                Ok(counts) => {
                    summary.reviews_merged = counts.merged;
                    summary.reviews_changes_requested = counts.changes_requested;
                    summary.reviews_merge_conflict = counts.merge_conflict;
                    summary.reviews_closed = counts.closed;
                }
                Err(err) => {
                    tracing::warn!(project = %slug, error = %err, "review pass failed for project");
                }
            }

            if running_pickups >= config.max_pickups_per_tick {
                project_summaries.push(summary);
                break;
            }

            let has_active_work = match project_has_active_work(&self.registry, slug.as_str(), &config.roles) {
                Ok(active) => active,
                Err(err) => {
                    tracing::warn!(project = %slug, error = %err, "failed to read worker state for active-work check");
                    false
                }
            };

            if config.project_execution == ExecutionMode::Sequential && !has_active_work && any_project_active {
                summary.skipped = true;
                project_summaries.push(summary);
                continue;
            }

            for role in &roles {
                if running_pickups >= config.max_pickups_per_tick {
                    break;
                }
                match attempt_pickup_for_role(self.provider.as_ref(), &self.pipeline, &self.notifier, &self.registry, &project, &config, role).await
                {
                    Ok(Some(_outcome)) => {
                        summary.pickups += 1;
                        running_pickups += 1;
                    }
                    Ok(None) => {}
                    Err(err) => {
                        tracing::warn!(project = %slug, role = %role, error = %err, "pickup attempt failed");
                    }
                }
            }

            any_project_active = any_project_active || has_active_work || summary.pickups > 0;
            project_summaries.push(summary);
        }

        let (orphaned_sessions_deleted, session_liveness_known) = match &live_keys {
            Some(live) => match foreman_health::scan_orphaned_sessions(self.sessions.as_ref(), &self.registry, live).await
            {
                Ok(deleted) => (deleted.len() as u32, true),
                Err(err) => {
                    tracing::warn!(error = %err, "orphaned session scan failed");
                    (0, true)
                }
            },
            None => (0, false),
        };

        let summary =
            TickSummary { projects: project_summaries, orphaned_sessions_deleted, session_liveness_known };

        self.audit.append(&AuditRecord::new(
            self.clock.epoch_ms(),
            "heartbeat_tick",
            json!({
                "projects": summary.projects.len(),
                "projects_skipped": summary.projects_skipped(),
                "total_pickups": summary.total_pickups(),
                "total_health_fixes": summary.total_health_fixes(),
                "orphaned_sessions_deleted": summary.orphaned_sessions_deleted,
                "session_liveness_known": summary.session_liveness_known,
            }),
        ));

        Ok(summary)
    }

    async fn run_health_pass_for_role(
        &self,
        config: &ResolvedConfig,
        slug: &str,
        role: &str,
        live_keys: Option<&std::collections::HashSet<foreman_core::project::SessionKey>>,
        summary: &mut ProjectTickSummary,
    ) {
        match self.health.check_role(config, slug, role, live_keys, true).await {
            Ok(results) => {
                summary.health_anomalies += results.len() as u32;
                summary.health_fixes += results.iter().filter(|(_, fix)| fix.fixed).count() as u32;
            }
            Err(err) => {
                tracing::warn!(project = slug, role, error = %err, "health check_role failed");
            }
        }

        match self.health.scan_orphaned_labels(config, slug, role, true).await {
            Ok(results) => {
                summary.health_anomalies += results.len() as u32;
                summary.health_fixes += results.iter().filter(|(_, fix)| fix.fixed).count() as u32;
            }
            Err(err) => {
                tracing::warn!(project = slug, role, error = %err, "scan_orphaned_labels failed");
            }
        }
    }

    /// Drive [`Self::tick`] on a fixed cadence (SPEC_FULL.md §4.7): a single
    /// `tokio::time::interval` whose first tick fires immediately, raced
    /// against `cancel` on every iteration. Cancellation is only observed
    /// between ticks — an in-flight tick always runs to completion.
    pub async fn run(&self, interval_secs: u64, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("heartbeat loop stopping");
                    return;
                }
                _ = ticker.tick() => {
                    match self.tick().await {
                        Ok(summary) => {
                            tracing::info!(
                                pickups = summary.total_pickups(),
                                health_fixes = summary.total_health_fixes(),
                                projects_skipped = summary.projects_skipped(),
                                orphaned_sessions_deleted = summary.orphaned_sessions_deleted,
                                "heartbeat tick complete"
                            );
                        }
                        Err(err) => {
                            tracing::warn!(error = %err, "heartbeat tick failed");
                        }
                    }
                }
            }
        }
    }
}

fn log_config_error(slug: &ProjectSlug, err: &ConfigError) {
    tracing::warn!(project = %slug, error = %err, "failed to load project config, skipping project for this tick");
}

fn project_has_active_work(
    registry: &RegistryStore,
    slug: &str,
    roles: &IndexMap<RoleId, RoleConfig>,
) -> Result<bool, RegistryError> {
    for role in roles.keys() {
        let worker = registry.get_worker(slug, role)?;
        if role_has_active_work(&worker) {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
