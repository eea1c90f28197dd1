//! Per-slot triangulation (§4.6): three observations — `slot.active`,
//! the issue's current workflow-state label, and whether its session key
//! is live — are combined into zero or one anomaly per slot, evaluated in
//! table order so the first matching case wins.

use std::collections::HashSet;
use std::sync::Arc;

use foreman_core::project::{IssueId, SessionKey};
use foreman_core::workflow::Label;
use foreman_core::{Clock, ResolvedConfig, Slot, Workflow};
use foreman_registry::RegistryStore;
use foreman_tracker::{IssueProvider, TrackerError};

use crate::error::HealthError;
use crate::types::{Anomaly, AnomalyKind, HealthFix};

/// 5 minutes, in milliseconds (§4.6 "Grace period", GLOSSARY).
pub const GRACE_PERIOD_MS: u64 = 5 * 60 * 1000;

pub struct HealthChecker<P, C> {
    provider: Arc<P>,
    registry: Arc<RegistryStore>,
    clock: C,
}

impl<P, C> HealthChecker<P, C>
where
    P: IssueProvider + Send + Sync,
    C: Clock,
{
    pub fn new(provider: Arc<P>, registry: Arc<RegistryStore>, clock: C) -> Self {
        Self { provider, registry, clock }
    }

    pub(crate) fn provider(&self) -> &P {
        &self.provider
    }

    pub(crate) fn registry(&self) -> &RegistryStore {
        &self.registry
    }

    /// Triangulate every slot of `role` within `project_slug` and, when
    /// `auto_fix` is set, apply the table's repair action. Returns one
    /// `(Anomaly, HealthFix)` pair per detected anomaly — a healthy slot
    /// contributes nothing.
    pub async fn check_role(
        &self,
        config: &ResolvedConfig,
        project_slug: &str,
        role: &str,
        live_session_keys: Option<&HashSet<SessionKey>>,
        auto_fix: bool,
    ) -> Result<Vec<(Anomaly, HealthFix)>, HealthError> {
        let workflow = &config.workflow;
        let active_label = workflow.active_label(role)?;
        let revert_default = workflow.revert_label(role);
        let worker = self.registry.get_worker(project_slug, role)?;
        let stale_after_ms = config.timeouts.stale_worker_hours.saturating_mul(3_600_000);
        let now = self.clock.epoch_ms();

        let mut results = Vec::new();
        for (level, slots) in worker.iter() {
            for (index, slot) in slots.iter().enumerate() {
                let kind = if slot.active {
                    self.classify_active(workflow, slot, &active_label, live_session_keys, stale_after_ms, now)
                        .await?
                } else {
                    self.classify_inactive(workflow, slot, &active_label).await?
                };
                let Some(kind) = kind else { continue };

                let fix = if auto_fix {
                    self.apply_fix(project_slug, role, level, index, slot, kind, &active_label, &revert_default)
                        .await
                } else {
                    HealthFix::not_attempted()
                };

                results.push((
                    Anomaly {
                        kind,
                        role: role.into(),
                        level: level.clone(),
                        slot_index: index,
                        issue_id: slot.issue_id.clone(),
                    },
                    fix,
                ));
            }
        }
        Ok(results)
    }

    async fn classify_active(
        &self,
        workflow: &Workflow,
        slot: &Slot,
        active_label: &str,
        live_session_keys: Option<&HashSet<SessionKey>>,
        stale_after_ms: u64,
        now: u64,
    ) -> Result<Option<AnomalyKind>, HealthError> {
        let issue = match &slot.issue_id {
            Some(iid) => self.fetch_issue(iid).await?,
            None => None,
        };
        let Some(issue) = issue else { return Ok(Some(AnomalyKind::IssueGone)) };
        if !issue.open {
            return Ok(Some(AnomalyKind::IssueGone));
        }
        let current_label = workflow.current_state_label(&issue.labels);
        if current_label.as_deref() != Some(active_label) {
            return Ok(Some(AnomalyKind::LabelMismatch));
        }

        if slot.session_key.is_none() {
            return Ok(Some(AnomalyKind::SessionDead));
        }

        let start_time = slot.start_time.unwrap_or(now);
        let in_grace = now.saturating_sub(start_time) < GRACE_PERIOD_MS;

        if let Some(live) = live_session_keys {
            let is_live = slot.session_key.as_ref().is_some_and(|key| live.contains(key));
            if !is_live && !in_grace {
                return Ok(Some(AnomalyKind::SessionDead));
            }
            if is_live && now.saturating_sub(start_time) > stale_after_ms {
                return Ok(Some(AnomalyKind::StaleWorker));
            }
        }

        Ok(None)
    }

    async fn classify_inactive(
        &self,
        workflow: &Workflow,
        slot: &Slot,
        active_label: &str,
    ) -> Result<Option<AnomalyKind>, HealthError> {
        let Some(iid) = &slot.issue_id else { return Ok(None) };
        let issue = self.fetch_issue(iid).await?;
        let stuck = issue
            .filter(|issue| issue.open)
            .is_some_and(|issue| workflow.current_state_label(&issue.labels).as_deref() == Some(active_label));
        Ok(Some(if stuck { AnomalyKind::StuckLabel } else { AnomalyKind::OrphanIssueId }))
    }

    async fn fetch_issue(&self, iid: &IssueId) -> Result<Option<foreman_tracker::Issue>, HealthError> {
        match self.provider.get_issue(iid).await {
            Ok(issue) => Ok(Some(issue)),
            Err(TrackerError::NotFound(_)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn apply_fix(
        &self,
        project_slug: &str,
        role: &str,
        level: &str,
        index: usize,
        slot: &Slot,
        kind: AnomalyKind,
        active_label: &str,
        revert_default: &Option<Label>,
    ) -> HealthFix {
        match kind {
            AnomalyKind::IssueGone | AnomalyKind::LabelMismatch => {
                self.deactivate(project_slug, role, level, index)
            }
            AnomalyKind::SessionDead | AnomalyKind::StaleWorker | AnomalyKind::StuckLabel => {
                let revert_ok = self.revert_label(slot, active_label, revert_default).await;
                let clear_result = if kind == AnomalyKind::StuckLabel {
                    self.registry.update_slot(project_slug, role, level, index, |s| s.clear_issue_id())
                } else {
                    self.registry
                        .update_slot(project_slug, role, level, index, |s| s.deactivate_and_clear_session())
                };
                match clear_result {
                    Ok(()) if revert_ok => HealthFix::ok(),
                    Ok(()) => HealthFix::revert_failed(),
                    Err(err) => {
                        tracing::warn!(project_slug = %project_slug, role = %role, level = %level, index, error = %err, "failed to persist health fix");
                        HealthFix { fixed: false, label_revert_failed: Some(!revert_ok) }
                    }
                }
            }
            AnomalyKind::OrphanIssueId => {
                match self.registry.update_slot(project_slug, role, level, index, |s| s.clear_issue_id()) {
                    Ok(()) => HealthFix::ok(),
                    Err(err) => {
                        tracing::warn!(project_slug = %project_slug, role = %role, level = %level, index, error = %err, "failed to clear orphaned issue id");
                        HealthFix::not_attempted()
                    }
                }
            }
            AnomalyKind::OrphanedLabel => {
                unreachable!("OrphanedLabel is produced by the per-role scan, not per-slot classify")
            }
        }
    }

    fn deactivate(&self, project_slug: &str, role: &str, level: &str, index: usize) -> HealthFix {
        match self.registry.update_slot(project_slug, role, level, index, |s| s.deactivate_and_clear_session())
        {
            Ok(()) => HealthFix::ok(),
            Err(err) => {
                tracing::warn!(project_slug = %project_slug, role = %role, level = %level, index, error = %err, "failed to deactivate slot");
                HealthFix::not_attempted()
            }
        }
    }

    /// Revert the issue's label from `active_label` to `slot.previousLabel
    /// ?? revertLabel(role)` (§4.6, GLOSSARY "Revert label"). Returns
    /// whether the revert succeeded.
    async fn revert_label(&self, slot: &Slot, active_label: &str, revert_default: &Option<Label>) -> bool {
        let Some(iid) = &slot.issue_id else { return false };
        let Some(target) = slot.previous_label.clone().or_else(|| revert_default.clone()) else {
            tracing::warn!(issue = %iid, "no revert label available for health fix");
            return false;
        };
        match self.provider.transition_label(iid, active_label, &target).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(issue = %iid, target = %target, error = %err, "failed to revert label");
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "checker_tests.rs"]
mod tests;
