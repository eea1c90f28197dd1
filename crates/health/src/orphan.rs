//! The two sweeps that run alongside per-slot triangulation (§4.6): a
//! per-role scan for tracker issues the registry has forgotten about, and a
//! global once-per-tick scan for session-layer sessions the registry no
//! longer references.

use std::collections::HashSet;

use foreman_core::project::SessionKey;
use foreman_core::{is_subagent_session_key, Clock, ResolvedConfig};
use foreman_registry::RegistryStore;
use foreman_sessions::SessionRegistry;
use foreman_tracker::IssueProvider;

use crate::checker::HealthChecker;
use crate::error::HealthError;
use crate::types::{Anomaly, AnomalyKind, HealthFix};

impl<P, C> HealthChecker<P, C>
where
    P: IssueProvider + Send + Sync,
    C: Clock,
{
    /// List every open issue bearing `role`'s active label and flag any not
    /// held by a currently-active slot of this project+role. These
    /// anomalies are not tied to a specific slot, so `Anomaly::level` and
    /// `Anomaly::slot_index` are left at their zero value.
    pub async fn scan_orphaned_labels(
        &self,
        config: &ResolvedConfig,
        project_slug: &str,
        role: &str,
        auto_fix: bool,
    ) -> Result<Vec<(Anomaly, HealthFix)>, HealthError> {
        let workflow = &config.workflow;
        let active_label = workflow.active_label(role)?;
        let revert_default = workflow.revert_label(role);
        let worker = self.registry().get_worker(project_slug, role)?;

        let held: HashSet<&str> = worker
            .values()
            .flatten()
            .filter(|slot| slot.active)
            .filter_map(|slot| slot.issue_id.as_ref().map(|id| id.as_str()))
            .collect();

        let mut results = Vec::new();
        for issue in self.provider().list_issues_by_label(&active_label).await? {
            if held.contains(issue.iid.as_str()) {
                continue;
            }

            let fix = if auto_fix {
                match &revert_default {
                    Some(target) => match self.provider().transition_label(&issue.iid, &active_label, target).await
                    {
                        Ok(()) => HealthFix::ok(),
                        Err(err) => {
                            tracing::warn!(issue = %issue.iid, error = %err, "failed to revert orphaned label");
                            HealthFix::not_attempted()
                        }
                    },
                    None => {
                        tracing::warn!(issue = %issue.iid, role, "no revert label configured for orphaned_label fix");
                        HealthFix::not_attempted()
                    }
                }
            } else {
                HealthFix::not_attempted()
            };

            results.push((
                Anomaly {
                    kind: AnomalyKind::OrphanedLabel,
                    role: role.into(),
                    level: Default::default(),
                    slot_index: 0,
                    issue_id: Some(issue.iid),
                },
                fix,
            ));
        }
        Ok(results)
    }
}

/// Global, once-per-tick sweep (§4.6 "Orphaned-session scan"): delete any
/// live subagent session key not referenced by any slot and not held by an
/// active slot. Returns the keys deleted. Best-effort per key — a failed
/// delete is logged and does not stop the sweep.
pub async fn scan_orphaned_sessions<S: SessionRegistry>(
    session_registry: &S,
    registry: &RegistryStore,
    live_session_keys: &HashSet<SessionKey>,
) -> Result<Vec<SessionKey>, HealthError> {
    let snapshot = registry.read()?;

    let mut tracked: HashSet<SessionKey> = HashSet::new();
    let mut active: HashSet<SessionKey> = HashSet::new();
    for project in snapshot.projects.values() {
        for role_worker in project.workers.values() {
            for slots in role_worker.values() {
                for slot in slots {
                    if let Some(key) = &slot.session_key {
                        tracked.insert(key.clone());
                        if slot.active {
                            active.insert(key.clone());
                        }
                    }
                }
            }
        }
    }

    let mut deleted = Vec::new();
    for key in live_session_keys {
        if !is_subagent_session_key(key.as_str()) || tracked.contains(key) || active.contains(key) {
            continue;
        }
        match session_registry.delete_session(key).await {
            Ok(()) => deleted.push(key.clone()),
            Err(err) => tracing::warn!(session_key = %key, error = %err, "failed to delete orphaned session"),
        }
    }
    Ok(deleted)
}

#[cfg(test)]
#[path = "orphan_tests.rs"]
mod tests;
