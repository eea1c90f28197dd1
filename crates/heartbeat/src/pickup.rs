//! The pickup pass (§4.7 step 2.6): for one role, find the oldest issue in
//! its highest-priority non-empty queue state and dispatch it.
//!
//! A role contributes at most one dispatch per tick; `maxPickupsPerTick`
//! and `projectExecution=sequential` are enforced by the engine across
//! roles and projects, not here.

use foreman_core::workflow::events;
use foreman_core::{Project, ResolvedConfig};
use foreman_notify::{ChatAdapter, TemplatedNotifier};
use foreman_registry::RegistryStore;
use foreman_sessions::SessionRegistry;
use foreman_tracker::IssueProvider;

use crate::error::HeartbeatError;
use crate::level_label::parse_level_override;
use crate::queue::queue_states_for_role;
use crate::slot_alloc::{allocate_slot_index, role_has_active_work};

pub struct PickupOutcome {
    pub issue_id: foreman_core::IssueId,
    pub level: smol_str::SmolStr,
}

/// Attempt one pickup for `role` within `project`. Returns `Ok(None)` when
/// there is nothing to pick up, the role already has active work under
/// `roleExecution=sequential`, or every level is at capacity — all
/// ordinary, not-an-error outcomes the engine counts as "no pickup this
/// role".
#[allow(clippy::too_many_arguments)]
pub async fn attempt_pickup_for_role<P, S, A, AT, C>(
    provider: &P,
    pipeline: &foreman_dispatch::DispatchPipeline<P, S, AT, C>,
    notifier: &TemplatedNotifier<A>,
    registry: &RegistryStore,
    project: &Project,
    config: &ResolvedConfig,
    role: &str,
) -> Result<Option<PickupOutcome>, HeartbeatError>
where
    P: IssueProvider + Send + Sync + 'static,
    S: SessionRegistry + Send + Sync + 'static,
    A: ChatAdapter,
    AT: foreman_dispatch::attachments::AttachmentProvider + Send + Sync + 'static,
    C: foreman_core::Clock + 'static,
{
    let Some(role_config) = config.role(role) else { return Ok(None) };

    let worker = registry.get_worker(project.slug.as_str(), role)?;
    if config.role_execution == foreman_core::ExecutionMode::Sequential && role_has_active_work(&worker) {
        return Ok(None);
    }

    let queue_states = queue_states_for_role(&config.workflow, role);
    let mut picked = None;
    for (_, state) in queue_states.iter().copied() {
        let issues = provider.list_issues_by_label(&state.label).await?;
        if let Some(issue) = issues.into_iter().next_back() {
            picked = Some((state, issue));
            break;
        }
    }
    let Some((state, issue)) = picked else { return Ok(None) };

    let Some(pickup_transition) = state.on.get(events::PICKUP) else {
        tracing::warn!(role, state = %state.label, "queue state has no PICKUP transition");
        return Ok(None);
    };
    let Some(to_label) = config.workflow.states.get(&pickup_transition.target).map(|s| s.label.clone()) else {
        tracing::warn!(role, target = %pickup_transition.target, "PICKUP transition targets an undefined state");
        return Ok(None);
    };

    let level = foreman_core::canonical_level(
        &parse_level_override(&issue.labels, role, role_config).unwrap_or_else(|| {
            foreman_core::infer_level(&role_config.levels, &role_config.default_level, &issue.title, &issue.body)
        }),
    );

    let Some(slot_index) = allocate_slot_index(&worker, role_config, &level) else {
        tracing::debug!(role, level = %level, project = %project.slug, "no free slot at this level, skipping pickup");
        return Ok(None);
    };

    let input = foreman_dispatch::DispatchInput {
        project_slug: project.slug.as_str().into(),
        project_name: project.name.clone(),
        issue_id: issue.iid.clone(),
        issue_title: issue.title.clone(),
        issue_description: issue.body.to_string(),
        issue_url: synthesize_issue_url(project, &issue.iid),
        issue_labels: issue.labels.clone(),
        role: role.into(),
        level: Some(level.clone()),
        from_label: state.label.clone(),
        to_label,
        slot_index: slot_index as u32,
        provider: project.provider,
        agent_id: None,
        orchestrator_session_key: None,
        instance_name: config.instance_name.clone(),
        session_context_fraction: None,
    };

    let outcome = pipeline.dispatch(config, input, notifier).await?;
    for handle in outcome.background.handles {
        drop(handle);
    }

    Ok(Some(PickupOutcome { issue_id: issue.iid, level }))
}

/// The tracker interface (§4.3) has no `url` field on [`foreman_tracker::Issue`]
/// — concrete adapters are out of scope (§1) and would own the real URL.
/// This synthesizes a stable placeholder so the task message still carries
/// a linkable reference; see `DESIGN.md` for the rationale.
fn synthesize_issue_url(project: &Project, iid: &foreman_core::IssueId) -> smol_str::SmolStr {
    format!("{}#{}", project.slug, iid).into()
}

#[cfg(test)]
#[path = "pickup_tests.rs"]
mod tests;
