//! The review pass (§4.7 step 2.3): drains every `check=prApproved` queue
//! state by asking the tracker for PR status and driving the matching
//! workflow transition. Runs before the pickup pass within a project.

use foreman_core::workflow::{events, ReviewCheck, Workflow};
use foreman_core::{Project, ResolvedConfig};
use foreman_notify::{ChatAdapter, NotifyEvent, TemplatedNotifier};
use foreman_tracker::{IssueProvider, PrState};

use crate::error::HeartbeatError;
use crate::git::GitPuller;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewPassCounts {
    pub merged: u32,
    pub changes_requested: u32,
    pub merge_conflict: u32,
    pub closed: u32,
}

/// Run the review pass for one project against every state carrying
/// `check=prApproved`. Each issue is handled independently; a tracker error
/// fetching one issue's PR status is logged and skipped rather than
/// aborting the rest of the pass.
pub async fn run_review_pass<P, G, A>(
    provider: &P,
    git_puller: &G,
    notifier: &TemplatedNotifier<A>,
    project: &Project,
    config: &ResolvedConfig,
) -> Result<ReviewPassCounts, HeartbeatError>
where
    P: IssueProvider + Send + Sync,
    G: GitPuller + Send + Sync,
    A: ChatAdapter,
{
    let mut counts = ReviewPassCounts::default();

    let review_states: Vec<_> = config
        .workflow
        .states
        .values()
        .filter(|s| s.check == Some(ReviewCheck::PrApproved))
        .collect();

    for state in review_states {
        let issues = match provider.list_issues_by_label(&state.label).await {
            Ok(issues) => issues,
            Err(err) => {
                tracing::warn!(project = %project.slug, state = %state.label, error = %err, "failed to list issues for review pass");
                continue;
            }
        };

        for issue in issues {
            let pr_status = match provider.get_pr_status(&issue.iid).await {
                Ok(status) => status,
                Err(err) => {
                    tracing::warn!(project = %project.slug, issue = %issue.iid, error = %err, "failed to fetch PR status");
                    continue;
                }
            };
            let Some(pr_status) = pr_status else { continue };

            match pr_status.state {
                PrState::Approved if pr_status.mergeable == Some(true) => {
                    if let Err(err) = provider.merge_pr(&issue.iid).await {
                        tracing::warn!(project = %project.slug, issue = %issue.iid, error = %err, "failed to merge PR");
                        continue;
                    }
                    if let Err(err) =
                        git_puller.pull(&project.repo, &project.base_branch, config.timeouts.git_pull_ms).await
                    {
                        tracing::warn!(project = %project.slug, issue = %issue.iid, error = %err, "failed to pull base branch after merge");
                    }
                    transition(provider, &config.workflow, &issue.iid, &state.label, state.on.get(events::APPROVED)).await;
                    notifier
                        .notify(
                            project,
                            &issue.labels,
                            &NotifyEvent::PrMerged { issue_iid: issue.iid.as_str().into(), issue_title: issue.title.clone(), url: pr_status.url },
                        )
                        .await;
                    counts.merged += 1;
                }
                PrState::Merged => {
                    transition(provider, &config.workflow, &issue.iid, &state.label, state.on.get(events::APPROVED)).await;
                    notifier
                        .notify(
                            project,
                            &issue.labels,
                            &NotifyEvent::PrMerged { issue_iid: issue.iid.as_str().into(), issue_title: issue.title.clone(), url: pr_status.url },
                        )
                        .await;
                    counts.merged += 1;
                }
                PrState::ChangesRequested => {
                    transition(provider, &config.workflow, &issue.iid, &state.label, state.on.get(events::CHANGES_REQUESTED)).await;
                    notifier
                        .notify(
                            project,
                            &issue.labels,
                            &NotifyEvent::ChangesRequested { issue_iid: issue.iid.as_str().into(), issue_title: issue.title.clone() },
                        )
                        .await;
                    counts.changes_requested += 1;
                }
                PrState::HasComments => {
                    // Awaits an explicit human/agent review — no transition.
                }
                PrState::Approved => {
                    // mergeable == Some(false) (or unknown, treated as blocked).
                    transition(provider, &config.workflow, &issue.iid, &state.label, state.on.get(events::MERGE_CONFLICT)).await;
                    notifier
                        .notify(
                            project,
                            &issue.labels,
                            &NotifyEvent::MergeConflict { issue_iid: issue.iid.as_str().into(), issue_title: issue.title.clone() },
                        )
                        .await;
                    counts.merge_conflict += 1;
                }
                PrState::Closed => {
                    transition(provider, &config.workflow, &issue.iid, &state.label, state.on.get(events::MERGE_FAILED)).await;
                    notifier
                        .notify(
                            project,
                            &issue.labels,
                            &NotifyEvent::PrClosed { issue_iid: issue.iid.as_str().into(), issue_title: issue.title.clone() },
                        )
                        .await;
                    counts.closed += 1;
                }
                PrState::Open => {
                    // Not yet reviewed; nothing to do this tick.
                }
            }
        }
    }

    Ok(counts)
}

async fn transition<P: IssueProvider>(
    provider: &P,
    workflow: &Workflow,
    iid: &foreman_core::IssueId,
    from_label: &str,
    transition: Option<&foreman_core::workflow::Transition>,
) {
    let Some(transition) = transition else {
        tracing::warn!(issue = %iid, from = %from_label, "review pass has no transition for this event");
        return;
    };
    let Some(to_label) = workflow.states.get(&transition.target).map(|s| s.label.as_str()) else {
        tracing::warn!(issue = %iid, from = %from_label, target = %transition.target, "review pass transition targets an undefined state");
        return;
    };
    if let Err(err) = provider.transition_label(iid, from_label, to_label).await {
        tracing::warn!(issue = %iid, from = %from_label, to = %to_label, error = %err, "failed to transition label during review pass");
    }
}

#[cfg(test)]
#[path = "review_tests.rs"]
mod tests;
