//! The dispatch pipeline (C5, §4.5): the idempotent commitment sequence
//! that moves one issue from a queue state into an active state.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::json;
use tokio::task::JoinHandle;

use foreman_core::level::{canonical_level, infer_level, resolve_model};
use foreman_core::project::SessionKey;
use foreman_core::workflow::{resolve_review_routing, resolve_test_routing, TestRouting};
use foreman_core::{Clock, ResolvedConfig};
use foreman_notify::{ChatAdapter, NotifyEvent, TemplatedNotifier};
use foreman_registry::{Activation, AuditLog, AuditRecord, RegistryStore};
use foreman_sessions::{SendOptions, SessionRegistry};
use foreman_tracker::IssueProvider;

use crate::acknowledge::{acknowledge_all, Consumable};
use crate::attachments::AttachmentProvider;
use crate::error::DispatchError;
use crate::input::{DispatchInput, DispatchOutput, SessionAction};
use crate::labels::{apply_if_absent, is_role_level_label, replace_label};
use crate::message::{render_task_message, TaskMessageInput};
use crate::role_prompt::load_role_prompt;

const ROUTING_LABEL_COLOR: &str = "#5319e7";
const ROLE_LEVEL_LABEL_COLOR: &str = "#0e8a16";
const OWNER_LABEL_COLOR: &str = "#fbca04";

/// Every independently-failable background task Phase 3 kicks off
/// (§4.5 steps 12, 19, 20; §9 "Fire-and-forget"). Production callers drop
/// this; tests await it for deterministic assertions.
pub struct Background {
    pub handles: Vec<JoinHandle<()>>,
}

pub struct DispatchOutcome {
    pub output: DispatchOutput,
    pub background: Background,
}

pub struct DispatchPipeline<P, S, A, C> {
    provider: Arc<P>,
    sessions: Arc<S>,
    attachments: Arc<A>,
    registry: Arc<RegistryStore>,
    audit: Arc<AuditLog>,
    clock: C,
    workspace: PathBuf,
}

impl<P, S, A, C> DispatchPipeline<P, S, A, C>
where
    P: IssueProvider + Send + Sync + 'static,
    S: SessionRegistry + Send + Sync + 'static,
    A: AttachmentProvider + Send + Sync + 'static,
    C: Clock + 'static,
{
    pub fn new(
        provider: Arc<P>,
        sessions: Arc<S>,
        attachments: Arc<A>,
        registry: Arc<RegistryStore>,
        audit: Arc<AuditLog>,
        clock: C,
        workspace: impl Into<PathBuf>,
    ) -> Self {
        Self { provider, sessions, attachments, registry, audit, clock, workspace: workspace.into() }
    }

    pub async fn dispatch(
        &self,
        config: &ResolvedConfig,
        input: DispatchInput,
        notifier: &TemplatedNotifier<impl ChatAdapter>,
    ) -> Result<DispatchOutcome, DispatchError> {
        // --- Phase 1: setup ---------------------------------------------
        let role_config = config
            .role(&input.role)
            .ok_or_else(|| DispatchError::UnknownRole(input.role.to_string()))?;

        let level = canonical_level(
            &input
                .level
                .clone()
                .unwrap_or_else(|| infer_level(&role_config.levels, &role_config.default_level, &input.issue_title, &input.issue_description)),
        );
        if !role_config.levels.is_empty() && !role_config.levels.iter().any(|l| l.as_str() == level.as_str()) {
            return Err(DispatchError::UnknownLevel {
                role: input.role.to_string(),
                level: level.to_string(),
            });
        }
        let model = resolve_model(&level, Some(&role_config.models));

        let worker = self.registry.get_worker(&input.project_slug, &input.role)?;
        let slot = worker
            .get(level.as_str())
            .and_then(|slots| slots.get(input.slot_index as usize))
            .cloned()
            .unwrap_or_default();

        let mut reusable_key = slot.session_key.clone();
        if let (Some(_), Some(fraction)) = (&reusable_key, input.session_context_fraction) {
            let different_issue = slot.issue_id.as_ref() != Some(&input.issue_id);
            if fraction >= config.timeouts.session_context_budget && different_issue {
                reusable_key = None;
            }
        }

        let deterministic_key = foreman_core::session_key(
            input.agent_id.as_deref(),
            &input.project_name,
            &input.role,
            &level,
            input.slot_index,
        );

        let mut background = Vec::new();
        if reusable_key.as_ref().map(SessionKey::as_str) != Some(deterministic_key.as_str()) {
            if let Some(stale_key) = reusable_key.take() {
                let sessions = Arc::clone(&self.sessions);
                background.push(tokio::spawn(async move {
                    if let Err(err) = sessions.delete_session(&stale_key).await {
                        tracing::warn!(error = %err, "failed to delete orphaned session");
                    }
                }));
            }
        }
        let session_action =
            if reusable_key.is_some() { SessionAction::Send } else { SessionAction::Spawn };
        let session_key: SessionKey = deterministic_key;

        let comments = self.provider.list_comments(&input.issue_id).await.unwrap_or_else(|err| {
            tracing::warn!(issue = %input.issue_id, error = %err, "failed to fetch issue comments");
            Vec::new()
        });

        let pr_feedback = if config.workflow.is_feedback_state(&input.from_label) {
            self.provider.get_pr_review_comments(&input.issue_id).await.unwrap_or_else(|err| {
                tracing::warn!(issue = %input.issue_id, error = %err, "failed to fetch PR feedback");
                Vec::new()
            })
        } else {
            Vec::new()
        };

        let pr_status = if config.workflow.has_review_check(&input.role) {
            self.provider.get_pr_status(&input.issue_id).await.unwrap_or_else(|err| {
                tracing::warn!(issue = %input.issue_id, error = %err, "failed to fetch PR status");
                None
            })
        } else {
            None
        };

        let attachments = self.attachments.attachments_for(&input.issue_id).await;

        let channel_id = self
            .resolve_channel_id(config, &input)
            .unwrap_or_default();

        let task_message = render_task_message(&TaskMessageInput {
            project_name: &input.project_name,
            role: &input.role,
            level: &level,
            issue_id: &input.issue_id,
            issue_title: &input.issue_title,
            issue_description: &input.issue_description,
            issue_url: &input.issue_url,
            comments: &comments,
            pr_status: pr_status.as_ref(),
            pr_feedback: &pr_feedback,
            attachments: &attachments,
            orchestrator_session_key: input.orchestrator_session_key.as_ref().map(SessionKey::as_str),
            channel_id: &channel_id,
        });

        let role_prompt = load_role_prompt(&self.workspace, &input.project_slug, &input.role).await;

        // --- Phase 2: commitment -----------------------------------------
        self.provider.transition_label(&input.issue_id, &input.from_label, &input.to_label).await.map_err(
            |source| DispatchError::Commitment {
                iid: input.issue_id.to_string(),
                from: input.from_label.to_string(),
                to: input.to_label.to_string(),
                source,
            },
        )?;

        // --- Phase 3: post-commitment side effects (best-effort) ---------
        {
            let provider = Arc::clone(&self.provider);
            let iid = input.issue_id.clone();
            background.push(tokio::spawn(async move {
                if let Err(err) = provider.react_to_issue(&iid).await {
                    tracing::warn!(issue = %iid, error = %err, "failed to react to issue");
                }
                if let Err(err) = provider.react_to_pr(&iid).await {
                    tracing::warn!(issue = %iid, error = %err, "failed to react to pr");
                }
            }));
        }

        let consumables: Vec<Consumable<'_>> = comments
            .iter()
            .map(|c| Consumable::IssueComment(c.id.as_str()))
            .chain(pr_feedback.iter().map(Consumable::PrComment))
            .collect();
        acknowledge_all(self.provider.as_ref(), &consumables).await;

        let slot_name = foreman_core::slot_name_of(session_key.as_str()).unwrap_or_else(|| "slot".into());
        let role_level_label = crate::labels::role_level_label(&input.role, &level, &slot_name);
        replace_label(
            self.provider.as_ref(),
            &input.issue_id,
            &input.issue_labels,
            |l| is_role_level_label(l, &config.roles),
            &role_level_label,
            ROLE_LEVEL_LABEL_COLOR,
        )
        .await;

        if config.workflow.produces_reviewable_work(&input.role) {
            let routing = resolve_review_routing(config.workflow.review_policy, &level).to_string();
            replace_label(
                self.provider.as_ref(),
                &input.issue_id,
                &input.issue_labels,
                |l| l.starts_with("review:"),
                &routing,
                ROUTING_LABEL_COLOR,
            )
            .await;
        }

        if config.workflow.has_test_phase() {
            let routing = resolve_test_routing(config.workflow.test_policy, &level);
            if !matches!(routing, TestRouting::Skip) {
                replace_label(
                    self.provider.as_ref(),
                    &input.issue_id,
                    &input.issue_labels,
                    |l| l.starts_with("test:"),
                    &routing.to_string(),
                    ROUTING_LABEL_COLOR,
                )
                .await;
            }
        }

        if let Some(instance) = &input.instance_name {
            let owner_label = format!("owner:{instance}");
            apply_if_absent(
                self.provider.as_ref(),
                &input.issue_id,
                &input.issue_labels,
                "owner:",
                &owner_label,
                OWNER_LABEL_COLOR,
            )
            .await;
        }

        match self.registry.read() {
            Ok(registry) => {
                if let Some(project) = registry.projects.get(input.project_slug.as_str()) {
                    notifier
                        .notify(
                            project,
                            &input.issue_labels,
                            &NotifyEvent::WorkerStart {
                                issue_iid: input.issue_id.as_str().into(),
                                issue_title: input.issue_title.clone(),
                                role: input.role.clone(),
                                level: level.clone(),
                            },
                        )
                        .await;
                }
            }
            Err(err) => {
                tracing::warn!(issue = %input.issue_id, error = %err, "failed to read registry for notification");
            }
        }

        {
            let sessions = Arc::clone(&self.sessions);
            let key = session_key.clone();
            let model = model.clone();
            let label = role_level_label.clone();
            let timeout_ms = config.timeouts.session_patch_ms;
            background.push(tokio::spawn(async move {
                if let Err(err) = sessions.ensure_session(&key, &model, &label, timeout_ms).await {
                    tracing::warn!(error = %err, "failed to ensure session");
                }
            }));
        }
        {
            let sessions = Arc::clone(&self.sessions);
            let key = session_key.clone();
            let message = task_message.to_string();
            let options = SendOptions {
                model: model.clone(),
                extra_system_prompt: role_prompt,
                timeout_ms: config.timeouts.dispatch_ms,
                orchestrator_key: input.orchestrator_session_key.clone(),
            };
            background.push(tokio::spawn(async move {
                if let Err(err) = sessions.send_to_session(&key, &message, options).await {
                    tracing::warn!(error = %err, "failed to send task message to session");
                }
            }));
        }

        let start_time = self.clock.epoch_ms();
        if let Err(err) = self.registry.activate_worker(
            &input.project_slug,
            &input.role,
            &level,
            input.slot_index as usize,
            Activation {
                issue_id: input.issue_id.clone(),
                session_key: session_key.clone(),
                start_time,
                previous_label: Some(input.from_label.clone()),
            },
        ) {
            tracing::warn!(issue = %input.issue_id, error = %err, "failed to activate worker in registry");
        }

        self.audit.append(&AuditRecord::new(
            start_time,
            "dispatch",
            json!({
                "project": input.project_slug,
                "issue": input.issue_id,
                "role": input.role,
                "level": level,
                "sessionAction": session_action_str(session_action),
                "sessionKey": session_key,
                "from": input.from_label,
                "to": input.to_label,
            }),
        ));
        self.audit.append(&AuditRecord::new(
            start_time,
            "model_selection",
            json!({
                "project": input.project_slug,
                "issue": input.issue_id,
                "role": input.role,
                "level": level,
                "model": model,
            }),
        ));

        Ok(DispatchOutcome {
            output: DispatchOutput {
                session_action,
                session_key,
                level,
                model,
                announcement: task_message,
            },
            background: Background { handles: background },
        })
    }

    fn resolve_channel_id(&self, _config: &ResolvedConfig, input: &DispatchInput) -> Option<String> {
        let registry = self.registry.read().ok()?;
        let project = registry.projects.get(input.project_slug.as_str())?;
        project.resolve_notify_channel(&input.issue_labels).map(|c| c.channel_id.to_string())
    }
}

fn session_action_str(action: SessionAction) -> &'static str {
    match action {
        SessionAction::Spawn => "spawn",
        SessionAction::Send => "send",
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
