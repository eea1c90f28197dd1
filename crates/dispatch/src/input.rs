//! Dispatch pipeline input/output shapes (§4.5).

use smol_str::SmolStr;

use foreman_core::project::{IssueId, SessionKey};
use foreman_core::workflow::Label;
use foreman_core::Provider;

/// Input to [`crate::pipeline::DispatchPipeline::dispatch`] (§4.5): one
/// queue-state issue picked up for one role/level slot.
#[derive(Debug, Clone)]
pub struct DispatchInput {
    pub project_slug: SmolStr,
    pub project_name: SmolStr,
    pub issue_id: IssueId,
    pub issue_title: SmolStr,
    pub issue_description: String,
    pub issue_url: SmolStr,
    /// Labels currently on the issue, needed by `resolveNotifyChannel` and
    /// the label-replacement steps (14-17) — not part of the literal §4.5
    /// input tuple, but every caller already has it from the fetch that
    /// produced this issue during the pickup pass.
    pub issue_labels: Vec<Label>,
    pub role: SmolStr,
    /// `None` triggers the keyword-based level-inference fallback.
    pub level: Option<SmolStr>,
    pub from_label: Label,
    pub to_label: Label,
    pub slot_index: u32,
    pub provider: Provider,
    pub agent_id: Option<SmolStr>,
    pub orchestrator_session_key: Option<SessionKey>,
    pub instance_name: Option<SmolStr>,
    /// Fraction of the session's context window already consumed, if the
    /// session layer's adapter can report it; compared against
    /// `timeouts.session_context_budget` (§4.5 step 2). No adapter in this
    /// workspace's trait set surfaces this, so it is supplied out-of-band.
    pub session_context_fraction: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Spawn,
    Send,
}

/// Result of a successful dispatch (§4.5 Output).
#[derive(Debug, Clone)]
pub struct DispatchOutput {
    pub session_action: SessionAction,
    pub session_key: SessionKey,
    pub level: SmolStr,
    pub model: SmolStr,
    pub announcement: SmolStr,
}
