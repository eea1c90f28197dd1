//! Default collaborator adapters for the binary's composition root.
//!
//! Concrete GitHub/GitLab, LLM-session, and chat-transport clients are out
//! of scope (spec §1) — this mirrors `foreman_heartbeat::git::NoopGitPuller`'s
//! "ship the trait plus a no-op default" pattern for the three remaining
//! collaborator traits so `foremand` links and runs standalone. A real
//! deployment swaps these for concrete adapters behind the same traits.

use std::collections::HashSet;

use async_trait::async_trait;
use foreman_core::project::SessionKey;
use foreman_core::IssueId;
use foreman_notify::{ChatAdapter, NotifyError, SendOptions as NotifySendOptions};
use foreman_sessions::{SendOptions as SessionSendOptions, SessionError, SessionRegistry};
use foreman_tracker::{Comment, Issue, IssueProvider, PrReviewComment, PrStatus, TrackerError};

/// Reports no queued work and fails lookups, so the heartbeat loop ticks
/// cleanly (zero pickups, zero health anomalies) without a real tracker.
pub struct NoopIssueProvider;

#[async_trait]
impl IssueProvider for NoopIssueProvider {
    async fn ensure_label(&self, _name: &str, _color: &str) -> Result<(), TrackerError> {
        Ok(())
    }

    async fn create_issue(
        &self,
        _title: &str,
        _body: &str,
        _label: &str,
        _assignees: &[String],
    ) -> Result<Issue, TrackerError> {
        Err(TrackerError::Request("no tracker adapter configured".into()))
    }

    async fn list_issues_by_label(&self, _label: &str) -> Result<Vec<Issue>, TrackerError> {
        Ok(Vec::new())
    }

    async fn get_issue(&self, iid: &IssueId) -> Result<Issue, TrackerError> {
        Err(TrackerError::NotFound(iid.to_string()))
    }

    async fn list_comments(&self, _iid: &IssueId) -> Result<Vec<Comment>, TrackerError> {
        Ok(Vec::new())
    }

    async fn transition_label(&self, _iid: &IssueId, _from: &str, _to: &str) -> Result<(), TrackerError> {
        Ok(())
    }

    async fn add_label(&self, _iid: &IssueId, _label: &str) -> Result<(), TrackerError> {
        Ok(())
    }

    async fn remove_labels(&self, _iid: &IssueId, _labels: &[String]) -> Result<(), TrackerError> {
        Ok(())
    }

    async fn close_issue(&self, _iid: &IssueId) -> Result<(), TrackerError> {
        Ok(())
    }

    async fn reopen_issue(&self, _iid: &IssueId) -> Result<(), TrackerError> {
        Ok(())
    }

    async fn get_pr_status(&self, _iid: &IssueId) -> Result<Option<PrStatus>, TrackerError> {
        Ok(None)
    }

    async fn merge_pr(&self, iid: &IssueId) -> Result<(), TrackerError> {
        Err(TrackerError::NotMergeable(iid.to_string()))
    }

    async fn get_pr_review_comments(&self, _iid: &IssueId) -> Result<Vec<PrReviewComment>, TrackerError> {
        Ok(Vec::new())
    }

    async fn add_comment(&self, _iid: &IssueId, _body: &str) -> Result<(), TrackerError> {
        Ok(())
    }

    async fn react_to_issue(&self, _iid: &IssueId) -> Result<(), TrackerError> {
        Ok(())
    }

    async fn react_to_pr(&self, _iid: &IssueId) -> Result<(), TrackerError> {
        Ok(())
    }

    async fn react_to_issue_comment(&self, _comment_id: &str) -> Result<(), TrackerError> {
        Ok(())
    }

    async fn react_to_pr_comment(&self, _comment_id: &str) -> Result<(), TrackerError> {
        Ok(())
    }

    async fn react_to_pr_review(&self, _review_id: &str) -> Result<(), TrackerError> {
        Ok(())
    }

    async fn issue_has_reaction(&self, _iid: &IssueId) -> Result<bool, TrackerError> {
        Ok(false)
    }

    async fn pr_has_reaction(&self, _iid: &IssueId) -> Result<bool, TrackerError> {
        Ok(false)
    }

    async fn issue_comment_has_reaction(&self, _comment_id: &str) -> Result<bool, TrackerError> {
        Ok(false)
    }

    async fn pr_comment_has_reaction(&self, _comment_id: &str) -> Result<bool, TrackerError> {
        Ok(false)
    }

    async fn pr_review_has_reaction(&self, _review_id: &str) -> Result<bool, TrackerError> {
        Ok(false)
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Reports session liveness as "unknown" (`None`), which the health checker
/// and heartbeat engine both treat as "no information" rather than "dead" —
/// the safe default for a workspace with no real LLM gateway wired up.
pub struct NoopSessionRegistry;

#[async_trait]
impl SessionRegistry for NoopSessionRegistry {
    async fn ensure_session(
        &self,
        _key: &SessionKey,
        _model: &str,
        _label: &str,
        _timeout_ms: u64,
    ) -> Result<(), SessionError> {
        Ok(())
    }

    async fn send_to_session(
        &self,
        _key: &SessionKey,
        _message: &str,
        _options: SessionSendOptions,
    ) -> Result<(), SessionError> {
        Ok(())
    }

    async fn delete_session(&self, _key: &SessionKey) -> Result<(), SessionError> {
        Ok(())
    }

    async fn list_live_session_keys(&self) -> Option<HashSet<SessionKey>> {
        None
    }
}

/// Logs every notification instead of delivering it.
pub struct NoopChatAdapter;

#[async_trait]
impl ChatAdapter for NoopChatAdapter {
    async fn send(
        &self,
        channel_id: &str,
        channel: &str,
        message: &str,
        _options: NotifySendOptions,
    ) -> Result<(), NotifyError> {
        tracing::info!(channel_id, channel, message, "no chat adapter configured, logging notification instead");
        Ok(())
    }
}
