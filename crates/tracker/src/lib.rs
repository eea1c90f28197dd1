// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! foreman-tracker: the issue-provider interface (C3, §4.3) the core
//! depends on for GitHub/GitLab-shaped operations — issues, labels,
//! comments, reactions, PR status, merge. Concrete adapters are out of
//! scope (spec §1); this crate ships only the trait, its types, and error.

mod error;
mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use error::TrackerError;
pub use types::{Comment, Issue, PrReviewComment, PrStatus, PrState, ReviewState};

use async_trait::async_trait;
use foreman_core::IssueId;

/// Abstract adapter over an issue tracker. Errors surface to the caller
/// except where §4.3 calls out tolerant behavior (idempotent `ensure*`).
#[async_trait]
pub trait IssueProvider: Send + Sync {
    async fn ensure_label(&self, name: &str, color: &str) -> Result<(), TrackerError>;

    async fn ensure_all_state_labels(&self, labels: &[(String, String)]) -> Result<(), TrackerError> {
        for (name, color) in labels {
            self.ensure_label(name, color).await?;
        }
        Ok(())
    }

    async fn create_issue(
        &self,
        title: &str,
        body: &str,
        label: &str,
        assignees: &[String],
    ) -> Result<Issue, TrackerError>;

    /// Open issues only — §4.3.
    async fn list_issues_by_label(&self, label: &str) -> Result<Vec<Issue>, TrackerError>;

    /// Must error on not-found rather than return `None` — §4.3.
    async fn get_issue(&self, iid: &IssueId) -> Result<Issue, TrackerError>;

    async fn list_comments(&self, iid: &IssueId) -> Result<Vec<Comment>, TrackerError>;

    /// Remove `from` and add `to` in the minimum number of tracker
    /// operations; any other workflow-state label present on the issue
    /// must also be removed, preserving "≤1 workflow label per issue".
    async fn transition_label(
        &self,
        iid: &IssueId,
        from: &str,
        to: &str,
    ) -> Result<(), TrackerError>;

    async fn add_label(&self, iid: &IssueId, label: &str) -> Result<(), TrackerError>;

    async fn remove_labels(&self, iid: &IssueId, labels: &[String]) -> Result<(), TrackerError>;

    async fn close_issue(&self, iid: &IssueId) -> Result<(), TrackerError>;

    async fn reopen_issue(&self, iid: &IssueId) -> Result<(), TrackerError>;

    async fn get_pr_status(&self, iid: &IssueId) -> Result<Option<PrStatus>, TrackerError>;

    /// Fails iff `mergeable == false` — §4.3.
    async fn merge_pr(&self, iid: &IssueId) -> Result<(), TrackerError>;

    async fn get_pr_review_comments(
        &self,
        iid: &IssueId,
    ) -> Result<Vec<PrReviewComment>, TrackerError>;

    async fn add_comment(&self, iid: &IssueId, body: &str) -> Result<(), TrackerError>;

    async fn react_to_issue(&self, iid: &IssueId) -> Result<(), TrackerError>;
    async fn react_to_pr(&self, iid: &IssueId) -> Result<(), TrackerError>;
    async fn react_to_issue_comment(&self, comment_id: &str) -> Result<(), TrackerError>;
    async fn react_to_pr_comment(&self, comment_id: &str) -> Result<(), TrackerError>;
    async fn react_to_pr_review(&self, review_id: &str) -> Result<(), TrackerError>;

    async fn issue_has_reaction(&self, iid: &IssueId) -> Result<bool, TrackerError>;
    async fn pr_has_reaction(&self, iid: &IssueId) -> Result<bool, TrackerError>;
    async fn issue_comment_has_reaction(&self, comment_id: &str) -> Result<bool, TrackerError>;
    async fn pr_comment_has_reaction(&self, comment_id: &str) -> Result<bool, TrackerError>;
    async fn pr_review_has_reaction(&self, review_id: &str) -> Result<bool, TrackerError>;

    /// Used at startup only (§4.3).
    async fn health_check(&self) -> bool;
}
