//! In-memory test double, grounded in the teacher's `FakeAgentAdapter` /
//! `FakeNotifyAdapter` shape: an `Arc<Mutex<State>>` holding scripted issues
//! plus a call log callers can assert against.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use foreman_core::IssueId;
use indexmap::IndexMap;
use parking_lot::Mutex;
use smol_str::SmolStr;

use crate::{Comment, Issue, IssueProvider, PrReviewComment, PrStatus, TrackerError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerCall {
    TransitionLabel { iid: IssueId, from: String, to: String },
    AddLabel { iid: IssueId, label: String },
    RemoveLabels { iid: IssueId, labels: Vec<String> },
    CloseIssue { iid: IssueId },
    ReopenIssue { iid: IssueId },
    MergePr { iid: IssueId },
    AddComment { iid: IssueId, body: String },
    ReactToIssue { iid: IssueId },
    ReactToPr { iid: IssueId },
    ReactToIssueComment { comment_id: String },
    ReactToPrComment { comment_id: String },
    ReactToPrReview { review_id: String },
}

#[derive(Default)]
struct State {
    issues: IndexMap<IssueId, Issue>,
    comments: IndexMap<IssueId, Vec<Comment>>,
    pr_status: IndexMap<IssueId, PrStatus>,
    pr_review_comments: IndexMap<IssueId, Vec<PrReviewComment>>,
    reacted_issues: HashSet<IssueId>,
    reacted_prs: HashSet<IssueId>,
    reacted_comments: HashSet<String>,
    reacted_reviews: HashSet<String>,
    merge_fails: HashSet<IssueId>,
    calls: Vec<TrackerCall>,
}

/// Scripted in-memory [`IssueProvider`] for exercising the health checker,
/// dispatch pipeline, and heartbeat engine without a real tracker.
#[derive(Clone, Default)]
pub struct FakeIssueProvider {
    state: Arc<Mutex<State>>,
}

impl FakeIssueProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_issue(&self, issue: Issue) {
        self.state.lock().issues.insert(issue.iid.clone(), issue);
    }

    pub fn seed_comments(&self, iid: impl Into<IssueId>, comments: Vec<Comment>) {
        self.state.lock().comments.insert(iid.into(), comments);
    }

    pub fn seed_pr_status(&self, iid: impl Into<IssueId>, status: PrStatus) {
        self.state.lock().pr_status.insert(iid.into(), status);
    }

    pub fn seed_pr_review_comments(&self, iid: impl Into<IssueId>, comments: Vec<PrReviewComment>) {
        self.state.lock().pr_review_comments.insert(iid.into(), comments);
    }

    /// Make the next `merge_pr` call for this issue fail, as if
    /// `mergeable == false`.
    pub fn set_merge_fails(&self, iid: impl Into<IssueId>) {
        self.state.lock().merge_fails.insert(iid.into());
    }

    pub fn calls(&self) -> Vec<TrackerCall> {
        self.state.lock().calls.clone()
    }

    pub fn labels_of(&self, iid: &IssueId) -> Vec<String> {
        self.state
            .lock()
            .issues
            .get(iid)
            .map(|i| i.labels.iter().map(|l| l.to_string()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl IssueProvider for FakeIssueProvider {
    async fn ensure_label(&self, _name: &str, _color: &str) -> Result<(), TrackerError> {
        Ok(())
    }

    async fn create_issue(
        &self,
        title: &str,
        body: &str,
        label: &str,
        assignees: &[String],
    ) -> Result<Issue, TrackerError> {
        let mut state = self.state.lock();
        let iid: IssueId = format!("{}", state.issues.len() + 1).into();
        let issue = Issue {
            iid: iid.clone(),
            title: title.into(),
            body: body.into(),
            labels: vec![label.into()],
            assignees: assignees.iter().map(SmolStr::from).collect(),
            open: true,
        };
        state.issues.insert(iid, issue.clone());
        Ok(issue)
    }

    async fn list_issues_by_label(&self, label: &str) -> Result<Vec<Issue>, TrackerError> {
        Ok(self
            .state
            .lock()
            .issues
            .values()
            .filter(|i| i.open && i.labels.iter().any(|l| l == label))
            .cloned()
            .collect())
    }

    async fn get_issue(&self, iid: &IssueId) -> Result<Issue, TrackerError> {
        self.state
            .lock()
            .issues
            .get(iid)
            .cloned()
            .ok_or_else(|| TrackerError::NotFound(iid.to_string()))
    }

    async fn list_comments(&self, iid: &IssueId) -> Result<Vec<Comment>, TrackerError> {
        Ok(self.state.lock().comments.get(iid).cloned().unwrap_or_default())
    }

    async fn transition_label(&self, iid: &IssueId, from: &str, to: &str) -> Result<(), TrackerError> {
        let mut state = self.state.lock();
        state.calls.push(TrackerCall::TransitionLabel {
            iid: iid.clone(),
            from: from.to_string(),
            to: to.to_string(),
        });
        let issue = state
            .issues
            .get_mut(iid)
            .ok_or_else(|| TrackerError::NotFound(iid.to_string()))?;
        issue.labels.retain(|l| l != from);
        if !issue.labels.iter().any(|l| l == to) {
            issue.labels.push(to.into());
        }
        Ok(())
    }

    async fn add_label(&self, iid: &IssueId, label: &str) -> Result<(), TrackerError> {
        let mut state = self.state.lock();
        state.calls.push(TrackerCall::AddLabel { iid: iid.clone(), label: label.to_string() });
        let issue = state
            .issues
            .get_mut(iid)
            .ok_or_else(|| TrackerError::NotFound(iid.to_string()))?;
        if !issue.labels.iter().any(|l| l == label) {
            issue.labels.push(label.into());
        }
        Ok(())
    }

    async fn remove_labels(&self, iid: &IssueId, labels: &[String]) -> Result<(), TrackerError> {
        let mut state = self.state.lock();
        state.calls.push(TrackerCall::RemoveLabels { iid: iid.clone(), labels: labels.to_vec() });
        let issue = state
            .issues
            .get_mut(iid)
            .ok_or_else(|| TrackerError::NotFound(iid.to_string()))?;
        issue.labels.retain(|l| !labels.iter().any(|r| r == l));
        Ok(())
    }

    async fn close_issue(&self, iid: &IssueId) -> Result<(), TrackerError> {
        let mut state = self.state.lock();
        state.calls.push(TrackerCall::CloseIssue { iid: iid.clone() });
        let issue = state
            .issues
            .get_mut(iid)
            .ok_or_else(|| TrackerError::NotFound(iid.to_string()))?;
        issue.open = false;
        Ok(())
    }

    async fn reopen_issue(&self, iid: &IssueId) -> Result<(), TrackerError> {
        let mut state = self.state.lock();
        state.calls.push(TrackerCall::ReopenIssue { iid: iid.clone() });
        let issue = state
            .issues
            .get_mut(iid)
            .ok_or_else(|| TrackerError::NotFound(iid.to_string()))?;
        issue.open = true;
        Ok(())
    }

    async fn get_pr_status(&self, iid: &IssueId) -> Result<Option<PrStatus>, TrackerError> {
        Ok(self.state.lock().pr_status.get(iid).cloned())
    }

    async fn merge_pr(&self, iid: &IssueId) -> Result<(), TrackerError> {
        let mut state = self.state.lock();
        state.calls.push(TrackerCall::MergePr { iid: iid.clone() });
        if state.merge_fails.contains(iid) {
            return Err(TrackerError::NotMergeable(iid.to_string()));
        }
        Ok(())
    }

    async fn get_pr_review_comments(
        &self,
        iid: &IssueId,
    ) -> Result<Vec<PrReviewComment>, TrackerError> {
        Ok(self.state.lock().pr_review_comments.get(iid).cloned().unwrap_or_default())
    }

    async fn add_comment(&self, iid: &IssueId, body: &str) -> Result<(), TrackerError> {
        self.state
            .lock()
            .calls
            .push(TrackerCall::AddComment { iid: iid.clone(), body: body.to_string() });
        Ok(())
    }

    async fn react_to_issue(&self, iid: &IssueId) -> Result<(), TrackerError> {
        let mut state = self.state.lock();
        state.calls.push(TrackerCall::ReactToIssue { iid: iid.clone() });
        state.reacted_issues.insert(iid.clone());
        Ok(())
    }

    async fn react_to_pr(&self, iid: &IssueId) -> Result<(), TrackerError> {
        let mut state = self.state.lock();
        state.calls.push(TrackerCall::ReactToPr { iid: iid.clone() });
        state.reacted_prs.insert(iid.clone());
        Ok(())
    }

    async fn react_to_issue_comment(&self, comment_id: &str) -> Result<(), TrackerError> {
        let mut state = self.state.lock();
        state.calls.push(TrackerCall::ReactToIssueComment { comment_id: comment_id.to_string() });
        state.reacted_comments.insert(comment_id.to_string());
        Ok(())
    }

    async fn react_to_pr_comment(&self, comment_id: &str) -> Result<(), TrackerError> {
        let mut state = self.state.lock();
        state.calls.push(TrackerCall::ReactToPrComment { comment_id: comment_id.to_string() });
        state.reacted_comments.insert(comment_id.to_string());
        Ok(())
    }

    async fn react_to_pr_review(&self, review_id: &str) -> Result<(), TrackerError> {
        let mut state = self.state.lock();
        state.calls.push(TrackerCall::ReactToPrReview { review_id: review_id.to_string() });
        state.reacted_reviews.insert(review_id.to_string());
        Ok(())
    }

    async fn issue_has_reaction(&self, iid: &IssueId) -> Result<bool, TrackerError> {
        Ok(self.state.lock().reacted_issues.contains(iid))
    }

    async fn pr_has_reaction(&self, iid: &IssueId) -> Result<bool, TrackerError> {
        Ok(self.state.lock().reacted_prs.contains(iid))
    }

    async fn issue_comment_has_reaction(&self, comment_id: &str) -> Result<bool, TrackerError> {
        Ok(self.state.lock().reacted_comments.contains(comment_id))
    }

    async fn pr_comment_has_reaction(&self, comment_id: &str) -> Result<bool, TrackerError> {
        Ok(self.state.lock().reacted_comments.contains(comment_id))
    }

    async fn pr_review_has_reaction(&self, review_id: &str) -> Result<bool, TrackerError> {
        Ok(self.state.lock().reacted_reviews.contains(review_id))
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
