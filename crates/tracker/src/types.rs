//! Issue-provider data types (§4.3).

use foreman_core::IssueId;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub iid: IssueId,
    pub title: SmolStr,
    pub body: SmolStr,
    pub labels: Vec<SmolStr>,
    #[serde(default)]
    pub assignees: Vec<SmolStr>,
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: SmolStr,
    pub author: SmolStr,
    pub body: SmolStr,
    pub created_at_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrState {
    Open,
    Approved,
    ChangesRequested,
    HasComments,
    Merged,
    Closed,
}

/// `getPrStatus(iid) -> {state, url?, title?, sourceBranch?, mergeable?}` —
/// §4.3. `None` means the issue has no associated PR yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrStatus {
    pub state: PrState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<SmolStr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<SmolStr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_branch: Option<SmolStr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mergeable: Option<bool>,
}

/// Review-level state of a PR review comment, distinct from the overall
/// PR state — used to route acknowledgement (§4.5 step 13).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
}

/// Either an inline PR comment or a review-level submission; §4.5 step 13
/// routes the two differently when acknowledging consumed feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrReviewComment {
    pub id: SmolStr,
    pub author: SmolStr,
    pub body: SmolStr,
    /// `None` for a plain inline comment; `Some` for a review submission.
    pub review_state: Option<ReviewState>,
}
