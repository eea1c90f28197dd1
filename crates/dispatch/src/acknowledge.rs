//! Comment acknowledgement (§4.5 step 13): every consumed issue comment, PR
//! comment and PR review gets an "eyes" reaction exactly once, so the same
//! comment is never re-announced to the worker on a later dispatch.

use foreman_tracker::{IssueProvider, PrReviewComment, ReviewState};

/// One (issue comment, PR comment, PR review) item worth acknowledging.
pub enum Consumable<'a> {
    IssueComment(&'a str),
    PrComment(&'a PrReviewComment),
}

/// Route per kind (§4.5 step 13): inline PR comments and anything without a
/// review state go through `reactToPrComment`; review-level submissions
/// whose state is APPROVED or CHANGES_REQUESTED go through
/// `reactToPrReview`. Skips items that already carry the reaction.
pub async fn acknowledge_all(provider: &(impl IssueProvider + ?Sized), items: &[Consumable<'_>]) {
    for item in items {
        match item {
            Consumable::IssueComment(comment_id) => {
                acknowledge_issue_comment(provider, comment_id).await;
            }
            Consumable::PrComment(comment) => {
                acknowledge_pr_comment(provider, comment).await;
            }
        }
    }
}

async fn acknowledge_issue_comment(provider: &(impl IssueProvider + ?Sized), comment_id: &str) {
    match provider.issue_comment_has_reaction(comment_id).await {
        Ok(true) => {}
        Ok(false) => {
            if let Err(err) = provider.react_to_issue_comment(comment_id).await {
                tracing::warn!(comment_id, error = %err, "failed to acknowledge issue comment");
            }
        }
        Err(err) => tracing::warn!(comment_id, error = %err, "failed to check issue comment reaction"),
    }
}

async fn acknowledge_pr_comment(provider: &(impl IssueProvider + ?Sized), comment: &PrReviewComment) {
    let is_review_verdict =
        matches!(comment.review_state, Some(ReviewState::Approved) | Some(ReviewState::ChangesRequested));

    if is_review_verdict {
        match provider.pr_review_has_reaction(&comment.id).await {
            Ok(true) => {}
            Ok(false) => {
                if let Err(err) = provider.react_to_pr_review(&comment.id).await {
                    tracing::warn!(review_id = %comment.id, error = %err, "failed to acknowledge pr review");
                }
            }
            Err(err) => {
                tracing::warn!(review_id = %comment.id, error = %err, "failed to check pr review reaction")
            }
        }
        return;
    }

    match provider.pr_comment_has_reaction(&comment.id).await {
        Ok(true) => {}
        Ok(false) => {
            if let Err(err) = provider.react_to_pr_comment(&comment.id).await {
                tracing::warn!(comment_id = %comment.id, error = %err, "failed to acknowledge pr comment");
            }
        }
        Err(err) => {
            tracing::warn!(comment_id = %comment.id, error = %err, "failed to check pr comment reaction")
        }
    }
}

#[cfg(test)]
#[path = "acknowledge_tests.rs"]
mod tests;
