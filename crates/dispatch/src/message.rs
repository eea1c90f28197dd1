//! Task message rendering (§4.5 step 9): a structured text rendering of
//! project/role/issue/comments/PR context/attachments, concluded with the
//! orchestrator session key and channel id so the worker can call back.

use smol_str::SmolStr;

use foreman_core::IssueId;
use foreman_tracker::{Comment, PrReviewComment, PrStatus};

use crate::attachments::Attachment;

/// Everything the rendered task message needs. Built from dispatch inputs
/// plus the best-effort fetches of steps 6-8.
pub struct TaskMessageInput<'a> {
    pub project_name: &'a str,
    pub role: &'a str,
    pub level: &'a str,
    pub issue_id: &'a IssueId,
    pub issue_title: &'a str,
    pub issue_description: &'a str,
    pub issue_url: &'a str,
    pub comments: &'a [Comment],
    pub pr_status: Option<&'a PrStatus>,
    pub pr_feedback: &'a [PrReviewComment],
    pub attachments: &'a [Attachment],
    pub orchestrator_session_key: Option<&'a str>,
    pub channel_id: &'a str,
}

/// Plain-text rendering; the teacher's worker-facing messages are Markdown
/// so sections are headed with `##` to match that convention.
pub fn render_task_message(input: &TaskMessageInput<'_>) -> SmolStr {
    let mut out = String::new();

    out.push_str(&format!("## Task: {}\n\n", input.issue_title));
    out.push_str(&format!(
        "Project: {}\nRole: {} ({})\nIssue: {} ({})\n\n",
        input.project_name, input.role, input.level, input.issue_id, input.issue_url
    ));

    out.push_str("### Description\n\n");
    out.push_str(input.issue_description);
    out.push_str("\n\n");

    if !input.comments.is_empty() {
        out.push_str("### Comments\n\n");
        for comment in input.comments {
            out.push_str(&format!("- **{}**: {}\n", comment.author, comment.body));
        }
        out.push('\n');
    }

    if let Some(status) = input.pr_status {
        out.push_str("### PR status\n\n");
        out.push_str(&format!("{:?}, mergeable={:?}\n\n", status.state, status.mergeable));
    }

    if !input.pr_feedback.is_empty() {
        out.push_str("### Review feedback\n\n");
        for comment in input.pr_feedback {
            out.push_str(&format!("- **{}**: {}\n", comment.author, comment.body));
        }
        out.push('\n');
    }

    if !input.attachments.is_empty() {
        out.push_str("### Attachments\n\n");
        for attachment in input.attachments {
            out.push_str(&format!("- {}: {}\n", attachment.name, attachment.summary));
        }
        out.push('\n');
    }

    out.push_str("---\n");
    out.push_str(&format!(
        "Reply on channel `{}`{}.\n",
        input.channel_id,
        input
            .orchestrator_session_key
            .map(|key| format!(" and notify orchestrator session `{key}`"))
            .unwrap_or_default()
    ));

    out.into()
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
