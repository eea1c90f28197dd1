use super::*;
use foreman_tracker::Comment;

#[test]
fn renders_core_sections() {
    let iid: IssueId = "42".into();
    let comments = vec![Comment { id: "c1".into(), author: "alice".into(), body: "lgtm".into(), created_at_ms: 0 }];
    let input = TaskMessageInput {
        project_name: "P1",
        role: "developer",
        level: "medior",
        issue_id: &iid,
        issue_title: "Fix the thing",
        issue_description: "Do the work.",
        issue_url: "https://example.test/42",
        comments: &comments,
        pr_status: None,
        pr_feedback: &[],
        attachments: &[],
        orchestrator_session_key: Some("agent:main:subagent:orchestrator"),
        channel_id: "chan-1",
    };

    let rendered = render_task_message(&input);
    assert!(rendered.contains("Fix the thing"));
    assert!(rendered.contains("P1"));
    assert!(rendered.contains("developer"));
    assert!(rendered.contains("alice"));
    assert!(rendered.contains("chan-1"));
    assert!(rendered.contains("agent:main:subagent:orchestrator"));
}

#[test]
fn omits_empty_sections() {
    let iid: IssueId = "1".into();
    let input = TaskMessageInput {
        project_name: "P1",
        role: "developer",
        level: "medior",
        issue_id: &iid,
        issue_title: "T",
        issue_description: "D",
        issue_url: "u",
        comments: &[],
        pr_status: None,
        pr_feedback: &[],
        attachments: &[],
        orchestrator_session_key: None,
        channel_id: "chan-1",
    };

    let rendered = render_task_message(&input);
    assert!(!rendered.contains("### Comments"));
    assert!(!rendered.contains("### PR status"));
    assert!(!rendered.contains("notify orchestrator session"));
}
