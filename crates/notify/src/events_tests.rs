use super::*;

#[test]
fn worker_start_renders_role_and_level() {
    let event = NotifyEvent::WorkerStart {
        issue_iid: "42".into(),
        issue_title: "Fix login bug".into(),
        role: "developer".into(),
        level: "medior".into(),
    };
    let text = event.render();
    assert!(text.contains("#42"));
    assert!(text.contains("developer"));
    assert!(text.contains("medior"));
}

#[test]
fn pr_merged_includes_url_when_present() {
    let event = NotifyEvent::PrMerged {
        issue_iid: "7".into(),
        issue_title: "Add feature".into(),
        url: Some("https://example.test/pr/7".into()),
    };
    assert!(event.render().contains("https://example.test/pr/7"));
}

#[test]
fn pr_merged_omits_url_when_absent() {
    let event =
        NotifyEvent::PrMerged { issue_iid: "7".into(), issue_title: "Add feature".into(), url: None };
    assert!(!event.render().contains("http"));
}

#[test]
fn each_event_type_gets_a_distinct_emoji_prefix() {
    let events = vec![
        NotifyEvent::WorkerStart {
            issue_iid: "1".into(),
            issue_title: "t".into(),
            role: "developer".into(),
            level: "junior".into(),
        },
        NotifyEvent::ReviewNeeded { issue_iid: "1".into(), issue_title: "t".into() },
        NotifyEvent::ChangesRequested { issue_iid: "1".into(), issue_title: "t".into() },
        NotifyEvent::MergeConflict { issue_iid: "1".into(), issue_title: "t".into() },
        NotifyEvent::PrClosed { issue_iid: "1".into(), issue_title: "t".into() },
    ];
    let prefixes: std::collections::HashSet<_> = events.iter().map(|e| e.emoji()).collect();
    assert_eq!(prefixes.len(), events.len());
}
