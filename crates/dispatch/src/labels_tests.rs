use super::*;
use foreman_tracker::fake::FakeIssueProvider;
use foreman_tracker::Issue;

fn seeded(provider: &FakeIssueProvider, iid: &str, labels: &[&str]) {
    provider.seed_issue(Issue {
        iid: iid.into(),
        title: "t".into(),
        body: "b".into(),
        labels: labels.iter().map(|l| (*l).into()).collect(),
        assignees: vec![],
        open: true,
    });
}

fn roles() -> IndexMap<RoleId, RoleConfig> {
    let mut m = IndexMap::new();
    m.insert(
        "developer".into(),
        RoleConfig {
            enabled: true,
            levels: vec!["medior".into()],
            default_level: "medior".into(),
            models: IndexMap::new(),
            level_max_workers: IndexMap::new(),
        },
    );
    m
}

#[test]
fn role_level_label_formats_three_segments() {
    assert_eq!(role_level_label("developer", "medior", "cordelia"), "developer:medior:cordelia");
}

#[test]
fn is_role_level_label_matches_known_role_prefix() {
    let roles = roles();
    assert!(is_role_level_label("developer:medior:cordelia", &roles));
    assert!(!is_role_level_label("status:in-review", &roles));
    assert!(!is_role_level_label("no-colon", &roles));
}

#[tokio::test]
async fn replace_label_removes_matching_and_adds_new() {
    let provider = FakeIssueProvider::new();
    let iid: foreman_core::IssueId = "42".into();
    let current = vec!["developer:junior:ariel".to_string(), "status:doing".to_string()];
    seeded(&provider, "42", &["developer:junior:ariel", "status:doing"]);

    replace_label(
        &provider,
        &iid,
        &current,
        |l| l.starts_with("developer:"),
        "developer:medior:cordelia",
        "#00ff00",
    )
    .await;

    let labels = provider.labels_of(&iid);
    assert!(labels.contains(&"developer:medior:cordelia".to_string()));
    assert!(!labels.contains(&"developer:junior:ariel".to_string()));
    assert!(labels.contains(&"status:doing".to_string()));
}

#[tokio::test]
async fn apply_if_absent_skips_when_prefix_already_present() {
    let provider = FakeIssueProvider::new();
    let iid: foreman_core::IssueId = "7".into();
    let current = vec!["owner:alice".to_string()];
    seeded(&provider, "7", &["owner:alice"]);

    apply_if_absent(&provider, &iid, &current, "owner:", "owner:bob", "#ffffff").await;

    let labels = provider.labels_of(&iid);
    assert!(!labels.contains(&"owner:bob".to_string()));
}
