//! Label-vocabulary helpers (§6.5): the `role:level:<slotName>` label,
//! review/test routing labels, and the generic "replace any previous label
//! of this kind" operation dispatch steps 14-17 all reduce to.

use indexmap::IndexMap;
use smol_str::SmolStr;

use foreman_core::workflow::RoleId;
use foreman_core::{IssueId, RoleConfig};
use foreman_tracker::IssueProvider;

/// `role:level:<slotName>` (§6.5).
pub fn role_level_label(role: &str, level: &str, slot_name: &str) -> SmolStr {
    format!("{role}:{level}:{slot_name}").into()
}

/// True iff `label`'s first `:`-separated segment names a configured role —
/// the only generic way to recognize "a previous role-level label" without
/// hardcoding the literal string `"role"` (§6.5's `role:level:<slotName>`
/// uses the actual role id as its first segment, not the word "role").
pub fn is_role_level_label(label: &str, roles: &IndexMap<RoleId, RoleConfig>) -> bool {
    label.split_once(':').is_some_and(|(first, _)| roles.contains_key(first))
}

/// Remove every label matching `should_remove` (skipping `new_label` itself,
/// so a dispatch retry is idempotent), ensure `new_label` exists on the
/// tracker, then add it. Errors are logged and swallowed — dispatch step
/// 14-17 side effects are all best-effort post-commitment work (§7).
pub async fn replace_label(
    provider: &(impl IssueProvider + ?Sized),
    iid: &IssueId,
    current_labels: &[impl AsRef<str>],
    should_remove: impl Fn(&str) -> bool,
    new_label: &str,
    color: &str,
) {
    let to_remove: Vec<String> = current_labels
        .iter()
        .map(|l| l.as_ref().to_string())
        .filter(|l| l != new_label && should_remove(l))
        .collect();

    if !to_remove.is_empty() {
        if let Err(err) = provider.remove_labels(iid, &to_remove).await {
            tracing::warn!(issue = %iid, error = %err, "failed to remove stale labels");
        }
    }
    if let Err(err) = provider.ensure_label(new_label, color).await {
        tracing::warn!(issue = %iid, label = new_label, error = %err, "failed to ensure label exists");
    }
    if let Err(err) = provider.add_label(iid, new_label).await {
        tracing::warn!(issue = %iid, label = new_label, error = %err, "failed to add label");
    }
}

/// Add `new_label` only if no label already carries `prefix` — used for the
/// owner label (§4.5 step 17: "if the issue has no owner label, apply").
pub async fn apply_if_absent(
    provider: &(impl IssueProvider + ?Sized),
    iid: &IssueId,
    current_labels: &[impl AsRef<str>],
    prefix: &str,
    new_label: &str,
    color: &str,
) {
    if current_labels.iter().any(|l| l.as_ref().starts_with(prefix)) {
        return;
    }
    if let Err(err) = provider.ensure_label(new_label, color).await {
        tracing::warn!(issue = %iid, label = new_label, error = %err, "failed to ensure label exists");
    }
    if let Err(err) = provider.add_label(iid, new_label).await {
        tracing::warn!(issue = %iid, label = new_label, error = %err, "failed to add owner label");
    }
}

#[cfg(test)]
#[path = "labels_tests.rs"]
mod tests;
