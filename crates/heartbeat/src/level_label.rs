//! Level-override parsing for the pickup pass (§4.7 step 2.6: "Determine
//! level: first, parse any `role.level` or bare level label on the issue;
//! otherwise apply the heuristic (§4.5)."). A human triaging an issue can
//! pin its level before it is ever picked up, either by a role-scoped
//! `developer.senior` label or a bare `senior` label understood in the
//! context of the role being dispatched.

use foreman_core::RoleConfig;
use smol_str::SmolStr;

/// Parse an explicit level override from `issue_labels` for `role`, given
/// the role's configured (ordered) level set. Returns `None` when no label
/// names a configured level, leaving the caller to fall back to the
/// keyword heuristic.
pub fn parse_level_override(issue_labels: &[impl AsRef<str>], role: &str, role_config: &RoleConfig) -> Option<SmolStr> {
    let scoped_prefix = format!("{role}.");
    for label in issue_labels {
        let label = label.as_ref();
        if let Some(level) = label.strip_prefix(&scoped_prefix) {
            if role_config.levels.iter().any(|l| l.as_str() == level) {
                return Some(level.into());
            }
        }
    }
    for label in issue_labels {
        let label = label.as_ref();
        if role_config.levels.iter().any(|l| l.as_str() == label) {
            return Some(label.into());
        }
    }
    None
}

#[cfg(test)]
#[path = "level_label_tests.rs"]
mod tests;
