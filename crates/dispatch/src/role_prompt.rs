//! Loads role prompt instructions (§4.5 step 10): a project-specific file
//! if present, else the workspace default. Plain filesystem lookup — no
//! templating, no caching, reread on every dispatch since a workflow is
//! only immutable for the duration of one tick (§3.5).

use std::path::Path;

const ROLE_PROMPTS_DIR: &str = "roles";

/// `<workspace>/roles/<project_slug>/<role>.md` if present, else
/// `<workspace>/roles/<role>.md`. Returns `None` if neither exists —
/// dispatch proceeds with no extra system prompt (§4.5 step 1 setup
/// errors are suppressed).
pub async fn load_role_prompt(workspace: &Path, project_slug: &str, role: &str) -> Option<String> {
    let project_specific =
        workspace.join(ROLE_PROMPTS_DIR).join(project_slug).join(format!("{role}.md"));
    if let Ok(contents) = tokio::fs::read_to_string(&project_specific).await {
        return Some(contents);
    }

    let workspace_default = workspace.join(ROLE_PROMPTS_DIR).join(format!("{role}.md"));
    tokio::fs::read_to_string(&workspace_default).await.ok()
}

#[cfg(test)]
#[path = "role_prompt_tests.rs"]
mod tests;
