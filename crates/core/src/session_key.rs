//! Deterministic LLM session-key derivation (§4.5 step 3).
//!
//! `sessionKey` must be a pure function of `(agentId, project.name, role,
//! level, slotIndex)` (§8) so repeated dispatches against the same slot
//! reuse the same session without coordinating with the session layer.

use crate::project::SessionKey;
use smol_str::SmolStr;
use std::hash::{Hash, Hasher};

/// Fixed word list a slot index is hashed into. Any deterministic,
/// sufficiently large list works; the exact words are not load-bearing.
const SLOT_NAMES: &[&str] = &[
    "cordelia", "beatrice", "hermione", "ophelia", "juliet", "rosalind", "portia", "viola",
    "miranda", "perdita", "imogen", "cressida", "isabella", "desdemona", "titania", "olivia",
    "orsino", "benedick", "malvolio", "oberon", "prospero", "ferdinand", "sebastian", "antonio",
    "claudio", "mercutio", "horatio", "laertes", "fortinbras", "banquo", "macduff", "lennox",
];

/// Hash `(project_name, role, level, slot_index)` into a stable index over
/// [`SLOT_NAMES`]. Uses `DefaultHasher`, whose default construction has a
/// fixed seed (unlike `HashMap`'s `RandomState`), so this is reproducible
/// across processes and runs.
fn stable_slot_name(project_name: &str, role: &str, level: &str, slot_index: u32) -> &'static str {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    project_name.hash(&mut hasher);
    role.hash(&mut hasher);
    level.hash(&mut hasher);
    slot_index.hash(&mut hasher);
    let idx = (hasher.finish() as usize) % SLOT_NAMES.len();
    SLOT_NAMES[idx]
}

/// Build the deterministic session key
/// `agent:<agentId|unknown>:subagent:<project.name>-<role>-<level>-<slotName>`.
pub fn session_key(
    agent_id: Option<&str>,
    project_name: &str,
    role: &str,
    level: &str,
    slot_index: u32,
) -> SessionKey {
    let slot_name = stable_slot_name(project_name, role, level, slot_index);
    format!(
        "agent:{}:subagent:{}-{}-{}-{}",
        agent_id.unwrap_or("unknown"),
        project_name,
        role,
        level,
        slot_name
    )
    .into()
}

/// True iff `key` matches the subagent session-key pattern
/// `^agent:[^:]+:subagent:` — used by the orphaned-session scan (§4.6) to
/// distinguish subagent sessions from any other live session the registry
/// might enumerate.
pub fn is_subagent_session_key(key: &str) -> bool {
    let Some(rest) = key.strip_prefix("agent:") else { return false };
    let Some(colon_idx) = rest.find(':') else { return false };
    let (agent_part, tail) = rest.split_at(colon_idx);
    !agent_part.is_empty() && tail.starts_with(":subagent:")
}

/// Extract the `slotName` suffix from a session key built by
/// [`session_key`], if it matches the expected shape.
pub fn slot_name_of(key: &str) -> Option<SmolStr> {
    key.rsplit('-').next().map(SmolStr::from)
}

#[cfg(test)]
#[path = "session_key_tests.rs"]
mod tests;
