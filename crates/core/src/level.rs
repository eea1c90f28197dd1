//! Competence-level resolution: the keyword heuristic used when a dispatch
//! caller does not supply a level (§4.5 "Level selection fallback"), level
//! name aliasing, and model resolution (§4.5 "Model resolution").

use indexmap::IndexMap;
use smol_str::SmolStr;

const SIMPLE_KEYWORDS: &[&str] =
    &["typo", "rename", "minor", "small", "css", "style", "copy", "wording", "change color"];

const COMPLEX_KEYWORDS: &[&str] = &[
    "architect",
    "refactor",
    "redesign",
    "system-wide",
    "migration",
    "database schema",
    "security",
    "performance",
    "infrastructure",
    "multi-service",
];

/// Map a historical/alias level name onto its canonical form (e.g. the old
/// `"mid"` name onto `"medior"`). Unknown names pass through unchanged.
pub fn canonical_level(level: &str) -> SmolStr {
    match level {
        "mid" => "medior".into(),
        "jr" => "junior".into(),
        "sr" => "senior".into(),
        other => other.into(),
    }
}

/// Infer a level from issue title + description when the caller does not
/// supply one. `levels` must be ordered lowest-competence first.
pub fn infer_level(levels: &[SmolStr], default_level: &SmolStr, title: &str, description: &str) -> SmolStr {
    if levels.len() <= 1 {
        return levels.first().cloned().unwrap_or_else(|| default_level.clone());
    }

    let text = format!("{} {}", title, description).to_lowercase();
    let word_count = text.split_whitespace().count();
    let is_complex = COMPLEX_KEYWORDS.iter().any(|k| text.contains(k)) || word_count > 500;

    if levels.len() == 2 {
        // Binary roles skip the "simple" keyword check entirely: only
        // complex/not-complex matters.
        return if is_complex { levels.last() } else { levels.first() }
            .cloned()
            .unwrap_or_else(|| default_level.clone());
    }

    let is_simple = SIMPLE_KEYWORDS.iter().any(|k| text.contains(k)) && word_count < 100;
    if is_simple {
        levels.first().cloned().unwrap_or_else(|| default_level.clone())
    } else if is_complex {
        levels.last().cloned().unwrap_or_else(|| default_level.clone())
    } else {
        default_level.clone()
    }
}

/// Built-in level → model fallback used when a role's `models` table has no
/// entry for the resolved level. Levels with no built-in mapping pass
/// through as a raw model id (the caller may configure a model name
/// directly as the "level").
pub fn default_model_for_level(level: &str) -> SmolStr {
    match canonical_level(level).as_str() {
        "junior" => "model-small".into(),
        "medior" => "model-medium".into(),
        "senior" => "model-large".into(),
        other => other.into(),
    }
}

/// `resolveModel(role, level, resolvedRole?)`: the per-role `models` table
/// takes precedence, then the built-in default table, then the level name
/// itself (a raw model id passes through unchanged).
pub fn resolve_model(level: &str, role_models: Option<&IndexMap<SmolStr, SmolStr>>) -> SmolStr {
    let level = canonical_level(level);
    if let Some(models) = role_models {
        if let Some(model) = models.get(&level) {
            return model.clone();
        }
    }
    default_model_for_level(&level)
}

#[cfg(test)]
#[path = "level_tests.rs"]
mod tests;
