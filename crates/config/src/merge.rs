//! Three-tier document merge (defaults ← workspace ← project, §4.9): nested
//! mappings merge key by key, local (override) wins; anything else — a
//! scalar, a sequence, or a type mismatch — lets the override replace the
//! base value outright.

use serde_yaml::{Mapping, Value};

pub fn merge_values(base: Value, over: Value) -> Value {
    match (base, over) {
        (Value::Mapping(base_map), Value::Mapping(over_map)) => {
            Value::Mapping(merge_mappings(base_map, over_map))
        }
        (_, over) => over,
    }
}

fn merge_mappings(mut base: Mapping, over: Mapping) -> Mapping {
    for (key, over_value) in over {
        let merged = match base.remove(&key) {
            Some(base_value) => merge_values(base_value, over_value),
            None => over_value,
        };
        base.insert(key, merged);
    }
    base
}

/// A role overridden with a bare `false` replaces its whole entry during
/// [`merge_values`] (a mapping met by a scalar just takes the scalar). Turn
/// that `false` back into `{enabled: false}` so it still deserializes into
/// a `RoleConfig` — disabled, empty of levels.
pub fn normalize_roles(document: &mut Value) {
    let Some(Value::Mapping(roles)) = document.get_mut("roles") else {
        return;
    };
    for value in roles.values_mut() {
        if matches!(value, Value::Bool(false)) {
            let mut disabled = Mapping::new();
            disabled.insert(Value::String("enabled".into()), Value::Bool(false));
            *value = Value::Mapping(disabled);
        }
    }
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
