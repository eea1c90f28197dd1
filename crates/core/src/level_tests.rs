use super::*;
use yare::parameterized;

fn levels3() -> Vec<SmolStr> {
    vec!["junior".into(), "medior".into(), "senior".into()]
}

fn levels2() -> Vec<SmolStr> {
    vec!["junior".into(), "senior".into()]
}

fn levels1() -> Vec<SmolStr> {
    vec!["solo".into()]
}

#[test]
fn canonical_level_aliases_mid() {
    assert_eq!(canonical_level("mid"), "medior");
    assert_eq!(canonical_level("senior"), "senior");
}

#[test]
fn infer_level_single_level_role_always_returns_it() {
    let levels = levels1();
    let default = SmolStr::from("solo");
    assert_eq!(infer_level(&levels, &default, "rewrite the entire database schema", ""), "solo");
}

#[parameterized(
    typo = { "fix typo in readme", "junior" },
    small_style = { "small css style tweak", "junior" },
)]
fn infer_level_three_levels_simple_keyword_picks_lowest(title: &str, expected: &str) {
    let levels = levels3();
    let default = SmolStr::from("medior");
    assert_eq!(infer_level(&levels, &default, title, ""), expected);
}

#[parameterized(
    architecture = { "redesign the system-wide architecture", "senior" },
    security = { "fix a security vulnerability", "senior" },
)]
fn infer_level_three_levels_complex_keyword_picks_highest(title: &str, expected: &str) {
    let levels = levels3();
    let default = SmolStr::from("medior");
    assert_eq!(infer_level(&levels, &default, title, ""), expected);
}

#[test]
fn infer_level_three_levels_neither_keyword_returns_default() {
    let levels = levels3();
    let default = SmolStr::from("medior");
    assert_eq!(infer_level(&levels, &default, "add a button to the settings page", ""), "medior");
}

#[test]
fn infer_level_three_levels_long_description_picks_highest_even_without_keyword() {
    let levels = levels3();
    let default = SmolStr::from("medior");
    let long_desc = "word ".repeat(501);
    assert_eq!(infer_level(&levels, &default, "task", &long_desc), "senior");
}

#[test]
fn infer_level_two_levels_ignores_simple_keywords_uses_binary_only() {
    let levels = levels2();
    let default = SmolStr::from("junior");
    // Contains a "simple" keyword but two-level roles skip that check.
    assert_eq!(infer_level(&levels, &default, "fix typo", ""), "junior");
    assert_eq!(infer_level(&levels, &default, "migrate the database schema", ""), "senior");
}

#[test]
fn resolve_model_prefers_role_table() {
    let mut models = IndexMap::new();
    models.insert(SmolStr::from("senior"), SmolStr::from("custom-model"));
    assert_eq!(resolve_model("senior", Some(&models)), "custom-model");
}

#[test]
fn resolve_model_falls_back_to_builtin_default() {
    assert_eq!(resolve_model("senior", None), "model-large");
}

#[test]
fn resolve_model_passes_through_raw_model_id() {
    assert_eq!(resolve_model("gpt-5-custom", None), "gpt-5-custom");
}

#[test]
fn resolve_model_applies_canonical_alias_before_lookup() {
    let mut models = IndexMap::new();
    models.insert(SmolStr::from("medior"), SmolStr::from("mapped"));
    assert_eq!(resolve_model("mid", Some(&models)), "mapped");
}
