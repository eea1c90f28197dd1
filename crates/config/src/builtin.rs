//! Built-in configuration (§4.9): the base document every workspace and
//! project document merges onto. Mirrors the default workflow (§6.4) with a
//! four-role catalogue matching it (developer, reviewer, tester, architect).

use indexmap::IndexMap;
use smol_str::SmolStr;

use foreman_core::{default_workflow, ExecutionMode, ResolvedConfig, RoleConfig, Timeouts};

pub fn builtin_config() -> ResolvedConfig {
    ResolvedConfig {
        workflow: default_workflow(),
        roles: default_roles(),
        timeouts: Timeouts::default(),
        instance_name: None,
        heartbeat_interval_secs: 60,
        max_pickups_per_tick: 5,
        project_execution: ExecutionMode::default(),
        role_execution: ExecutionMode::default(),
    }
}

fn role(levels: &[&str], default_level: &str) -> RoleConfig {
    let levels: Vec<SmolStr> = levels.iter().map(|l| SmolStr::from(*l)).collect();
    let level_max_workers = levels.iter().cloned().map(|l| (l, 1u32)).collect();
    RoleConfig {
        enabled: true,
        levels,
        default_level: default_level.into(),
        models: IndexMap::new(),
        level_max_workers,
    }
}

fn default_roles() -> IndexMap<SmolStr, RoleConfig> {
    let mut roles = IndexMap::new();
    roles.insert("developer".into(), role(&["junior", "medior", "senior"], "medior"));
    roles.insert("reviewer".into(), role(&["junior", "medior", "senior"], "medior"));
    roles.insert("tester".into(), role(&["junior", "medior", "senior"], "medior"));
    roles.insert("architect".into(), role(&["medior", "senior"], "senior"));
    roles
}
