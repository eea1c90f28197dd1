//! Resolved configuration data model (§3.3): the product of merging
//! defaults, workspace, and per-project config documents. The merge logic
//! itself lives in the config-loader crate; this module only owns the
//! shape every other crate consumes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::workflow::{RoleId, Workflow};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Ordered lowest-competence first. Empty when the role is disabled via
    /// a bare `false` override and carries no other configuration.
    #[serde(default)]
    pub levels: Vec<SmolStr>,
    #[serde(default)]
    pub default_level: SmolStr,
    #[serde(default)]
    pub models: IndexMap<SmolStr, SmolStr>,
    #[serde(default)]
    pub level_max_workers: IndexMap<SmolStr, u32>,
}

fn default_true() -> bool {
    true
}

impl RoleConfig {
    pub fn max_workers_for(&self, level: &str) -> Option<u32> {
        self.level_max_workers.get(level).copied()
    }
}

/// §3.3 timeouts. All millisecond fields default into the 10-30s range
/// the concurrency model (§5) calls for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timeouts {
    #[serde(default = "default_session_patch_ms")]
    pub session_patch_ms: u64,
    #[serde(default = "default_dispatch_ms")]
    pub dispatch_ms: u64,
    #[serde(default = "default_git_pull_ms")]
    pub git_pull_ms: u64,
    #[serde(default = "default_stale_worker_hours")]
    pub stale_worker_hours: u64,
    #[serde(default = "default_session_context_budget")]
    pub session_context_budget: f64,
}

fn default_session_patch_ms() -> u64 {
    15_000
}
fn default_dispatch_ms() -> u64 {
    30_000
}
fn default_git_pull_ms() -> u64 {
    20_000
}
fn default_stale_worker_hours() -> u64 {
    6
}
fn default_session_context_budget() -> f64 {
    0.85
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            session_patch_ms: default_session_patch_ms(),
            dispatch_ms: default_dispatch_ms(),
            git_pull_ms: default_git_pull_ms(),
            stale_worker_hours: default_stale_worker_hours(),
            session_context_budget: default_session_context_budget(),
        }
    }
}

/// Product of defaults ← workspace ← project, used for the remainder of a
/// tick once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedConfig {
    pub workflow: Workflow,
    pub roles: IndexMap<RoleId, RoleConfig>,
    #[serde(default)]
    pub timeouts: Timeouts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_name: Option<SmolStr>,
    /// Heartbeat cadence, default 60s (§4.7).
    #[serde(default = "default_heartbeat_interval_secs")]
    pub heartbeat_interval_secs: u64,
    /// Fairness bound on pickups per tick (§4.7, §5).
    #[serde(default = "default_max_pickups_per_tick")]
    pub max_pickups_per_tick: u32,
    #[serde(default)]
    pub project_execution: ExecutionMode,
    #[serde(default)]
    pub role_execution: ExecutionMode,
}

fn default_heartbeat_interval_secs() -> u64 {
    60
}
fn default_max_pickups_per_tick() -> u32 {
    5
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    #[default]
    Parallel,
    Sequential,
}

impl ResolvedConfig {
    pub fn role(&self, role: &str) -> Option<&RoleConfig> {
        self.roles.get(role).filter(|r| r.enabled)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
