//! Aggregate counts produced by one tick (§4.7 step 4: "Emit a
//! `heartbeat_tick` audit record with aggregate counts").

use smol_str::SmolStr;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectTickSummary {
    pub project_slug: SmolStr,
    pub health_fixes: u32,
    pub health_anomalies: u32,
    pub reviews_merged: u32,
    pub reviews_changes_requested: u32,
    pub reviews_merge_conflict: u32,
    pub reviews_closed: u32,
    pub pickups: u32,
    pub skipped: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub projects: Vec<ProjectTickSummary>,
    pub orphaned_sessions_deleted: u32,
    pub session_liveness_known: bool,
}

impl TickSummary {
    pub fn total_pickups(&self) -> u32 {
        self.projects.iter().map(|p| p.pickups).sum()
    }

    pub fn total_health_fixes(&self) -> u32 {
        self.projects.iter().map(|p| p.health_fixes).sum()
    }

    pub fn projects_skipped(&self) -> u32 {
        self.projects.iter().filter(|p| p.skipped).count() as u32
    }
}
