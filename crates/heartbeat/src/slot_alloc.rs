//! Worker-slot selection for the pickup pass (§4.5 step "find or grow a free
//! slot", §3.5: slots are an ordered, append-only `Vec<Slot>` per level,
//! capped by `levelMaxWorkers`).

use foreman_core::project::RoleWorker;
use foreman_core::RoleConfig;

/// Pick the slot index to activate for `level`: the first inactive slot in
/// the existing vec, or the next index past the end if there is still room
/// under `levelMaxWorkers`. `None` means the level is at capacity and the
/// caller must skip this pickup.
pub fn allocate_slot_index(worker: &RoleWorker, role_config: &RoleConfig, level: &str) -> Option<usize> {
    let existing = worker.get(level);
    if let Some(slots) = existing {
        if let Some(idx) = slots.iter().position(|s| !s.active) {
            return Some(idx);
        }
    }
    let occupied = existing.map_or(0, |s| s.len());
    let max = role_config.max_workers_for(level).unwrap_or(u32::MAX);
    if (occupied as u32) < max {
        Some(occupied)
    } else {
        None
    }
}

/// True if any slot across any level of `worker` is active, i.e. the role
/// has at least one piece of in-flight work for this project.
pub fn role_has_active_work(worker: &RoleWorker) -> bool {
    worker.values().any(|slots| slots.iter().any(|s| s.active))
}

#[cfg(test)]
#[path = "slot_alloc_tests.rs"]
mod tests;
