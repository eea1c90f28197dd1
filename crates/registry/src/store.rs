//! Project registry (C2): the worker-state store. Reads are lock-free over
//! an atomic-replace file; writes acquire a per-workspace in-process mutex
//! so two concurrent writers never interleave partial state (§3.4, §5).

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use foreman_core::project::{IssueId, SessionKey};
use foreman_core::{Project, Registry, Slot};
use parking_lot::Mutex;

use crate::atomic::atomic_replace;
use crate::error::RegistryError;

const REGISTRY_FILE: &str = "foreman-state.json";

/// Process-wide map of workspace path → write lock, so two `RegistryStore`
/// handles pointed at the same workspace still serialize their writers.
fn workspace_locks() -> &'static Mutex<HashMap<PathBuf, Arc<Mutex<()>>>> {
    static LOCKS: OnceLock<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> = OnceLock::new();
    LOCKS.get_or_init(|| Mutex::new(HashMap::new()))
}

fn lock_for(workspace: &Path) -> Arc<Mutex<()>> {
    let canonical = workspace.canonicalize().unwrap_or_else(|_| workspace.to_path_buf());
    workspace_locks().lock().entry(canonical).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
}

/// Fields supplied by `activateWorker` (§4.2) in a single commit.
#[derive(Debug, Clone)]
pub struct Activation {
    pub issue_id: IssueId,
    pub session_key: SessionKey,
    pub start_time: u64,
    pub previous_label: Option<String>,
}

pub struct RegistryStore {
    workspace: PathBuf,
}

impl RegistryStore {
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        Self { workspace: workspace.into() }
    }

    fn registry_path(&self) -> PathBuf {
        self.workspace.join(REGISTRY_FILE)
    }

    /// `readProjects(workspace)`: unlocked read; a missing file is an empty
    /// registry, not an error.
    pub fn read(&self) -> Result<Registry, RegistryError> {
        match fs::read(self.registry_path()) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Registry::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_locked(&self, registry: &Registry) -> Result<(), RegistryError> {
        let bytes = serde_json::to_vec_pretty(registry)?;
        atomic_replace(&self.registry_path(), &bytes)?;
        Ok(())
    }

    /// Read-modify-write under the per-workspace mutex, returning the
    /// registry as it stood after `f` ran.
    pub fn update<F>(&self, f: F) -> Result<Registry, RegistryError>
    where
        F: FnOnce(&mut Registry),
    {
        let lock = lock_for(&self.workspace);
        let _guard = lock.lock();
        let mut registry = self.read()?;
        f(&mut registry);
        self.write_locked(&registry)?;
        Ok(registry)
    }

    /// `getWorker(project, role)`: non-destructive, auto-vivifying read.
    pub fn get_worker(
        &self,
        slug: &str,
        role: &str,
    ) -> Result<foreman_core::RoleWorker, RegistryError> {
        let registry = self.read()?;
        Ok(registry.projects.get(slug).map(|p| p.get_worker(role)).unwrap_or_default())
    }

    /// `updateSlot(workspace, slug, role, level, index, patch)`: merges
    /// `patch` into the slot under the write lock, allocating the slot
    /// lazily if this is its first activation (§3.5).
    pub fn update_slot<F>(
        &self,
        slug: &str,
        role: &str,
        level: &str,
        index: usize,
        patch: F,
    ) -> Result<(), RegistryError>
    where
        F: FnOnce(&mut Slot),
    {
        self.update(|registry| {
            let Some(project) = registry.projects.get_mut(slug) else { return };
            ensure_slot(project, role, level, index);
            // ensure_slot just inserted this level's Vec if it was missing.
            #[allow(clippy::expect_used)]
            let slots = project.get_worker_mut(role).get_mut(level).expect("just ensured");
            patch(&mut slots[index]);
        })
        .map(|_| ())
    }

    /// `activateWorker(...)`: set the slot active with all supplied fields
    /// in one commit. Failure here MUST NOT roll the already-transitioned
    /// label back (§4.5 step 21) — callers treat an `Err` here as a
    /// logged warning, not a dispatch failure.
    pub fn activate_worker(
        &self,
        slug: &str,
        role: &str,
        level: &str,
        index: usize,
        activation: Activation,
    ) -> Result<(), RegistryError> {
        self.update_slot(slug, role, level, index, move |slot| {
            slot.active = true;
            slot.issue_id = Some(activation.issue_id);
            slot.session_key = Some(activation.session_key);
            slot.start_time = Some(activation.start_time);
            slot.previous_label = activation.previous_label.map(Into::into);
        })
    }

    /// Register a project once (§3.5: "created externally ... never
    /// deleted by the core"). A no-op if the slug already exists.
    pub fn ensure_project(&self, project: Project) -> Result<(), RegistryError> {
        self.update(|registry| {
            registry.projects.entry(project.slug.clone()).or_insert(project);
        })
        .map(|_| ())
    }
}

fn ensure_slot(project: &mut Project, role: &str, level: &str, index: usize) {
    let worker = project.get_worker_mut(role);
    let slots = worker.entry(level.into()).or_default();
    while slots.len() <= index {
        slots.push(Slot::empty());
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
