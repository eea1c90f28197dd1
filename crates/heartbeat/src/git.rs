//! `gitPull` action (§3.1, §4.7, §6.4): pulling a project's base branch
//! after a PR merges. Concrete git plumbing is out of scope (spec §1 lists
//! "the external issue-tracker adapter implementations" and workspace
//! layout as plumbing; a git worktree puller sits in the same category),
//! so this crate ships only the collaborator trait the review pass calls,
//! grounded in `foreman-dispatch`'s [`foreman_dispatch::attachments::AttachmentProvider`]
//! "ship the trait plus a no-op default" pattern.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitPullError {
    #[error("git pull timed out after {0}ms")]
    Timeout(u64),
    #[error("git pull failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait GitPuller: Send + Sync {
    async fn pull(&self, repo: &Path, base_branch: &str, timeout_ms: u64) -> Result<(), GitPullError>;
}

/// Default used when no concrete git adapter is wired up: logs and
/// succeeds without touching the filesystem. The `gitPull` action is
/// best-effort post-merge housekeeping (§4.7), never a precondition for
/// the label transition it accompanies.
pub struct NoopGitPuller;

#[async_trait]
impl GitPuller for NoopGitPuller {
    async fn pull(&self, repo: &Path, base_branch: &str, _timeout_ms: u64) -> Result<(), GitPullError> {
        tracing::debug!(repo = %repo.display(), base_branch, "git pull is a no-op in this configuration");
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::{GitPullError, GitPuller};

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct PullCall {
        pub repo: PathBuf,
        pub base_branch: String,
    }

    #[derive(Clone, Default)]
    pub struct FakeGitPuller {
        calls: Arc<Mutex<Vec<PullCall>>>,
        fails: Arc<Mutex<bool>>,
    }

    impl FakeGitPuller {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> Vec<PullCall> {
            self.calls.lock().clone()
        }

        pub fn set_fails(&self, fails: bool) {
            *self.fails.lock() = fails;
        }
    }

    #[async_trait]
    impl GitPuller for FakeGitPuller {
        async fn pull(
            &self,
            repo: &Path,
            base_branch: &str,
            _timeout_ms: u64,
        ) -> Result<(), GitPullError> {
            self.calls
                .lock()
                .push(PullCall { repo: repo.to_path_buf(), base_branch: base_branch.to_string() });
            if *self.fails.lock() {
                return Err(GitPullError::Failed("simulated failure".into()));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
