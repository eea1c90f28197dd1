//! Project registry data model: projects, channel bindings, and worker
//! slots (§3.2). Plain data, no behavior beyond small invariant helpers —
//! the registry crate owns persistence, this crate owns the shape.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::workflow::RoleId;

/// Defines a string newtype with the `Display`/`From`/`PartialEq<str>`/
/// `Borrow<str>` impls every id-like type in this module needs. Each of
/// `IssueId`, `SessionKey`, and `ProjectSlug` wraps a distinct `SmolStr` so
/// one can never be passed where another is expected.
macro_rules! string_id {
    ($(#[$meta:meta])* pub struct $name:ident;) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub SmolStr);

        impl $name {
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<SmolStr> for $name {
            fn from(s: SmolStr) -> Self {
                Self(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(SmolStr::from(s))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(SmolStr::from(s))
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                self.0.as_str()
            }
        }
    };
}

string_id! {
    /// Tracker-assigned issue identifier. Opaque to the core; carried as a
    /// string so numeric (`"42"`) and slug-style (`"ORG-42"`) tracker ids are
    /// both representable without a lossy integer cast.
    pub struct IssueId;
}

string_id! {
    /// A session key as understood by the session registry: an opaque string
    /// the core generates deterministically (§4.5) and the adapter never
    /// interprets.
    pub struct SessionKey;
}

string_id! {
    /// Stable project identifier: ASCII, lowercase, hyphenated.
    pub struct ProjectSlug;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Github,
    Gitlab,
}

/// One chat-channel binding for a project. `channels[0]` (declaration
/// order within [`Project::channels`]) is the primary channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelBinding {
    pub channel_id: SmolStr,
    pub channel: SmolStr,
    pub name: SmolStr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<SmolStr>,
    #[serde(default)]
    pub events: Vec<SmolStr>,
}

/// One worker position at (project, role, level, index).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_id: Option<IssueId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_key: Option<SessionKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_label: Option<SmolStr>,
}

impl Slot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// §3.2 invariant: an active slot has non-null issueId, sessionKey,
    /// startTime; an inactive slot has null issueId and startTime.
    pub fn is_consistent(&self) -> bool {
        if self.active {
            self.issue_id.is_some() && self.session_key.is_some() && self.start_time.is_some()
        } else {
            self.issue_id.is_none() && self.start_time.is_none()
        }
    }

    /// Deactivate the slot and drop its session reference, keeping
    /// `previous_label` (used by health-checker revert repairs).
    pub fn deactivate_and_clear_session(&mut self) {
        self.active = false;
        self.issue_id = None;
        self.session_key = None;
        self.start_time = None;
    }

    /// Patch used by [`Slot::deactivate_and_clear_session`] without also
    /// clearing the session key (stuck_label / orphan_issue_id repairs
    /// only clear `issue_id`).
    pub fn clear_issue_id(&mut self) {
        self.issue_id = None;
    }
}

crate::builder! {
    pub struct SlotBuilder => Slot {
        set {
            active: bool = false,
        }
        option {
            issue_id: IssueId = None,
            session_key: SessionKey = None,
            start_time: u64 = None,
            previous_label: SmolStr = None,
        }
    }
}

/// level → ordered sequence of slots.
pub type RoleWorker = IndexMap<SmolStr, Vec<Slot>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub slug: ProjectSlug,
    pub name: SmolStr,
    pub repo: std::path::PathBuf,
    pub base_branch: SmolStr,
    pub deploy_branch: SmolStr,
    pub provider: Provider,
    pub channels: Vec<ChannelBinding>,
    #[serde(default)]
    pub workers: IndexMap<RoleId, RoleWorker>,
}

impl Project {
    /// The primary channel, i.e. `channels[0]`.
    pub fn primary_channel(&self) -> Option<&ChannelBinding> {
        self.channels.first()
    }

    /// `getWorker`: fetch the RoleWorker for a role, auto-vivifying an
    /// empty value without mutating the project (non-destructive read).
    pub fn get_worker(&self, role: &str) -> RoleWorker {
        self.workers.get(role).cloned().unwrap_or_default()
    }

    /// Mutable accessor that DOES autovivify into `self.workers`, used by
    /// the registry's write path.
    pub fn get_worker_mut(&mut self, role: &str) -> &mut RoleWorker {
        self.workers.entry(role.into()).or_default()
    }

    /// Resolve the notification channel for an issue: the first channel
    /// whose `channel_id` equals the value of a `notify:<channelId>` label,
    /// else the primary channel.
    pub fn resolve_notify_channel(&self, issue_labels: &[impl AsRef<str>]) -> Option<&ChannelBinding> {
        let notified_id = issue_labels.iter().find_map(|l| l.as_ref().strip_prefix("notify:"));
        if let Some(id) = notified_id {
            if let Some(c) = self.channels.iter().find(|c| c.channel_id == id) {
                return Some(c);
            }
        }
        self.primary_channel()
    }
}

crate::builder! {
    pub struct ProjectBuilder => Project {
        into {
            slug: ProjectSlug = "p1",
            name: SmolStr = "P1",
            base_branch: SmolStr = "main",
            deploy_branch: SmolStr = "main",
        }
        set {
            repo: std::path::PathBuf = std::path::PathBuf::from("/tmp/p1"),
            provider: Provider = Provider::Github,
            channels: Vec<ChannelBinding> = Vec::new(),
            workers: IndexMap<RoleId, RoleWorker> = IndexMap::new(),
        }
    }
}

/// The whole worker-state registry (§3.4): `{projects: {slug -> Project}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub projects: IndexMap<ProjectSlug, Project>,
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
