//! The anomaly taxonomy (§4.6): exhaustive classification of what a
//! triangulation of tracker label ↔ worker slot ↔ session liveness can
//! reveal, plus the per-class repair outcome.

use smol_str::SmolStr;

use foreman_core::workflow::RoleId;
use foreman_core::IssueId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Critical,
    Warning,
}

/// One row of the §4.6 table, evaluated in table order (first match wins
/// per slot, except `OrphanedLabel` which is a separate per-role scan that
/// can coexist with a healthy slot).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyKind {
    IssueGone,
    LabelMismatch,
    SessionDead,
    StaleWorker,
    StuckLabel,
    OrphanIssueId,
    OrphanedLabel,
}

impl AnomalyKind {
    pub fn severity(self) -> Severity {
        match self {
            AnomalyKind::StaleWorker | AnomalyKind::OrphanIssueId => Severity::Warning,
            _ => Severity::Critical,
        }
    }
}

/// One detected anomaly, identifying the slot (or, for `OrphanedLabel`, the
/// tracker issue) it was raised against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    pub role: RoleId,
    pub level: SmolStr,
    pub slot_index: usize,
    pub issue_id: Option<IssueId>,
}

impl Anomaly {
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

/// The repair outcome for one anomaly (§7: "captured into
/// `HealthFix{fixed:false, labelRevertFailed?:true}`; surface to the
/// tick's audit but do not block other fixes").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthFix {
    pub fixed: bool,
    pub label_revert_failed: Option<bool>,
}

impl HealthFix {
    pub fn not_attempted() -> Self {
        Self::default()
    }

    pub fn ok() -> Self {
        Self { fixed: true, label_revert_failed: None }
    }

    pub fn revert_failed() -> Self {
        Self { fixed: false, label_revert_failed: Some(true) }
    }
}
