//! Append-only audit log (§3.4, §6.6): one JSON object per line preserving
//! `{timestamp, event, ...fields}`. Write failures are non-fatal — logged
//! and swallowed, never surfaced to the caller (§7 "Fatal errors" excludes
//! the audit log explicitly: "Write failures are non-fatal").

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

const AUDIT_LOG_FILE: &str = "foreman-audit.log";

/// One audit event: a fixed `timestamp`/`event` pair plus arbitrary flattened
/// fields (dispatch details, health-fix counts, tick summaries, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub timestamp_ms: u64,
    pub event: String,
    #[serde(flatten)]
    pub fields: Value,
}

impl AuditRecord {
    pub fn new(timestamp_ms: u64, event: impl Into<String>, fields: Value) -> Self {
        Self { timestamp_ms, event: event.into(), fields }
    }
}

/// Append-only, per-workspace audit log. Unlike [`crate::RegistryStore`] this
/// has no read path and no write lock: a line-append is already atomic at
/// the filesystem-buffer granularity audit records need, and losing an
/// interleaved line under concurrent writers is an accepted tradeoff for a
/// stream that exists for human/operator review, not reconciliation.
pub struct AuditLog {
    workspace: PathBuf,
}

impl AuditLog {
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        Self { workspace: workspace.into() }
    }

    fn path(&self) -> PathBuf {
        self.workspace.join(AUDIT_LOG_FILE)
    }

    /// Append one record as a line of JSON. Never returns an error; any
    /// failure is logged via `tracing::warn!` and otherwise ignored.
    pub fn append(&self, record: &AuditRecord) {
        let line = match serde_json::to_string(record) {
            Ok(line) => line,
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize audit record");
                return;
            }
        };

        if let Err(err) = append_line(&self.path(), &line) {
            tracing::warn!(error = %err, path = %self.path().display(), "failed to append audit record");
        }
    }

    /// Read every record back, in file order. Intended for tests and
    /// operator tooling, not the hot path.
    pub fn read_all(&self) -> std::io::Result<Vec<AuditRecord>> {
        let contents = match std::fs::read_to_string(self.path()) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };
        Ok(contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect())
    }
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")
}

#[cfg(test)]
#[path = "audit_tests.rs"]
mod tests;
