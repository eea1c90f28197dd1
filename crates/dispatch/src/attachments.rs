//! Attachment ingestion is a collaborator contract only (spec §1 lists
//! "attachment ingestion" among the plumbing explicitly out of scope for
//! this crate). Dispatch step 8 loads attachment context best-effort; this
//! module ships the trait the pipeline calls plus a no-op default so the
//! pipeline compiles and runs without a concrete ingestion backend.

use async_trait::async_trait;
use foreman_core::IssueId;
use smol_str::SmolStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: SmolStr,
    pub summary: SmolStr,
}

#[async_trait]
pub trait AttachmentProvider: Send + Sync {
    async fn attachments_for(&self, iid: &IssueId) -> Vec<Attachment>;
}

/// Default used when no ingestion backend is wired up.
pub struct NoAttachments;

#[async_trait]
impl AttachmentProvider for NoAttachments {
    async fn attachments_for(&self, _iid: &IssueId) -> Vec<Attachment> {
        Vec::new()
    }
}
