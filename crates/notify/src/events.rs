//! Typed notification events (§4.8) and their plain-text rendering with a
//! small fixed set of emoji prefixes per event type.

use smol_str::SmolStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyEvent {
    WorkerStart { issue_iid: SmolStr, issue_title: SmolStr, role: SmolStr, level: SmolStr },
    WorkerComplete { issue_iid: SmolStr, issue_title: SmolStr, role: SmolStr, result: SmolStr },
    ReviewNeeded { issue_iid: SmolStr, issue_title: SmolStr },
    PrMerged { issue_iid: SmolStr, issue_title: SmolStr, url: Option<SmolStr> },
    ChangesRequested { issue_iid: SmolStr, issue_title: SmolStr },
    MergeConflict { issue_iid: SmolStr, issue_title: SmolStr },
    PrClosed { issue_iid: SmolStr, issue_title: SmolStr },
}

impl NotifyEvent {
    fn emoji(&self) -> &'static str {
        match self {
            NotifyEvent::WorkerStart { .. } => "🚀",
            NotifyEvent::WorkerComplete { .. } => "✅",
            NotifyEvent::ReviewNeeded { .. } => "👀",
            NotifyEvent::PrMerged { .. } => "🔀",
            NotifyEvent::ChangesRequested { .. } => "✏️",
            NotifyEvent::MergeConflict { .. } => "⚠️",
            NotifyEvent::PrClosed { .. } => "🛑",
        }
    }

    /// Render the event into the plain-text message a [`crate::ChatAdapter`]
    /// delivers.
    pub fn render(&self) -> String {
        let emoji = self.emoji();
        match self {
            NotifyEvent::WorkerStart { issue_iid, issue_title, role, level } => {
                format!("{emoji} #{issue_iid} {issue_title} — {role} ({level}) picked up")
            }
            NotifyEvent::WorkerComplete { issue_iid, issue_title, role, result } => {
                format!("{emoji} #{issue_iid} {issue_title} — {role} finished: {result}")
            }
            NotifyEvent::ReviewNeeded { issue_iid, issue_title } => {
                format!("{emoji} #{issue_iid} {issue_title} needs review")
            }
            NotifyEvent::PrMerged { issue_iid, issue_title, url } => match url {
                Some(url) => format!("{emoji} #{issue_iid} {issue_title} merged — {url}"),
                None => format!("{emoji} #{issue_iid} {issue_title} merged"),
            },
            NotifyEvent::ChangesRequested { issue_iid, issue_title } => {
                format!("{emoji} #{issue_iid} {issue_title} — changes requested")
            }
            NotifyEvent::MergeConflict { issue_iid, issue_title } => {
                format!("{emoji} #{issue_iid} {issue_title} — merge conflict")
            }
            NotifyEvent::PrClosed { issue_iid, issue_title } => {
                format!("{emoji} #{issue_iid} {issue_title} — PR closed without merge")
            }
        }
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
