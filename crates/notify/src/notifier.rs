//! [`TemplatedNotifier`]: resolves the target channel via
//! `resolveNotifyChannel` (§3.2, §4.5 step 18), renders the event, and
//! delivers through a [`ChatAdapter`] — best-effort, failures logged and
//! never propagated (§4.8, §7).

use foreman_core::Project;

use crate::{ChatAdapter, NotifyEvent, SendOptions};

pub struct TemplatedNotifier<A> {
    adapter: A,
}

impl<A: ChatAdapter> TemplatedNotifier<A> {
    pub fn new(adapter: A) -> Self {
        Self { adapter }
    }

    /// Deliver `event` to the channel `resolveNotifyChannel` picks for
    /// `issue_labels` within `project`. Swallows delivery errors after
    /// logging — the notifier contract is best-effort (§6.3, §7).
    pub async fn notify(&self, project: &Project, issue_labels: &[impl AsRef<str>], event: &NotifyEvent) {
        let Some(channel) = project.resolve_notify_channel(issue_labels) else {
            tracing::warn!(project = %project.slug, "no channel bound to project, dropping notification");
            return;
        };

        let message = event.render();
        match self
            .adapter
            .send(&channel.channel_id, &channel.channel, &message, SendOptions::default())
            .await
        {
            Ok(()) => {
                tracing::debug!(project = %project.slug, channel = %channel.channel_id, "notification sent");
            }
            Err(err) => {
                tracing::warn!(project = %project.slug, channel = %channel.channel_id, error = %err, "notification delivery failed");
            }
        }
    }
}

#[cfg(test)]
#[path = "notifier_tests.rs"]
mod tests;
