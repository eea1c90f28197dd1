//! The chat/notification adapter contract (§6.3). Concrete chat transports
//! are out of scope (spec §1); this crate ships the trait, the event
//! renderer, and the channel-resolution + delivery wrapper around it.

use async_trait::async_trait;

use crate::NotifyError;

#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    pub silent: bool,
    pub disable_link_preview: bool,
    pub account_id: Option<String>,
}

/// `send(channelId, channel, message, {silent, disableLinkPreview,
/// accountId?}) -> ok | error` (§6.3). Delivery failures are non-fatal —
/// callers of [`crate::TemplatedNotifier`] log and swallow `Err`.
#[async_trait]
pub trait ChatAdapter: Send + Sync {
    async fn send(
        &self,
        channel_id: &str,
        channel: &str,
        message: &str,
        options: SendOptions,
    ) -> Result<(), NotifyError>;
}
