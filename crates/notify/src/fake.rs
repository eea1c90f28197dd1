//! In-memory [`ChatAdapter`] test double, mirroring the teacher's
//! `FakeNotifyAdapter`: an `Arc<Mutex<Vec<_>>>` call log.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{ChatAdapter, NotifyError, SendOptions};

#[derive(Debug, Clone)]
pub struct ChatCall {
    pub channel_id: String,
    pub channel: String,
    pub message: String,
}

#[derive(Clone, Default)]
pub struct FakeChatAdapter {
    calls: Arc<Mutex<Vec<ChatCall>>>,
}

impl FakeChatAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<ChatCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ChatAdapter for FakeChatAdapter {
    async fn send(
        &self,
        channel_id: &str,
        channel: &str,
        message: &str,
        _options: SendOptions,
    ) -> Result<(), NotifyError> {
        self.calls.lock().push(ChatCall {
            channel_id: channel_id.to_string(),
            channel: channel.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }
}
