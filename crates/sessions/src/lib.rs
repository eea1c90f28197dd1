// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! foreman-sessions: the session-registry interface (C4, §4.4) over the LLM
//! gateway. Session keys are structured strings the core generates (§4.5)
//! and this layer treats as opaque.

mod error;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use error::SessionError;

use async_trait::async_trait;
use foreman_core::project::SessionKey;
use smol_str::SmolStr;
use std::collections::HashSet;

/// Options accompanying `sendToSession` (§4.4).
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    pub model: SmolStr,
    pub extra_system_prompt: Option<String>,
    pub timeout_ms: u64,
    pub orchestrator_key: Option<SessionKey>,
}

/// Abstract adapter over the LLM session layer. `ensure_session` and
/// `send_to_session` are meant to be invoked fire-and-forget (§4.5 step
/// 19-20, §9 "Fire-and-forget"): callers spawn an independent task and do
/// not await the returned future inline on the dispatch path.
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Create the session if absent, patch its model if present.
    async fn ensure_session(
        &self,
        key: &SessionKey,
        model: &str,
        label: &str,
        timeout_ms: u64,
    ) -> Result<(), SessionError>;

    async fn send_to_session(
        &self,
        key: &SessionKey,
        message: &str,
        options: SendOptions,
    ) -> Result<(), SessionError>;

    /// Best-effort cleanup.
    async fn delete_session(&self, key: &SessionKey) -> Result<(), SessionError>;

    /// `None` means the session layer is unreachable — interpreted as "no
    /// information", never as "dead" (§4.4, §9).
    async fn list_live_session_keys(&self) -> Option<HashSet<SessionKey>>;
}
