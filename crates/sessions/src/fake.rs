//! In-memory test double, mirroring the teacher's `FakeAgentAdapter`: a call
//! log plus a scriptable live-key set (including the "unknown" state).

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use foreman_core::project::SessionKey;
use parking_lot::Mutex;

use crate::{SendOptions, SessionError, SessionRegistry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCall {
    Ensure { key: SessionKey, model: String },
    Send { key: SessionKey, message: String },
    Delete { key: SessionKey },
}

#[derive(Default)]
struct State {
    live_keys: Option<HashSet<SessionKey>>,
    calls: Vec<SessionCall>,
}

#[derive(Clone)]
pub struct FakeSessionRegistry {
    state: Arc<Mutex<State>>,
}

impl Default for FakeSessionRegistry {
    fn default() -> Self {
        // A fresh fake defaults to an empty-but-known live set, not
        // "unknown" — tests that want the unknown state call
        // `set_unknown()` explicitly.
        Self { state: Arc::new(Mutex::new(State { live_keys: Some(HashSet::new()), calls: Vec::new() })) }
    }
}

impl FakeSessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_live_keys(&self, keys: impl IntoIterator<Item = SessionKey>) {
        self.state.lock().live_keys = Some(keys.into_iter().collect());
    }

    pub fn add_live_key(&self, key: impl Into<SessionKey>) {
        let mut state = self.state.lock();
        state.live_keys.get_or_insert_with(HashSet::new).insert(key.into());
    }

    /// Simulate the session layer being unreachable.
    pub fn set_unknown(&self) {
        self.state.lock().live_keys = None;
    }

    pub fn calls(&self) -> Vec<SessionCall> {
        self.state.lock().calls.clone()
    }
}

#[async_trait]
impl SessionRegistry for FakeSessionRegistry {
    async fn ensure_session(
        &self,
        key: &SessionKey,
        model: &str,
        _label: &str,
        _timeout_ms: u64,
    ) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        state.calls.push(SessionCall::Ensure { key: key.clone(), model: model.to_string() });
        state.live_keys.get_or_insert_with(HashSet::new).insert(key.clone());
        Ok(())
    }

    async fn send_to_session(
        &self,
        key: &SessionKey,
        message: &str,
        _options: SendOptions,
    ) -> Result<(), SessionError> {
        self.state
            .lock()
            .calls
            .push(SessionCall::Send { key: key.clone(), message: message.to_string() });
        Ok(())
    }

    async fn delete_session(&self, key: &SessionKey) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        state.calls.push(SessionCall::Delete { key: key.clone() });
        if let Some(keys) = state.live_keys.as_mut() {
            keys.remove(key);
        }
        Ok(())
    }

    async fn list_live_session_keys(&self) -> Option<HashSet<SessionKey>> {
        self.state.lock().live_keys.clone()
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
