// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! foreman-notify: the chat/notification adapter contract (C8, §4.8, §6.3)
//! plus a templated renderer that resolves the target channel and delivers
//! best-effort.

mod chat;
mod error;
mod events;
mod notifier;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use chat::{ChatAdapter, SendOptions};
pub use error::NotifyError;
pub use events::NotifyEvent;
pub use notifier::TemplatedNotifier;
