//! Inbound dispatch for the camera channel.
//!
//! `LogObserver` is the provider's fixed handler: it writes every message to
//! the log and nothing else. `CameraRouter` decodes messages into typed
//! events and folds them into a shared [`CameraState`].

use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;

use crate::channel::{ChannelError, ChannelObserver, ChannelState};
use crate::state::CameraState;

/// Logs channel traffic and lifecycle.
pub struct LogObserver;

impl ChannelObserver for LogObserver {
    fn on_message(&self, message: &Value) {
        tracing::info!(payload = %message, "[ws] message");
    }

    fn on_open(&self) {
        tracing::info!("[ws] open");
    }

    fn on_close(&self) {
        tracing::info!("[ws] closed");
    }

    fn on_error(&self, error: &ChannelError) {
        tracing::warn!(%error, "[ws] error");
    }

    fn on_state(&self, from: ChannelState, to: ChannelState) {
        tracing::debug!(%from, %to, "[ws] state");
    }
}

/// Applies recognized camera events to a shared state.
#[derive(Clone, Default)]
pub struct CameraRouter {
    state: Arc<Mutex<CameraState>>,
}

impl CameraRouter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> CameraState {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl ChannelObserver for CameraRouter {
    fn on_message(&self, message: &Value) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.messages_seen += 1;
        match frames::event_from_value(message) {
            Some(event) => {
                if let frames::Event::Error { data } = &event {
                    tracing::warn!(error = %data, "camera service reported an error");
                }
                tracing::debug!(event = event.name(), "camera event");
                state.apply(&event);
            }
            None => {
                tracing::debug!("unrecognized camera message");
            }
        }
    }
}

#[cfg(test)]
#[path = "router_test.rs"]
mod tests;
