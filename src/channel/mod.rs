//! Real-time channel to the camera service.
//!
//! A `ChannelHandle` owns one WebSocket connection and the task that drives
//! it. The task is the only place the connection state changes after
//! `connect` has moved it to `Connecting`. Outbound payloads are queued to
//! the task; inbound text frames are parsed as one JSON document each and
//! handed to observers sequentially, so delivery order equals transport
//! order.
//!
//! TRADE-OFFS
//! ==========
//! Sends outside `Open`, or after `close`, are dropped and reported, never
//! buffered. Sends accepted before `close` are written before the close
//! frame. There is
//! no reconnect: a dropped connection ends in `Closed` and the owner decides
//! what to do next.

mod observer;
mod state;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{Notify, mpsc, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::http::Uri;
use uuid::Uuid;

pub use observer::{ChannelObserver, OnMessage, Subscription};
pub use state::ChannelState;

use observer::Dispatcher;
use state::advance;

/// Upper bound on flushing queued frames and the close frame during shutdown.
const CLOSE_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

// =============================================================================
// ERRORS
// =============================================================================

/// Connection-level failure, reported through [`ChannelObserver::on_error`].
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("invalid websocket endpoint `{endpoint}`: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("websocket transport failed: {0}")]
    Transport(Box<tokio_tungstenite::tungstenite::Error>),
    /// An inbound text frame was not a JSON document. The channel stays open.
    #[error("inbound message is not JSON: {0}")]
    Malformed(#[source] serde_json::Error),
}

/// Returned by `send_json` when the payload was not queued.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("channel is {state}, message dropped")]
    NotOpen { state: ChannelState },
    /// `close` was requested; the channel may still read `Open` until the
    /// connection task winds down.
    #[error("channel is closing, message dropped")]
    Closing,
    #[error("payload could not be serialized: {0}")]
    Encode(#[source] serde_json::Error),
}

// =============================================================================
// OPTIONS
// =============================================================================

/// Observers registered before the connection task starts, so they see
/// every notification including `Idle -> Connecting`.
#[derive(Default)]
pub struct ChannelOptions {
    observers: Vec<Arc<dyn ChannelObserver>>,
}

impl ChannelOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn observer(mut self, observer: Arc<dyn ChannelObserver>) -> Self {
        self.observers.push(observer);
        self
    }
}

// =============================================================================
// HANDLE
// =============================================================================

/// State shared between the handle, its senders and the connection task.
pub(crate) struct Shared {
    id: Uuid,
    state: watch::Sender<ChannelState>,
    outbound: mpsc::UnboundedSender<String>,
    dispatcher: Arc<Dispatcher>,
    shutdown: Notify,
    close_requested: AtomicBool,
}

impl Shared {
    fn transition(&self, next: ChannelState) {
        if let Some(from) = advance(&self.state, next) {
            tracing::debug!(channel = %self.id, %from, to = %next, "channel state changed");
            self.dispatcher.state(from, next);
        }
    }

    pub(crate) fn state(&self) -> ChannelState {
        *self.state.borrow()
    }

    pub(crate) fn send_json<T: Serialize + ?Sized>(&self, payload: &T) -> Result<(), SendError> {
        let state = self.state();
        if state != ChannelState::Open {
            tracing::warn!(channel = %self.id, %state, "send while not open, dropping message");
            return Err(SendError::NotOpen { state });
        }
        if self.close_requested.load(Ordering::Acquire) {
            tracing::warn!(channel = %self.id, "send after close requested, dropping message");
            return Err(SendError::Closing);
        }
        let text = serde_json::to_string(payload).map_err(SendError::Encode)?;
        // The receiver is closed once shutdown starts; anything queued before
        // that is flushed ahead of the close frame.
        self.outbound
            .send(text)
            .map_err(|_| SendError::NotOpen { state: ChannelState::Closed })
    }
}

/// Owner of one real-time connection.
///
/// Dropping the handle closes the connection.
pub struct ChannelHandle {
    shared: Arc<Shared>,
}

impl ChannelHandle {
    /// Start connecting to `endpoint` and return immediately.
    ///
    /// Never fails: a malformed endpoint or a refused connection shows up as
    /// `Erroring -> Closed` plus an `on_error` notification.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    #[must_use]
    pub fn connect(endpoint: &str, options: ChannelOptions) -> Self {
        let (state, _) = watch::channel(ChannelState::Idle);
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let dispatcher = Arc::new(Dispatcher::default());
        for observer in options.observers {
            dispatcher.add(observer);
        }

        let shared = Arc::new(Shared {
            id: Uuid::new_v4(),
            state,
            outbound,
            dispatcher,
            shutdown: Notify::new(),
            close_requested: AtomicBool::new(false),
        });

        tracing::info!(channel = %shared.id, %endpoint, "channel connecting");
        shared.transition(ChannelState::Connecting);

        let endpoint = endpoint.to_owned();
        tokio::spawn(run(Arc::clone(&shared), endpoint, outbound_rx));

        Self { shared }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    #[must_use]
    pub fn state(&self) -> ChannelState {
        self.shared.state()
    }

    /// Serialize `payload` and queue it as one text frame.
    ///
    /// # Errors
    ///
    /// [`SendError::NotOpen`] when the channel is not `Open` and
    /// [`SendError::Closing`] after [`close`](Self::close) (nothing is
    /// written in either case), [`SendError::Encode`] when serialization
    /// fails.
    pub fn send_json<T: Serialize + ?Sized>(&self, payload: &T) -> Result<(), SendError> {
        self.shared.send_json(payload)
    }

    /// Register another observer. Refused (inactive subscription) once the
    /// channel has closed.
    pub fn subscribe(&self, observer: Arc<dyn ChannelObserver>) -> Subscription {
        let id = self.shared.dispatcher.add(observer);
        Subscription::new(id, &self.shared.dispatcher)
    }

    /// Request shutdown. Idempotent and non-blocking.
    pub fn close(&self) {
        if self.shared.close_requested.swap(true, Ordering::AcqRel) {
            return;
        }
        tracing::debug!(channel = %self.shared.id, "channel close requested");
        self.shared.shutdown.notify_one();
    }

    /// Wait until the channel is `Open`.
    ///
    /// # Errors
    ///
    /// Returns the state the channel ended in if it never opened.
    pub async fn opened(&self) -> Result<(), ChannelState> {
        wait_open(&self.shared).await
    }

    /// Wait until the channel reaches `Closed`.
    pub async fn closed(&self) {
        wait_closed(&self.shared).await;
    }

    pub(crate) fn shared(&self) -> Arc<Shared> {
        Arc::clone(&self.shared)
    }
}

impl Drop for ChannelHandle {
    fn drop(&mut self) {
        self.close();
    }
}

pub(crate) async fn wait_open(shared: &Shared) -> Result<(), ChannelState> {
    let mut rx = shared.state.subscribe();
    let state = rx
        .wait_for(|s| *s == ChannelState::Open || s.is_terminal() || *s == ChannelState::Erroring)
        .await
        .map_or(ChannelState::Closed, |s| *s);
    if state == ChannelState::Open { Ok(()) } else { Err(state) }
}

pub(crate) async fn wait_closed(shared: &Shared) {
    let mut rx = shared.state.subscribe();
    let _ = rx.wait_for(|s| s.is_terminal()).await;
}

// =============================================================================
// CONNECTION TASK
// =============================================================================

/// Check that `endpoint` is a `ws://` or `wss://` URI with a host.
///
/// # Errors
///
/// Returns [`ChannelError::InvalidEndpoint`] describing the problem.
pub fn validate_endpoint(endpoint: &str) -> Result<Uri, ChannelError> {
    let invalid = |reason: &str| ChannelError::InvalidEndpoint {
        endpoint: endpoint.to_owned(),
        reason: reason.to_owned(),
    };
    let uri: Uri = endpoint.parse().map_err(|_| invalid("not a URI"))?;
    match uri.scheme_str() {
        Some("ws" | "wss") => {}
        Some(_) => return Err(invalid("scheme must be ws or wss")),
        None => return Err(invalid("missing scheme")),
    }
    if uri.host().is_none_or(str::is_empty) {
        return Err(invalid("missing host"));
    }
    Ok(uri)
}

enum Ending {
    Clean,
    Failed(ChannelError),
}

async fn run(shared: Arc<Shared>, endpoint: String, mut outbound_rx: mpsc::UnboundedReceiver<String>) {
    let ending = drive(&shared, &endpoint, &mut outbound_rx).await;
    outbound_rx.close();

    if let Ending::Failed(error) = ending {
        tracing::warn!(channel = %shared.id, error = %error, "channel failed");
        shared.transition(ChannelState::Erroring);
        shared.dispatcher.error(&error);
    }
    shared.transition(ChannelState::Closed);
    tracing::info!(channel = %shared.id, "channel closed");
    shared.dispatcher.close_and_release();
}

async fn drive(
    shared: &Shared,
    endpoint: &str,
    outbound_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Ending {
    if let Err(error) = validate_endpoint(endpoint) {
        return Ending::Failed(error);
    }

    let connected = tokio::select! {
        biased;
        () = shared.shutdown.notified() => return Ending::Clean,
        result = connect_async(endpoint) => result,
    };
    let stream = match connected {
        Ok((stream, _)) => stream,
        Err(error) => return Ending::Failed(ChannelError::Transport(Box::new(error))),
    };

    shared.transition(ChannelState::Open);
    tracing::info!(channel = %shared.id, "channel open");
    shared.dispatcher.open();

    let (mut ws_write, mut ws_read) = stream.split();

    loop {
        tokio::select! {
            biased;

            () = shared.shutdown.notified() => {
                outbound_rx.close();
                let flush = async {
                    while let Ok(text) = outbound_rx.try_recv() {
                        if ws_write.send(Message::Text(text.into())).await.is_err() {
                            return;
                        }
                    }
                    let _ = ws_write.close().await;
                };
                let _ = tokio::time::timeout(CLOSE_FLUSH_TIMEOUT, flush).await;
                return Ending::Clean;
            }

            Some(text) = outbound_rx.recv() => {
                if let Err(error) = ws_write.send(Message::Text(text.into())).await {
                    return Ending::Failed(ChannelError::Transport(Box::new(error)));
                }
            }

            message = ws_read.next() => match message {
                Some(Ok(Message::Text(text))) => dispatch_text(shared, text.as_str()),
                Some(Ok(Message::Close(_))) | None => return Ending::Clean,
                Some(Ok(_)) => {}
                Some(Err(error)) => {
                    return Ending::Failed(ChannelError::Transport(Box::new(error)));
                }
            },
        }
    }
}

fn dispatch_text(shared: &Shared, text: &str) {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => shared.dispatcher.message(&value),
        Err(error) => {
            tracing::warn!(channel = %shared.id, error = %error, "dropping non-JSON message");
            shared.dispatcher.error(&ChannelError::Malformed(error));
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
