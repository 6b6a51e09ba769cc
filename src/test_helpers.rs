//! Shared fixtures for channel and provider tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

use crate::channel::{ChannelError, ChannelObserver, ChannelState};

/// One notification seen by a [`Recorder`].
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Note {
    Message(Value),
    Open,
    Close,
    Error(String),
    State(ChannelState, ChannelState),
}

/// Observer that records everything it is told.
#[derive(Default)]
pub(crate) struct Recorder {
    notes: Mutex<Vec<Note>>,
}

impl Recorder {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn notes(&self) -> Vec<Note> {
        self.notes.lock().expect("recorder mutex should lock").clone()
    }

    pub(crate) fn messages(&self) -> Vec<Value> {
        self.notes()
            .into_iter()
            .filter_map(|n| match n {
                Note::Message(v) => Some(v),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn states(&self) -> Vec<(ChannelState, ChannelState)> {
        self.notes()
            .into_iter()
            .filter_map(|n| match n {
                Note::State(from, to) => Some((from, to)),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn errors(&self) -> Vec<String> {
        self.notes()
            .into_iter()
            .filter_map(|n| match n {
                Note::Error(e) => Some(e),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn count(&self, note: &Note) -> usize {
        self.notes().iter().filter(|n| *n == note).count()
    }

    /// Poll until at least `count` messages were recorded.
    pub(crate) async fn wait_for_messages(&self, count: usize) -> Vec<Value> {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                let messages = self.messages();
                if messages.len() >= count {
                    return messages;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("timed out waiting for messages")
    }

    fn push(&self, note: Note) {
        self.notes.lock().expect("recorder mutex should lock").push(note);
    }
}

impl ChannelObserver for Recorder {
    fn on_message(&self, message: &Value) {
        self.push(Note::Message(message.clone()));
    }

    fn on_open(&self) {
        self.push(Note::Open);
    }

    fn on_close(&self) {
        self.push(Note::Close);
    }

    fn on_error(&self, error: &ChannelError) {
        self.push(Note::Error(error.to_string()));
    }

    fn on_state(&self, from: ChannelState, to: ChannelState) {
        self.push(Note::State(from, to));
    }
}

/// Single-connection WebSocket server for tests.
///
/// Sends `script` right after the handshake, then forwards every text frame
/// it receives to `received` until the client closes. `received` ends when
/// the connection is gone.
pub(crate) struct TestServer {
    pub(crate) url: String,
    pub(crate) received: mpsc::UnboundedReceiver<String>,
    _task: JoinHandle<()>,
}

impl TestServer {
    pub(crate) async fn spawn(script: Vec<String>) -> Self {
        Self::start(script, false).await
    }

    /// Like [`TestServer::spawn`], but closes the socket after the script.
    pub(crate) async fn spawn_then_hang_up(script: Vec<String>) -> Self {
        Self::start(script, true).await
    }

    async fn start(script: Vec<String>, hang_up: bool) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
        let addr = listener.local_addr().expect("listener addr");
        let (tx, received) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let Ok(mut ws) = tokio_tungstenite::accept_async(stream).await else {
                return;
            };
            for text in script {
                if ws.send(Message::Text(text.into())).await.is_err() {
                    return;
                }
            }
            if hang_up {
                let _ = ws.close(None).await;
                return;
            }
            while let Some(Ok(message)) = ws.next().await {
                match message {
                    Message::Text(text) => {
                        let _ = tx.send(text.as_str().to_owned());
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        });

        Self { url: format!("ws://{addr}/ws/camera"), received, _task: task }
    }

    /// Collect everything the client sent until the connection ended.
    pub(crate) async fn drain(mut self) -> Vec<String> {
        let mut out = Vec::new();
        let collect = async {
            while let Some(text) = self.received.recv().await {
                out.push(text);
            }
        };
        tokio::time::timeout(Duration::from_secs(2), collect)
            .await
            .expect("test server did not finish");
        out
    }
}

/// An address nothing is listening on.
pub(crate) async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("ws://{addr}/ws/camera")
}
