#![allow(dead_code)]

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::protocol::Message;

pub const VALID_TOKEN: &str = "valid-access-token";

/// Single-connection realtime server for tests.
///
/// Every JSON frame the client sends is forwarded to `received`; frames
/// pushed into `push` are sent to the client. Auth frames are answered
/// automatically: [`VALID_TOKEN`] is accepted, anything else rejected.
pub struct MockRealtimeServer {
    pub url: String,
    pub received: mpsc::UnboundedReceiver<Value>,
    pub push: mpsc::UnboundedSender<Value>,
    handle: JoinHandle<()>,
}

impl MockRealtimeServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");
        let (received_tx, received) = mpsc::unbounded_channel();
        let (push, mut push_rx) = mpsc::unbounded_channel::<Value>();

        let handle = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept connection");
            let socket = accept_async(stream).await.expect("websocket handshake");
            let (mut write, mut read) = socket.split();

            loop {
                tokio::select! {
                    outgoing = push_rx.recv() => {
                        let Some(frame) = outgoing else { break };
                        if write.send(Message::Text(frame.to_string().into())).await.is_err() {
                            break;
                        }
                    }
                    incoming = read.next() => {
                        let text = match incoming {
                            Some(Ok(Message::Text(text))) => text.to_string(),
                            Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                            Some(Ok(_)) => continue,
                        };
                        let frame: Value = serde_json::from_str(&text).expect("client sends JSON");

                        if frame["type"] == "auth" {
                            let reply = if frame["access_token"] == VALID_TOKEN {
                                json!({"type": "auth", "status": "ok"})
                            } else {
                                json!({
                                    "type": "auth",
                                    "status": "error",
                                    "error": {"code": "TOKEN_EXPIRED", "message": "Token expired."}
                                })
                            };
                            let _ = write.send(Message::Text(reply.to_string().into())).await;
                        }

                        if received_tx.send(frame).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Self { url: format!("ws://{addr}/websocket"), received, push, handle }
    }

    /// Next frame received from the client, failing the test after a second.
    pub async fn next_frame(&mut self) -> Value {
        tokio::time::timeout(Duration::from_secs(1), self.received.recv())
            .await
            .expect("client frame within timeout")
            .expect("server still running")
    }

    pub fn send(&self, frame: Value) {
        self.push.send(frame).expect("server still running");
    }

    pub async fn stop(self) {
        self.handle.abort();
    }
}

/// Receive with a timeout so a missing event fails instead of hanging.
pub async fn recv_within<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> T {
    tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("event within timeout")
        .expect("channel open")
}
