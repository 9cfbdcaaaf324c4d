use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use vellum_core::TokenStore;
use vellum_domain::{
    ClientConfig, ClientFrame, FrameStatus, Query, Result, ServerFrame, SubscriptionEvent,
    VellumError,
};

use crate::errors::InfraError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWrite = SplitSink<WsStream, Message>;
type WsRead = SplitStream<WsStream>;

/// Callback invoked for every event of one subscription.
pub type SubscriptionCallback = Arc<dyn Fn(SubscriptionEvent) + Send + Sync>;

type Subscriptions = Arc<Mutex<HashMap<String, SubscriptionCallback>>>;

/// Realtime connection with a map of subscription callbacks.
///
/// There is no reconnection: once the socket closes, `is_connected` turns
/// false and further subscribe calls fail.
pub struct RealtimeClient {
    outgoing: mpsc::UnboundedSender<Message>,
    subscriptions: Subscriptions,
    connected: Arc<AtomicBool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl RealtimeClient {
    /// Connect to the realtime endpoint derived from `config`.
    ///
    /// When the token store holds an access token (or a static token is
    /// configured) the connection is authenticated before this returns.
    ///
    /// # Errors
    /// `Timeout` if the handshake or auth reply takes longer than the
    /// configured timeout, `Auth` if the server rejects the token, `Realtime`
    /// or `Network` for socket failures.
    pub async fn connect(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let url = config.realtime_endpoint()?;
        let access_token = match tokens.access_token().await? {
            Some(token) => Some(token),
            None => config.static_token.clone(),
        };
        Self::connect_to(&url, access_token.as_deref(), config.timeout()).await
    }

    /// Connect to an explicit `ws://` or `wss://` URL.
    #[instrument(skip(access_token))]
    pub async fn connect_to(
        url: &str,
        access_token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let (socket, _response) = tokio::time::timeout(timeout, connect_async(url))
            .await
            .map_err(|_| VellumError::Timeout(timeout))?
            .map_err(|err| VellumError::from(InfraError::from(err)))?;

        let (mut write, mut read) = socket.split();

        if let Some(token) = access_token {
            send_frame(&mut write, &ClientFrame::Auth { access_token: token.to_string() }).await?;
            tokio::time::timeout(timeout, await_auth(&mut write, &mut read))
                .await
                .map_err(|_| VellumError::Timeout(timeout))??;
            debug!("realtime connection authenticated");
        }

        let (outgoing, outgoing_rx) = mpsc::unbounded_channel();
        let subscriptions: Subscriptions = Arc::new(Mutex::new(HashMap::new()));
        let connected = Arc::new(AtomicBool::new(true));

        let task = tokio::spawn(run_connection(
            write,
            read,
            outgoing_rx,
            subscriptions.clone(),
            connected.clone(),
        ));

        info!(%url, "realtime connected");
        Ok(Self { outgoing, subscriptions, connected, task: Mutex::new(Some(task)) })
    }

    /// Subscribe to changes in `collection`.
    ///
    /// Returns the generated subscription uid. The first event is usually an
    /// `init` event carrying the current result set.
    ///
    /// # Errors
    /// `InvalidInput` for an empty collection name, `Realtime` when the
    /// connection is closed.
    pub fn subscribe<F>(&self, collection: &str, query: Option<Query>, callback: F) -> Result<String>
    where
        F: Fn(SubscriptionEvent) + Send + Sync + 'static,
    {
        if collection.trim().is_empty() {
            return Err(VellumError::InvalidInput("Collection name must not be empty".into()));
        }

        let uid = Uuid::new_v4().to_string();
        self.subscriptions.lock().insert(uid.clone(), Arc::new(callback));

        let frame = ClientFrame::Subscribe {
            collection: collection.to_string(),
            query,
            uid: uid.clone(),
        };
        if let Err(err) = self.send(&frame) {
            self.subscriptions.lock().remove(&uid);
            return Err(err);
        }

        debug!(%uid, collection, "subscribed");
        Ok(uid)
    }

    /// Like [`subscribe`](Self::subscribe), delivering events through a
    /// channel instead of a callback.
    pub fn subscribe_channel(
        &self,
        collection: &str,
        query: Option<Query>,
    ) -> Result<(String, mpsc::UnboundedReceiver<SubscriptionEvent>)> {
        let (tx, rx) = mpsc::unbounded_channel();
        let uid = self.subscribe(collection, query, move |event| {
            let _ = tx.send(event);
        })?;
        Ok((uid, rx))
    }

    /// Stop receiving events for `uid`. Unknown uids are ignored.
    pub fn unsubscribe(&self, uid: &str) -> Result<()> {
        if self.subscriptions.lock().remove(uid).is_none() {
            debug!(uid, "unsubscribe for unknown uid ignored");
            return Ok(());
        }
        self.send(&ClientFrame::Unsubscribe { uid: uid.to_string() })
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.lock().len()
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst) && !self.outgoing.is_closed()
    }

    /// Send a close frame and wait for the connection task to finish.
    pub async fn close(&self) -> Result<()> {
        let _ = self.outgoing.send(Message::Close(None));

        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(err) = task.await {
                warn!(error = %err, "realtime task ended abnormally");
            }
        }

        self.subscriptions.lock().clear();
        self.connected.store(false, Ordering::SeqCst);
        info!("realtime connection closed");
        Ok(())
    }

    fn send(&self, frame: &ClientFrame) -> Result<()> {
        if !self.is_connected() {
            return Err(VellumError::Realtime("realtime connection is closed".into()));
        }
        let text = serde_json::to_string(frame)?;
        self.outgoing
            .send(Message::Text(text.into()))
            .map_err(|_| VellumError::Realtime("realtime connection is closed".into()))
    }
}

async fn send_frame(write: &mut WsWrite, frame: &ClientFrame) -> Result<()> {
    let text = serde_json::to_string(frame)?;
    write
        .send(Message::Text(text.into()))
        .await
        .map_err(|err| VellumError::from(InfraError::from(err)))
}

/// Read until the auth reply arrives, answering pings on the way.
async fn await_auth(write: &mut WsWrite, read: &mut WsRead) -> Result<()> {
    while let Some(message) = read.next().await {
        let message = message.map_err(|err| VellumError::from(InfraError::from(err)))?;
        let text = match message {
            Message::Text(text) => text,
            Message::Close(frame) => {
                return Err(VellumError::Realtime(format!(
                    "connection closed during authentication: {frame:?}"
                )))
            }
            _ => continue,
        };

        match serde_json::from_str::<ServerFrame>(text.as_str()) {
            Ok(ServerFrame::Auth { status: FrameStatus::Ok, .. }) => return Ok(()),
            Ok(ServerFrame::Auth { status: FrameStatus::Error, error }) => {
                let reason = error.map_or_else(|| "authentication failed".to_string(), |e| e.to_string());
                return Err(VellumError::Auth(reason));
            }
            Ok(ServerFrame::Ping) => send_frame(write, &ClientFrame::Pong).await?,
            Ok(other) => debug!(frame = ?other, "frame before auth reply ignored"),
            Err(err) => warn!(error = %err, "unparsable frame before auth reply"),
        }
    }

    Err(VellumError::Realtime("connection closed before authentication completed".into()))
}

async fn run_connection(
    mut write: WsWrite,
    mut read: WsRead,
    mut outgoing: mpsc::UnboundedReceiver<Message>,
    subscriptions: Subscriptions,
    connected: Arc<AtomicBool>,
) {
    loop {
        tokio::select! {
            message = outgoing.recv() => {
                let Some(message) = message else {
                    let _ = write.send(Message::Close(None)).await;
                    break;
                };
                let closing = matches!(message, Message::Close(_));
                if let Err(err) = write.send(message).await {
                    warn!(error = %err, "failed to write realtime frame");
                    break;
                }
                if closing {
                    break;
                }
            }

            incoming = read.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = handle_frame(text.as_str(), &subscriptions) {
                            if let Err(err) = send_frame(&mut write, &reply).await {
                                warn!(error = %err, "failed to answer realtime frame");
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        info!(frame = ?frame, "realtime connection closed by server");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!(error = %err, "realtime socket error");
                        break;
                    }
                    None => {
                        debug!("realtime stream ended");
                        break;
                    }
                }
            }
        }
    }

    connected.store(false, Ordering::SeqCst);
}

/// Dispatch one text frame. Returns a frame to send back, if any.
fn handle_frame(text: &str, subscriptions: &Subscriptions) -> Option<ClientFrame> {
    let frame = match serde_json::from_str::<ServerFrame>(text) {
        Ok(frame) => frame,
        Err(err) => {
            warn!(error = %err, "dropping unparsable realtime frame");
            return None;
        }
    };

    match frame {
        ServerFrame::Ping => return Some(ClientFrame::Pong),
        ServerFrame::Subscription { uid: Some(uid), event, data } => {
            // Clone out of the lock so callbacks may subscribe or unsubscribe.
            let callback = subscriptions.lock().get(&uid).cloned();
            match callback {
                Some(callback) => callback(SubscriptionEvent { uid, event, data }),
                None => debug!(%uid, "event for unknown subscription dropped"),
            }
        }
        ServerFrame::Subscription { uid: None, event, .. } => {
            debug!(%event, "subscription event without uid dropped");
        }
        ServerFrame::Subscribe { uid, status: FrameStatus::Error, error } => {
            if let Some(uid) = &uid {
                subscriptions.lock().remove(uid);
            }
            warn!(uid = ?uid, error = ?error.map(|e| e.to_string()), "subscription rejected");
        }
        ServerFrame::Auth { status: FrameStatus::Error, error } => {
            warn!(error = ?error.map(|e| e.to_string()), "realtime authentication error");
        }
        other => debug!(frame = ?other, "realtime frame ignored"),
    }

    None
}
