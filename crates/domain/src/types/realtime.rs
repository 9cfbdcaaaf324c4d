//! Realtime subscription frames
//!
//! Every frame is a JSON object with a `type` discriminator. Subscription
//! traffic is correlated by a client-chosen `uid`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::impl_wire_str_conversions;
use crate::query::Query;

/// Kind of change carried by a subscription event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RealtimeEventKind {
    /// Initial result set sent right after subscribing.
    Init,
    Create,
    Update,
    Delete,
}

impl_wire_str_conversions!(RealtimeEventKind {
    Init => "init",
    Create => "create",
    Update => "update",
    Delete => "delete",
});

/// Outcome flag on auth and subscribe acknowledgements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameStatus {
    Ok,
    Error,
}

impl_wire_str_conversions!(FrameStatus {
    Ok => "ok",
    Error => "error",
});

/// Frames sent by the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientFrame {
    Auth {
        access_token: String,
    },
    Subscribe {
        collection: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        query: Option<Query>,
        uid: String,
    },
    Unsubscribe {
        uid: String,
    },
    Ping,
    Pong,
}

/// Frames received from the server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerFrame {
    Auth {
        status: FrameStatus,
        #[serde(default)]
        error: Option<FrameError>,
    },
    Subscription {
        #[serde(default)]
        uid: Option<String>,
        event: RealtimeEventKind,
        #[serde(default)]
        data: Value,
    },
    /// Acknowledgement or failure of a subscribe/unsubscribe request.
    Subscribe {
        #[serde(default)]
        uid: Option<String>,
        status: FrameStatus,
        #[serde(default)]
        error: Option<FrameError>,
    },
    Ping,
    Pong,
    #[serde(other)]
    Unknown,
}

/// Error attached to a failed auth or subscribe frame.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FrameError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} ({code})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// An event delivered to a subscription callback.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionEvent {
    pub uid: String,
    pub event: RealtimeEventKind,
    /// Affected records for init/create/update, affected keys for delete.
    pub data: Value,
}
