//! WebSocket subscriptions to collection changes
//!
//! A [`RealtimeClient`] owns one connection. A background task reads the
//! socket, answers pings and hands subscription events to the callback
//! registered for their `uid`, in the order the socket yields them.

pub mod client;

pub use client::{RealtimeClient, SubscriptionCallback};
