//! The five outer message variants and their payloads.
//!
//! Each variant is a full-frame struct (`metadata` + `payload`) so that one
//! `serde_json::from_str` per frame produces it. [`Message`] is the closed
//! union the dispatcher hands to handlers.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::envelope::{MessageMetadata, MessageType};

// ── Shared payload types ────────────────────────────────────────────

/// A websocket session as described by welcome and reconnect frames.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Session id; subscriptions are created against it.
    pub id: String,
    /// `connected` on welcome, `reconnecting` on reconnect.
    #[serde(default)]
    pub status: String,
    /// When the session was established.
    #[serde(default)]
    pub connected_at: Option<DateTime<Utc>>,
    /// Seconds the server may stay silent before the client should assume
    /// the connection is dead. Null on reconnect frames.
    #[serde(default)]
    pub keepalive_timeout_seconds: Option<u64>,
    /// Where to reconnect; only set on reconnect frames.
    #[serde(default)]
    pub reconnect_url: Option<String>,
}

/// `payload` of welcome and reconnect frames.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPayload {
    /// The session.
    pub session: Session,
}

/// How a subscription delivers events.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionTransport {
    /// `websocket`, `webhook`, or `conduit`.
    pub method: String,
    /// Websocket session id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Webhook callback URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback: Option<String>,
    /// Conduit id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conduit_id: Option<String>,
}

/// Subscription descriptor carried by notification and revocation frames.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// Subscription id.
    pub id: String,
    /// `enabled`, or the revocation reason.
    #[serde(default)]
    pub status: String,
    /// Subscription type as sent, e.g. `"channel.follow"`.
    #[serde(rename = "type")]
    pub subscription_type: String,
    /// Subscription version.
    #[serde(default)]
    pub version: String,
    /// Cost against the client's subscription budget.
    #[serde(default)]
    pub cost: u64,
    /// Condition the subscription was created with.
    #[serde(default)]
    pub condition: BTreeMap<String, serde_json::Value>,
    /// Delivery transport.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<SubscriptionTransport>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

// ── Message variants ────────────────────────────────────────────────

/// `session_welcome`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WelcomeMessage {
    /// Frame metadata.
    pub metadata: MessageMetadata,
    /// Session.
    pub payload: SessionPayload,
}

impl WelcomeMessage {
    /// The new session id.
    pub fn session_id(&self) -> &str {
        &self.payload.session.id
    }
}

/// `session_keepalive`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeepAliveMessage {
    /// Frame metadata.
    pub metadata: MessageMetadata,
}

/// `payload` of a notification.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NotificationPayload {
    /// Subscription the event belongs to.
    pub subscription: Subscription,
    /// Event body, kept as the exact bytes received.
    #[serde(alias = "events")]
    pub event: Box<RawValue>,
}

/// `notification`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NotificationMessage {
    /// Frame metadata.
    pub metadata: MessageMetadata,
    /// Subscription and event.
    pub payload: NotificationPayload,
}

impl NotificationMessage {
    /// The undecoded event JSON.
    pub fn raw_event(&self) -> &str {
        self.payload.event.get()
    }

    /// The subscription type string as sent.
    pub fn subscription_type(&self) -> &str {
        &self.payload.subscription.subscription_type
    }
}

/// `session_reconnect`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReconnectMessage {
    /// Frame metadata.
    pub metadata: MessageMetadata,
    /// Session, with `reconnect_url` set.
    pub payload: SessionPayload,
}

impl ReconnectMessage {
    /// Address to move to, if the server supplied one.
    pub fn reconnect_url(&self) -> Option<&str> {
        self.payload.session.reconnect_url.as_deref()
    }
}

/// `payload` of a revocation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RevocationPayload {
    /// The revoked subscription; `status` carries the reason.
    pub subscription: Subscription,
}

/// `revocation`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevocationMessage {
    /// Frame metadata.
    pub metadata: MessageMetadata,
    /// Revoked subscription.
    pub payload: RevocationPayload,
}

impl RevocationMessage {
    /// Why the subscription was revoked (e.g. `"authorization_revoked"`).
    pub fn reason(&self) -> &str {
        &self.payload.subscription.status
    }
}

// ── Message union ───────────────────────────────────────────────────

/// A fully decoded frame.
#[derive(Clone, Debug)]
pub enum Message {
    /// `session_welcome`
    Welcome(WelcomeMessage),
    /// `session_keepalive`
    KeepAlive(KeepAliveMessage),
    /// `notification`
    Notification(NotificationMessage),
    /// `session_reconnect`
    Reconnect(ReconnectMessage),
    /// `revocation`
    Revocation(RevocationMessage),
}

impl Message {
    /// Discriminant of this message.
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::Welcome(_) => MessageType::SessionWelcome,
            Self::KeepAlive(_) => MessageType::SessionKeepalive,
            Self::Notification(_) => MessageType::Notification,
            Self::Reconnect(_) => MessageType::SessionReconnect,
            Self::Revocation(_) => MessageType::Revocation,
        }
    }

    /// Frame metadata.
    pub fn metadata(&self) -> &MessageMetadata {
        match self {
            Self::Welcome(m) => &m.metadata,
            Self::KeepAlive(m) => &m.metadata,
            Self::Notification(m) => &m.metadata,
            Self::Reconnect(m) => &m.metadata,
            Self::Revocation(m) => &m.metadata,
        }
    }
}

/// A message variant bound to one [`MessageType`].
///
/// Lets registration and decoding be written once, generically, over the five
/// variants.
pub trait TypedMessage: Sized + Send + 'static {
    /// The discriminant this variant decodes from.
    const TYPE: MessageType;

    /// Unwrap the variant if `message` is of type [`Self::TYPE`].
    fn from_message(message: Message) -> Option<Self>;

    /// Wrap the variant in [`Message`].
    fn into_message(self) -> Message;
}

macro_rules! typed_message {
    ($ty:ty, $variant:ident, $mt:ident) => {
        impl TypedMessage for $ty {
            const TYPE: MessageType = MessageType::$mt;

            fn from_message(message: Message) -> Option<Self> {
                match message {
                    Message::$variant(m) => Some(m),
                    _ => None,
                }
            }

            fn into_message(self) -> Message {
                Message::$variant(self)
            }
        }

        impl From<$ty> for Message {
            fn from(m: $ty) -> Self {
                Message::$variant(m)
            }
        }
    };
}

typed_message!(WelcomeMessage, Welcome, SessionWelcome);
typed_message!(KeepAliveMessage, KeepAlive, SessionKeepalive);
typed_message!(NotificationMessage, Notification, Notification);
typed_message!(ReconnectMessage, Reconnect, SessionReconnect);
typed_message!(RevocationMessage, Revocation, Revocation);
