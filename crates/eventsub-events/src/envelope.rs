//! Outer frame metadata and the message-type discriminant.
//!
//! Every frame carries a `metadata` object. [`Envelope`] decodes only that
//! object and keeps `payload` as an undecoded slice of the frame, so routing
//! can be decided before committing to a full decode.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// Metadata present on every frame.
///
/// `message_type` stays a plain string so that frames with an unrecognized
/// discriminant still decode this far and can be reported by name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageMetadata {
    /// Unique message id (used for de-duplication by applications).
    #[serde(default)]
    pub message_id: String,
    /// Discriminant, e.g. `"session_welcome"`.
    pub message_type: String,
    /// When the server sent the message.
    pub message_timestamp: DateTime<Utc>,
    /// Subscription type, on notification and revocation frames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_type: Option<String>,
    /// Subscription version, on notification and revocation frames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_version: Option<String>,
}

impl MessageMetadata {
    /// The discriminant parsed into a known [`MessageType`], if it is one.
    pub fn known_type(&self) -> Option<MessageType> {
        self.message_type.parse().ok()
    }
}

/// A frame decoded as far as its metadata.
#[derive(Debug, Deserialize)]
pub struct Envelope<'a> {
    /// Frame metadata.
    pub metadata: MessageMetadata,
    /// Kind-specific payload, left undecoded.
    #[serde(borrow, default)]
    pub payload: Option<&'a RawValue>,
}

/// Outer message discriminant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    /// First frame on every connection; carries the session.
    #[serde(rename = "session_welcome")]
    SessionWelcome,
    /// Payload-less liveness signal.
    #[serde(rename = "session_keepalive")]
    SessionKeepalive,
    /// A subscribed event.
    #[serde(rename = "notification")]
    Notification,
    /// The server asks the client to move to a new address.
    #[serde(rename = "session_reconnect")]
    SessionReconnect,
    /// A subscription was revoked.
    #[serde(rename = "revocation")]
    Revocation,
}

/// All message types in wire order of a typical session.
pub const ALL_MESSAGE_TYPES: [MessageType; 5] = [
    MessageType::SessionWelcome,
    MessageType::SessionKeepalive,
    MessageType::Notification,
    MessageType::SessionReconnect,
    MessageType::Revocation,
];

impl MessageType {
    /// Canonical wire string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SessionWelcome => "session_welcome",
            Self::SessionKeepalive => "session_keepalive",
            Self::Notification => "notification",
            Self::SessionReconnect => "session_reconnect",
            Self::Revocation => "revocation",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_MESSAGE_TYPES
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown message type: {s}"))
    }
}
