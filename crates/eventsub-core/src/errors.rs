//! Error taxonomy for the eventsub client.
//!
//! Two enums cover every failure the client can observe:
//!
//! - [`TransportError`]: failures of the duplex connection itself (dial,
//!   read, write, close, keepalive expiry)
//! - [`ClientError`]: everything the client reports, including wrapped
//!   transport failures, per-frame decode failures, unknown discriminants,
//!   reconnect handoff failures, and handler faults
//!
//! Only [`ClientError::Configuration`] and [`ClientError::Transport`] are ever
//! returned from `connect`. Every other variant goes to the error sink.

use thiserror::Error;

// ── Error code constants ────────────────────────────────────────────

/// Client was misconfigured (e.g. no welcome handler registered).
pub const CONFIGURATION_ERROR: &str = "CONFIGURATION_ERROR";
/// Unrecoverable transport failure.
pub const TRANSPORT_ERROR: &str = "TRANSPORT_ERROR";
/// A frame or event payload could not be decoded.
pub const DECODE_ERROR: &str = "DECODE_ERROR";
/// Outer `metadata.message_type` not present in the dispatch table.
pub const UNKNOWN_MESSAGE_TYPE: &str = "UNKNOWN_MESSAGE_TYPE";
/// Notification `subscription.type` not present in the routing table.
pub const UNKNOWN_EVENT_TYPE: &str = "UNKNOWN_EVENT_TYPE";
/// Reconnect handoff aborted; the previous connection stays active.
pub const RECONNECT_FAILURE: &str = "RECONNECT_FAILURE";
/// An application handler panicked.
pub const HANDLER_PANICKED: &str = "HANDLER_PANICKED";
/// An application handler ran past its deadline (inline dispatch only).
pub const HANDLER_TIMEOUT: &str = "HANDLER_TIMEOUT";

/// Websocket close code for a normal closure.
pub const NORMAL_CLOSURE: u16 = 1000;

/// Failure of the underlying duplex connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Opening the connection failed.
    #[error("could not dial {address}: {message}")]
    Dial {
        /// Address that was dialed.
        address: String,
        /// Underlying failure.
        message: String,
    },

    /// The connection was closed, by either side.
    #[error("connection closed (code {code:?}): {reason}")]
    Closed {
        /// Close code, if the peer sent one.
        code: Option<u16>,
        /// Close reason text.
        reason: String,
    },

    /// Reading a frame failed.
    #[error("read failed: {0}")]
    Read(String),

    /// Writing a frame (including close frames) failed.
    #[error("write failed: {0}")]
    Write(String),

    /// An operation did not complete in time.
    #[error("timed out after {timeout_ms}ms while {context}")]
    Timeout {
        /// What was being waited on.
        context: String,
        /// Deadline that elapsed.
        timeout_ms: u64,
    },

    /// The server went silent for longer than its advertised keepalive.
    #[error("no message received within keepalive window of {timeout_ms}ms")]
    KeepaliveExpired {
        /// Keepalive window including grace.
        timeout_ms: u64,
    },
}

impl TransportError {
    /// Whether this is a clean close with code 1000.
    pub fn is_normal_closure(&self) -> bool {
        matches!(self, Self::Closed { code: Some(NORMAL_CLOSURE), .. })
    }
}

/// Every condition the client reports.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The client cannot start as configured.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The transport failed and could not be recovered.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A frame or event could not be decoded.
    #[error("could not decode {context}: {source}")]
    Decode {
        /// What was being decoded (e.g. `"envelope"`, `"channel.follow event"`).
        context: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// No decoder is registered for the outer message type.
    #[error("unknown message type '{message_type}'")]
    UnknownMessageType {
        /// The unrecognized `metadata.message_type`.
        message_type: String,
    },

    /// No route is registered for the notification's subscription type.
    #[error("unknown event type '{subscription_type}'")]
    UnknownEventType {
        /// The unrecognized `subscription.type`.
        subscription_type: String,
    },

    /// The reconnect handoff was aborted.
    #[error("reconnect to {address} failed: {reason}")]
    Reconnect {
        /// Address the handoff tried to reach.
        address: String,
        /// Why it was aborted.
        reason: String,
    },

    /// A handler panicked while running.
    #[error("{kind} handler panicked: {message}")]
    HandlerPanicked {
        /// Message or event kind the handler was registered for.
        kind: String,
        /// Panic payload, when it was a string.
        message: String,
    },

    /// A handler did not finish within the inline dispatch deadline.
    #[error("{kind} handler exceeded {timeout_ms}ms")]
    HandlerTimedOut {
        /// Message or event kind the handler was registered for.
        kind: String,
        /// Deadline that elapsed.
        timeout_ms: u64,
    },
}

impl ClientError {
    /// Build a decode error with context.
    pub fn decode(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            context: context.into(),
            source,
        }
    }

    /// Machine-readable error code for this variant.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => CONFIGURATION_ERROR,
            Self::Transport(_) => TRANSPORT_ERROR,
            Self::Decode { .. } => DECODE_ERROR,
            Self::UnknownMessageType { .. } => UNKNOWN_MESSAGE_TYPE,
            Self::UnknownEventType { .. } => UNKNOWN_EVENT_TYPE,
            Self::Reconnect { .. } => RECONNECT_FAILURE,
            Self::HandlerPanicked { .. } => HANDLER_PANICKED,
            Self::HandlerTimedOut { .. } => HANDLER_TIMEOUT,
        }
    }

    /// Whether this error ends the connection.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Transport(_))
    }
}

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{bad").unwrap_err()
    }

    #[test]
    fn codes_are_distinct() {
        let errors = [
            ClientError::Configuration("x".into()),
            ClientError::Transport(TransportError::Read("x".into())),
            ClientError::decode("envelope", json_error()),
            ClientError::UnknownMessageType {
                message_type: "x".into(),
            },
            ClientError::UnknownEventType {
                subscription_type: "x".into(),
            },
            ClientError::Reconnect {
                address: "ws://x".into(),
                reason: "x".into(),
            },
            ClientError::HandlerPanicked {
                kind: "x".into(),
                message: "x".into(),
            },
            ClientError::HandlerTimedOut {
                kind: "x".into(),
                timeout_ms: 1,
            },
        ];
        let mut codes: Vec<&str> = errors.iter().map(ClientError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn only_configuration_and_transport_are_fatal() {
        assert!(ClientError::Configuration("no welcome".into()).is_fatal());
        assert!(ClientError::Transport(TransportError::Read("eof".into())).is_fatal());
        assert!(!ClientError::decode("envelope", json_error()).is_fatal());
        assert!(
            !ClientError::UnknownMessageType {
                message_type: "session_mystery".into()
            }
            .is_fatal()
        );
        assert!(
            !ClientError::Reconnect {
                address: "ws://new".into(),
                reason: "not welcome".into()
            }
            .is_fatal()
        );
    }

    #[test]
    fn unknown_message_type_names_the_type() {
        let err = ClientError::UnknownMessageType {
            message_type: "session_mystery".into(),
        };
        assert_eq!(err.to_string(), "unknown message type 'session_mystery'");
        assert_eq!(err.code(), UNKNOWN_MESSAGE_TYPE);
    }

    #[test]
    fn decode_error_keeps_source() {
        let err = ClientError::decode("envelope", json_error());
        assert!(err.to_string().starts_with("could not decode envelope"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn transport_error_converts() {
        let err: ClientError = TransportError::Closed {
            code: Some(4001),
            reason: "client sent inbound traffic".into(),
        }
        .into();
        assert_eq!(err.code(), TRANSPORT_ERROR);
        assert!(err.to_string().contains("4001"));
    }

    #[test]
    fn normal_closure_detection() {
        let normal = TransportError::Closed {
            code: Some(NORMAL_CLOSURE),
            reason: "bye".into(),
        };
        let abnormal = TransportError::Closed {
            code: Some(4002),
            reason: "failed ping-pong".into(),
        };
        let no_code = TransportError::Closed {
            code: None,
            reason: String::new(),
        };
        assert!(normal.is_normal_closure());
        assert!(!abnormal.is_normal_closure());
        assert!(!no_code.is_normal_closure());
        assert!(!TransportError::Read("reset".into()).is_normal_closure());
    }

    #[test]
    fn keepalive_display() {
        let err = TransportError::KeepaliveExpired { timeout_ms: 15_000 };
        assert_eq!(
            err.to_string(),
            "no message received within keepalive window of 15000ms"
        );
    }
}
