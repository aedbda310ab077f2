//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and `#[serde(default)]`,
//! so a settings file only needs the fields it changes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Production eventsub websocket endpoint.
pub const DEFAULT_ADDRESS: &str = "wss://eventsub.wss.twitch.tv/ws";

/// Root settings for an eventsub client.
///
/// ```json
/// {
///   "address": "ws://127.0.0.1:8080/ws",
///   "dispatch": { "mode": "bounded", "maxConcurrentHandlers": 16 }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientSettings {
    /// Initial websocket address.
    pub address: String,
    /// Dial, handshake, and keepalive settings.
    pub connection: ConnectionSettings,
    /// Handler execution settings.
    pub dispatch: DispatchSettings,
    /// Default error sink settings.
    pub errors: ErrorSettings,
    /// Logging settings (used by the binary).
    pub logging: LoggingSettings,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            connection: ConnectionSettings::default(),
            dispatch: DispatchSettings::default(),
            errors: ErrorSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl ClientSettings {
    /// Settings pointing at `address`, everything else default.
    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    /// Reject values the client cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.address.is_empty() {
            return Err(SettingsError::InvalidValue("address must not be empty".into()));
        }
        if self.dispatch.max_concurrent_handlers == 0 {
            return Err(SettingsError::InvalidValue(
                "dispatch.maxConcurrentHandlers must be greater than 0".into(),
            ));
        }
        if self.dispatch.handler_timeout_ms == 0 {
            return Err(SettingsError::InvalidValue(
                "dispatch.handlerTimeoutMs must be greater than 0".into(),
            ));
        }
        if self.connection.dial_timeout_ms == 0 || self.connection.welcome_timeout_ms == 0 {
            return Err(SettingsError::InvalidValue(
                "connection timeouts must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Connection timing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectionSettings {
    /// Deadline for opening a connection.
    pub dial_timeout_ms: u64,
    /// Deadline for the first frame on a reconnect target.
    pub welcome_timeout_ms: u64,
    /// Slack added to the server's keepalive timeout.
    pub keepalive_grace_ms: u64,
    /// Fail the connection when the server stays silent past its keepalive.
    pub enforce_keepalive: bool,
    /// Reason text sent with the client's close frame.
    pub close_reason: String,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            dial_timeout_ms: 10_000,
            welcome_timeout_ms: 10_000,
            keepalive_grace_ms: 5_000,
            enforce_keepalive: true,
            close_reason: "client closing".to_string(),
        }
    }
}

impl ConnectionSettings {
    /// Dial deadline as a [`Duration`].
    pub fn dial_timeout(&self) -> Duration {
        Duration::from_millis(self.dial_timeout_ms)
    }

    /// Reconnect welcome deadline as a [`Duration`].
    pub fn welcome_timeout(&self) -> Duration {
        Duration::from_millis(self.welcome_timeout_ms)
    }

    /// Keepalive grace as a [`Duration`].
    pub fn keepalive_grace(&self) -> Duration {
        Duration::from_millis(self.keepalive_grace_ms)
    }
}

/// How handlers are run relative to the read loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Spawn every handler and move on.
    #[default]
    Detached,
    /// Spawn, but cap in-flight handlers; the loop waits for a free slot.
    Bounded,
    /// Run each handler to completion (or timeout) before the next frame.
    Inline,
}

impl std::str::FromStr for DispatchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "detached" => Ok(Self::Detached),
            "bounded" => Ok(Self::Bounded),
            "inline" => Ok(Self::Inline),
            other => Err(format!("unknown dispatch mode: {other}")),
        }
    }
}

/// Handler execution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DispatchSettings {
    /// Execution mode.
    pub mode: DispatchMode,
    /// In-flight cap for [`DispatchMode::Bounded`].
    pub max_concurrent_handlers: usize,
    /// Per-handler deadline for [`DispatchMode::Inline`].
    pub handler_timeout_ms: u64,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            mode: DispatchMode::Detached,
            max_concurrent_handlers: 64,
            handler_timeout_ms: 5_000,
        }
    }
}

impl DispatchSettings {
    /// Inline handler deadline as a [`Duration`].
    pub fn handler_timeout(&self) -> Duration {
        Duration::from_millis(self.handler_timeout_ms)
    }
}

/// Default error sink.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorSettings {
    /// Reports kept before the oldest is dropped.
    pub buffer_capacity: usize,
}

impl Default for ErrorSettings {
    fn default() -> Self {
        Self {
            buffer_capacity: 256,
        }
    }
}

/// Logging output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Fallback filter when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of compact text.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = ClientSettings::default();
        assert_eq!(s.address, DEFAULT_ADDRESS);
        assert_eq!(s.connection.dial_timeout(), Duration::from_secs(10));
        assert_eq!(s.connection.welcome_timeout_ms, 10_000);
        assert_eq!(s.connection.keepalive_grace(), Duration::from_secs(5));
        assert!(s.connection.enforce_keepalive);
        assert_eq!(s.dispatch.mode, DispatchMode::Detached);
        assert_eq!(s.dispatch.max_concurrent_handlers, 64);
        assert_eq!(s.dispatch.handler_timeout(), Duration::from_secs(5));
        assert_eq!(s.errors.buffer_capacity, 256);
        assert_eq!(s.logging.level, "warn");
        assert!(s.validate().is_ok());
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(ClientSettings::default()).unwrap();
        assert_eq!(json["connection"]["dialTimeoutMs"], 10_000);
        assert_eq!(json["dispatch"]["maxConcurrentHandlers"], 64);
        assert_eq!(json["dispatch"]["mode"], "detached");
        assert_eq!(json["errors"]["bufferCapacity"], 256);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let s: ClientSettings =
            serde_json::from_str(r#"{"dispatch": {"mode": "inline"}}"#).unwrap();
        assert_eq!(s.dispatch.mode, DispatchMode::Inline);
        assert_eq!(s.dispatch.handler_timeout_ms, 5_000);
        assert_eq!(s.address, DEFAULT_ADDRESS);
    }

    #[test]
    fn dispatch_mode_parse() {
        assert_eq!("Bounded".parse::<DispatchMode>().unwrap(), DispatchMode::Bounded);
        assert_eq!("inline".parse::<DispatchMode>().unwrap(), DispatchMode::Inline);
        assert!("parallel".parse::<DispatchMode>().is_err());
    }

    #[test]
    fn validate_rejects_zero_limits() {
        let mut s = ClientSettings::default();
        s.dispatch.max_concurrent_handlers = 0;
        assert!(matches!(s.validate(), Err(SettingsError::InvalidValue(_))));

        let mut s = ClientSettings::with_address("");
        assert!(s.validate().is_err());
        s.address = "ws://localhost".into();
        s.connection.dial_timeout_ms = 0;
        assert!(s.validate().is_err());
    }
}
