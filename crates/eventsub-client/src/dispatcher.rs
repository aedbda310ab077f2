//! First-level dispatch: frame to outer message handler.
//!
//! [`Dispatcher::dispatch`] handles one frame end to end: envelope, decoder
//! lookup, full decode, the registered handler for the message type, and
//! for notifications the [`NotificationRouter`]. What the read loop itself
//! must act on (a new session, a reconnect request) comes back as a
//! [`Control`] value; everything else is handled here.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use eventsub_core::ClientError;
use eventsub_events::Message;
use parking_lot::RwLock;
use tracing::{debug, instrument, trace};

use crate::decoder::{MessageDecoder, decode_envelope, decoder_table};
use crate::executor::HandlerExecutor;
use crate::registry::HandlerRegistry;
use crate::router::NotificationRouter;

/// A frame outcome the read loop must act on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Control {
    /// A session started.
    Welcome {
        /// Session id from the server.
        session_id: String,
        /// Silence allowed between frames, if the server set one.
        keepalive: Option<Duration>,
    },
    /// The server asked the client to move.
    Reconnect {
        /// Where to dial.
        address: String,
    },
}

/// Decodes frames and runs the matching handlers.
#[derive(Clone)]
pub struct Dispatcher {
    decoders: Arc<HashMap<&'static str, MessageDecoder>>,
    registry: Arc<RwLock<HandlerRegistry>>,
    executor: HandlerExecutor,
    router: NotificationRouter,
}

impl Dispatcher {
    /// Create a dispatcher over `registry`.
    pub fn new(registry: Arc<RwLock<HandlerRegistry>>, executor: HandlerExecutor) -> Self {
        Self {
            decoders: Arc::new(decoder_table()),
            router: NotificationRouter::new(registry.clone(), executor.clone()),
            registry,
            executor,
        }
    }

    /// Dispatch one frame.
    ///
    /// An `Err` is a per-frame problem to report; the caller keeps reading.
    #[instrument(skip_all, fields(message_type))]
    pub async fn dispatch(&self, frame: &str) -> Result<Option<Control>, ClientError> {
        let envelope = decode_envelope(frame)?;
        let type_name = envelope.metadata.message_type.as_str();
        let _ = tracing::Span::current().record("message_type", type_name);

        let Some(decode) = self.decoders.get(type_name) else {
            return Err(ClientError::UnknownMessageType {
                message_type: type_name.to_owned(),
            });
        };
        let message = decode(frame).map_err(|e| ClientError::decode(format!("{type_name} message"), e))?;
        let message_type = message.message_type();

        // A notification also goes to the router after its own handler.
        let notification = match &message {
            Message::Notification(n) => Some(n.clone()),
            _ => None,
        };
        let control = control_for(&message);

        let handler = self.registry.read().message_handler(message_type);
        match handler {
            Some(handler) => {
                self.executor
                    .run(message_type.as_str(), move || handler(message))
                    .await;
            }
            None => trace!("no handler registered"),
        }

        if let Some(notification) = notification {
            self.router.route(&notification).await?;
        }
        control
    }
}

fn control_for(message: &Message) -> Result<Option<Control>, ClientError> {
    match message {
        Message::Welcome(welcome) => {
            let session = &welcome.payload.session;
            debug!(session_id = %session.id, keepalive_s = ?session.keepalive_timeout_seconds, "session welcome");
            Ok(Some(Control::Welcome {
                session_id: session.id.clone(),
                keepalive: session.keepalive_timeout_seconds.map(Duration::from_secs),
            }))
        }
        Message::Reconnect(reconnect) => match reconnect.reconnect_url() {
            Some(url) if !url.is_empty() => Ok(Some(Control::Reconnect {
                address: url.to_owned(),
            })),
            _ => Err(ClientError::Reconnect {
                address: String::new(),
                reason: "session_reconnect without reconnect_url".into(),
            }),
        },
        _ => Ok(None),
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("message_types", &self.decoders.len())
            .field("mode", &self.executor.mode())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{BufferedSink, ErrorReporter};
    use eventsub_events::{KeepAliveMessage, MessageType, NotificationMessage};
    use eventsub_settings::{DispatchMode, DispatchSettings};
    use parking_lot::Mutex;

    fn dispatcher() -> (Dispatcher, Arc<RwLock<HandlerRegistry>>) {
        let reporter = Arc::new(ErrorReporter::new(Arc::new(BufferedSink::new(8))));
        let settings = DispatchSettings {
            mode: DispatchMode::Inline,
            ..DispatchSettings::default()
        };
        let registry = Arc::new(RwLock::new(HandlerRegistry::new()));
        let executor = HandlerExecutor::new(&settings, reporter);
        (Dispatcher::new(registry.clone(), executor), registry)
    }

    fn frame(message_type: &str, payload: &str) -> String {
        format!(
            r#"{{"metadata":{{"message_id":"m","message_type":"{message_type}","message_timestamp":"2023-07-19T10:11:12Z"}},"payload":{payload}}}"#
        )
    }

    #[tokio::test]
    async fn welcome_yields_control() {
        let (dispatcher, _) = dispatcher();
        let control = dispatcher
            .dispatch(&frame(
                "session_welcome",
                r#"{"session":{"id":"abc","status":"connected","keepalive_timeout_seconds":10}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(
            control,
            Some(Control::Welcome {
                session_id: "abc".into(),
                keepalive: Some(Duration::from_secs(10)),
            })
        );
    }

    #[tokio::test]
    async fn keepalive_runs_handler_once() {
        let (dispatcher, registry) = dispatcher();
        let count = Arc::new(Mutex::new(0_u32));
        {
            let count = count.clone();
            let _ = registry
                .write()
                .on_keepalive(move |_: KeepAliveMessage| *count.lock() += 1);
        }
        let control = dispatcher
            .dispatch(&frame("session_keepalive", "{}"))
            .await
            .unwrap();
        assert_eq!(control, None);
        assert_eq!(*count.lock(), 1);
    }

    #[tokio::test]
    async fn unknown_message_type_is_reported() {
        let (dispatcher, _) = dispatcher();
        let err = dispatcher
            .dispatch(&frame("session_mystery", "{}"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::UnknownMessageType { ref message_type } if message_type == "session_mystery"));
    }

    #[tokio::test]
    async fn reconnect_without_url_is_error() {
        let (dispatcher, _) = dispatcher();
        let err = dispatcher
            .dispatch(&frame(
                "session_reconnect",
                r#"{"session":{"id":"abc","status":"reconnecting"}}"#,
            ))
            .await
            .unwrap_err();
        assert_eq!(err.code(), eventsub_core::errors::RECONNECT_FAILURE);
    }

    #[tokio::test]
    async fn reconnect_yields_address() {
        let (dispatcher, registry) = dispatcher();
        let seen = Arc::new(Mutex::new(None));
        {
            let seen = seen.clone();
            let _ = registry.write().on_reconnect(move |r| {
                *seen.lock() = r.reconnect_url().map(str::to_owned);
            });
        }
        let control = dispatcher
            .dispatch(&frame(
                "session_reconnect",
                r#"{"session":{"id":"abc","status":"reconnecting","reconnect_url":"wss://next"}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(
            control,
            Some(Control::Reconnect {
                address: "wss://next".into()
            })
        );
        assert_eq!(seen.lock().as_deref(), Some("wss://next"));
    }

    #[tokio::test]
    async fn notification_handler_runs_before_router() {
        let (dispatcher, registry) = dispatcher();
        let order = Arc::new(Mutex::new(Vec::new()));
        {
            let (a, b) = (order.clone(), order.clone());
            let _ = registry
                .write()
                .on_notification(move |_: NotificationMessage| a.lock().push("notification"))
                .on_raw_event(move |_| b.lock().push("raw"));
        }
        let payload = r#"{"subscription":{"id":"s","status":"enabled","type":"channel.chat.message","version":"1","cost":0,"condition":{}},"event":{"x":1}}"#;
        let _ = dispatcher.dispatch(&frame("notification", payload)).await.unwrap();
        assert_eq!(*order.lock(), vec!["notification", "raw"]);
    }

    #[tokio::test]
    async fn bad_payload_is_decode_error() {
        let (dispatcher, _) = dispatcher();
        let err = dispatcher
            .dispatch(&frame("session_welcome", r#"{"session":42}"#))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("session_welcome message"));
        assert_eq!(MessageType::SessionWelcome.as_str(), "session_welcome");
    }
}
