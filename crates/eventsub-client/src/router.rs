//! Second-level dispatch: notification event to typed handler.

use std::collections::HashMap;
use std::sync::Arc;

use eventsub_core::ClientError;
use eventsub_events::{ALL_SUBSCRIPTION_TYPES, NotificationMessage, SubscriptionType};
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::executor::HandlerExecutor;
use crate::registry::{HandlerRegistry, RawEvent};

/// Routes a decoded notification by its subscription type.
///
/// Every subscription type in the taxonomy has a route. For a routed
/// notification the raw-event hook always starts first, with the event JSON
/// exactly as received. Kinds with a typed payload are then decoded from
/// those same bytes and handed to their handler. Kinds without one stop
/// after the raw hook. A type string outside the taxonomy is reported as
/// [`ClientError::UnknownEventType`] and nothing fires.
#[derive(Clone)]
pub struct NotificationRouter {
    routes: HashMap<&'static str, SubscriptionType>,
    registry: Arc<RwLock<HandlerRegistry>>,
    executor: HandlerExecutor,
}

impl NotificationRouter {
    /// Create a router with a route for every known subscription type.
    pub fn new(registry: Arc<RwLock<HandlerRegistry>>, executor: HandlerExecutor) -> Self {
        let routes = ALL_SUBSCRIPTION_TYPES
            .iter()
            .map(|kind| (kind.as_str(), *kind))
            .collect();
        Self {
            routes,
            registry,
            executor,
        }
    }

    /// Whether `subscription_type` has a route.
    pub fn has_route(&self, subscription_type: &str) -> bool {
        self.routes.contains_key(subscription_type)
    }

    /// Route one notification.
    ///
    /// Errors are per-event and never end the connection.
    pub async fn route(&self, notification: &NotificationMessage) -> Result<(), ClientError> {
        let wire_type = notification.subscription_type();
        let Some(&kind) = self.routes.get(wire_type) else {
            return Err(ClientError::UnknownEventType {
                subscription_type: wire_type.to_owned(),
            });
        };
        let raw = notification.raw_event();

        // Clone handlers out so the lock is not held while handlers run.
        let (raw_hook, typed) = {
            let registry = self.registry.read();
            (registry.raw_event_handler(), registry.event_handler(kind))
        };

        if let Some(hook) = raw_hook {
            let event = RawEvent {
                raw: raw.to_owned(),
                metadata: notification.metadata.clone(),
                subscription: notification.payload.subscription.clone(),
            };
            self.executor.run(kind.as_str(), move || hook(event)).await;
        }

        let event = match kind.decode_event(raw) {
            Ok(Some(event)) => event,
            Ok(None) => {
                trace!(kind = %kind, "no typed payload");
                return Ok(());
            }
            Err(e) => return Err(ClientError::decode(format!("{kind} event"), e)),
        };

        match typed {
            Some(handler) => self.executor.run(kind.as_str(), move || handler(event)).await,
            None => debug!(kind = %kind, "no handler registered"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{BufferedSink, ErrorReporter};
    use eventsub_events::payloads::ChannelFollowEvent;
    use eventsub_events::{Event, TypedEvent};
    use eventsub_settings::{DispatchMode, DispatchSettings};
    use parking_lot::Mutex;

    fn notification(subscription_type: &str, event: &str) -> NotificationMessage {
        let frame = format!(
            r#"{{"metadata":{{"message_id":"n1","message_type":"notification","message_timestamp":"2023-07-19T10:11:12Z","subscription_type":"{subscription_type}","subscription_version":"1"}},
               "payload":{{"subscription":{{"id":"s1","status":"enabled","type":"{subscription_type}","version":"1","cost":0,"condition":{{}},"created_at":"2023-07-19T10:11:12Z"}},
               "event":{event}}}}}"#
        );
        serde_json::from_str(&frame).unwrap()
    }

    fn router() -> (NotificationRouter, Arc<RwLock<HandlerRegistry>>) {
        let reporter = Arc::new(ErrorReporter::new(Arc::new(BufferedSink::new(8))));
        let settings = DispatchSettings {
            mode: DispatchMode::Inline,
            ..DispatchSettings::default()
        };
        let registry = Arc::new(RwLock::new(HandlerRegistry::new()));
        let router = NotificationRouter::new(registry.clone(), HandlerExecutor::new(&settings, reporter));
        (router, registry)
    }

    #[test]
    fn every_subscription_type_is_routed() {
        let (router, _) = router();
        for kind in ALL_SUBSCRIPTION_TYPES {
            assert!(router.has_route(kind.as_str()));
        }
        assert!(!router.has_route("channel.mystery"));
    }

    #[tokio::test]
    async fn typed_and_raw_handlers_fire() {
        let (router, registry) = router();
        let raws = Arc::new(Mutex::new(Vec::new()));
        let follows = Arc::new(Mutex::new(Vec::new()));
        {
            let (raws, follows) = (raws.clone(), follows.clone());
            let mut registry = registry.write();
            let _ = registry
                .on_raw_event(move |e| raws.lock().push(e.raw))
                .on(move |f: ChannelFollowEvent| follows.lock().push(f.user.user_login));
        }

        let event = r#"{"user_id":"1","user_login":"viewer","user_name":"Viewer","broadcaster_user_id":"2","broadcaster_user_login":"b","broadcaster_user_name":"B","followed_at":"2023-07-19T10:11:12Z"}"#;
        router.route(&notification("channel.follow", event)).await.unwrap();

        assert_eq!(*raws.lock(), vec![event.to_owned()]);
        assert_eq!(*follows.lock(), vec!["viewer".to_owned()]);
    }

    #[tokio::test]
    async fn raw_only_kind_fires_raw_hook_only() {
        let (router, registry) = router();
        let raws = Arc::new(Mutex::new(0_usize));
        {
            let raws = raws.clone();
            let _ = registry.write().on_raw_event(move |_| *raws.lock() += 1);
        }
        router
            .route(&notification("channel.chat.message", r#"{"anything":true}"#))
            .await
            .unwrap();
        assert_eq!(*raws.lock(), 1);
    }

    #[tokio::test]
    async fn unknown_type_skips_everything() {
        let (router, registry) = router();
        let raws = Arc::new(Mutex::new(0_usize));
        {
            let raws = raws.clone();
            let _ = registry.write().on_raw_event(move |_| *raws.lock() += 1);
        }
        let err = router
            .route(&notification("channel.mystery", "{}"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::UnknownEventType { ref subscription_type } if subscription_type == "channel.mystery"));
        assert_eq!(*raws.lock(), 0);
    }

    #[tokio::test]
    async fn malformed_typed_event_is_decode_error() {
        let (router, registry) = router();
        let called = Arc::new(Mutex::new(false));
        {
            let called = called.clone();
            let _ = registry
                .write()
                .on_event(ChannelFollowEvent::KIND, move |_: Event| *called.lock() = true);
        }
        let err = router
            .route(&notification("channel.follow", r#"{"followed_at":42}"#))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("channel.follow event"));
        assert!(!*called.lock());
    }
}
