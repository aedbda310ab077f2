//! Handler registry.
//!
//! One optional callback per outer message type, one per subscription type,
//! and one raw-event hook. Registering again replaces the previous callback.
//! A missing entry means the message or event is decoded and then dropped.

use std::collections::HashMap;
use std::sync::Arc;

use eventsub_events::{
    Event, KeepAliveMessage, Message, MessageMetadata, MessageType, NotificationMessage,
    ReconnectMessage, RevocationMessage, Subscription, SubscriptionType, TypedEvent, TypedMessage,
    WelcomeMessage,
};

/// Callback for an outer message type.
pub type MessageHandler = Arc<dyn Fn(Message) + Send + Sync>;
/// Callback for a subscription type.
pub type EventHandler = Arc<dyn Fn(Event) + Send + Sync>;
/// Callback receiving every notification's undecoded event.
pub type RawEventHandler = Arc<dyn Fn(RawEvent) + Send + Sync>;

/// What the raw-event hook receives.
#[derive(Clone, Debug)]
pub struct RawEvent {
    /// The `event` JSON exactly as received.
    pub raw: String,
    /// Frame metadata.
    pub metadata: MessageMetadata,
    /// Subscription descriptor.
    pub subscription: Subscription,
}

/// Callbacks keyed by message type and subscription type.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    messages: HashMap<MessageType, MessageHandler>,
    events: HashMap<SubscriptionType, EventHandler>,
    raw: Option<RawEventHandler>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Outer messages ──────────────────────────────────────────────

    /// Register a handler for message variant `M`.
    pub fn on_message<M, F>(&mut self, handler: F) -> &mut Self
    where
        M: TypedMessage,
        F: Fn(M) + Send + Sync + 'static,
    {
        let erased: MessageHandler = Arc::new(move |message: Message| {
            if let Some(message) = M::from_message(message) {
                handler(message);
            }
        });
        let _ = self.messages.insert(M::TYPE, erased);
        self
    }

    /// Register the welcome handler. Required before connecting.
    pub fn on_welcome(&mut self, handler: impl Fn(WelcomeMessage) + Send + Sync + 'static) -> &mut Self {
        self.on_message::<WelcomeMessage, _>(handler)
    }

    /// Register the keepalive handler.
    pub fn on_keepalive(&mut self, handler: impl Fn(KeepAliveMessage) + Send + Sync + 'static) -> &mut Self {
        self.on_message::<KeepAliveMessage, _>(handler)
    }

    /// Register the notification handler. Runs before per-event routing.
    pub fn on_notification(
        &mut self,
        handler: impl Fn(NotificationMessage) + Send + Sync + 'static,
    ) -> &mut Self {
        self.on_message::<NotificationMessage, _>(handler)
    }

    /// Register the reconnect handler. The handoff itself is automatic.
    pub fn on_reconnect(&mut self, handler: impl Fn(ReconnectMessage) + Send + Sync + 'static) -> &mut Self {
        self.on_message::<ReconnectMessage, _>(handler)
    }

    /// Register the revocation handler.
    pub fn on_revocation(
        &mut self,
        handler: impl Fn(RevocationMessage) + Send + Sync + 'static,
    ) -> &mut Self {
        self.on_message::<RevocationMessage, _>(handler)
    }

    /// Remove the handler for `message_type`. Returns whether one was set.
    pub fn clear_message_handler(&mut self, message_type: MessageType) -> bool {
        self.messages.remove(&message_type).is_some()
    }

    /// Handler for `message_type`, if registered.
    pub fn message_handler(&self, message_type: MessageType) -> Option<MessageHandler> {
        self.messages.get(&message_type).cloned()
    }

    /// Whether a handler is registered for `message_type`.
    pub fn has_message_handler(&self, message_type: MessageType) -> bool {
        self.messages.contains_key(&message_type)
    }

    // ── Events ──────────────────────────────────────────────────────

    /// Register a handler for the subscription type whose payload is `E`.
    pub fn on<E, F>(&mut self, handler: F) -> &mut Self
    where
        E: TypedEvent,
        F: Fn(E) + Send + Sync + 'static,
    {
        self.on_event(E::KIND, move |event| {
            if let Some(payload) = E::from_event(event) {
                handler(payload);
            }
        })
    }

    /// Register a handler for `kind` receiving the untyped [`Event`].
    ///
    /// Raw-only kinds never produce an [`Event`], so a handler registered
    /// for one is never called; use [`Self::on_raw_event`] for those.
    pub fn on_event(
        &mut self,
        kind: SubscriptionType,
        handler: impl Fn(Event) + Send + Sync + 'static,
    ) -> &mut Self {
        let _ = self.events.insert(kind, Arc::new(handler));
        self
    }

    /// Remove the handler for `kind`. Returns whether one was set.
    pub fn clear_event_handler(&mut self, kind: SubscriptionType) -> bool {
        self.events.remove(&kind).is_some()
    }

    /// Handler for `kind`, if registered.
    pub fn event_handler(&self, kind: SubscriptionType) -> Option<EventHandler> {
        self.events.get(&kind).cloned()
    }

    /// Whether a handler is registered for `kind`.
    pub fn has_event_handler(&self, kind: SubscriptionType) -> bool {
        self.events.contains_key(&kind)
    }

    /// Subscription types with a handler, sorted.
    pub fn event_kinds(&self) -> Vec<SubscriptionType> {
        let mut kinds: Vec<SubscriptionType> = self.events.keys().copied().collect();
        kinds.sort_unstable();
        kinds
    }

    // ── Raw hook ────────────────────────────────────────────────────

    /// Register the hook that sees every routed notification's raw event.
    pub fn on_raw_event(&mut self, handler: impl Fn(RawEvent) + Send + Sync + 'static) -> &mut Self {
        self.raw = Some(Arc::new(handler));
        self
    }

    /// Remove the raw-event hook. Returns whether one was set.
    pub fn clear_raw_event_handler(&mut self) -> bool {
        self.raw.take().is_some()
    }

    /// The raw-event hook, if registered.
    pub fn raw_event_handler(&self) -> Option<RawEventHandler> {
        self.raw.clone()
    }
}
