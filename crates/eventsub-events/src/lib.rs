//! # eventsub-events
//!
//! Wire types for the eventsub websocket protocol.
//!
//! - [`MessageMetadata`] / [`Envelope`]: the outer frame, decodable without
//!   touching the kind-specific payload
//! - [`Message`]: the five outer message variants keyed by [`MessageType`]
//! - [`SubscriptionType`] / [`Event`]: the subscription taxonomy and its typed
//!   payloads, generated from a single table by `define_subscriptions!`
//! - [`payloads`]: data-only event payload structs

#![deny(unsafe_code)]

#[macro_use]
mod macros;

pub mod envelope;
pub mod message;
pub mod payloads;
pub mod subscription;

pub use envelope::{Envelope, MessageMetadata, MessageType, ALL_MESSAGE_TYPES};
pub use message::{
    KeepAliveMessage, Message, NotificationMessage, NotificationPayload, ReconnectMessage,
    RevocationMessage, RevocationPayload, Session, SessionPayload, Subscription,
    SubscriptionTransport, TypedMessage, WelcomeMessage,
};
pub use subscription::{ALL_SUBSCRIPTION_TYPES, Event, SubscriptionType, TypedEvent};
