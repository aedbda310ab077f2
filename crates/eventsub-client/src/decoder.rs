//! First-level decoding: frame text to [`Message`].
//!
//! Decoding happens in two passes. [`decode_envelope`] reads only the
//! metadata and leaves the payload as borrowed raw JSON, so an unknown
//! `message_type` is rejected without parsing anything kind-specific. The
//! decoder table then maps the type string to a function that parses the
//! whole frame into its [`Message`] variant.

use std::collections::HashMap;

use eventsub_core::ClientError;
use eventsub_events::{
    Envelope, KeepAliveMessage, Message, NotificationMessage, ReconnectMessage, RevocationMessage,
    TypedMessage, WelcomeMessage,
};
use serde::de::DeserializeOwned;

/// Parses a complete frame into one [`Message`] variant.
pub type MessageDecoder = fn(&str) -> Result<Message, serde_json::Error>;

/// Decode just the envelope of `frame`.
pub fn decode_envelope(frame: &str) -> Result<Envelope<'_>, ClientError> {
    serde_json::from_str(frame).map_err(|e| ClientError::decode("envelope", e))
}

/// Decode `frame` as variant `M`.
pub fn decode_as<M>(frame: &str) -> Result<Message, serde_json::Error>
where
    M: TypedMessage + DeserializeOwned,
{
    serde_json::from_str::<M>(frame).map(M::into_message)
}

/// Decoders for every outer message type, keyed by wire string.
pub fn decoder_table() -> HashMap<&'static str, MessageDecoder> {
    let mut table: HashMap<&'static str, MessageDecoder> = HashMap::new();
    register::<WelcomeMessage>(&mut table);
    register::<KeepAliveMessage>(&mut table);
    register::<NotificationMessage>(&mut table);
    register::<ReconnectMessage>(&mut table);
    register::<RevocationMessage>(&mut table);
    table
}

fn register<M>(table: &mut HashMap<&'static str, MessageDecoder>)
where
    M: TypedMessage + DeserializeOwned,
{
    let _ = table.insert(M::TYPE.as_str(), decode_as::<M>);
}
