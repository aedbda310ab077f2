//! # eventsub-client
//!
//! Long-lived eventsub websocket client.
//!
//! ```text
//! Connector ─dial─▶ Transport ─frame─▶ Dispatcher ─▶ message handler
//!                                          │
//!                                          └─notification─▶ NotificationRouter ─▶ raw hook, event handler
//! ```
//!
//! - [`EventSubClient`]: lifecycle, read loop, reconnect handoff
//! - [`HandlerRegistry`]: callbacks per message type and subscription type
//! - [`Dispatcher`] / [`NotificationRouter`]: the two dispatch levels
//! - [`HandlerExecutor`]: detached, bounded, or inline handler execution
//! - [`ErrorSink`]: where non-fatal errors go
//! - [`transport`]: websocket and in-memory connections

#![deny(unsafe_code)]

pub mod client;
pub mod decoder;
pub mod dispatcher;
pub mod executor;
pub mod registry;
pub mod router;
pub mod sink;
pub mod state;
pub mod transport;

pub use client::{CloseHandle, EventSubClient};
pub use decoder::{MessageDecoder, decode_envelope, decoder_table};
pub use dispatcher::{Control, Dispatcher};
pub use executor::HandlerExecutor;
pub use registry::{EventHandler, HandlerRegistry, MessageHandler, RawEvent, RawEventHandler};
pub use router::NotificationRouter;
pub use sink::{BufferedSink, ErrorReporter, ErrorSink, NoopSink};
pub use state::ConnectionState;
pub use transport::{Connector, MemoryConnector, MemoryServer, Transport, WebSocketConnector};
