//! The duplex connection seam.
//!
//! The client only needs three operations from a connection: open it, read
//! one text frame, and close it with a code. [`Connector`] opens and
//! [`Transport`] does the rest. Methods take `&self` so one task can be
//! blocked in [`Transport::read_frame`] while another closes the connection.

pub mod memory;
pub mod websocket;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use eventsub_core::TransportError;
use tracing::debug;

pub use memory::{MemoryConnector, MemoryServer};
pub use websocket::{WebSocketConnector, WebSocketTransport};

/// An open duplex connection delivering text frames.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Wait for the next text frame.
    ///
    /// Control frames are handled internally. A close frame from the peer,
    /// or the stream ending, surfaces as [`TransportError::Closed`].
    async fn read_frame(&self) -> Result<String, TransportError>;

    /// Send a close frame with `code` and `reason`.
    async fn close(&self, code: u16, reason: &str) -> Result<(), TransportError>;
}

/// Opens connections to an address.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Dial `address`.
    async fn connect(&self, address: &str) -> Result<Arc<dyn Transport>, TransportError>;
}

/// Close `transport`, logging instead of returning failures.
///
/// Used for transports the client is abandoning (the old side of a handoff, a
/// rejected reconnect target) where a failed close changes nothing.
pub(crate) async fn close_quietly(
    transport: &dyn Transport,
    code: u16,
    reason: &str,
    timeout: Duration,
) {
    match tokio::time::timeout(timeout, transport.close(code, reason)).await {
        Ok(Ok(())) => {}
        Ok(Err(error)) => debug!(%error, "close on abandoned transport failed"),
        Err(_) => debug!(
            timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            "close on abandoned transport timed out"
        ),
    }
}
