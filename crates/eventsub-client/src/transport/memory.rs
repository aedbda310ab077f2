//! Scripted in-memory transport.
//!
//! [`MemoryConnector::expect`] registers a connection the client will receive
//! the next time it dials that address, and returns the [`MemoryServer`] end
//! used to push frames and observe how the client closed it. Dialing an
//! address with nothing registered fails like an unreachable host.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use eventsub_core::TransportError;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::{Connector, Transport};

enum ServerEvent {
    Frame(String),
    Close { code: Option<u16>, reason: String },
}

/// Hands out pre-registered [`MemoryTransport`]s by address.
#[derive(Default)]
pub struct MemoryConnector {
    pending: Mutex<HashMap<String, VecDeque<Arc<MemoryTransport>>>>,
    dialed: Mutex<Vec<String>>,
}

impl MemoryConnector {
    /// Create a connector with nothing registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one connection for the next dial of `address`.
    pub fn expect(&self, address: &str) -> MemoryServer {
        let (tx, rx) = mpsc::unbounded_channel();
        let transport = Arc::new(MemoryTransport {
            inbound: tokio::sync::Mutex::new(rx),
            client_close: Mutex::new(None),
            closed: CancellationToken::new(),
        });
        self.pending
            .lock()
            .entry(address.to_owned())
            .or_default()
            .push_back(transport.clone());
        MemoryServer { tx, transport }
    }

    /// Every address dialed so far, in order.
    pub fn dialed(&self) -> Vec<String> {
        self.dialed.lock().clone()
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(&self, address: &str) -> Result<Arc<dyn Transport>, TransportError> {
        self.dialed.lock().push(address.to_owned());
        let next = self
            .pending
            .lock()
            .get_mut(address)
            .and_then(VecDeque::pop_front);
        match next {
            Some(transport) => Ok(transport),
            None => Err(TransportError::Dial {
                address: address.to_owned(),
                message: "connection refused".into(),
            }),
        }
    }
}

/// Client end of an in-memory connection.
pub struct MemoryTransport {
    inbound: tokio::sync::Mutex<mpsc::UnboundedReceiver<ServerEvent>>,
    client_close: Mutex<Option<(u16, String)>>,
    closed: CancellationToken,
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn read_frame(&self) -> Result<String, TransportError> {
        let mut inbound = self.inbound.lock().await;
        tokio::select! {
            biased;
            () = self.closed.cancelled() => {
                // mirrors the peer echoing the client's close frame
                let (code, reason) = self.client_close.lock().clone().unwrap_or_default();
                Err(TransportError::Closed { code: Some(code), reason })
            }
            event = inbound.recv() => match event {
                Some(ServerEvent::Frame(frame)) => Ok(frame),
                Some(ServerEvent::Close { code, reason }) => Err(TransportError::Closed { code, reason }),
                None => Err(TransportError::Read("server end dropped".into())),
            },
        }
    }

    async fn close(&self, code: u16, reason: &str) -> Result<(), TransportError> {
        let mut slot = self.client_close.lock();
        if slot.is_some() {
            return Err(TransportError::Write("already closed".into()));
        }
        *slot = Some((code, reason.to_owned()));
        drop(slot);
        self.closed.cancel();
        Ok(())
    }
}

/// Server end of an in-memory connection.
pub struct MemoryServer {
    tx: mpsc::UnboundedSender<ServerEvent>,
    transport: Arc<MemoryTransport>,
}

impl MemoryServer {
    /// Queue a text frame for the client.
    pub fn send(&self, frame: impl Into<String>) {
        let _ = self.tx.send(ServerEvent::Frame(frame.into()));
    }

    /// Close the connection from the server side.
    pub fn close(&self, code: Option<u16>, reason: &str) {
        let _ = self.tx.send(ServerEvent::Close {
            code,
            reason: reason.to_owned(),
        });
    }

    /// Code and reason of the client's close frame, if it sent one.
    pub fn client_close(&self) -> Option<(u16, String)> {
        self.transport.client_close.lock().clone()
    }

    /// Whether the client has closed this connection.
    pub fn is_closed_by_client(&self) -> bool {
        self.transport.closed.is_cancelled()
    }

    /// Wait until the client closes this connection.
    pub async fn closed_by_client(&self) {
        self.transport.closed.cancelled().await;
    }
}
