//! Connection lifecycle state.
//!
//! ```text
//! Idle ──connect──▶ Connecting ──dial ok──▶ Connected ◀──swap── ReconnectPending
//!                        │                     │  └──reconnect frame──▶ │
//!                        └──────── close / cancel / fatal error ────────┴──▶ Closed
//! ```
//!
//! Every transition happens under the client's lifecycle lock, so a close
//! racing a handoff always sees one consistent state and wins.

use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::transport::Transport;

/// Where the client is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Never connected.
    Idle,
    /// Dialing the initial address.
    Connecting,
    /// Reading frames from the active transport.
    Connected,
    /// Still reading the active transport while a replacement is dialed.
    ReconnectPending,
    /// Closed by the application, cancelled, or failed.
    Closed,
}

impl ConnectionState {
    /// Whether a connection attempt or connection is in progress.
    pub fn is_live(self) -> bool {
        matches!(self, Self::Connecting | Self::Connected | Self::ReconnectPending)
    }

    /// Lowercase name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::ReconnectPending => "reconnect_pending",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable lifecycle data, guarded by one lock in the client.
pub(crate) struct Lifecycle {
    pub(crate) state: ConnectionState,
    pub(crate) address: String,
    pub(crate) active: Option<Arc<dyn Transport>>,
    pub(crate) closing: CancellationToken,
}

impl Lifecycle {
    pub(crate) fn new(address: String) -> Self {
        Self {
            state: ConnectionState::Idle,
            address,
            active: None,
            closing: CancellationToken::new(),
        }
    }

    /// Enter `Connecting` with a fresh closing token.
    ///
    /// Returns the address to dial and the token, or `None` if already live.
    pub(crate) fn begin_connect(&mut self) -> Option<(String, CancellationToken)> {
        if self.state.is_live() {
            return None;
        }
        self.state = ConnectionState::Connecting;
        self.active = None;
        self.closing = CancellationToken::new();
        Some((self.address.clone(), self.closing.clone()))
    }

    /// Enter `Closed`, cancel the closing token, and hand back the transport.
    ///
    /// Returns `None` without changing anything if not live.
    pub(crate) fn shut(&mut self) -> Option<Option<Arc<dyn Transport>>> {
        if !self.state.is_live() {
            return None;
        }
        self.state = ConnectionState::Closed;
        self.closing.cancel();
        Some(self.active.take())
    }

    /// Enter `Closed` after a failure and hand back the transport, which
    /// may still be open.
    pub(crate) fn fail(&mut self) -> Option<Arc<dyn Transport>> {
        self.state = ConnectionState::Closed;
        self.active.take()
    }

    /// Move from `from` to `to`. Returns whether the state was `from`.
    pub(crate) fn transition(&mut self, from: ConnectionState, to: ConnectionState) -> bool {
        if self.state == from {
            self.state = to;
            true
        } else {
            false
        }
    }
}
