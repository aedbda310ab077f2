//! The long-lived client.
//!
//! [`EventSubClient::connect`] dials, then runs the read loop on the calling
//! task until the connection ends. The loop reads one frame at a time and
//! hands it to the [`Dispatcher`]. A `session_reconnect` frame starts a
//! handoff task that dials the new address and waits for its welcome while
//! the loop keeps reading the old connection. The finished handoff comes back
//! through a oneshot channel and the loop swaps connections between frames,
//! so no frame is read from both.

use std::sync::Arc;
use std::time::Duration;

use eventsub_core::errors::NORMAL_CLOSURE;
use eventsub_core::{ClientError, TransportError};
use eventsub_events::MessageType;
use eventsub_settings::{ClientSettings, ConnectionSettings};
use parking_lot::{Mutex, RwLock, RwLockWriteGuard};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::decoder::decode_envelope;
use crate::dispatcher::{Control, Dispatcher};
use crate::executor::HandlerExecutor;
use crate::registry::HandlerRegistry;
use crate::sink::{BufferedSink, ErrorReporter, ErrorSink};
use crate::state::{ConnectionState, Lifecycle};
use crate::transport::{Connector, Transport, WebSocketConnector, close_quietly};

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

// ── Shared lifecycle ────────────────────────────────────────────────

struct Shared {
    lifecycle: Mutex<Lifecycle>,
    reporter: Arc<ErrorReporter>,
    close_reason: String,
    close_timeout: Duration,
}

impl Shared {
    async fn close(&self) -> Result<(), ClientError> {
        let shut = self.lifecycle.lock().shut();
        let Some(active) = shut else {
            return Ok(());
        };
        // No transport yet means close raced the initial dial; connect cleans up.
        let Some(transport) = active else {
            return Ok(());
        };
        info!("closing connection");
        match tokio::time::timeout(
            self.close_timeout,
            transport.close(NORMAL_CLOSURE, &self.close_reason),
        )
        .await
        {
            Ok(result) => result.map_err(ClientError::from),
            Err(_) => Err(TransportError::Timeout {
                context: "closing".into(),
                timeout_ms: millis(self.close_timeout),
            }
            .into()),
        }
    }
}

/// Closes the client from anywhere, including from inside a handler.
#[derive(Clone)]
pub struct CloseHandle {
    shared: Arc<Shared>,
}

impl CloseHandle {
    /// Close the connection. A no-op unless connecting or connected.
    pub async fn close(&self) -> Result<(), ClientError> {
        self.shared.close().await
    }

    /// Close on a background task, for use from synchronous handlers.
    pub fn spawn_close(&self) {
        let shared = self.shared.clone();
        let _ = tokio::spawn(async move {
            if let Err(error) = shared.close().await {
                debug!(%error, "background close failed");
            }
        });
    }
}

// ── Handoff ─────────────────────────────────────────────────────────

struct Replacement {
    transport: Arc<dyn Transport>,
    address: String,
    welcome: String,
}

struct Handoff {
    address: String,
    token: CancellationToken,
    rx: oneshot::Receiver<Result<Replacement, ClientError>>,
}

fn reconnect_error(address: &str, reason: impl Into<String>) -> ClientError {
    ClientError::Reconnect {
        address: address.to_owned(),
        reason: reason.into(),
    }
}

fn expect_welcome(frame: &str) -> Result<(), String> {
    let envelope = decode_envelope(frame).map_err(|e| e.to_string())?;
    match envelope.metadata.known_type() {
        Some(MessageType::SessionWelcome) => Ok(()),
        _ => Err(format!(
            "expected session_welcome, got {}",
            envelope.metadata.message_type
        )),
    }
}

/// Dial `address` and read its first frame, which must be a welcome.
async fn dial_replacement(
    connector: &dyn Connector,
    address: String,
    settings: &ConnectionSettings,
    token: &CancellationToken,
) -> Result<Replacement, ClientError> {
    let dialed = tokio::select! {
        biased;
        () = token.cancelled() => return Err(reconnect_error(&address, "cancelled")),
        dialed = tokio::time::timeout(settings.dial_timeout(), connector.connect(&address)) => dialed,
    };
    let transport = match dialed {
        Ok(Ok(transport)) => transport,
        Ok(Err(e)) => return Err(reconnect_error(&address, e.to_string())),
        Err(_) => {
            return Err(reconnect_error(
                &address,
                format!("dial timed out after {}ms", settings.dial_timeout_ms),
            ));
        }
    };

    let first = tokio::select! {
        biased;
        () = token.cancelled() => Err("cancelled".to_owned()),
        read = tokio::time::timeout(settings.welcome_timeout(), transport.read_frame()) => match read {
            Ok(Ok(frame)) => expect_welcome(&frame).map(|()| frame),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!("no frame within {}ms", settings.welcome_timeout_ms)),
        },
    };

    match first {
        Ok(welcome) => Ok(Replacement {
            transport,
            address,
            welcome,
        }),
        Err(reason) => {
            close_quietly(
                transport.as_ref(),
                NORMAL_CLOSURE,
                &settings.close_reason,
                settings.dial_timeout(),
            )
            .await;
            Err(reconnect_error(&address, reason))
        }
    }
}

async fn handoff_outcome(handoff: &mut Option<Handoff>) -> Result<Replacement, ClientError> {
    match handoff {
        Some(pending) => (&mut pending.rx).await.unwrap_or_else(|_| {
            Err(reconnect_error(
                &pending.address,
                "handoff task ended without a result",
            ))
        }),
        None => std::future::pending().await,
    }
}

async fn read_within(
    transport: &dyn Transport,
    deadline: Option<Duration>,
) -> Result<String, TransportError> {
    let Some(limit) = deadline else {
        return transport.read_frame().await;
    };
    tokio::time::timeout(limit, transport.read_frame())
        .await
        .unwrap_or_else(|_| {
            Err(TransportError::KeepaliveExpired {
                timeout_ms: millis(limit),
            })
        })
}

// ── Client ──────────────────────────────────────────────────────────

/// A long-lived eventsub websocket client.
///
/// Register handlers through [`Self::handlers`], then call
/// [`Self::connect`], which returns only when the connection ends. Close it
/// from another task, or from a handler, with [`Self::close`] or a
/// [`CloseHandle`].
pub struct EventSubClient {
    shared: Arc<Shared>,
    registry: Arc<RwLock<HandlerRegistry>>,
    dispatcher: Dispatcher,
    connector: Arc<dyn Connector>,
    connection: ConnectionSettings,
    default_errors: Arc<BufferedSink>,
}

impl EventSubClient {
    /// Create a client that dials through `connector`.
    pub fn new(settings: ClientSettings, connector: Arc<dyn Connector>) -> Self {
        let default_errors = Arc::new(BufferedSink::new(settings.errors.buffer_capacity));
        let reporter = Arc::new(ErrorReporter::new(default_errors.clone()));
        let registry = Arc::new(RwLock::new(HandlerRegistry::new()));
        let executor = HandlerExecutor::new(&settings.dispatch, reporter.clone());
        let shared = Arc::new(Shared {
            lifecycle: Mutex::new(Lifecycle::new(settings.address.clone())),
            reporter,
            close_reason: settings.connection.close_reason.clone(),
            close_timeout: settings.connection.dial_timeout(),
        });
        Self {
            shared,
            dispatcher: Dispatcher::new(registry.clone(), executor),
            registry,
            connector,
            connection: settings.connection,
            default_errors,
        }
    }

    /// Create a client that dials real websockets.
    pub fn websocket(settings: ClientSettings) -> Self {
        Self::new(settings, Arc::new(WebSocketConnector))
    }

    /// Write access to the handler registry.
    ///
    /// Changes apply from the next frame. Do not hold the guard across an
    /// `.await`.
    pub fn handlers(&self) -> RwLockWriteGuard<'_, HandlerRegistry> {
        self.registry.write()
    }

    /// Replace where non-fatal errors go.
    pub fn set_error_sink(&self, sink: Arc<dyn ErrorSink>) {
        self.shared.reporter.set_sink(sink);
    }

    /// Send non-fatal errors to `handler`.
    pub fn on_error(&self, handler: impl Fn(ClientError) + Send + Sync + 'static) {
        self.set_error_sink(Arc::new(handler));
    }

    /// The default error sink. Stops receiving once another sink is set.
    pub fn error_buffer(&self) -> Arc<BufferedSink> {
        self.default_errors.clone()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.shared.lifecycle.lock().state
    }

    /// Address of the current connection, or the next one to dial.
    pub fn address(&self) -> String {
        self.shared.lifecycle.lock().address.clone()
    }

    /// A cloneable handle that can close this client.
    pub fn close_handle(&self) -> CloseHandle {
        CloseHandle {
            shared: self.shared.clone(),
        }
    }

    /// Close the connection. A no-op unless connecting or connected.
    ///
    /// The read loop in [`Self::connect`] then returns `Ok(())`.
    pub async fn close(&self) -> Result<(), ClientError> {
        self.shared.close().await
    }

    /// Dial and run the read loop until the connection ends.
    ///
    /// Returns `Ok(())` after [`Self::close`] or when `cancel` fires.
    /// Returns an error if no welcome handler is registered, if already
    /// connected, or if the transport fails and no handoff can replace it.
    pub async fn connect(&self, cancel: CancellationToken) -> Result<(), ClientError> {
        if !self
            .registry
            .read()
            .has_message_handler(MessageType::SessionWelcome)
        {
            return Err(ClientError::Configuration(
                "register a session_welcome handler before connecting".into(),
            ));
        }
        let begun = self.shared.lifecycle.lock().begin_connect();
        let Some((address, closing)) = begun else {
            return Err(ClientError::Configuration(
                "client is already connected".into(),
            ));
        };
        info!(%address, "connecting");

        let dial_timeout = self.connection.dial_timeout();
        let dialed = tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            () = closing.cancelled() => None,
            dialed = tokio::time::timeout(dial_timeout, self.connector.connect(&address)) => Some(dialed),
        };
        let transport = match dialed {
            None => {
                let _ = self.shared.lifecycle.lock().shut();
                debug!("connect abandoned during dial");
                return Ok(());
            }
            Some(Ok(Ok(transport))) => transport,
            Some(Ok(Err(e))) => return Err(self.fail(e).await),
            Some(Err(_)) => {
                let cause = TransportError::Timeout {
                    context: format!("dialing {address}"),
                    timeout_ms: millis(dial_timeout),
                };
                return Err(self.fail(cause).await);
            }
        };

        let accepted = {
            let mut lifecycle = self.shared.lifecycle.lock();
            let accepted =
                lifecycle.transition(ConnectionState::Connecting, ConnectionState::Connected);
            if accepted {
                lifecycle.active = Some(transport.clone());
            }
            accepted
        };
        if !accepted {
            self.discard(transport.as_ref()).await;
            return Ok(());
        }
        info!(%address, "connected");
        self.read_loop(transport, &cancel, &closing).await
    }

    async fn read_loop(
        &self,
        mut transport: Arc<dyn Transport>,
        cancel: &CancellationToken,
        closing: &CancellationToken,
    ) -> Result<(), ClientError> {
        let mut keepalive: Option<Duration> = None;
        let mut handoff: Option<Handoff> = None;
        // Set when the old transport fails while a handoff is still pending.
        let mut old_dead: Option<TransportError> = None;

        loop {
            let deadline = self.read_deadline(keepalive);
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    info!("cancelled");
                    if let Err(error) = self.shared.close().await {
                        debug!(%error, "close after cancel failed");
                    }
                    self.abort_handoff(handoff.take()).await;
                    return Ok(());
                }
                () = closing.cancelled() => {
                    info!("closed");
                    self.abort_handoff(handoff.take()).await;
                    return Ok(());
                }
                outcome = handoff_outcome(&mut handoff) => {
                    let _ = handoff.take();
                    match outcome {
                        Ok(replacement) => {
                            if self.swap(&replacement) {
                                let old = std::mem::replace(&mut transport, replacement.transport);
                                keepalive = None;
                                old_dead = None;
                                info!(address = %replacement.address, "reconnected");
                                self.discard(old.as_ref()).await;
                                self.handle_frame(&replacement.welcome, &mut keepalive, &mut handoff, cancel, closing)
                                    .await;
                            } else {
                                self.discard(replacement.transport.as_ref()).await;
                            }
                        }
                        Err(error) => {
                            if let Some(original) = old_dead.take() {
                                self.shared.reporter.report(error);
                                return Err(self.fail(original).await);
                            }
                            let _ = self
                                .shared
                                .lifecycle
                                .lock()
                                .transition(ConnectionState::ReconnectPending, ConnectionState::Connected);
                            self.shared.reporter.report(error);
                        }
                    }
                }
                read = read_within(transport.as_ref(), deadline), if old_dead.is_none() => match read {
                    Ok(frame) => {
                        self.handle_frame(&frame, &mut keepalive, &mut handoff, cancel, closing).await;
                    }
                    // The matching branch above ends the loop on the next pass.
                    Err(_) if cancel.is_cancelled() || closing.is_cancelled() => {}
                    Err(error) if handoff.is_some() => {
                        warn!(%error, "connection lost during reconnect, waiting for handoff");
                        old_dead = Some(error);
                    }
                    Err(error) => return Err(self.fail(error).await),
                },
            }
        }
    }

    /// Dispatch one frame. Gives up on the frame if the client is closed or
    /// cancelled while a handler slot or an inline handler is awaited; the
    /// loop then ends on its next pass.
    async fn handle_frame(
        &self,
        frame: &str,
        keepalive: &mut Option<Duration>,
        handoff: &mut Option<Handoff>,
        cancel: &CancellationToken,
        closing: &CancellationToken,
    ) {
        let dispatched = tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            () = closing.cancelled() => None,
            dispatched = self.dispatcher.dispatch(frame) => Some(dispatched),
        };
        let Some(dispatched) = dispatched else {
            debug!("frame dropped, client stopping");
            return;
        };
        match dispatched {
            Ok(None) => {}
            Ok(Some(Control::Welcome {
                session_id,
                keepalive: window,
            })) => {
                info!(%session_id, "session established");
                *keepalive = window;
            }
            Ok(Some(Control::Reconnect { address })) => {
                if handoff.is_some() {
                    debug!(%address, "reconnect already pending");
                } else {
                    *handoff = self.start_handoff(address, closing);
                }
            }
            Err(error) => self.shared.reporter.report(error),
        }
    }

    fn start_handoff(&self, address: String, closing: &CancellationToken) -> Option<Handoff> {
        let moved = self
            .shared
            .lifecycle
            .lock()
            .transition(ConnectionState::Connected, ConnectionState::ReconnectPending);
        if !moved {
            return None;
        }
        info!(%address, "server requested reconnect");

        let token = closing.child_token();
        let (tx, rx) = oneshot::channel();
        let connector = self.connector.clone();
        let settings = self.connection.clone();
        let task_token = token.clone();
        let target = address.clone();
        let _ = tokio::spawn(async move {
            let outcome =
                dial_replacement(connector.as_ref(), target, &settings, &task_token).await;
            if let Err(Ok(unclaimed)) = tx.send(outcome) {
                close_quietly(
                    unclaimed.transport.as_ref(),
                    NORMAL_CLOSURE,
                    &settings.close_reason,
                    settings.dial_timeout(),
                )
                .await;
            }
        });
        Some(Handoff { address, token, rx })
    }

    /// Make `replacement` the active transport. Fails if the client left
    /// `ReconnectPending` in the meantime.
    fn swap(&self, replacement: &Replacement) -> bool {
        let mut lifecycle = self.shared.lifecycle.lock();
        if !lifecycle.transition(ConnectionState::ReconnectPending, ConnectionState::Connected) {
            return false;
        }
        lifecycle.address.clone_from(&replacement.address);
        lifecycle.active = Some(replacement.transport.clone());
        true
    }

    async fn abort_handoff(&self, handoff: Option<Handoff>) {
        let Some(handoff) = handoff else {
            return;
        };
        handoff.token.cancel();
        if let Ok(Ok(replacement)) = handoff.rx.await {
            self.discard(replacement.transport.as_ref()).await;
        }
        debug!(address = %handoff.address, "reconnect aborted");
    }

    async fn discard(&self, transport: &dyn Transport) {
        close_quietly(
            transport,
            NORMAL_CLOSURE,
            &self.shared.close_reason,
            self.shared.close_timeout,
        )
        .await;
    }

    fn read_deadline(&self, keepalive: Option<Duration>) -> Option<Duration> {
        if !self.connection.enforce_keepalive {
            return None;
        }
        keepalive.map(|window| window + self.connection.keepalive_grace())
    }

    async fn fail(&self, cause: TransportError) -> ClientError {
        let active = self.shared.lifecycle.lock().fail();
        let err = ClientError::Transport(cause);
        error!(code = err.code(), error = %err, "connection failed");
        // A watchdog expiry leaves the socket open.
        if let Some(transport) = active {
            self.discard(transport.as_ref()).await;
        }
        err
    }
}

impl std::fmt::Debug for EventSubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSubClient")
            .field("state", &self.state())
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}
