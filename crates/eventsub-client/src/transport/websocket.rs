//! Production transport over `tokio-tungstenite`.

use std::sync::Arc;

use async_trait::async_trait;
use eventsub_core::TransportError;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, trace};

use super::{Connector, Transport};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Dials `ws://` and `wss://` addresses.
#[derive(Clone, Copy, Debug, Default)]
pub struct WebSocketConnector;

#[async_trait]
impl Connector for WebSocketConnector {
    async fn connect(&self, address: &str) -> Result<Arc<dyn Transport>, TransportError> {
        let (ws, response) = connect_async(address)
            .await
            .map_err(|e| TransportError::Dial {
                address: address.to_owned(),
                message: e.to_string(),
            })?;
        debug!(address, status = %response.status(), "websocket connected");
        Ok(Arc::new(WebSocketTransport::new(ws)))
    }
}

/// A connected websocket, split so reads and closes do not contend.
pub struct WebSocketTransport {
    reader: Mutex<SplitStream<WsStream>>,
    writer: Mutex<SplitSink<WsStream, WsMessage>>,
}

impl WebSocketTransport {
    fn new(ws: WsStream) -> Self {
        let (writer, reader) = ws.split();
        Self {
            reader: Mutex::new(reader),
            writer: Mutex::new(writer),
        }
    }
}

#[async_trait]
impl Transport for WebSocketTransport {
    async fn read_frame(&self) -> Result<String, TransportError> {
        let mut reader = self.reader.lock().await;
        loop {
            let Some(next) = reader.next().await else {
                return Err(TransportError::Closed {
                    code: None,
                    reason: "stream ended".into(),
                });
            };
            match next.map_err(|e| TransportError::Read(e.to_string()))? {
                WsMessage::Text(text) => return Ok(text.as_str().to_owned()),
                WsMessage::Binary(bytes) => {
                    return String::from_utf8(bytes.to_vec())
                        .map_err(|e| TransportError::Read(format!("binary frame is not UTF-8: {e}")));
                }
                WsMessage::Close(frame) => {
                    let (code, reason) = frame.map_or((None, String::new()), |f| {
                        (Some(u16::from(f.code)), f.reason.as_str().to_owned())
                    });
                    return Err(TransportError::Closed { code, reason });
                }
                // tungstenite queues the pong reply itself
                WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_) => {
                    trace!("control frame");
                }
            }
        }
    }

    async fn close(&self, code: u16, reason: &str) -> Result<(), TransportError> {
        let frame = CloseFrame {
            code: CloseCode::from(code),
            reason: reason.to_owned().into(),
        };
        let mut writer = self.writer.lock().await;
        writer
            .send(WsMessage::Close(Some(frame)))
            .await
            .map_err(|e| TransportError::Write(e.to_string()))
    }
}
