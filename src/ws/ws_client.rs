//! WebSocket client for the live order feed.
//!
//! One persistent connection, one reader task. Reconnection is never
//! automatic: when the stream terminates, the owner decides whether to call
//! [`OrderFeed::connect`] again.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use async_trait::async_trait;
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use tokio::{
    net::TcpStream,
    spawn,
    sync::{
        mpsc::{unbounded_channel, UnboundedReceiver},
        Mutex,
    },
};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{client::IntoClientRequest, http::header::AUTHORIZATION, protocol},
    MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, warn};

use crate::{
    prelude::*,
    ws::message_types::{decode_event, OrderEvent, OutgoingMessage},
    BaseUrl, Credentials, Error,
};

type WsWriter = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, protocol::Message>;

/// Abstraction over the order feed so the store can run against a fake in
/// tests.
#[async_trait]
pub trait OrderFeed: Send + Sync {
    /// Open the connection and return the inbound event sequence.
    ///
    /// The sequence yields decoded events until the connection terminates;
    /// connection-level failures arrive as a final `Err` item. Calling
    /// `connect` again drops any previous connection first.
    async fn connect(
        &self,
        credentials: &Credentials,
    ) -> Result<UnboundedReceiver<Result<OrderEvent>>>;

    /// Send an outbound message, best-effort.
    async fn send(&self, message: &OutgoingMessage) -> Result<()>;

    /// Close the connection and stop the reader task. Safe to call when not
    /// connected.
    async fn disconnect(&self);
}

/// Default [`OrderFeed`] over `tokio-tungstenite`.
#[derive(Debug)]
pub struct OrderSocket {
    ws_url: String,
    writer: Mutex<Option<WsWriter>>,
    stop_flag: Mutex<Arc<AtomicBool>>,
}

impl OrderSocket {
    pub fn new(base: &BaseUrl) -> Self {
        Self {
            ws_url: format!("{}/admin/orders/connect", base.ws_url()),
            writer: Mutex::new(None),
            stop_flag: Mutex::new(Arc::new(AtomicBool::new(false))),
        }
    }

    async fn open(
        &self,
        credentials: &Credentials,
    ) -> Result<WebSocketStream<MaybeTlsStream<TcpStream>>> {
        let mut request = self
            .ws_url
            .as_str()
            .into_client_request()
            .map_err(|e| Error::InvalidUrl(e.to_string()))?;
        request.headers_mut().insert(
            AUTHORIZATION,
            credentials
                .basic_auth()
                .parse()
                .map_err(|_| Error::Websocket("invalid authorization header".to_string()))?,
        );

        let (stream, _) = connect_async(request)
            .await
            .map_err(|e| Error::Websocket(e.to_string()))?;
        Ok(stream)
    }
}

#[async_trait]
impl OrderFeed for OrderSocket {
    async fn connect(
        &self,
        credentials: &Credentials,
    ) -> Result<UnboundedReceiver<Result<OrderEvent>>> {
        // Stop any previous reader before replacing the connection.
        self.disconnect().await;

        let stream = self.open(credentials).await?;
        let (writer, mut reader) = stream.split();
        *self.writer.lock().await = Some(writer);

        let stop_flag = Arc::new(AtomicBool::new(false));
        *self.stop_flag.lock().await = Arc::clone(&stop_flag);

        let (tx, rx) = unbounded_channel();
        let reader_fut = async move {
            while !stop_flag.load(Ordering::Relaxed) {
                match reader.next().await {
                    Some(Ok(protocol::Message::Text(text))) => match decode_event(&text) {
                        Ok(Some(event)) => {
                            if tx.send(Ok(event)).is_err() {
                                // Receiver dropped, nobody is listening.
                                break;
                            }
                        }
                        Ok(None) => debug!(frame = %text, "ignoring unknown event type"),
                        Err(err) => warn!(%err, "dropping malformed frame"),
                    },
                    Some(Ok(protocol::Message::Close(_))) | None => {
                        let _ = tx.send(Err(Error::Websocket(
                            "connection closed by server".to_string(),
                        )));
                        break;
                    }
                    Some(Ok(_)) => {
                        // Binary/ping/pong frames carry no events.
                    }
                    Some(Err(err)) => {
                        let _ = tx.send(Err(Error::Websocket(err.to_string())));
                        break;
                    }
                }
            }
            debug!("order feed reader task stopped");
        };
        spawn(reader_fut);

        Ok(rx)
    }

    async fn send(&self, message: &OutgoingMessage) -> Result<()> {
        let payload =
            serde_json::to_string(message).map_err(|e| Error::Encode(e.to_string()))?;

        let mut writer = self.writer.lock().await;
        let writer = writer
            .as_mut()
            .ok_or_else(|| Error::WsSend("not connected".to_string()))?;
        writer
            .send(protocol::Message::Text(payload))
            .await
            .map_err(|e| Error::WsSend(e.to_string()))
    }

    async fn disconnect(&self) {
        self.stop_flag.lock().await.store(true, Ordering::Relaxed);
        if let Some(mut writer) = self.writer.lock().await.take() {
            if let Err(err) = writer.send(protocol::Message::Close(None)).await {
                debug!(%err, "error sending close frame");
            }
        }
    }
}
