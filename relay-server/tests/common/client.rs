//! WebSocket test client for relay protocol testing
//!
//! Note: Some methods may appear unused because they're only used in
//! specific test files and clippy checks each test independently.

use std::net::SocketAddr;
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Low-level WebSocket connection to the relay
pub struct WsConnection {
    sink: SplitSink<WsStream, Message>,
    stream: SplitStream<WsStream>,
}

impl WsConnection {
    /// Connect with a device identifier in the handshake query
    #[allow(dead_code)]
    pub async fn connect(addr: SocketAddr, device_id: &str) -> Self {
        Self::connect_url(format!("ws://{}/ws?deviceId={}", addr, device_id)).await
    }

    /// Connect without any device identifier
    #[allow(dead_code)]
    pub async fn connect_anonymous(addr: SocketAddr) -> Self {
        Self::connect_url(format!("ws://{}/ws", addr)).await
    }

    async fn connect_url(url: String) -> Self {
        let (ws, _) = tokio_tungstenite::connect_async(&url)
            .await
            .expect("Failed to connect");
        let (sink, stream) = ws.split();
        Self { sink, stream }
    }

    /// Send JSON message
    #[allow(dead_code)]
    pub async fn send_json<T: Serialize>(&mut self, msg: &T) {
        let json = serde_json::to_string(msg).unwrap();
        self.sink.send(Message::Text(json.into())).await.unwrap();
    }

    /// Receive next text message as JSON
    #[allow(dead_code)]
    pub async fn recv_json(&mut self) -> serde_json::Value {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    return serde_json::from_str(&text).expect("Failed to parse JSON");
                }
                Some(Ok(Message::Ping(_))) => continue,
                Some(Ok(other)) => panic!("Unexpected frame: {:?}", other),
                Some(Err(e)) => panic!("WebSocket error: {}", e),
                None => panic!("WebSocket closed"),
            }
        }
    }

    /// Receive with timeout, returns None if nothing arrives
    #[allow(dead_code)]
    pub async fn recv_timeout(&mut self, duration: Duration) -> Option<serde_json::Value> {
        tokio::time::timeout(duration, self.recv_json()).await.ok()
    }

    /// Assert no message is received within the duration
    #[allow(dead_code)]
    pub async fn expect_no_message(&mut self, duration: Duration) {
        let next = tokio::time::timeout(duration, self.stream.next()).await;
        assert!(
            next.is_err(),
            "Expected no message but received: {:?}",
            next.unwrap()
        );
    }

    /// Wait for the server to close the connection
    #[allow(dead_code)]
    pub async fn expect_server_close(&mut self) {
        let deadline = Duration::from_secs(1);
        let result = tokio::time::timeout(deadline, async {
            loop {
                match self.stream.next().await {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return,
                    Some(Ok(_)) => continue,
                }
            }
        })
        .await;
        assert!(result.is_ok(), "Server did not close the connection");
    }

    /// Close the connection from the client side
    #[allow(dead_code)]
    pub async fn close(mut self) {
        let _ = self.sink.send(Message::Close(None)).await;
    }

    /// Send a heartbeat and wait for its ack.
    ///
    /// Admission happens after the HTTP upgrade returns, so tests use
    /// this round-trip to know the session is registered before racing
    /// further connections or broadcasts against it.
    #[allow(dead_code)]
    pub async fn heartbeat_ack(&mut self) -> serde_json::Value {
        self.send_json(&serde_json::json!({
            "type": "heartbeat",
            "timestamp": "2024-01-01T00:00:00Z",
        }))
        .await;

        let ack = self.recv_json().await;
        assert_eq!(ack["type"], "heartbeat_ack", "expected ack, got: {}", ack);
        ack
    }
}
