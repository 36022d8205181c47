//! Integration test harness
//!
//! In-process doubles for the mirror's collaborators: a fake gateway (the
//! WebSocket accept side) and a fake webhook/REST receiver. Tests drive the
//! real session loop against these.


use axum::extract::{Json, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, WebSocketStream};

/// How long to wait for any expected frame or request
///
/// Long enough to cover the supervisor's fixed 5 s reconnect backoff.
pub const WAIT: Duration = Duration::from_secs(10);

/// A fake gateway endpoint the mirror can dial
pub struct FakeGateway {
    listener: TcpListener,
    /// `ws://` URL of this endpoint
    pub url: String,
}

impl FakeGateway {
    /// Bind on an ephemeral local port
    pub async fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake gateway");
        let url = format!("ws://{}", listener.local_addr().expect("local addr"));
        Self { listener, url }
    }

    /// Accept the next client connection
    pub async fn accept(&self) -> GatewayPeer {
        let (stream, _) = timeout(WAIT, self.listener.accept())
            .await
            .expect("client did not connect")
            .expect("accept");
        let ws = accept_async(stream).await.expect("websocket handshake");
        GatewayPeer { ws }
    }
}

/// The server side of one accepted gateway connection
pub struct GatewayPeer {
    ws: WebSocketStream<TcpStream>,
}

impl GatewayPeer {
    /// Send one JSON envelope to the client
    pub async fn send_json(&mut self, value: &Value) {
        self.ws
            .send(Message::Text(value.to_string()))
            .await
            .expect("send frame");
    }

    /// Wait for the next JSON text frame from the client
    pub async fn next_json(&mut self) -> Value {
        loop {
            let frame = timeout(WAIT, self.ws.next())
                .await
                .expect("no frame from client")
                .expect("connection ended")
                .expect("frame error");
            match frame {
                Message::Text(text) => {
                    return serde_json::from_str(&text).expect("client sent invalid JSON")
                }
                // Control frames are not part of the protocol under test
                _ => continue,
            }
        }
    }

    /// Assert no text frame arrives within the given window
    pub async fn expect_silence(&mut self, window: Duration) {
        let result = timeout(window, self.ws.next()).await;
        if let Ok(Some(Ok(Message::Text(text)))) = result {
            panic!("expected silence, got frame: {text}");
        }
    }

    /// Close the connection with a close frame
    pub async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }
}

async fn webhook_handler(
    State(tx): State<mpsc::UnboundedSender<Value>>,
    Json(body): Json<Value>,
) -> StatusCode {
    let _ = tx.send(body);
    StatusCode::NO_CONTENT
}

/// Spawn a fake webhook receiver
///
/// Returns the destination URL and a channel yielding each delivered body.
pub async fn spawn_webhook_server() -> (String, mpsc::UnboundedReceiver<Value>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let app = Router::new()
        .route("/hook", post(webhook_handler))
        .with_state(tx);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind webhook server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("webhook server");
    });

    (format!("http://{addr}/hook"), rx)
}

/// One recorded channel-creation request
#[derive(Debug)]
pub struct RecordedChannelRequest {
    pub guild_id: String,
    pub authorization: Option<String>,
    pub body: Value,
}

async fn create_channel_handler(
    State(tx): State<mpsc::UnboundedSender<RecordedChannelRequest>>,
    Path(guild_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let name = body["name"].clone();
    let _ = tx.send(RecordedChannelRequest {
        guild_id,
        authorization,
        body,
    });
    Json(serde_json::json!({"id": "424242", "name": name, "position": 0}))
}

/// Spawn a fake REST API for channel creation
///
/// Returns the API base URL and a channel yielding each recorded request.
pub async fn spawn_channel_api() -> (String, mpsc::UnboundedReceiver<RecordedChannelRequest>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let app = Router::new()
        .route("/guilds/:guild_id/channels", post(create_channel_handler))
        .with_state(tx);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind channel api");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("channel api");
    });

    (format!("http://{addr}"), rx)
}

/// Receive the next value from a channel, with the standard wait
pub async fn recv_within<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> T {
    timeout(WAIT, rx.recv())
        .await
        .expect("nothing received")
        .expect("channel closed")
}
