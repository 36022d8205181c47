//! Gateway session integration tests
//!
//! Drive the real session loop and supervisor against an in-process fake
//! gateway and webhook receiver.
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use integration_tests::{
    fixtures, recv_within, spawn_webhook_server, FakeGateway, GatewayPeer,
};
use mirror_gateway::client;
use mirror_gateway::transport::CloseReason;
use mirror_relay::{EventRouter, WebhookClient};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// Spawn the real session loop against a fake gateway
fn spawn_session(
    gateway_url: &str,
    webhook_url: &str,
) -> JoinHandle<Result<CloseReason, mirror_gateway::transport::TransportError>> {
    let config = fixtures::config(gateway_url, webhook_url);
    let sink = Arc::new(WebhookClient::new(reqwest::Client::new()));
    let router = EventRouter::new(config.server_id.clone(), config.routes.clone(), sink);
    let url = gateway_url.to_string();

    tokio::spawn(async move { client::run_session(&url, fixtures::TOKEN, &router).await })
}

/// Read frames until a heartbeat appears, returning its data field
async fn next_heartbeat(peer: &mut GatewayPeer) -> Value {
    loop {
        let frame = peer.next_json().await;
        if frame["op"] == 1 {
            return frame["d"].clone();
        }
    }
}

// ============================================================================
// Handshake
// ============================================================================

#[tokio::test]
async fn test_handshake_sends_identify_with_token() {
    let gateway = FakeGateway::bind().await;
    let (webhook_url, _rx) = spawn_webhook_server().await;
    let session = spawn_session(&gateway.url, &webhook_url);

    let mut peer = gateway.accept().await;
    peer.send_json(&fixtures::hello(60_000)).await;

    let identify = peer.next_json().await;
    assert_eq!(identify["op"], 2);
    assert_eq!(identify["d"]["token"], fixtures::TOKEN);
    assert_eq!(identify["d"]["properties"]["os"], "linux");

    peer.close().await;
    session.abort();
}

#[tokio::test]
async fn test_duplicate_hello_identifies_once() {
    let gateway = FakeGateway::bind().await;
    let (webhook_url, _rx) = spawn_webhook_server().await;
    let session = spawn_session(&gateway.url, &webhook_url);

    let mut peer = gateway.accept().await;
    peer.send_json(&fixtures::hello(60_000)).await;

    let identify = peer.next_json().await;
    assert_eq!(identify["op"], 2);

    // The server may resend Hello; the client re-arms its timer but must
    // not identify again.
    peer.send_json(&fixtures::hello(60_000)).await;
    peer.expect_silence(Duration::from_millis(300)).await;

    peer.close().await;
    session.abort();
}

// ============================================================================
// Heartbeats
// ============================================================================

#[tokio::test]
async fn test_heartbeat_starts_null_then_carries_sequence() {
    let gateway = FakeGateway::bind().await;
    let (webhook_url, _rx) = spawn_webhook_server().await;
    let session = spawn_session(&gateway.url, &webhook_url);

    let mut peer = gateway.accept().await;
    peer.send_json(&fixtures::hello(100)).await;

    let identify = peer.next_json().await;
    assert_eq!(identify["op"], 2);

    // No Dispatch seen yet: the heartbeat data field is an explicit null
    let first = next_heartbeat(&mut peer).await;
    assert_eq!(first, Value::Null);
    peer.send_json(&fixtures::heartbeat_ack()).await;

    // After a Dispatch with s=7, heartbeats carry that sequence
    peer.send_json(&fixtures::message_create("999", 7, "ignored"))
        .await;
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        assert!(tokio::time::Instant::now() < deadline, "sequence never picked up");
        if next_heartbeat(&mut peer).await == 7 {
            break;
        }
    }

    peer.close().await;
    session.abort();
}

// ============================================================================
// Mirroring
// ============================================================================

#[tokio::test]
async fn test_message_is_mirrored_to_webhook() {
    let gateway = FakeGateway::bind().await;
    let (webhook_url, mut webhook_rx) = spawn_webhook_server().await;
    let session = spawn_session(&gateway.url, &webhook_url);

    let mut peer = gateway.accept().await;
    peer.send_json(&fixtures::hello(60_000)).await;
    let _identify = peer.next_json().await;
    peer.send_json(&fixtures::heartbeat_ack()).await;

    peer.send_json(&fixtures::message_create(fixtures::CHANNEL_ID, 1, "hello there"))
        .await;

    let body = recv_within(&mut webhook_rx).await;
    assert_eq!(body["username"], "someone [USER]");
    assert_eq!(body["content"], "hello there");

    let expected_index = (123_456_789_012_345_678_u128 >> 22) % 6;
    assert_eq!(
        body["avatarURL"],
        format!("https://cdn.discordapp.com/embed/avatars/{expected_index}.png")
    );

    peer.close().await;
    session.abort();
}

#[tokio::test]
async fn test_unrouted_channel_is_not_mirrored() {
    let gateway = FakeGateway::bind().await;
    let (webhook_url, mut webhook_rx) = spawn_webhook_server().await;
    let session = spawn_session(&gateway.url, &webhook_url);

    let mut peer = gateway.accept().await;
    peer.send_json(&fixtures::hello(60_000)).await;
    let _identify = peer.next_json().await;
    peer.send_json(&fixtures::heartbeat_ack()).await;

    // Unrouted channel first, then a routed message as the ordering proof:
    // if the unrouted one had been delivered it would arrive first.
    peer.send_json(&fixtures::message_create("999", 1, "unrouted"))
        .await;
    peer.send_json(&fixtures::message_create(fixtures::CHANNEL_ID, 2, "routed"))
        .await;

    let body = recv_within(&mut webhook_rx).await;
    assert_eq!(body["content"], "routed");
    assert!(webhook_rx.try_recv().is_err());

    peer.close().await;
    session.abort();
}

// ============================================================================
// Closure
// ============================================================================

#[tokio::test]
async fn test_server_close_ends_session_normally() {
    let gateway = FakeGateway::bind().await;
    let (webhook_url, _rx) = spawn_webhook_server().await;
    let session = spawn_session(&gateway.url, &webhook_url);

    let mut peer = gateway.accept().await;
    peer.send_json(&fixtures::hello(60_000)).await;
    let _identify = peer.next_json().await;

    peer.close().await;

    let reason = timeout(Duration::from_secs(5), session)
        .await
        .expect("session did not end")
        .expect("session task panicked")
        .expect("session errored");
    assert_eq!(reason, CloseReason::Normal);
}

// ============================================================================
// Reconnection
// ============================================================================

#[tokio::test]
async fn test_supervisor_reconnects_with_a_fresh_session() {
    let gateway = FakeGateway::bind().await;
    let (webhook_url, _rx) = spawn_webhook_server().await;

    let config = fixtures::config(&gateway.url, &webhook_url);
    let sink = Arc::new(WebhookClient::new(reqwest::Client::new()));
    let router = EventRouter::new(config.server_id.clone(), config.routes.clone(), sink);
    let supervisor = tokio::spawn(async move {
        mirror_gateway::supervisor::run(&config, &router).await;
    });

    // First connection: complete the handshake with a short heartbeat
    // cadence, then close from the server side.
    let mut first = gateway.accept().await;
    first.send_json(&fixtures::hello(100)).await;
    assert_eq!(first.next_json().await["op"], 2);
    first.close().await;

    // A brand-new session dials in after the fixed backoff and restarts the
    // handshake from scratch: Identify comes again.
    let mut second = gateway.accept().await;
    second.send_json(&fixtures::hello(60_000)).await;
    assert_eq!(second.next_json().await["op"], 2);

    // The first session's 100 ms heartbeat timer is dead; with the second
    // session's cadence at 60 s, any frame now would be a leaked timer.
    second.expect_silence(Duration::from_millis(500)).await;

    second.close().await;
    supervisor.abort();
}

#[tokio::test]
async fn test_connect_failure_is_a_transport_error() {
    // Nothing is listening on this port
    let (webhook_url, _rx) = spawn_webhook_server().await;
    let session = spawn_session("ws://127.0.0.1:9", &webhook_url);

    let result = timeout(Duration::from_secs(5), session)
        .await
        .expect("connect attempt did not resolve")
        .expect("session task panicked");
    assert!(result.is_err());
}
