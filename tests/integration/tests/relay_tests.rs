//! Delivery and REST collaborator tests
//!
//! Exercise the webhook delivery client and the channel-creation call
//! against in-process receivers.
//!
//! Run with: cargo test -p integration-tests --test relay_tests

use integration_tests::{recv_within, spawn_channel_api, spawn_webhook_server};
use mirror_relay::channels::{ChannelApi, CreateChannelRequest};
use mirror_relay::{MessageSink, NormalizedMessage, WebhookClient};
use serde_json::json;

fn message(destination_url: String) -> NormalizedMessage {
    NormalizedMessage {
        username: "someone#4242 [BOT]".to_string(),
        avatar_url: "https://cdn.discordapp.com/avatars/1/a_x.gif".to_string(),
        content: "mirrored".to_string(),
        files: Some(vec!["https://example.com/a.png".to_string()]),
        embeds: None,
        destination_url,
    }
}

#[tokio::test]
async fn test_webhook_client_posts_delivery_body() {
    let (webhook_url, mut rx) = spawn_webhook_server().await;
    let client = WebhookClient::new(reqwest::Client::new());

    client.deliver(message(webhook_url)).await;

    let body = recv_within(&mut rx).await;
    assert_eq!(body["username"], "someone#4242 [BOT]");
    assert_eq!(body["avatarURL"], "https://cdn.discordapp.com/avatars/1/a_x.gif");
    assert_eq!(body["content"], "mirrored");
    assert_eq!(body["files"], json!(["https://example.com/a.png"]));
    assert!(body.get("embeds").is_none());
}

#[tokio::test]
async fn test_webhook_delivery_failure_is_swallowed() {
    // Nothing is listening on this port; delivery must not panic or error
    let client = WebhookClient::new(reqwest::Client::new());
    client
        .deliver(message("http://127.0.0.1:9/hook".to_string()))
        .await;
}

#[tokio::test]
async fn test_create_channel_sends_authorized_request() {
    let (base_url, mut rx) = spawn_channel_api().await;
    let api = ChannelApi::with_base_url(
        reqwest::Client::new(),
        Some("test-token".to_string()),
        base_url,
    );

    let request = CreateChannelRequest {
        name: "mirror-general".to_string(),
        parent_id: Some("999".to_string()),
        position: 3,
    };
    let resource = api.create_channel("222", &request).await.unwrap();
    assert_eq!(resource.id, "424242");
    assert_eq!(resource.name.as_deref(), Some("mirror-general"));

    let recorded = recv_within(&mut rx).await;
    assert_eq!(recorded.guild_id, "222");
    assert_eq!(recorded.authorization.as_deref(), Some("test-token"));
    assert_eq!(recorded.body["name"], "mirror-general");
    assert_eq!(recorded.body["parent_id"], "999");
    assert_eq!(recorded.body["position"], 3);
}

#[tokio::test]
async fn test_create_channel_without_token_omits_authorization() {
    let (base_url, mut rx) = spawn_channel_api().await;
    let api = ChannelApi::with_base_url(reqwest::Client::new(), None, base_url);

    let request = CreateChannelRequest {
        name: "mirror-general".to_string(),
        parent_id: None,
        position: 0,
    };
    api.create_channel("222", &request).await.unwrap();

    let recorded = recv_within(&mut rx).await;
    assert!(recorded.authorization.is_none());
}
