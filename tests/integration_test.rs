use serde_json::json;
use std::error::Error;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use twitch_ext::{
    encode_secret, sign_claims, verify_token, ApiError, ExtensionClaims, ExtensionClient,
    ExtensionConfig, Permissions, PublishTarget, Role, SdkError, TokenError,
};

fn config_for(server: &MockServer) -> ExtensionConfig {
    ExtensionConfig::builder()
        .owner_id("owner-1")
        .client_id("client-1")
        .secret(encode_secret(b"integration-secret"))
        .version("0.0.1")
        .config_version("1")
        .api_base_url(server.uri())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_publish_and_read_rate_limits() -> Result<(), Box<dyn Error>> {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/extensions/message/123"))
        .and(header("client-id", "client-1"))
        .respond_with(
            ResponseTemplate::new(204)
                .insert_header("Ratelimit-Ratelimitermessagesbychannel-Limit", "100")
                .insert_header("Ratelimit-Ratelimitermessagesbychannel-Remaining", "99"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ExtensionClient::new(config_for(&mock_server))?;
    let response = client
        .publish_channel_notification("123", &json!({"round": 2}))
        .await?;

    assert_eq!(response.pubsub_channel_rate_limit(), 100);
    assert_eq!(response.pubsub_channel_rate_limit_remaining(), 99);

    Ok(())
}

#[tokio::test]
async fn test_rate_limited_call_surfaces_through_sdk_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let client = ExtensionClient::new(config_for(&mock_server)).unwrap();
    let result: Result<_, SdkError> = client
        .send_chat_message("123", "hello")
        .await
        .map_err(SdkError::from);

    assert!(matches!(
        result,
        Err(SdkError::Api(ApiError::RateLimitExceeded { .. }))
    ));
}

#[tokio::test]
async fn test_get_segment_through_facade() -> Result<(), Box<dyn Error>> {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/extensions/client-1/configurations/segments/broadcaster"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "broadcaster:123": {
                "segment": {"segment_type": "broadcaster", "channel_id": "123"},
                "record": {"version": "1", "content": "{\"color\":\"red\"}"}
            }
        })))
        .mount(&mock_server)
        .await;

    let client = ExtensionClient::new(config_for(&mock_server))?;
    let response = client.get_broadcaster_segment("123").await?;
    let record = response.configuration.record.ok_or("record missing")?;
    let content: serde_json::Value = serde_json::from_str(&record.content)?;

    assert_eq!(content["color"], "red");

    Ok(())
}

#[test]
fn test_verify_frontend_token() {
    let secret = encode_secret(b"integration-secret");

    // tokens minted by the frontend helper carry exp in seconds
    let exp_seconds = now_seconds() + 60;
    let frontend = ExtensionClaims {
        opaque_user_id: Some("U98765".to_string()),
        user_id: "98765".to_string(),
        channel_id: "123".to_string(),
        role: Role::Viewer,
        unlinked: false,
        permissions: Permissions::new(
            vec![],
            vec![PublishTarget::Broadcast, PublishTarget::whisper("U98765")],
        ),
        expires_at: exp_seconds,
        issued_at: None,
    };
    let token = sign_claims(&frontend, &secret).unwrap();

    let verified = verify_token(&token, &secret).unwrap();
    assert_eq!(verified.role, Role::Viewer);
    assert_eq!(verified.opaque_user_id.as_deref(), Some("U98765"));
    assert_eq!(verified.permissions.listen().len(), 2);

    let expired = ExtensionClaims {
        expires_at: exp_seconds - 3600,
        ..frontend
    };
    let token = sign_claims(&expired, &secret).unwrap();
    assert!(matches!(
        verify_token(&token, &secret),
        Err(TokenError::InvalidToken(_))
    ));
}

fn now_seconds() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

#[test]
fn test_client_claims_are_issued_for_owner() {
    let config = ExtensionConfig::new(
        "owner-1",
        "client-1",
        encode_secret(b"integration-secret"),
        "0.0.1",
        "1",
    );
    let client = ExtensionClient::new(config).unwrap();

    let claims = client.create_claims("123", Some(Role::Broadcaster), Permissions::broadcast_send());
    assert_eq!(claims.user_id, "owner-1");

    let verified = verify_token(&client.sign(&claims).unwrap(), &encode_secret(b"integration-secret"))
        .unwrap();
    assert_eq!(verified.user_id, "owner-1");
    assert_eq!(verified.channel_id, "123");
}
