mod common;

use std::time::Duration;

use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::http_mock::{mount_refresh, mount_stations, stations_body, token_body, ResponseBody};
use netatmo::NetatmoError;

#[tokio::test]
async fn exchange_authenticates_without_notifying() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=good-code"))
        .and(body_string_contains("state=s1"))
        .and(body_string_contains("redirect_uri=https%3A%2F%2Fcb"))
        .and(body_string_contains("client_id=a"))
        .and(body_string_contains("client_secret=b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("acc", Some("ref"))))
        .expect(1)
        .mount(&server)
        .await;

    let (client, seen) = common::recording_client(&server.uri());
    client.auth_code_url("https://cb", "s1").unwrap();
    client.exchange("good-code", "s1").await.unwrap();

    assert!(client.is_authenticated());
    let token = client.current_token().await.unwrap();
    assert_eq!(token.access_token, "acc");
    assert_eq!(token.refresh_token, "ref");
    assert!(token.is_valid());
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn rejected_exchange_leaves_client_unauthenticated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "code expired"
        })))
        .mount(&server)
        .await;

    let (client, _) = common::recording_client(&server.uri());
    let err = client.exchange("stale-code", "s1").await.unwrap_err();
    assert!(matches!(err, NetatmoError::ExchangeFailed(_)));
    assert!(err.to_string().contains("invalid_grant"));

    let err = client.current_token().await.unwrap_err();
    assert!(matches!(err, NetatmoError::NotAuthenticated));
}

#[tokio::test]
async fn failed_exchange_keeps_previous_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down"))
        .mount(&server)
        .await;

    let (client, _) = common::recording_client(&server.uri());
    client.init_with_token(common::fresh_token("kept", "r"));
    assert!(client.exchange("code", "s").await.is_err());
    assert_eq!(client.current_token().await.unwrap().access_token, "kept");
}

#[tokio::test]
async fn expired_token_is_refreshed_and_reported_once() {
    let server = MockServer::start().await;
    mount_refresh(&server, "new-acc", Some("r2"), Duration::ZERO, 1).await;

    let (client, seen) = common::recording_client(&server.uri());
    client.init_with_token(common::expired_token("old-acc", "r1"));

    let first = client.current_token().await.unwrap();
    let second = client.current_token().await.unwrap();
    assert_eq!(first.access_token, "new-acc");
    assert_eq!(second.access_token, "new-acc");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].access_token, "new-acc");
    assert_eq!(seen[0].refresh_token, "r2");
}

#[tokio::test]
async fn refresh_carries_over_refresh_token_when_not_rotated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("refresh_token=r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("new-acc", None)))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = common::recording_client(&server.uri());
    client.init_with_token(common::expired_token("old-acc", "r1"));

    let token = client.current_token().await.unwrap();
    assert_eq!(token.access_token, "new-acc");
    assert_eq!(token.refresh_token, "r1");
}

#[tokio::test]
async fn refresh_failure_propagates_without_notifying() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant"
        })))
        .mount(&server)
        .await;

    let (client, seen) = common::recording_client(&server.uri());
    client.init_with_token(common::expired_token("old-acc", "revoked"));

    let err = client.current_token().await.unwrap_err();
    assert!(matches!(err, NetatmoError::RefreshFailed(_)));
    assert!(seen.lock().unwrap().is_empty());
    assert!(client.is_authenticated());
}

#[tokio::test]
async fn read_sends_bearer_token_and_decodes_stations() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/getstationsdata"))
        .and(header("Authorization", "Bearer acc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stations_body()))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = common::recording_client(&server.uri());
    client.init_with_token(common::fresh_token("acc", "ref"));

    let stations = client.read().await.unwrap();
    assert_eq!(stations.devices().len(), 1);
    assert_eq!(stations.devices()[0].display_name(), "Home");
    assert_eq!(stations.devices()[0].modules[0].display_name(), "Outdoor");
}

#[tokio::test]
async fn read_refreshes_expired_token_before_request() {
    let server = MockServer::start().await;
    mount_refresh(&server, "new-acc", Some("r2"), Duration::ZERO, 1).await;
    Mock::given(method("GET"))
        .and(path("/api/getstationsdata"))
        .and(header("Authorization", "Bearer new-acc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stations_body()))
        .expect(1)
        .mount(&server)
        .await;

    let (client, seen) = common::recording_client(&server.uri());
    client.init_with_token(common::expired_token("old-acc", "r1"));

    client.read().await.unwrap();
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn read_surfaces_structured_upstream_error() {
    let server = MockServer::start().await;
    mount_stations(
        &server,
        403,
        ResponseBody::Json(serde_json::json!({
            "error": {"code": 26, "message": "User usage reached"}
        })),
    )
    .await;

    let (client, _) = common::recording_client(&server.uri());
    client.init_with_token(common::fresh_token("acc", "ref"));

    match client.read().await.unwrap_err() {
        NetatmoError::Upstream {
            status,
            code,
            message,
        } => {
            assert_eq!(status, 403);
            assert_eq!(code, 26);
            assert_eq!(message, "User usage reached");
        }
        other => panic!("expected structured upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn read_echoes_unstructured_upstream_error() {
    let server = MockServer::start().await;
    mount_stations(&server, 503, ResponseBody::Raw("maintenance".into())).await;

    let (client, _) = common::recording_client(&server.uri());
    client.init_with_token(common::fresh_token("acc", "ref"));

    let err = client.read().await.unwrap_err();
    assert!(matches!(
        err,
        NetatmoError::UpstreamUnstructured { status: 503, ref body } if body == "maintenance"
    ));
}

#[tokio::test]
async fn read_rejects_malformed_station_data() {
    let server = MockServer::start().await;
    mount_stations(&server, 200, ResponseBody::Raw("{\"body\": 42}".into())).await;

    let (client, _) = common::recording_client(&server.uri());
    client.init_with_token(common::fresh_token("acc", "ref"));

    let err = client.read().await.unwrap_err();
    assert_eq!(err.code(), "parse_error");
}
