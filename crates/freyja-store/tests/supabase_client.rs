//! Integration tests for `SupabaseClient` against a `wiremock` backend.

use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use freyja_core::SupabaseSettings;
use freyja_store::{StoreError, SupabaseClient};

const USER_ID: &str = "6f1c2f9e-3d43-4b8e-9a77-2f0c8d1e5a10";

fn client(server: &MockServer) -> SupabaseClient {
    SupabaseClient::new(SupabaseSettings {
        url: format!("{}/", server.uri()),
        anon_key: "anon-key".to_string(),
        service_role_key: "service-key".to_string(),
    })
    .expect("failed to build test client")
}

fn user_id() -> Uuid {
    Uuid::parse_str(USER_ID).expect("valid uuid")
}

// ---------------------------------------------------------------------------
// authenticate_user
// ---------------------------------------------------------------------------

#[tokio::test]
async fn authenticate_user_returns_user_for_valid_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": USER_ID,
            "email": "owner@example.com",
            "role": "authenticated"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = client(&server)
        .authenticate_user("user-token")
        .await
        .expect("token accepted");
    assert_eq!(user.id, user_id());
    assert_eq!(user.email.as_deref(), Some("owner@example.com"));
}

#[tokio::test]
async fn authenticate_user_maps_401_to_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": 401,
            "msg": "invalid JWT"
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .authenticate_user("expired")
        .await
        .expect_err("token rejected");
    assert!(matches!(err, StoreError::Unauthorized), "got: {err:?}");
}

#[tokio::test]
async fn authenticate_user_reports_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client(&server)
        .authenticate_user("token")
        .await
        .expect_err("server error");
    assert!(
        matches!(err, StoreError::UnexpectedStatus { status: 500, .. }),
        "got: {err:?}"
    );
}

// ---------------------------------------------------------------------------
// fetch_completion_api_key
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_completion_api_key_returns_trimmed_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/settings"))
        .and(query_param("user_id", format!("eq.{USER_ID}")))
        .and(query_param("select", "openai_api_key"))
        .and(query_param("limit", "1"))
        .and(header("apikey", "service-key"))
        .and(header("authorization", "Bearer service-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "openai_api_key": " sk-user \n" }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let key = client(&server)
        .fetch_completion_api_key(user_id())
        .await
        .expect("key configured");
    assert_eq!(key, "sk-user");
}

#[tokio::test]
async fn fetch_completion_api_key_without_row_is_missing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = client(&server)
        .fetch_completion_api_key(user_id())
        .await
        .expect_err("no settings row");
    assert!(matches!(err, StoreError::MissingApiKey), "got: {err:?}");
}

#[tokio::test]
async fn fetch_completion_api_key_null_or_blank_is_missing() {
    for row in [json!({ "openai_api_key": null }), json!({ "openai_api_key": "  " })] {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/settings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([row])))
            .mount(&server)
            .await;

        let err = client(&server)
            .fetch_completion_api_key(user_id())
            .await
            .expect_err("key not usable");
        assert!(matches!(err, StoreError::MissingApiKey), "got: {err:?}");
    }
}

#[tokio::test]
async fn fetch_completion_api_key_reports_bad_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client(&server)
        .fetch_completion_api_key(user_id())
        .await
        .expect_err("bad payload");
    assert!(matches!(err, StoreError::Deserialize(_)), "got: {err:?}");
}
