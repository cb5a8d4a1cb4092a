use edupredict_client::error::AppError;
use edupredict_client::transport::ApiRequest;
use edupredict_client::utils::logger::setup_logger;
use edupredict_client::{ApiClient, Config, MemoryTokenStore, TokenPair, TokenStore};
use mockito::{Matcher, Server};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;

fn client_with(server: &Server, store: Arc<MemoryTokenStore>) -> ApiClient {
    ApiClient::new(&Config::with_base_url(&server.url()), store).unwrap()
}

fn signed_in() -> Arc<MemoryTokenStore> {
    Arc::new(MemoryTokenStore::with_pair(TokenPair::new("A1", "R1")))
}

#[tokio::test]
async fn authenticated_get_attaches_bearer() {
    setup_logger();
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/academics/me")
        .match_header("authorization", "Bearer A1")
        .match_header("accept", "application/json")
        .with_status(200)
        .with_body(r#"{"items": [], "total": 0}"#)
        .expect(1)
        .create_async()
        .await;

    let store = signed_in();
    let client = client_with(&server, store.clone());
    let body: Value = client
        .request_with_refresh("/academics/me", &ApiRequest::get())
        .await
        .unwrap();

    assert_eq!(body, json!({"items": [], "total": 0}));
    assert_eq!(store.set_count(), 0);
    assert_eq!(store.clear_count(), 0);
    mock.assert_async().await;
}

#[tokio::test]
async fn stale_access_token_is_refreshed_and_retried() {
    setup_logger();
    let mut server = Server::new_async().await;
    let stale = server
        .mock("GET", "/ml/model")
        .match_header("authorization", "Bearer A1")
        .with_status(401)
        .with_body(r#"{"detail": "Token expired"}"#)
        .expect(1)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/auth/refresh")
        .match_header("authorization", Matcher::Missing)
        .match_body(Matcher::Json(json!({"refresh_token": "R1"})))
        .with_status(200)
        .with_body(r#"{"access_token": "A2", "refresh_token": "R2", "token_type": "bearer"}"#)
        .expect(1)
        .create_async()
        .await;
    let fresh = server
        .mock("GET", "/ml/model")
        .match_header("authorization", "Bearer A2")
        .with_status(200)
        .with_body(r#"{"model_version": "v3"}"#)
        .expect(1)
        .create_async()
        .await;

    let store = signed_in();
    let client = client_with(&server, store.clone());
    let body: Value = client
        .request_with_refresh("/ml/model", &ApiRequest::get())
        .await
        .unwrap();

    assert_eq!(body["model_version"], "v3");
    assert_eq!(store.get(), Some(TokenPair::new("A2", "R2")));
    stale.assert_async().await;
    refresh.assert_async().await;
    fresh.assert_async().await;
}

#[tokio::test]
async fn invalid_refresh_token_clears_session() {
    let mut server = Server::new_async().await;
    let original = server
        .mock("GET", "/academics/me")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;
    server
        .mock("POST", "/auth/refresh")
        .with_status(401)
        .with_body(r#"{"detail": "Invalid refresh token"}"#)
        .expect(1)
        .create_async()
        .await;

    let store = signed_in();
    let client = client_with(&server, store.clone());
    let err = client
        .request_with_refresh::<Value>("/academics/me", &ApiRequest::get())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), "Invalid refresh token");
    assert_eq!(store.get(), None);
    assert_eq!(store.clear_count(), 1);
    original.assert_async().await;
}

#[tokio::test]
async fn unrelated_failure_is_not_retried() {
    let mut server = Server::new_async().await;
    let predict = server
        .mock("POST", "/ml/predict")
        .with_status(503)
        .with_body(r#"{"detail": "no model"}"#)
        .expect(1)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/auth/refresh")
        .expect(0)
        .create_async()
        .await;

    let store = signed_in();
    let client = client_with(&server, store.clone());
    let request = ApiRequest::post()
        .json(&json!({"student_user_id": "6f1c1c4e-2f55-4f1e-9a63-0b5a5b1d2c3e"}))
        .unwrap();
    let err = client
        .request_with_refresh::<Value>("/ml/predict", &request)
        .await
        .unwrap_err();

    let api = err.as_api().unwrap();
    assert_eq!(api.status, 503);
    assert_eq!(api.message, "no model");
    assert_eq!(api.detail, json!({"detail": "no model"}));
    assert_eq!(store.get(), Some(TokenPair::new("A1", "R1")));
    predict.assert_async().await;
    refresh.assert_async().await;
}

#[tokio::test]
async fn retried_call_is_final_even_if_rejected_again() {
    let mut server = Server::new_async().await;
    let calls = server
        .mock("GET", "/auth/me")
        .with_status(401)
        .with_body(r#"{"detail": "Not authenticated"}"#)
        .expect(2)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/auth/refresh")
        .with_status(200)
        .with_body(r#"{"access_token": "A2", "refresh_token": "R2"}"#)
        .expect(1)
        .create_async()
        .await;

    let client = client_with(&server, signed_in());
    let err = client
        .request_with_refresh::<Value>("/auth/me", &ApiRequest::get())
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "Not authenticated");
    calls.assert_async().await;
    refresh.assert_async().await;
}

#[tokio::test]
async fn no_refresh_without_a_stored_session() {
    let mut server = Server::new_async().await;
    let me = server
        .mock("GET", "/auth/me")
        .match_header("authorization", Matcher::Missing)
        .with_status(401)
        .expect(1)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/auth/refresh")
        .expect(0)
        .create_async()
        .await;

    let client = client_with(&server, Arc::new(MemoryTokenStore::new()));
    let err = client
        .request_with_refresh::<Value>("/auth/me", &ApiRequest::get())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NoRefreshToken));
    me.assert_async().await;
    refresh.assert_async().await;
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let store = signed_in();
    let client = ApiClient::new(&Config::with_base_url("http://127.0.0.1:9"), store.clone()).unwrap();
    let err = client
        .request_with_refresh::<Value>("/auth/me", &ApiRequest::get())
        .await
        .unwrap_err();

    let api = err.as_api().unwrap();
    assert!(api.is_network());
    assert_eq!(api.status, 0);
    assert_eq!(api.detail["kind"], "network_error");
    assert!(api.message.contains("http://127.0.0.1:9"));
    assert_eq!(store.get(), Some(TokenPair::new("A1", "R1")));
}
