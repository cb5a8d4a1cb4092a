use edupredict_client::session::Section;
use edupredict_client::storage::FileTokenStore;
use edupredict_client::{ApiClient, BootstrapOutcome, Config, Session, TokenPair, TokenStore};
use mockito::Server;
use pretty_assertions::assert_eq;
use std::sync::Arc;

const TEACHER_BODY: &str = r#"{
    "id": "0b7b1c52-8f0e-4a43-a7a4-4f8f2c6f0e11",
    "email": "turing@example.com",
    "full_name": "Alan Turing",
    "role": "teacher",
    "is_active": true
}"#;

#[tokio::test]
async fn session_survives_restart_through_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tokens.json");
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/auth/login")
        .with_status(200)
        .with_body(r#"{"access_token": "A1", "refresh_token": "R1"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/auth/me")
        .match_header("authorization", "Bearer A1")
        .with_status(200)
        .with_body(TEACHER_BODY)
        .expect(2)
        .create_async()
        .await;

    let config = Config::with_base_url(&server.url());
    {
        let store = Arc::new(FileTokenStore::new(&path));
        let mut session = Session::new(Arc::new(ApiClient::new(&config, store).unwrap()));
        session.sign_in("turing@example.com", "enigma-1940").await.unwrap();
    }

    let store = Arc::new(FileTokenStore::new(&path));
    assert_eq!(store.get(), Some(TokenPair::new("A1", "R1")));

    let mut session = Session::new(Arc::new(ApiClient::new(&config, store).unwrap()));
    let outcome = session.bootstrap(Some("/records")).await;

    assert!(matches!(outcome, BootstrapOutcome::Authenticated(_)));
    assert_eq!(
        session.sections(),
        vec![Section::Dashboard, Section::Records, Section::Import]
    );
}

#[tokio::test]
async fn expired_session_is_refreshed_during_bootstrap() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileTokenStore::new(dir.path().join("tokens.json")));
    store.set(&TokenPair::new("A1", "R1"));

    let mut server = Server::new_async().await;
    server
        .mock("GET", "/auth/me")
        .match_header("authorization", "Bearer A1")
        .with_status(401)
        .create_async()
        .await;
    server
        .mock("POST", "/auth/refresh")
        .with_status(200)
        .with_body(r#"{"access_token": "A2", "refresh_token": "R2"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/auth/me")
        .match_header("authorization", "Bearer A2")
        .with_status(200)
        .with_body(TEACHER_BODY)
        .create_async()
        .await;

    let client = ApiClient::new(&Config::with_base_url(&server.url()), store.clone()).unwrap();
    let mut session = Session::new(Arc::new(client));
    let outcome = session.bootstrap(None).await;

    assert!(matches!(outcome, BootstrapOutcome::Authenticated(_)));
    assert_eq!(store.get(), Some(TokenPair::new("A2", "R2")));
}
