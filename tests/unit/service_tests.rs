use edupredict_client::application::models::ml::{PredictionRequest, PredictionSubject};
use edupredict_client::application::{AcademicService, AcademicServiceImpl, MlService, MlServiceImpl};
use edupredict_client::{ApiClient, Config, MemoryTokenStore, TokenPair, TokenStore};
use mockito::{Matcher, Server};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use uuid::Uuid;

#[tokio::test]
async fn services_share_one_session() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/academics/me")
        .match_query(Matcher::Any)
        .match_header("authorization", "Bearer A1")
        .with_status(401)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/auth/refresh")
        .with_status(200)
        .with_body(r#"{"access_token": "A2", "refresh_token": "R2"}"#)
        .expect(1)
        .create_async()
        .await;
    server
        .mock("GET", "/academics/me")
        .match_query(Matcher::Any)
        .match_header("authorization", "Bearer A2")
        .with_status(200)
        .with_body(r#"{"items": [], "total": 0}"#)
        .create_async()
        .await;
    let predict = server
        .mock("POST", "/ml/predict")
        .match_header("authorization", "Bearer A2")
        .with_status(200)
        .with_body(
            r#"{"classification": "At-Risk", "risk_probability": 0.81,
                "confidence": 0.62, "threshold": 0.5, "model_version": "v3"}"#,
        )
        .create_async()
        .await;

    let store = Arc::new(MemoryTokenStore::with_pair(TokenPair::new("A1", "R1")));
    let client = Arc::new(
        ApiClient::new(&Config::with_base_url(&server.url()), store.clone()).unwrap(),
    );
    let academics = AcademicServiceImpl::new(client.clone());
    let ml = MlServiceImpl::new(client);

    let records = academics.list_mine(50, 0).await.unwrap();
    let prediction = ml
        .predict(&PredictionRequest::new(&PredictionSubject::Student(Uuid::nil())))
        .await
        .unwrap();

    assert_eq!(records.total, 0);
    assert!(prediction.is_at_risk());
    assert_eq!(store.get(), Some(TokenPair::new("A2", "R2")));
    refresh.assert_async().await;
    predict.assert_async().await;
}
