use anyhow::{bail, Result};
use edupredict_client::application::models::ml::{
    ExplainRequest, PredictionRequest, PredictionSubject,
};
use edupredict_client::application::{MlService, MlServiceImpl};
use edupredict_client::config::Config;
use edupredict_client::session::Session;
use edupredict_client::storage::FileTokenStore;
use edupredict_client::transport::ApiClient;
use edupredict_client::utils::logger::setup_logger;
use edupredict_client::BootstrapOutcome;
use std::env;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    setup_logger();

    let config = Config::new();
    let store = Arc::new(FileTokenStore::new(config.storage.token_file.clone()));
    let client = Arc::new(ApiClient::new(&config, store)?);

    let mut session = Session::new(client.clone());
    if !matches!(session.bootstrap(None).await, BootstrapOutcome::Authenticated(_)) {
        bail!("No usable session, run the session_bootstrap demo first");
    }

    let ml = MlServiceImpl::new(client);
    match ml.model_info().await {
        Ok(model) => info!("Active model {} trained {}", model.model_version, model.created_at),
        Err(e) if e.status() == Some(503) => {
            println!("No model trained yet: {e}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }

    let Some(student) = env::args().nth(1) else {
        println!("Usage: model_console <student-uuid>");
        return Ok(());
    };
    let subject = PredictionSubject::Student(student.parse::<Uuid>()?);

    let prediction = ml.predict(&PredictionRequest::new(&subject)).await?;
    println!(
        "{} (p={:.2}, confidence {:.2})",
        prediction.classification, prediction.risk_probability, prediction.confidence
    );

    let explanation = ml.explain(&ExplainRequest::new(&subject).with_top_k(5)).await?;
    for factor in explanation.factors {
        println!(
            "  {:<24} {:>8.2}{}  {:+.3} {}",
            factor.feature_label,
            factor.value,
            factor.unit.unwrap_or_default(),
            factor.impact,
            factor.direction
        );
    }

    Ok(())
}
