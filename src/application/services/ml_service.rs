use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    application::models::ml::{
        ExplainRequest, ExplainResponse, ModelInfo, ModelListResponse, PredictionRequest,
        PredictionResponse, PromoteResponse, TrainRequest, TrainResponse,
    },
    application::services::page_limit,
    error::AppError,
    transport::http_client::ApiGateway,
    transport::request::ApiRequest,
};

/// Risk model console: the active model, its history, training and scoring.
///
/// A `503` from these endpoints means no model has been trained yet; it is
/// returned to the caller unchanged.
#[async_trait]
pub trait MlService: Send + Sync {
    async fn model_info(&self) -> Result<ModelInfo, AppError>;

    async fn list_models(&self, limit: u32) -> Result<ModelListResponse, AppError>;

    async fn promote(&self, model_version: &str) -> Result<PromoteResponse, AppError>;

    async fn train(&self, request: &TrainRequest) -> Result<TrainResponse, AppError>;

    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse, AppError>;

    async fn explain(&self, request: &ExplainRequest) -> Result<ExplainResponse, AppError>;
}

pub struct MlServiceImpl<T: ApiGateway> {
    client: Arc<T>,
}

impl<T: ApiGateway> MlServiceImpl<T> {
    pub fn new(client: Arc<T>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<T: ApiGateway + 'static> MlService for MlServiceImpl<T> {
    async fn model_info(&self) -> Result<ModelInfo, AppError> {
        let info: ModelInfo = self.client.send("/ml/model", ApiRequest::get()).await?;
        debug!("Active model {}", info.model_version);
        Ok(info)
    }

    async fn list_models(&self, limit: u32) -> Result<ModelListResponse, AppError> {
        let request = ApiRequest::get().query("limit", page_limit(limit));
        let result: ModelListResponse = self.client.send("/ml/models", request).await?;
        debug!(
            "Loaded {} models, latest {:?}",
            result.items.len(),
            result.latest_version
        );
        Ok(result)
    }

    async fn promote(&self, model_version: &str) -> Result<PromoteResponse, AppError> {
        info!("Promoting model {}", model_version);
        let path = format!("/ml/models/{}/promote", urlencoding::encode(model_version));
        self.client.send(&path, ApiRequest::post()).await
    }

    async fn train(&self, request: &TrainRequest) -> Result<TrainResponse, AppError> {
        info!("Training a new model");
        let result: TrainResponse = self
            .client
            .send("/ml/train", ApiRequest::post().json(request)?)
            .await?;
        info!("Trained model {}", result.model.model_version);
        Ok(result)
    }

    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse, AppError> {
        let result: PredictionResponse = self
            .client
            .send("/ml/predict", ApiRequest::post().json(request)?)
            .await?;
        debug!(
            "Prediction {} (p={:.3}) from {}",
            result.classification, result.risk_probability, result.model_version
        );
        Ok(result)
    }

    async fn explain(&self, request: &ExplainRequest) -> Result<ExplainResponse, AppError> {
        self.client
            .send("/ml/explain", ApiRequest::post().json(request)?)
            .await
    }
}
