use crate::config::Config;
use crate::constants::REFRESH_PATH;
use crate::error::AppError;
use crate::storage::token_store::{TokenPair, TokenStore};
use crate::transport::headers::RequestHeaders;
use crate::transport::normalizer::{network_error, normalize_response};
use crate::transport::request::{ApiRequest, PartValue, RequestBody};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

/// Anything that can run an authenticated call against the API.
///
/// [`ApiClient`] implements it with the refresh-and-retry policy; the
/// application services are generic over it.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    async fn send<T>(&self, path: &str, request: ApiRequest) -> Result<T, AppError>
    where
        T: DeserializeOwned + Send + 'static;
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// HTTP gateway to the EduPredict API.
///
/// Owns the reqwest client, the resolved base URL and the injected
/// [`TokenStore`]. Refreshes are serialized so concurrent 401s on the same
/// stale token cause a single `/auth/refresh` call.
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
    refresh_guard: Mutex<()>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{\"base_url\":\"{}\"}}", self.base_url)
    }
}

impl ApiClient {
    /// Creates a new client.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration holding the base URL and request timeout.
    /// * `store` - Where the session's token pair lives.
    ///
    /// # Returns
    ///
    /// The client, or `AppError::Config` when no base URL is available for
    /// the configured environment.
    pub fn new(config: &Config, store: Arc<dyn TokenStore>) -> Result<Self, AppError> {
        let base_url = config.base_url()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.rest_api.timeout))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {e}")))?;

        info!("API client ready for {}", base_url);
        Ok(Self {
            client,
            base_url,
            store,
            refresh_guard: Mutex::new(()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Issues one call without any retry.
    ///
    /// Attaches the stored access token when `request.auth` is set, decodes a
    /// success body as `T` (a 204 or empty body decodes from `null`), and
    /// normalizes every failure into an `AppError::Api`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        request: &ApiRequest,
    ) -> Result<T, AppError> {
        self.send_once(path, request).await.0
    }

    /// Exchanges the stored refresh token for a new pair and stores it.
    ///
    /// Fails with `AppError::NoRefreshToken`, without touching the network,
    /// when nothing is stored. A rejected refresh clears the store before the
    /// error is returned; a transport failure leaves it alone. A new pair the
    /// store fails to keep is an `AppError::Io`.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<TokenPair, AppError> {
        let existing = self.store.get().ok_or(AppError::NoRefreshToken)?;

        let request = ApiRequest::post()
            .json(&RefreshRequest {
                refresh_token: &existing.refresh_token,
            })?
            .without_auth();

        match self.request::<TokenPair>(REFRESH_PATH, &request).await {
            Ok(pair) if pair.is_complete() => {
                self.keep_pair(&pair)?;
                info!("Session tokens refreshed");
                Ok(pair)
            }
            Ok(_) => {
                self.store.clear();
                error!("Refresh endpoint returned an incomplete token pair");
                Err(AppError::Api(normalize_response(
                    StatusCode::BAD_GATEWAY.as_u16(),
                    b"Refresh response is missing a token",
                )))
            }
            Err(AppError::Api(e)) if e.is_network() => {
                warn!("Refresh failed before reaching the server: {}", e);
                Err(AppError::Api(e))
            }
            Err(e) => {
                self.store.clear();
                warn!("Refresh rejected, session cleared: {}", e);
                Err(e)
            }
        }
    }

    /// Stores a freshly issued pair and reads it back.
    ///
    /// A store that did not keep the pair is cleared and reported as
    /// `AppError::Io`, so callers never carry on with tokens the store lost.
    pub(crate) fn keep_pair(&self, pair: &TokenPair) -> Result<(), AppError> {
        self.store.set(pair);
        if self.store.get().as_ref() == Some(pair) {
            return Ok(());
        }
        self.store.clear();
        error!("Token store did not keep the issued pair, session cleared");
        Err(AppError::Io(io::Error::other(
            "token store did not keep the issued token pair",
        )))
    }

    /// Issues a call, and on a 401 refreshes the session and retries it once.
    ///
    /// Every other failure is returned as is. The retried call's outcome is
    /// final whatever it is, and a failed refresh is returned instead of the
    /// original 401.
    #[instrument(skip(self, request), fields(method = %request.method))]
    pub async fn request_with_refresh<T: DeserializeOwned>(
        &self,
        path: &str,
        request: &ApiRequest,
    ) -> Result<T, AppError> {
        let (result, sent_token) = self.send_once(path, request).await;
        match result {
            Err(e) if e.is_unauthorized() => {
                debug!("{} rejected with 401, refreshing session", path);
                self.refresh_after_rejection(sent_token.as_deref()).await?;
                self.request(path, request).await
            }
            other => other,
        }
    }

    async fn refresh_after_rejection(&self, rejected: Option<&str>) -> Result<(), AppError> {
        let _guard = self.refresh_guard.lock().await;

        if let (Some(current), Some(rejected)) = (self.store.get(), rejected) {
            if current.access_token != rejected {
                debug!("Session already refreshed by a concurrent call");
                return Ok(());
            }
        }

        self.refresh().await.map(|_| ())
    }

    /// Runs the call and also reports which access token (if any) was sent.
    async fn send_once<T: DeserializeOwned>(
        &self,
        path: &str,
        request: &ApiRequest,
    ) -> (Result<T, AppError>, Option<String>) {
        let bearer = if request.auth {
            self.store.get().map(|pair| pair.access_token)
        } else {
            None
        };
        let result = self.execute(path, request, bearer.as_deref()).await;
        (result, bearer)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        path: &str,
        request: &ApiRequest,
        bearer: Option<&str>,
    ) -> Result<T, AppError> {
        let url = self.url(path);
        debug!("Sending {} request to {}", request.method, url);

        let builder = self.build(&url, request, bearer)?;
        let response = builder.send().await.map_err(|e| {
            error!("Failed to send {} request to {}: {}", request.method, url, e);
            network_error(&self.base_url, &e)
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            error!("Failed to read response body from {}: {}", url, e);
            network_error(&self.base_url, &e)
        })?;
        debug!("Response Status: {}", status);

        if !status.is_success() {
            let err = normalize_response(status.as_u16(), &body);
            warn!(
                "{} {} failed. Status: {}, Message: {}",
                request.method, url, status, err.message
            );
            return Err(err.into());
        }

        if status == StatusCode::NO_CONTENT || body.is_empty() {
            return Ok(serde_json::from_value(Value::Null)?);
        }

        serde_json::from_slice(&body).map_err(|e| {
            error!("Failed to deserialize response body from {}: {}", url, e);
            AppError::Json(e)
        })
    }

    fn build(
        &self,
        url: &str,
        request: &ApiRequest,
        bearer: Option<&str>,
    ) -> Result<RequestBuilder, AppError> {
        let headers = RequestHeaders::new(&request.headers, bearer).to_header_map()?;
        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .headers(headers);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(fields) => builder.form(fields),
            RequestBody::Multipart(parts) => {
                let mut form = Form::new();
                for part in parts {
                    form = match &part.value {
                        PartValue::Text(text) => form.text(part.name.clone(), text.clone()),
                        PartValue::File {
                            file_name,
                            mime,
                            bytes,
                        } => {
                            let mut file = Part::bytes(bytes.clone()).file_name(file_name.clone());
                            if let Some(mime) = mime {
                                file = file.mime_str(mime).map_err(|e| {
                                    AppError::InvalidRequest(format!("mime type {mime}: {e}"))
                                })?;
                            }
                            form.part(part.name.clone(), file)
                        }
                    };
                }
                builder.multipart(form)
            }
        };

        Ok(builder)
    }
}

#[async_trait]
impl ApiGateway for ApiClient {
    async fn send<T>(&self, path: &str, request: ApiRequest) -> Result<T, AppError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.request_with_refresh(path, &request).await
    }
}
