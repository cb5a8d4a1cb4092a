use crate::constants::{HEALTH_PATH, LOGIN_PATH, LOGOUT_PATH, ME_PATH, REGISTER_PATH};
use crate::error::AppError;
use crate::session::user::{RegisterRequest, UserPublic};
use crate::storage::token_store::TokenPair;
use crate::transport::http_client::ApiClient;
use crate::transport::request::ApiRequest;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Serialize)]
struct LogoutRequest<'a> {
    refresh_token: &'a str,
}

/// Calls under `/auth`: sign-in, registration, sign-out and the current user.
#[derive(Debug, Clone)]
pub struct AuthService {
    client: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// Signs in with email and password and stores the issued pair.
    ///
    /// The endpoint expects an OAuth2 password form, so the email goes in
    /// the `username` field.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AppError> {
        let request = ApiRequest::post()
            .form(&[("username", email), ("password", password)])
            .without_auth();

        let pair: TokenPair = self.client.request(LOGIN_PATH, &request).await?;
        self.client.keep_pair(&pair)?;
        info!("Signed in as {}", email);
        Ok(pair)
    }

    #[instrument(skip(self, body), fields(email = %body.email))]
    pub async fn register(&self, body: &RegisterRequest) -> Result<UserPublic, AppError> {
        let request = ApiRequest::post().json(body)?.without_auth();
        self.client.request(REGISTER_PATH, &request).await
    }

    /// Revokes the refresh token server-side and forgets the local session.
    ///
    /// The store is cleared whether or not the server call succeeds; its
    /// outcome is still returned. With no refresh token stored nothing is sent.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), AppError> {
        let Some(tokens) = self.client.store().get() else {
            debug!("No session to sign out of");
            self.client.store().clear();
            return Ok(());
        };

        let result = match ApiRequest::post().json(&LogoutRequest {
            refresh_token: &tokens.refresh_token,
        }) {
            Ok(request) => self.client.request::<()>(LOGOUT_PATH, &request).await,
            Err(e) => Err(e),
        };
        self.client.store().clear();

        if let Err(ref e) = result {
            warn!("Logout call failed, local session cleared anyway: {}", e);
        }
        result
    }

    pub async fn me(&self) -> Result<UserPublic, AppError> {
        self.client
            .request_with_refresh(ME_PATH, &ApiRequest::get())
            .await
    }

    /// Unauthenticated liveness probe.
    pub async fn health(&self) -> Result<(), AppError> {
        self.client
            .request::<Value>(HEALTH_PATH, &ApiRequest::get().without_auth())
            .await
            .map(|_| ())
    }
}
