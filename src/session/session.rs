/******************************************************************************
   Project: edupredict-client
   Date: 16/10/26
******************************************************************************/

use crate::error::AppError;
use crate::session::auth::AuthService;
use crate::session::user::{Section, UserPublic};
use crate::storage::token_store::TokenPair;
use crate::transport::http_client::ApiClient;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const DEFAULT_LANDING: &str = "/dashboard";
const NOT_READY: &str = "The service is not ready yet.";

/// Result of loading the signed-in user when the application starts.
#[derive(Debug, Clone, PartialEq)]
pub enum BootstrapOutcome {
    Authenticated(UserPublic),
    /// The backend is up but would not accept the session.
    SignInRequired { next: String },
    /// The backend could not be reached or is not ready; stay put and show this.
    BackendOffline(String),
}

impl BootstrapOutcome {
    /// Sign-in route that returns to `next` afterwards, for `SignInRequired`.
    pub fn login_path(&self) -> Option<String> {
        match self {
            BootstrapOutcome::SignInRequired { next } => {
                Some(format!("/login?next={}", urlencoding::encode(next)))
            }
            _ => None,
        }
    }
}

/// The signed-in user as the application sees it.
///
/// Holds the profile from the last successful bootstrap or sign-in; it is
/// dropped on sign-out and whenever a bootstrap fails.
#[derive(Debug)]
pub struct Session {
    auth: AuthService,
    me: Option<UserPublic>,
}

impl Session {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            auth: AuthService::new(client),
            me: None,
        }
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn me(&self) -> Option<&UserPublic> {
        self.me.as_ref()
    }

    pub fn sections(&self) -> Vec<Section> {
        self.me.as_ref().map(UserPublic::sections).unwrap_or_default()
    }

    /// Loads the current user, telling a rejected session apart from an
    /// unreachable backend.
    ///
    /// When `/auth/me` fails (after the usual refresh-and-retry), an
    /// unauthenticated `/health` probe decides: a healthy backend means the
    /// session is no good and the user has to sign in again; anything else
    /// means the backend is the problem.
    #[instrument(skip(self))]
    pub async fn bootstrap(&mut self, next: Option<&str>) -> BootstrapOutcome {
        let me_error = match self.auth.me().await {
            Ok(user) => {
                info!("Session restored for {} ({})", user.email, user.role);
                self.me = Some(user.clone());
                return BootstrapOutcome::Authenticated(user);
            }
            Err(e) => e,
        };
        self.me = None;
        debug!("Loading current user failed: {}", me_error);

        match self.auth.health().await {
            Ok(()) => BootstrapOutcome::SignInRequired {
                next: next.unwrap_or(DEFAULT_LANDING).to_string(),
            },
            Err(AppError::Api(e)) if e.is_network() => {
                warn!("Backend unreachable: {}", e);
                BootstrapOutcome::BackendOffline(e.message)
            }
            Err(e) => {
                warn!("Backend not ready: {}", e);
                BootstrapOutcome::BackendOffline(NOT_READY.to_string())
            }
        }
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<UserPublic, AppError> {
        let _: TokenPair = self.auth.login(email, password).await?;
        let user = self.auth.me().await?;
        self.me = Some(user.clone());
        Ok(user)
    }

    pub async fn sign_out(&mut self) -> Result<(), AppError> {
        self.me = None;
        self.auth.logout().await
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"client\":{},\"user\":{}}}",
            self.auth.client(),
            self.me
                .as_ref()
                .map_or("null".to_string(), |me| format!("\"{}\"", me.email))
        )
    }
}
