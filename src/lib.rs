/******************************************************************************
   Project: edupredict-client
   Date: 16/10/26
******************************************************************************/

//! Client access layer for the EduPredict student-risk API.
//!
//! Every call goes through [`transport::ApiClient`], which attaches the
//! stored bearer token, turns failures into a single [`error::ApiError`]
//! shape and, on a `401`, refreshes the session once and retries once.
//! [`session::Session`] builds on it to restore the signed-in user at
//! start-up, and the services under [`application`] wrap the academics,
//! ML and user endpoints.

pub mod config;

pub mod application;

pub(crate) mod constants;

pub mod error;

pub mod session;

pub mod storage;

pub mod transport;

pub mod utils;

pub use config::Config;
pub use error::{ApiError, AppError};
pub use session::{BootstrapOutcome, Session};
pub use storage::{FileTokenStore, MemoryTokenStore, TokenPair, TokenStore};
pub use transport::{ApiClient, ApiGateway, ApiRequest};
