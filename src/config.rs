use crate::constants::{DEFAULT_BASE_URL, DEFAULT_REST_TIMEOUT, DEFAULT_TOKEN_FILE};
use crate::error::AppError;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fmt::Debug;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{error, warn};

pub const BASE_URL_ENV: &str = "EDUPREDICT_API_BASE_URL";
pub const TIMEOUT_ENV: &str = "EDUPREDICT_REST_TIMEOUT";
pub const ENVIRONMENT_ENV: &str = "EDUPREDICT_ENV";
pub const TOKEN_FILE_ENV: &str = "EDUPREDICT_TOKEN_FILE";

/// Deployment flavour. Only decides what happens when no base URL is configured.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" | "test" => Ok(Environment::Development),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub rest_api: RestApiConfig,
    pub storage: StorageConfig,
    pub environment: Environment,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RestApiConfig {
    pub base_url: Option<String>,
    pub timeout: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub token_file: PathBuf,
}

impl RestApiConfig {
    /// Returns the base URL requests are resolved against, without a trailing slash.
    ///
    /// A missing value falls back to the local development server unless the
    /// deployment is `Production`, in which case it is a configuration error.
    pub fn resolve_base_url(&self, environment: Environment) -> Result<String, AppError> {
        match self.base_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => {
                Ok(url.strip_suffix('/').unwrap_or(url).to_string())
            }
            _ if environment == Environment::Production => {
                error!("{} is not set in production", BASE_URL_ENV);
                Err(AppError::Config(format!("{BASE_URL_ENV} is not set")))
            }
            _ => {
                warn!(
                    "{} is not set, falling back to {}",
                    BASE_URL_ENV, DEFAULT_BASE_URL
                );
                Ok(DEFAULT_BASE_URL.to_string())
            }
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"rest_api\":{},\"storage\":{},\"environment\":\"{}\"}}",
            self.rest_api, self.storage, self.environment
        )
    }
}

impl fmt::Display for RestApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"base_url\":{},\"timeout\":{}}}",
            self.base_url
                .as_ref()
                .map_or("null".to_string(), |url| format!("\"{url}\"")),
            self.timeout
        )
    }
}

impl fmt::Display for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{\"token_file\":\"{}\"}}", self.token_file.display())
    }
}

pub fn get_env_or_default<T: FromStr>(env_var: &str, default: T) -> T
where
    <T as FromStr>::Err: Debug,
{
    match env::var(env_var) {
        Ok(val) => val.parse::<T>().unwrap_or_else(|_| {
            error!("Failed to parse {}: {}, using default", env_var, val);
            default
        }),
        Err(_) => default,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Config {
            rest_api: RestApiConfig {
                base_url: env::var(BASE_URL_ENV)
                    .ok()
                    .filter(|url| !url.trim().is_empty()),
                timeout: get_env_or_default(TIMEOUT_ENV, DEFAULT_REST_TIMEOUT),
            },
            storage: StorageConfig {
                token_file: get_env_or_default(
                    TOKEN_FILE_ENV,
                    PathBuf::from(DEFAULT_TOKEN_FILE),
                ),
            },
            environment: get_env_or_default(ENVIRONMENT_ENV, Environment::Development),
        }
    }

    /// Configuration pointing at an explicit server, handy for tests and scripts.
    pub fn with_base_url(base_url: &str) -> Self {
        let mut config = Self::new();
        config.rest_api.base_url = Some(base_url.to_string());
        config
    }

    pub fn base_url(&self) -> Result<String, AppError> {
        self.rest_api.resolve_base_url(self.environment)
    }
}
