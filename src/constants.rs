/******************************************************************************
   Project: edupredict-client
   Date: 16/10/26
******************************************************************************/

pub(crate) const ACCESS_TOKEN_KEY: &str = "edupredict.access";
pub(crate) const REFRESH_TOKEN_KEY: &str = "edupredict.refresh";

pub(crate) const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub(crate) const DEFAULT_REST_TIMEOUT: u64 = 30;
pub(crate) const DEFAULT_TOKEN_FILE: &str = ".edupredict/tokens.json";

pub(crate) const LOGIN_PATH: &str = "/auth/login";
pub(crate) const REGISTER_PATH: &str = "/auth/register";
pub(crate) const REFRESH_PATH: &str = "/auth/refresh";
pub(crate) const LOGOUT_PATH: &str = "/auth/logout";
pub(crate) const ME_PATH: &str = "/auth/me";
pub(crate) const HEALTH_PATH: &str = "/health";

/// Page size bounds accepted by the list endpoints.
pub(crate) const MIN_PAGE_SIZE: u32 = 1;
pub(crate) const MAX_PAGE_SIZE: u32 = 200;
