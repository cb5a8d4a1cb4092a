/******************************************************************************
   Project: edupredict-client
   Date: 16/10/26
******************************************************************************/

use crate::error::AppError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use tracing::debug;

const JSON_MEDIA_TYPE: &str = "application/json";

/// Headers for one outgoing call.
///
/// Caller headers go in first. `Accept: application/json` is then set
/// unconditionally, and the bearer token, when there is one, is applied last.
#[derive(Debug)]
pub(crate) struct RequestHeaders<'a> {
    extra: &'a [(String, String)],
    bearer: Option<&'a str>,
}

impl<'a> RequestHeaders<'a> {
    pub(crate) fn new(extra: &'a [(String, String)], bearer: Option<&'a str>) -> Self {
        Self { extra, bearer }
    }

    pub(crate) fn to_header_map(&self) -> Result<HeaderMap, AppError> {
        let mut headers = HeaderMap::new();

        for (name, value) in self.extra {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| AppError::InvalidRequest(format!("header name {name:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| AppError::InvalidRequest(format!("header {name}: {e}")))?;
            headers.insert(name, value);
        }

        headers.insert(ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));

        if let Some(token) = self.bearer {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| AppError::InvalidRequest(format!("bearer token: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        debug!(
            "Request headers: {:?}",
            headers.keys().map(HeaderName::as_str).collect::<Vec<_>>()
        );
        Ok(headers)
    }
}
