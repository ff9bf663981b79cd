use std::{fmt, time::Duration};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{QueryParams, UpstreamClient};
use crate::error::UpstreamError;

pub const TMDB_V3_BASE: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const API_KEY_PARAM: &str = "api_key";

/// Connection settings for [`TmdbClient`].
#[derive(Clone)]
pub struct TmdbClientSettings {
    pub base_url: Url,
    pub api_key: String,
    /// Upper bound on one exchange, connect through body.
    pub request_timeout: Duration,
}

impl fmt::Debug for TmdbClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TmdbClientSettings")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// reqwest-backed [`UpstreamClient`] for the TMDB v3 API.
pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TmdbClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct TmdbErrorBody {
    #[serde(default)]
    status_message: Option<String>,
}

impl TmdbClient {
    pub fn new(settings: TmdbClientSettings) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .connect_timeout(settings.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: settings
                .base_url
                .as_str()
                .trim_end_matches('/')
                .to_string(),
            api_key: settings.api_key,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn transport_error(path: &str, err: &reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::unreachable(path, "request timed out")
        } else {
            UpstreamError::unreachable(path, err.to_string())
        }
    }
}

#[async_trait]
impl UpstreamClient for TmdbClient {
    async fn fetch(
        &self,
        path: &str,
        query: &QueryParams,
    ) -> Result<Value, UpstreamError> {
        let mut query = query.clone();
        query.insert(API_KEY_PARAM, self.api_key.as_str());

        debug!(path, "upstream request");

        let response = self
            .http
            .get(self.endpoint(path))
            .query(&query)
            .send()
            .await
            .map_err(|err| Self::transport_error(path, &err))?;

        let status = response.status();
        if status.is_success() {
            let body = response
                .bytes()
                .await
                .map_err(|err| Self::transport_error(path, &err))?;
            return serde_json::from_slice(&body)
                .map_err(|err| UpstreamError::malformed(path, err.to_string()));
        }

        let message = response
            .json::<TmdbErrorBody>()
            .await
            .ok()
            .and_then(|body| body.status_message);

        debug!(
            path,
            status = status.as_u16(),
            ?message,
            "upstream rejected request"
        );

        if status.is_client_error() {
            Err(UpstreamError::NotFound {
                path: path.to_string(),
                status: status.as_u16(),
                message,
            })
        } else {
            Err(UpstreamError::unreachable(
                path,
                message.unwrap_or_else(|| {
                    format!("TMDB request failed with status {status}")
                }),
            ))
        }
    }
}
