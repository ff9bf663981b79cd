//! Leaf access to the catalog provider.
//!
//! Everything above this module talks to the provider through
//! [`UpstreamClient`], so tests can swap the HTTP client for a scripted stub.

pub mod paths;
pub mod tmdb;

use std::{collections::BTreeMap, fmt, sync::Arc};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    error::{PooledFetchError, UpstreamError},
    pool::WorkerPool,
};

pub use tmdb::{TmdbClient, TmdbClientSettings};

/// Query string parameters for one request. Keys are unique; inserting an
/// existing key replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// One request/response exchange with the catalog provider.
///
/// Implementations perform exactly one exchange per call and never retry.
/// The provider API key is the implementation's concern; callers never pass
/// it.
#[async_trait]
pub trait UpstreamClient: Send + Sync + fmt::Debug {
    async fn fetch(
        &self,
        path: &str,
        query: &QueryParams,
    ) -> Result<Value, UpstreamError>;
}

/// Fetches `path` and decodes it into `T`, mapping shape mismatches to
/// [`UpstreamError::Malformed`].
pub async fn fetch_as<T>(
    client: &dyn UpstreamClient,
    path: &str,
    query: &QueryParams,
) -> Result<T, UpstreamError>
where
    T: DeserializeOwned,
{
    let payload = client.fetch(path, query).await?;
    serde_json::from_value(payload)
        .map_err(|err| UpstreamError::malformed(path, err.to_string()))
}

/// Runs one typed fetch as a pool task and waits for it.
pub(crate) async fn fetch_in_pool<T>(
    pool: &WorkerPool,
    upstream: &Arc<dyn UpstreamClient>,
    path: String,
    query: QueryParams,
) -> Result<T, PooledFetchError>
where
    T: DeserializeOwned + Send + 'static,
{
    let upstream = Arc::clone(upstream);
    let outcome = pool
        .submit(async move {
            fetch_as::<T>(upstream.as_ref(), &path, &query).await
        })
        .await?;
    Ok(outcome?)
}
