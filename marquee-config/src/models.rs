use std::{fmt, path::PathBuf, time::Duration};

use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_POOL_CAPACITY: usize = 10;
pub const DEFAULT_TRAILER_SITE: &str = "YouTube";

/// Fully resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct MarqueeConfig {
    pub upstream: UpstreamConfig,
    pub pool: PoolConfig,
    pub enrichment: EnrichmentConfig,
    pub metadata: ConfigMetadata,
}

#[derive(Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    pub base_url: Url,
    pub api_key: String,
    pub request_timeout: Duration,
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Upper bound on concurrently running upstream calls. Always >= 1.
    pub capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_POOL_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentConfig {
    pub trailer_site: String,
    /// `None` enriches every credited person.
    pub max_enriched_members: Option<usize>,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            trailer_site: DEFAULT_TRAILER_SITE.to_string(),
            max_enriched_members: None,
        }
    }
}

/// Where the configuration came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
