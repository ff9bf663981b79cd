use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub upstream: FileUpstreamConfig,
    #[serde(default)]
    pub pool: FilePoolConfig,
    #[serde(default)]
    pub enrichment: FileEnrichmentConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileUpstreamConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Human-readable duration such as `"10s"` or `"1500ms"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FilePoolConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileEnrichmentConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailer_site: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_enriched_members: Option<usize>,
}

/// Environment-derived configuration values.
///
/// Numeric and duration values are kept raw so the loader can report the
/// offending value.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub request_timeout: Option<String>,
    pub pool_capacity: Option<String>,
    pub trailer_site: Option<String>,
    pub max_enriched_members: Option<String>,
}

pub const ENV_CONFIG_PATH: &str = "MARQUEE_CONFIG";
pub const ENV_BASE_URL: &str = "TMDB_BASE_URL";
pub const ENV_API_KEY: &str = "TMDB_API_KEY";
pub const ENV_REQUEST_TIMEOUT: &str = "TMDB_REQUEST_TIMEOUT";
pub const ENV_POOL_CAPACITY: &str = "MARQUEE_POOL_CAPACITY";
pub const ENV_TRAILER_SITE: &str = "MARQUEE_TRAILER_SITE";
pub const ENV_MAX_ENRICHED_MEMBERS: &str = "MARQUEE_MAX_ENRICHED_MEMBERS";

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the environment view from an arbitrary variable lookup. Blank
    /// values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            config_path: var(ENV_CONFIG_PATH).map(PathBuf::from),
            base_url: var(ENV_BASE_URL),
            api_key: var(ENV_API_KEY),
            request_timeout: var(ENV_REQUEST_TIMEOUT),
            pool_capacity: var(ENV_POOL_CAPACITY),
            trailer_site: var(ENV_TRAILER_SITE),
            max_enriched_members: var(ENV_MAX_ENRICHED_MEMBERS),
        }
    }
}
