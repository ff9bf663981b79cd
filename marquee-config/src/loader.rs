use once_cell::sync::Lazy;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::{
    models::{
        ConfigMetadata, DEFAULT_BASE_URL, DEFAULT_POOL_CAPACITY,
        DEFAULT_REQUEST_TIMEOUT, DEFAULT_TRAILER_SITE, EnrichmentConfig,
        MarqueeConfig, PoolConfig, UpstreamConfig,
    },
    sources::{
        ENV_MAX_ENRICHED_MEMBERS, ENV_POOL_CAPACITY, ENV_REQUEST_TIMEOUT,
        EnvConfig, FileConfig,
    },
    validation::{self, ConfigWarnings},
};

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("marquee.toml"),
        PathBuf::from("config/marquee.toml"),
    ]
});

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: MarqueeConfig,
    pub warnings: ConfigWarnings,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    /// Loads `.env`, then resolves the configuration from the process
    /// environment and the discovered TOML file.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        let mut load = self.load_from(EnvConfig::gather())?;
        load.config.metadata.env_file_loaded = env_file_loaded;
        Ok(load)
    }

    /// Resolves the configuration from an explicit environment view without
    /// touching `.env` or the process environment.
    pub fn load_from(
        &self,
        env: EnvConfig,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env)?;
        self.compose_config(file_config, env, config_path)
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let explicit_path =
            self.options.config_path.as_ref().or(env.config_path.as_ref());
        let (path, explicit) = match explicit_path {
            Some(path) => (path.clone(), true),
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .find(|candidate| candidate.exists())
            {
                Some(path) => (path.clone(), false),
                None => return Ok((None, None)),
            },
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((None, None));
        }

        let contents =
            fs::read_to_string(&path).map_err(|err| ConfigLoadError::Io {
                path: path.clone(),
                source: err,
            })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
                path: path.clone(),
                source: err,
            })?;

        debug!(path = %path.display(), "loaded configuration file");
        Ok((Some(file_config), Some(path)))
    }

    fn compose_config(
        &self,
        file_config: Option<FileConfig>,
        env: EnvConfig,
        config_path: Option<PathBuf>,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let mut warnings = ConfigWarnings::default();

        if file_config.is_none() {
            warnings.push_with_hint(
                "No marquee.toml detected; using environment variables and defaults",
                "pass --config or set MARQUEE_CONFIG to use a file",
            );
        }

        let FileConfig {
            upstream: file_upstream,
            pool: file_pool,
            enrichment: file_enrichment,
        } = file_config.unwrap_or_default();

        let raw_base_url = env
            .base_url
            .or(file_upstream.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(raw_base_url.trim()).map_err(|source| {
            ConfigLoadError::InvalidBaseUrl {
                value: raw_base_url.clone(),
                source,
            }
        })?;

        let api_key = env
            .api_key
            .or(file_upstream.api_key)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigLoadError::MissingApiKey)?;

        let request_timeout = match env.request_timeout {
            Some(raw) => parse_duration(ENV_REQUEST_TIMEOUT, &raw)?,
            None => match file_upstream.request_timeout {
                Some(raw) => parse_duration("upstream.request_timeout", &raw)?,
                None => DEFAULT_REQUEST_TIMEOUT,
            },
        };
        if request_timeout.is_zero() {
            return Err(ConfigLoadError::ZeroTimeout);
        }

        let capacity = match env.pool_capacity {
            Some(raw) => parse_count(ENV_POOL_CAPACITY, &raw)?,
            None => file_pool.capacity.unwrap_or(DEFAULT_POOL_CAPACITY),
        };
        if capacity == 0 {
            return Err(ConfigLoadError::ZeroPoolCapacity);
        }

        let max_enriched_members = match env.max_enriched_members {
            Some(raw) => Some(parse_count(ENV_MAX_ENRICHED_MEMBERS, &raw)?),
            None => file_enrichment.max_enriched_members,
        };

        let trailer_site = env
            .trailer_site
            .or(file_enrichment.trailer_site)
            .map(|site| site.trim().to_string())
            .filter(|site| !site.is_empty())
            .unwrap_or_else(|| DEFAULT_TRAILER_SITE.to_string());

        let config = MarqueeConfig {
            upstream: UpstreamConfig {
                base_url,
                api_key,
                request_timeout,
            },
            pool: PoolConfig { capacity },
            enrichment: EnrichmentConfig {
                trailer_site,
                max_enriched_members,
            },
            metadata: ConfigMetadata {
                config_path,
                env_file_loaded: false,
            },
        };

        warnings.extend(validation::review(&config));

        Ok(ConfigLoad { config, warnings })
    }
}

fn parse_duration(key: &str, raw: &str) -> Result<Duration, ConfigLoadError> {
    humantime::parse_duration(raw.trim()).map_err(|source| {
        ConfigLoadError::InvalidDuration {
            key: key.to_string(),
            value: raw.to_string(),
            source,
        }
    })
}

fn parse_count(key: &str, raw: &str) -> Result<usize, ConfigLoadError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigLoadError::InvalidNumber {
            key: key.to_string(),
            value: raw.to_string(),
        })
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },

    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid upstream base URL '{value}'")]
    InvalidBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("TMDB API key missing; set TMDB_API_KEY or upstream.api_key")]
    MissingApiKey,

    #[error("invalid duration for {key}: '{value}'")]
    InvalidDuration {
        key: String,
        value: String,
        #[source]
        source: humantime::DurationError,
    },

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("invalid number for {key}: '{value}'")]
    InvalidNumber { key: String, value: String },

    #[error("pool capacity must be at least 1")]
    ZeroPoolCapacity,

    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

impl ConfigLoadError {
    /// Path of the configuration file involved, when there is one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigLoadError::MissingConfig { path }
            | ConfigLoadError::Io { path, .. }
            | ConfigLoadError::Parse { path, .. } => Some(path),
            _ => None,
        }
    }
}
