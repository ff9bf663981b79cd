use std::fmt;

use crate::models::{DEFAULT_TRAILER_SITE, MarqueeConfig};

/// Pool sizes above this are allowed but likely to trip provider rate limits.
pub const POOL_CAPACITY_SOFT_LIMIT: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.hint {
            Some(hint) => write!(f, "{} ({hint})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }
}

/// Non-fatal checks on a composed configuration.
pub fn review(config: &MarqueeConfig) -> ConfigWarnings {
    let mut warnings = ConfigWarnings::default();

    if config.pool.capacity > POOL_CAPACITY_SOFT_LIMIT {
        warnings.push_with_hint(
            format!(
                "pool capacity {} exceeds {POOL_CAPACITY_SOFT_LIMIT}",
                config.pool.capacity
            ),
            "the provider may start rejecting requests",
        );
    }

    if !config
        .enrichment
        .trailer_site
        .eq_ignore_ascii_case(DEFAULT_TRAILER_SITE)
    {
        warnings.push_with_hint(
            format!(
                "trailer site is '{}'",
                config.enrichment.trailer_site
            ),
            "watch URLs are only generated for YouTube trailers",
        );
    }

    if config.enrichment.max_enriched_members == Some(0) {
        warnings.push("max_enriched_members is 0; no person ids will be resolved");
    }

    if config.upstream.base_url.scheme() != "https" {
        warnings.push(format!(
            "upstream base URL {} is not HTTPS; the API key is sent in clear text",
            config.upstream.base_url
        ));
    }

    warnings
}
