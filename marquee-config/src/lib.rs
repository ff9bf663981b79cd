//! Configuration loading for Marquee.
//!
//! Values are resolved in precedence order: process environment (after an
//! optional `.env` file), then `marquee.toml`, then built-in defaults. The
//! composed [`MarqueeConfig`] is validated before it is returned; non-fatal
//! findings are reported as [`ConfigWarnings`].
#![allow(missing_docs)]

pub mod loader;
pub mod models;
pub mod sources;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions};
pub use models::{
    ConfigMetadata, EnrichmentConfig, MarqueeConfig, PoolConfig, UpstreamConfig,
};
pub use sources::{EnvConfig, FileConfig};
pub use validation::{ConfigWarning, ConfigWarnings};
