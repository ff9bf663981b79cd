//! # Marquee Core
//!
//! Aggregation engine for film metadata. A single request for a movie fans
//! out into several catalog lookups, each running on one shared, bounded
//! worker pool, and the results are merged back into one [`Movie`].
//!
//! ## Overview
//!
//! - **Upstream access**: [`UpstreamClient`] performs one exchange with the
//!   catalog provider; [`TmdbClient`] is the HTTP implementation
//! - **Worker pool**: [`WorkerPool`] caps how many upstream calls run at once
//!   across every in-flight aggregation
//! - **Enrichment**: credits (with per-person IMDb ids), similar titles and
//!   a trailer are fetched independently; each failure leaves only its own
//!   field empty and is recorded as an [`AbsentReason`]
//! - **Coordination**: [`AggregationCoordinator`] drives a single movie,
//!   an explicit list of ids, or a popular/search listing
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use marquee_core::{
//!     AggregationCoordinator, EnrichmentPolicy, TmdbClient,
//!     TmdbClientSettings, WorkerPool,
//! };
//! use marquee_model::MovieId;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = TmdbClient::new(TmdbClientSettings {
//!     base_url: marquee_core::upstream::tmdb::TMDB_V3_BASE.parse()?,
//!     api_key: std::env::var("TMDB_API_KEY")?,
//!     request_timeout: std::time::Duration::from_secs(10),
//! })?;
//! let pool = WorkerPool::new(10);
//! let coordinator = AggregationCoordinator::new(
//!     Arc::new(client),
//!     pool.clone(),
//!     EnrichmentPolicy::default(),
//! );
//!
//! let movie = coordinator.aggregate(MovieId::new(603).unwrap()).await?;
//! println!("{} ({:?})", movie.title, movie.trailer_url);
//!
//! pool.shutdown();
//! # Ok(())
//! # }
//! ```
//!
//! [`Movie`]: marquee_model::Movie
#![allow(missing_docs)]

pub mod aggregate;
pub mod enrich;
pub mod error;
pub mod pool;
pub mod upstream;

pub use aggregate::{
    Aggregation, AggregationCoordinator, AggregationState, EnrichmentReport,
};
pub use enrich::{
    AbsentReason, CreditRole, CreditsEnricher, CreditsOutcome, Enrichment,
    EnrichmentPolicy, PersonEnricher, SimilarResolver, TrailerResolver,
    UnresolvedPerson, select_trailer,
};
pub use error::{
    AggregateError, PoolError, PooledFetchError, Result, UpstreamError,
    UpstreamErrorKind,
};
pub use pool::{DEFAULT_POOL_CAPACITY, PoolStats, PoolTask, WorkerPool};
pub use upstream::{
    QueryParams, TmdbClient, TmdbClientSettings, UpstreamClient, fetch_as,
};
