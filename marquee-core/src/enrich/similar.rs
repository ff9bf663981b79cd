use std::sync::Arc;

use marquee_model::{MovieId, SimilarList};
use tracing::warn;

use super::Enrichment;
use crate::{
    pool::WorkerPool,
    upstream::{QueryParams, UpstreamClient, fetch_in_pool, paths},
};

/// Fetches the provider's similar-titles page unmodified.
#[derive(Debug, Clone)]
pub struct SimilarResolver {
    upstream: Arc<dyn UpstreamClient>,
    pool: WorkerPool,
}

impl SimilarResolver {
    pub fn new(upstream: Arc<dyn UpstreamClient>, pool: WorkerPool) -> Self {
        Self { upstream, pool }
    }

    pub async fn resolve_similar(
        &self,
        movie_id: MovieId,
    ) -> Enrichment<SimilarList> {
        let path = paths::movie_similar(movie_id);
        let outcome = fetch_in_pool::<SimilarList>(
            &self.pool,
            &self.upstream,
            path.clone(),
            QueryParams::new(),
        )
        .await;

        if let Err(err) = &outcome {
            warn!(
                %movie_id,
                path = %path,
                error = %err,
                "similar fetch failed"
            );
        }
        outcome.into()
    }
}
