use std::sync::Arc;

use marquee_model::{MovieId, VideoKind, VideoList, VideoReference};
use tracing::{debug, warn};

use super::{AbsentReason, Enrichment};
use crate::{
    pool::WorkerPool,
    upstream::{QueryParams, UpstreamClient, fetch_in_pool, paths},
};

/// Index of the first video published on `site` whose type is a trailer or
/// teaser. Provider order decides ties.
pub fn select_trailer(videos: &[VideoReference], site: &str) -> Option<usize> {
    videos.iter().position(|video| {
        video.is_hosted_on(site)
            && matches!(video.kind(), VideoKind::Trailer | VideoKind::Teaser)
    })
}

#[derive(Debug, Clone)]
pub struct TrailerResolver {
    upstream: Arc<dyn UpstreamClient>,
    pool: WorkerPool,
    site: String,
}

impl TrailerResolver {
    pub fn new(
        upstream: Arc<dyn UpstreamClient>,
        pool: WorkerPool,
        site: impl Into<String>,
    ) -> Self {
        Self {
            upstream,
            pool,
            site: site.into(),
        }
    }

    pub async fn resolve_trailer(
        &self,
        movie_id: MovieId,
    ) -> Enrichment<VideoReference> {
        let path = paths::movie_videos(movie_id);
        let mut videos: VideoList = match fetch_in_pool(
            &self.pool,
            &self.upstream,
            path.clone(),
            QueryParams::new(),
        )
        .await
        {
            Ok(videos) => videos,
            Err(err) => {
                warn!(
                    %movie_id,
                    path = %path,
                    error = %err,
                    "video fetch failed"
                );
                return Enrichment::Absent(err.into());
            }
        };

        match select_trailer(&videos.results, &self.site) {
            Some(index) => {
                Enrichment::Present(videos.results.swap_remove(index))
            }
            None => {
                debug!(
                    %movie_id,
                    candidates = videos.results.len(),
                    site = %self.site,
                    "no trailer found"
                );
                Enrichment::Absent(AbsentReason::NoMatch)
            }
        }
    }
}
