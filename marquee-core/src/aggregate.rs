//! Composes a base movie record with its optional enrichments.

use std::{sync::Arc, time::Instant};

use futures::future::join_all;
use marquee_model::{Movie, MovieId, MovieSummary, Page};
use tracing::{debug, info, trace, warn};

use crate::{
    enrich::{
        AbsentReason, CreditsEnricher, Enrichment, EnrichmentPolicy,
        SimilarResolver, TrailerResolver, UnresolvedPerson,
    },
    error::{AggregateError, Result},
    pool::WorkerPool,
    upstream::{QueryParams, UpstreamClient, fetch_in_pool, paths},
};

/// Lifecycle of one aggregation.
///
/// `Unstarted -> BaseFetched -> Enriching -> Complete`, or
/// `Unstarted -> Failed` when the base record cannot be fetched. A failed
/// aggregation surfaces only as an [`AggregateError`]; an [`Aggregation`]
/// always carries `Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregationState {
    Unstarted,
    BaseFetched,
    Enriching,
    Complete,
    Failed,
}

impl AggregationState {
    pub fn is_terminal(self) -> bool {
        matches!(self, AggregationState::Complete | AggregationState::Failed)
    }

    /// The state after a successful step. Terminal states stay put.
    pub fn advance(self) -> Self {
        match self {
            AggregationState::Unstarted => AggregationState::BaseFetched,
            AggregationState::BaseFetched => AggregationState::Enriching,
            AggregationState::Enriching => AggregationState::Complete,
            terminal => terminal,
        }
    }

    /// Only an aggregation that has not fetched its base record can fail.
    pub fn fail(self) -> Self {
        match self {
            AggregationState::Unstarted => AggregationState::Failed,
            other => other,
        }
    }

    fn step(&mut self, movie_id: MovieId, next: AggregationState) {
        trace!(%movie_id, from = ?*self, to = ?next, "aggregation state");
        *self = next;
    }
}

/// Why optional parts of a movie are missing. Empty when every enrichment
/// landed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichmentReport {
    pub credits: Option<AbsentReason>,
    pub similar: Option<AbsentReason>,
    pub trailer: Option<AbsentReason>,
    pub unresolved_people: Vec<UnresolvedPerson>,
}

impl EnrichmentReport {
    pub fn is_complete(&self) -> bool {
        self.credits.is_none()
            && self.similar.is_none()
            && self.trailer.is_none()
            && self.unresolved_people.is_empty()
    }

    /// Absences caused by an error rather than by missing provider data.
    pub fn failures(&self) -> impl Iterator<Item = &AbsentReason> {
        [&self.credits, &self.similar, &self.trailer]
            .into_iter()
            .flatten()
            .chain(self.unresolved_people.iter().map(|person| &person.reason))
            .filter(|reason| reason.is_failure())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub movie: Movie,
    pub state: AggregationState,
    pub report: EnrichmentReport,
}

/// Entry point of the engine: fetches a movie and fans its enrichments out
/// across the shared worker pool.
#[derive(Debug, Clone)]
pub struct AggregationCoordinator {
    upstream: Arc<dyn UpstreamClient>,
    pool: WorkerPool,
    credits: CreditsEnricher,
    similar: SimilarResolver,
    trailer: TrailerResolver,
}

impl AggregationCoordinator {
    pub fn new(
        upstream: Arc<dyn UpstreamClient>,
        pool: WorkerPool,
        policy: EnrichmentPolicy,
    ) -> Self {
        let trailer = TrailerResolver::new(
            Arc::clone(&upstream),
            pool.clone(),
            policy.trailer_site.clone(),
        );
        let similar = SimilarResolver::new(Arc::clone(&upstream), pool.clone());
        let credits =
            CreditsEnricher::new(Arc::clone(&upstream), pool.clone(), policy);

        Self {
            upstream,
            pool,
            credits,
            similar,
            trailer,
        }
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    pub async fn aggregate(&self, movie_id: MovieId) -> Result<Movie> {
        self.aggregate_with_report(movie_id)
            .await
            .map(|aggregation| aggregation.movie)
    }

    pub async fn aggregate_with_report(
        &self,
        movie_id: MovieId,
    ) -> Result<Aggregation> {
        let started = Instant::now();
        let mut state = AggregationState::Unstarted;

        let path = paths::movie(movie_id);
        let mut movie: Movie = match fetch_in_pool(
            &self.pool,
            &self.upstream,
            path.clone(),
            QueryParams::new(),
        )
        .await
        {
            Ok(movie) => movie,
            Err(err) => {
                warn!(
                    %movie_id,
                    path = %path,
                    error = %err,
                    "base fetch failed"
                );
                return Err(AggregateError::from_base(movie_id, err));
            }
        };
        state.step(movie_id, state.advance());

        state.step(movie_id, state.advance());
        let (credits, similar, trailer) = tokio::join!(
            self.credits.fetch_credits(movie_id),
            self.similar.resolve_similar(movie_id),
            self.trailer.resolve_trailer(movie_id),
        );

        let mut report = EnrichmentReport {
            unresolved_people: credits.unresolved,
            ..Default::default()
        };

        let (value, reason) = credits.credits.into_parts();
        if let Some(value) = value {
            movie.attach_credits(value);
        }
        report.credits = reason;

        let (value, reason) = similar.into_parts();
        if let Some(value) = value {
            movie.attach_similar(value);
        }
        report.similar = reason;

        let (value, reason) = trailer.into_parts();
        if let Some(value) = value {
            movie.attach_trailer(value);
        }
        report.trailer = reason;

        state.step(movie_id, state.advance());

        info!(
            %movie_id,
            credits = movie.credits.is_some(),
            similar = movie.similar.is_some(),
            trailer = movie.trailer.is_some(),
            unresolved_people = report.unresolved_people.len(),
            failures = report.failures().count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "aggregation complete"
        );

        Ok(Aggregation {
            movie,
            state,
            report,
        })
    }

    /// Aggregates every id concurrently, keeping input order.
    ///
    /// Movies whose base record cannot be fetched are left out. The page
    /// counters describe only the ids given.
    pub async fn aggregate_list(
        &self,
        ids: &[MovieId],
        page: u32,
    ) -> Page<Movie> {
        let outcomes =
            join_all(ids.iter().map(|&id| self.aggregate(id))).await;

        let results: Vec<Movie> = outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                Ok(movie) => Some(movie),
                Err(err) => {
                    warn!(
                        movie_id = %err.movie_id(),
                        error = %err,
                        "dropping movie from list"
                    );
                    None
                }
            })
            .collect();

        let page = page.max(1);
        Page {
            page,
            total_pages: page,
            total_results: results.len() as u32,
            results,
        }
    }

    /// One page of the provider's popular titles, each with its trailer
    /// when one can be found.
    pub async fn popular(&self, page: u32) -> Page<MovieSummary> {
        let page = page.max(1);
        let query = QueryParams::new().with("page", page.to_string());
        self.expand_listing(paths::POPULAR_MOVIES, query, page).await
    }

    /// One page of title search results, each with its trailer when one can
    /// be found. A blank query yields an empty page without contacting the
    /// provider.
    pub async fn search(
        &self,
        query: &str,
        page: u32,
    ) -> Page<MovieSummary> {
        let page = page.max(1);
        let query = query.trim();
        if query.is_empty() {
            debug!("empty search query");
            return Page::empty(page);
        }

        let params = QueryParams::new()
            .with("query", query)
            .with("page", page.to_string());
        self.expand_listing(paths::SEARCH_MOVIES, params, page).await
    }

    async fn expand_listing(
        &self,
        path: &str,
        query: QueryParams,
        page: u32,
    ) -> Page<MovieSummary> {
        let mut listing: Page<MovieSummary> = match fetch_in_pool(
            &self.pool,
            &self.upstream,
            path.to_string(),
            query,
        )
        .await
        {
            Ok(listing) => listing,
            Err(err) => {
                warn!(path, page, error = %err, "listing fetch failed");
                return Page::empty(page);
            }
        };

        // Every listed entry is kept; a missing trailer only leaves its URL
        // empty.
        let trailers = join_all(
            listing
                .results
                .iter()
                .map(|summary| self.trailer.resolve_trailer(summary.id)),
        )
        .await;

        let mut with_trailer = 0usize;
        for (summary, trailer) in listing.results.iter_mut().zip(trailers) {
            if let Enrichment::Present(video) = trailer {
                summary.attach_trailer(&video);
                with_trailer += 1;
            }
        }

        debug!(
            path,
            page = listing.page,
            listed = listing.results.len(),
            with_trailer,
            "listing enriched"
        );
        listing
    }
}
