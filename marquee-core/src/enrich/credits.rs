use std::sync::Arc;

use futures::future::join_all;
use marquee_model::{Credits, MovieId, PersonId, credits::CreditedPerson};
use tracing::{debug, warn};

use super::{AbsentReason, Enrichment, EnrichmentPolicy, PersonEnricher};
use crate::{
    pool::{PoolTask, WorkerPool},
    upstream::{QueryParams, UpstreamClient, fetch_in_pool, paths},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreditRole {
    Cast,
    Crew,
}

/// A credited person whose external id is missing after enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct UnresolvedPerson {
    pub role: CreditRole,
    /// Zero-based index in the cast or crew list.
    pub position: usize,
    pub person_id: Option<PersonId>,
    pub reason: AbsentReason,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreditsOutcome {
    pub credits: Enrichment<Credits>,
    /// Empty when the credits themselves are absent.
    pub unresolved: Vec<UnresolvedPerson>,
}

impl CreditsOutcome {
    fn absent(reason: AbsentReason) -> Self {
        Self {
            credits: Enrichment::Absent(reason),
            unresolved: Vec::new(),
        }
    }
}

/// Fetches cast and crew, then resolves every member's external id across
/// the shared pool.
#[derive(Debug, Clone)]
pub struct CreditsEnricher {
    upstream: Arc<dyn UpstreamClient>,
    pool: WorkerPool,
    person: PersonEnricher,
    policy: EnrichmentPolicy,
}

/// Lookup for one member, either decided up front or running on the pool.
enum Slot {
    Ready(Enrichment<String>),
    Pending(PoolTask<Enrichment<String>>),
}

impl CreditsEnricher {
    pub fn new(
        upstream: Arc<dyn UpstreamClient>,
        pool: WorkerPool,
        policy: EnrichmentPolicy,
    ) -> Self {
        let person = PersonEnricher::new(Arc::clone(&upstream));
        Self {
            upstream,
            pool,
            person,
            policy,
        }
    }

    pub async fn fetch_credits(&self, movie_id: MovieId) -> CreditsOutcome {
        let path = paths::movie_credits(movie_id);
        let mut credits: Credits = match fetch_in_pool(
            &self.pool,
            &self.upstream,
            path.clone(),
            QueryParams::new(),
        )
        .await
        {
            Ok(credits) => credits,
            Err(err) => {
                warn!(
                    %movie_id,
                    path = %path,
                    error = %err,
                    "credits fetch failed"
                );
                return CreditsOutcome::absent(err.into());
            }
        };

        // Every lookup is submitted before any is awaited.
        let cast_slots = self.submit_lookups(&credits.cast);
        let crew_slots = self.submit_lookups(&credits.crew);

        let (cast_results, crew_results) =
            tokio::join!(join_slots(cast_slots), join_slots(crew_slots));

        let mut unresolved = Vec::new();
        assign(
            &mut credits.cast,
            cast_results,
            CreditRole::Cast,
            &mut unresolved,
        );
        assign(
            &mut credits.crew,
            crew_results,
            CreditRole::Crew,
            &mut unresolved,
        );

        debug!(
            %movie_id,
            cast = credits.cast.len(),
            crew = credits.crew.len(),
            unresolved = unresolved.len(),
            "credits enriched"
        );

        CreditsOutcome {
            credits: Enrichment::Present(credits),
            unresolved,
        }
    }

    fn submit_lookups<M: CreditedPerson>(&self, members: &[M]) -> Vec<Slot> {
        members
            .iter()
            .enumerate()
            .map(|(position, member)| {
                if !self.policy.admits(position) {
                    return Slot::Ready(Enrichment::Absent(
                        AbsentReason::Capped,
                    ));
                }
                match member.person_id() {
                    Some(person_id) => {
                        let person = self.person.clone();
                        Slot::Pending(self.pool.submit(async move {
                            person.resolve_external_id(Some(person_id)).await
                        }))
                    }
                    None => Slot::Ready(Enrichment::Absent(
                        AbsentReason::MissingIdentifier,
                    )),
                }
            })
            .collect()
    }
}

async fn join_slots(slots: Vec<Slot>) -> Vec<Enrichment<String>> {
    join_all(slots.into_iter().map(|slot| async move {
        match slot {
            Slot::Ready(outcome) => outcome,
            Slot::Pending(task) => Enrichment::settle(task.await),
        }
    }))
    .await
}

/// Writes the i-th result into the i-th member.
fn assign<M: CreditedPerson>(
    members: &mut [M],
    results: Vec<Enrichment<String>>,
    role: CreditRole,
    unresolved: &mut Vec<UnresolvedPerson>,
) {
    debug_assert_eq!(members.len(), results.len());

    for (position, (member, result)) in
        members.iter_mut().zip(results).enumerate()
    {
        match result {
            Enrichment::Present(imdb_id) => {
                member.record_imdb_id(imdb_id);
            }
            Enrichment::Absent(reason) => unresolved.push(UnresolvedPerson {
                role,
                position,
                person_id: member.person_id(),
                reason,
            }),
        }
    }
}
