use std::sync::Arc;

use marquee_model::{PersonExternalIds, PersonId};
use tracing::{debug, warn};

use super::{AbsentReason, Enrichment};
use crate::upstream::{QueryParams, UpstreamClient, fetch_as, paths};

/// Looks up a person's external (IMDb) identifier.
#[derive(Debug, Clone)]
pub struct PersonEnricher {
    upstream: Arc<dyn UpstreamClient>,
}

impl PersonEnricher {
    pub fn new(upstream: Arc<dyn UpstreamClient>) -> Self {
        Self { upstream }
    }

    /// Performs one upstream call; callers schedule it on the worker pool.
    pub async fn resolve_external_id(
        &self,
        person_id: Option<PersonId>,
    ) -> Enrichment<String> {
        let Some(person_id) = person_id else {
            return Enrichment::Absent(AbsentReason::MissingIdentifier);
        };

        let path = paths::person_external_ids(person_id);
        match fetch_as::<PersonExternalIds>(
            self.upstream.as_ref(),
            &path,
            &QueryParams::new(),
        )
        .await
        {
            Ok(ids) => match ids.imdb() {
                Some(imdb_id) => Enrichment::Present(imdb_id.to_string()),
                None => {
                    debug!(%person_id, "person has no IMDb id");
                    Enrichment::Absent(AbsentReason::NoExternalId)
                }
            },
            Err(err) => {
                warn!(
                    %person_id,
                    path = %path,
                    error = %err,
                    "person external id lookup failed"
                );
                Enrichment::Absent(AbsentReason::Upstream(err))
            }
        }
    }
}
