//! Best-effort enrichment of a base movie record.
//!
//! Each enricher turns its upstream failures into an [`Enrichment::Absent`]
//! at its own boundary, so a failed sub-fetch leaves one field empty and
//! never reaches its siblings.

pub mod credits;
pub mod person;
pub mod similar;
pub mod trailer;

use thiserror::Error;

use crate::error::{PoolError, PooledFetchError, UpstreamError};

pub use credits::{CreditRole, CreditsEnricher, CreditsOutcome, UnresolvedPerson};
pub use person::PersonEnricher;
pub use similar::SimilarResolver;
pub use trailer::{TrailerResolver, select_trailer};

pub const DEFAULT_TRAILER_SITE: &str = "YouTube";

/// Outcome of one optional sub-fetch: exactly one of a value or the reason
/// it is missing.
#[derive(Debug, Clone, PartialEq)]
pub enum Enrichment<T> {
    Present(T),
    Absent(AbsentReason),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbsentReason {
    #[error("no provider identifier to look up")]
    MissingIdentifier,

    #[error("provider has no external identifier")]
    NoExternalId,

    #[error("no eligible entry in the provider response")]
    NoMatch,

    #[error("skipped: beyond the enrichment member cap")]
    Capped,

    #[error(transparent)]
    Upstream(UpstreamError),

    #[error(transparent)]
    Pool(PoolError),
}

impl AbsentReason {
    /// True when the value is missing because something went wrong, as
    /// opposed to the provider simply not having it.
    pub fn is_failure(&self) -> bool {
        matches!(self, AbsentReason::Upstream(_) | AbsentReason::Pool(_))
    }

    pub fn upstream(&self) -> Option<&UpstreamError> {
        match self {
            AbsentReason::Upstream(err) => Some(err),
            _ => None,
        }
    }
}

impl From<UpstreamError> for AbsentReason {
    fn from(err: UpstreamError) -> Self {
        AbsentReason::Upstream(err)
    }
}

impl From<PoolError> for AbsentReason {
    fn from(err: PoolError) -> Self {
        AbsentReason::Pool(err)
    }
}

impl From<PooledFetchError> for AbsentReason {
    fn from(err: PooledFetchError) -> Self {
        match err {
            PooledFetchError::Upstream(err) => AbsentReason::Upstream(err),
            PooledFetchError::Pool(err) => AbsentReason::Pool(err),
        }
    }
}

impl<T> Enrichment<T> {
    /// Flattens the result of a pool task that itself produced an
    /// enrichment.
    pub fn settle(outcome: Result<Enrichment<T>, PoolError>) -> Self {
        outcome.unwrap_or_else(|err| Enrichment::Absent(err.into()))
    }

    pub fn present(self) -> Option<T> {
        match self {
            Enrichment::Present(value) => Some(value),
            Enrichment::Absent(_) => None,
        }
    }

    pub fn as_present(&self) -> Option<&T> {
        match self {
            Enrichment::Present(value) => Some(value),
            Enrichment::Absent(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&AbsentReason> {
        match self {
            Enrichment::Present(_) => None,
            Enrichment::Absent(reason) => Some(reason),
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Enrichment::Present(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Enrichment<U> {
        match self {
            Enrichment::Present(value) => Enrichment::Present(f(value)),
            Enrichment::Absent(reason) => Enrichment::Absent(reason),
        }
    }

    /// Splits into the value and, when absent, its reason.
    pub fn into_parts(self) -> (Option<T>, Option<AbsentReason>) {
        match self {
            Enrichment::Present(value) => (Some(value), None),
            Enrichment::Absent(reason) => (None, Some(reason)),
        }
    }
}

impl<T, E> From<Result<T, E>> for Enrichment<T>
where
    E: Into<AbsentReason>,
{
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Enrichment::Present(value),
            Err(err) => Enrichment::Absent(err.into()),
        }
    }
}

/// Knobs for the optional enrichment steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentPolicy {
    /// Upper bound on person lookups per credit list; `None` looks up every
    /// member.
    pub max_members: Option<usize>,
    /// Hosting platform a trailer must be published on.
    pub trailer_site: String,
}

impl Default for EnrichmentPolicy {
    fn default() -> Self {
        Self {
            max_members: None,
            trailer_site: DEFAULT_TRAILER_SITE.to_string(),
        }
    }
}

impl EnrichmentPolicy {
    pub fn with_max_members(mut self, max_members: Option<usize>) -> Self {
        self.max_members = max_members;
        self
    }

    pub fn with_trailer_site(mut self, site: impl Into<String>) -> Self {
        self.trailer_site = site.into();
        self
    }

    /// Whether the member at `position` (zero-based) may be looked up.
    pub fn admits(&self, position: usize) -> bool {
        self.max_members.is_none_or(|max| position < max)
    }
}
