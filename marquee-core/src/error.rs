use marquee_model::MovieId;
use thiserror::Error;

/// Coarse category of an [`UpstreamError`], handy for assertions and metrics
/// labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpstreamErrorKind {
    Unreachable,
    Malformed,
    NotFound,
}

/// Failure of a single exchange with the catalog provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// Transport failure, timeout, or a provider-side (5xx) error.
    #[error("upstream unreachable for {path}: {reason}")]
    Unreachable { path: String, reason: String },

    /// The response body did not match the expected payload shape.
    #[error("malformed payload from {path}: {reason}")]
    Malformed { path: String, reason: String },

    /// The provider rejected the request with a 4xx status.
    #[error("upstream returned {status} for {path}")]
    NotFound {
        path: String,
        status: u16,
        message: Option<String>,
    },
}

impl UpstreamError {
    pub fn unreachable(path: &str, reason: impl Into<String>) -> Self {
        UpstreamError::Unreachable {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub fn malformed(path: &str, reason: impl Into<String>) -> Self {
        UpstreamError::Malformed {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub fn not_found(path: &str, status: u16) -> Self {
        UpstreamError::NotFound {
            path: path.to_string(),
            status,
            message: None,
        }
    }

    pub fn kind(&self) -> UpstreamErrorKind {
        match self {
            UpstreamError::Unreachable { .. } => UpstreamErrorKind::Unreachable,
            UpstreamError::Malformed { .. } => UpstreamErrorKind::Malformed,
            UpstreamError::NotFound { .. } => UpstreamErrorKind::NotFound,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            UpstreamError::Unreachable { path, .. }
            | UpstreamError::Malformed { path, .. }
            | UpstreamError::NotFound { path, .. } => path,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("worker pool is shut down")]
    Closed,

    #[error("pool task panicked")]
    Panicked,
}

/// Outcome of an upstream call that was scheduled on the worker pool.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PooledFetchError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// Failure of the mandatory part of an aggregation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    #[error("movie {movie_id} could not be fetched")]
    NotFound {
        movie_id: MovieId,
        #[source]
        source: UpstreamError,
    },

    #[error("movie {movie_id} aggregation aborted: {source}")]
    Pool {
        movie_id: MovieId,
        #[source]
        source: PoolError,
    },
}

impl AggregateError {
    pub(crate) fn from_base(movie_id: MovieId, err: PooledFetchError) -> Self {
        match err {
            PooledFetchError::Upstream(source) => {
                AggregateError::NotFound { movie_id, source }
            }
            PooledFetchError::Pool(source) => {
                AggregateError::Pool { movie_id, source }
            }
        }
    }

    pub fn movie_id(&self) -> MovieId {
        match self {
            AggregateError::NotFound { movie_id, .. }
            | AggregateError::Pool { movie_id, .. } => *movie_id,
        }
    }
}

pub type Result<T, E = AggregateError> = std::result::Result<T, E>;
