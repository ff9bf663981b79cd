//! Shared harness for core integration tests.

#![allow(dead_code)]

pub mod fixtures;
pub mod upstream;

use std::sync::Arc;

use marquee_core::{AggregationCoordinator, EnrichmentPolicy, WorkerPool};

pub use upstream::StubUpstream;

/// Coordinator over `stub` with a fresh pool of `capacity`.
pub fn coordinator(
    stub: &Arc<StubUpstream>,
    capacity: usize,
) -> (AggregationCoordinator, WorkerPool) {
    coordinator_with_policy(stub, capacity, EnrichmentPolicy::default())
}

pub fn coordinator_with_policy(
    stub: &Arc<StubUpstream>,
    capacity: usize,
    policy: EnrichmentPolicy,
) -> (AggregationCoordinator, WorkerPool) {
    let pool = WorkerPool::new(capacity);
    let upstream: Arc<dyn marquee_core::UpstreamClient> = stub.clone();
    (
        AggregationCoordinator::new(upstream, pool.clone(), policy),
        pool,
    )
}
