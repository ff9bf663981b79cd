//! Scripted [`UpstreamClient`] for exercising the engine without a network.

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use marquee_core::{QueryParams, UpstreamClient, UpstreamError};
use serde_json::Value;

#[derive(Debug, Clone)]
struct Route {
    response: Result<Value, UpstreamError>,
    delay: Option<Duration>,
}

/// Answers each path with a scripted payload or error, optionally after a
/// delay. Unscripted paths answer 404. Every call is recorded.
#[derive(Debug, Default)]
pub struct StubUpstream {
    routes: Mutex<HashMap<String, Route>>,
    calls: Mutex<Vec<(String, QueryParams)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StubUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, path: impl Into<String>, body: Value) -> &Self {
        self.script(path.into(), Ok(body), None)
    }

    pub fn fail(&self, path: impl Into<String>, err: UpstreamError) -> &Self {
        self.script(path.into(), Err(err), None)
    }

    /// Holds the response for `path` back by `delay`.
    pub fn delay(&self, path: &str, delay: Duration) -> &Self {
        if let Some(route) = self.routes.lock().unwrap().get_mut(path) {
            route.delay = Some(delay);
        }
        self
    }

    /// Applies `delay` to every scripted path starting with `prefix`.
    pub fn delay_matching(&self, prefix: &str, delay: Duration) -> &Self {
        for (path, route) in self.routes.lock().unwrap().iter_mut() {
            if path.starts_with(prefix) {
                route.delay = Some(delay);
            }
        }
        self
    }

    fn script(
        &self,
        path: String,
        response: Result<Value, UpstreamError>,
        delay: Option<Duration>,
    ) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .insert(path, Route { response, delay });
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(path, _)| path.clone())
            .collect()
    }

    pub fn calls_with_query(&self) -> Vec<(String, QueryParams)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, path: &str) -> usize {
        self.calls().iter().filter(|p| p.as_str() == path).count()
    }

    pub fn calls_starting_with(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|p| p.starts_with(prefix)).count()
    }

    /// Most exchanges that were ever in progress at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl UpstreamClient for StubUpstream {
    async fn fetch(
        &self,
        path: &str,
        query: &QueryParams,
    ) -> Result<Value, UpstreamError> {
        self.calls
            .lock()
            .unwrap()
            .push((path.to_string(), query.clone()));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        let route = self.routes.lock().unwrap().get(path).cloned();
        let Some(route) = route else {
            return Err(UpstreamError::not_found(path, 404));
        };

        // Every exchange yields at least once so overlapping calls are
        // observable.
        tokio::time::sleep(route.delay.unwrap_or(Duration::from_millis(2)))
            .await;
        route.response
    }
}
