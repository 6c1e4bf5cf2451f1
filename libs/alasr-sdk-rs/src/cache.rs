//! Single-snapshot cache for "list all" endpoints.
//!
//! Holds one snapshot of a whole collection with a freshness window, collapses
//! concurrent fetches into one shared future, and serves the last snapshot when a
//! refresh is rate limited or never reaches the backend.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::PortalError;

/// Default freshness window.
pub const DEFAULT_FRESHNESS: Duration = Duration::from_secs(300);

pub type FetchResult<T> = Result<Arc<Vec<T>>, PortalError>;

type InFlight<T> = Shared<BoxFuture<'static, FetchResult<T>>>;

struct Snapshot<T> {
    items: Arc<Vec<T>>,
    fetched_at: Instant,
}

struct CacheState<T> {
    snapshot: Option<Snapshot<T>>,
    in_flight: Option<InFlight<T>>,
    /// Bumped on every invalidation; fetches started under an older generation
    /// do not store their result.
    generation: u64,
}

impl<T> CacheState<T> {
    fn fresh(&self, freshness: Duration) -> Option<&Snapshot<T>> {
        self.snapshot
            .as_ref()
            .filter(|s| s.fetched_at.elapsed() < freshness)
    }
}

pub struct ListCache<T> {
    resource: &'static str,
    freshness: Duration,
    state: Arc<Mutex<CacheState<T>>>,
}

impl<T: Send + Sync + 'static> ListCache<T> {
    pub fn new(resource: &'static str, freshness: Duration) -> Self {
        Self {
            resource,
            freshness,
            state: Arc::new(Mutex::new(CacheState {
                snapshot: None,
                in_flight: None,
                generation: 0,
            })),
        }
    }

    pub fn freshness(&self) -> Duration {
        self.freshness
    }

    /// Snapshot, if one exists and is still inside the freshness window.
    pub fn get(&self) -> Option<Arc<Vec<T>>> {
        lock(&self.state)
            .fresh(self.freshness)
            .map(|s| Arc::clone(&s.items))
    }

    /// Snapshot regardless of age.
    pub fn stale(&self) -> Option<Arc<Vec<T>>> {
        lock(&self.state)
            .snapshot
            .as_ref()
            .map(|s| Arc::clone(&s.items))
    }

    /// Replace the snapshot and restart its freshness window.
    pub fn set(&self, items: Vec<T>) -> Arc<Vec<T>> {
        let items = Arc::new(items);
        lock(&self.state).snapshot = Some(Snapshot {
            items: Arc::clone(&items),
            fetched_at: Instant::now(),
        });
        items
    }

    /// Drop the snapshot and detach any in-flight fetch.
    pub fn invalidate(&self) {
        let mut state = lock(&self.state);
        state.snapshot = None;
        state.in_flight = None;
        state.generation += 1;
        debug!(resource = self.resource, "Cache invalidated");
    }

    pub fn is_fetching(&self) -> bool {
        lock(&self.state).in_flight.is_some()
    }

    /// Return the fresh snapshot when `use_cache` allows it, otherwise join the
    /// in-flight fetch or start one with `fetch`.
    pub async fn get_or_fetch<F>(&self, use_cache: bool, fetch: F) -> FetchResult<T>
    where
        F: FnOnce() -> BoxFuture<'static, Result<Vec<T>, PortalError>>,
    {
        let pending = {
            let mut state = lock(&self.state);

            if use_cache {
                if let Some(snapshot) = state.fresh(self.freshness) {
                    debug!(
                        resource = self.resource,
                        age_secs = snapshot.fetched_at.elapsed().as_secs(),
                        "Using cached list"
                    );
                    return Ok(Arc::clone(&snapshot.items));
                }
            }

            if let Some(pending) = state.in_flight.clone() {
                debug!(resource = self.resource, "Joining in-flight fetch");
                pending
            } else {
                debug!(resource = self.resource, "Fetching list");
                let pending = complete(
                    self.resource,
                    Arc::clone(&self.state),
                    state.generation,
                    fetch(),
                )
                .boxed()
                .shared();
                state.in_flight = Some(pending.clone());
                pending
            }
        };

        pending.await
    }
}

async fn complete<T: Send + Sync + 'static>(
    resource: &'static str,
    state: Arc<Mutex<CacheState<T>>>,
    generation: u64,
    fetch: BoxFuture<'static, Result<Vec<T>, PortalError>>,
) -> FetchResult<T> {
    let outcome = fetch.await;

    let mut state = lock(&state);
    let current = state.generation == generation;
    if current {
        state.in_flight = None;
    }

    match outcome {
        Ok(items) => {
            let items = Arc::new(items);
            if current {
                state.snapshot = Some(Snapshot {
                    items: Arc::clone(&items),
                    fetched_at: Instant::now(),
                });
            }
            debug!(resource, count = items.len(), "List fetched");
            Ok(items)
        }
        Err(err) if err.is_rate_limited() || err.is_network() => match &state.snapshot {
            Some(snapshot) => {
                warn!(resource, error = %err, "Fetch failed, serving stale list");
                Ok(Arc::clone(&snapshot.items))
            }
            None => Err(err),
        },
        Err(err) => Err(err),
    }
}

fn lock<T>(state: &Mutex<CacheState<T>>) -> MutexGuard<'_, CacheState<T>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
