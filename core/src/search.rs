//! Search-as-you-type.
//!
//! [`DebouncedSearch`] turns raw keystrokes into at most one live request.
//! Each keystroke supersedes everything before it: the previous debounce
//! timer or request is cancelled through its token, and a generation check
//! under the slot lock keeps a late response from ever being published.

use crate::config::SearchConfig;
use async_trait::async_trait;
use climbate_async_utils::OrCancelExt;
use climbate_catalog_client::CatalogApi;
use climbate_catalog_client::Result;
use climbate_protocol::AreaSearchHit;
use climbate_protocol::Crag;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::warn;

#[async_trait]
pub trait SearchBackend: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    async fn search(&self, query: &str) -> Result<Vec<Self::Item>>;
}

/// Name search over crags.
pub struct CragSearch {
    catalog: Arc<dyn CatalogApi>,
    limit: u32,
}

impl CragSearch {
    pub fn new(catalog: Arc<dyn CatalogApi>, limit: u32) -> Self {
        Self { catalog, limit }
    }
}

#[async_trait]
impl SearchBackend for CragSearch {
    type Item = Crag;

    async fn search(&self, query: &str) -> Result<Vec<Crag>> {
        self.catalog.search_crags(query, self.limit).await
    }
}

/// Name search over the area tree; hits carry their breadcrumb.
pub struct AreaSearch {
    catalog: Arc<dyn CatalogApi>,
}

impl AreaSearch {
    pub fn new(catalog: Arc<dyn CatalogApi>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl SearchBackend for AreaSearch {
    type Item = AreaSearchHit;

    async fn search(&self, query: &str) -> Result<Vec<AreaSearchHit>> {
        self.catalog.search_areas(query).await
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SearchState<T> {
    Idle,
    PendingDebounce(String),
    InFlight(String),
    Settled { query: String, results: Vec<T> },
}

impl<T> SearchState<T> {
    /// What the results list should show right now.
    pub fn results(&self) -> &[T] {
        match self {
            SearchState::Settled { results, .. } => results,
            _ => &[],
        }
    }

    pub fn query(&self) -> Option<&str> {
        match self {
            SearchState::Idle => None,
            SearchState::PendingDebounce(query)
            | SearchState::InFlight(query)
            | SearchState::Settled { query, .. } => Some(query),
        }
    }
}

pub struct DebouncedSearch<B: SearchBackend> {
    inner: Arc<Inner<B>>,
}

struct Inner<B: SearchBackend> {
    backend: B,
    debounce: Duration,
    min_query_chars: usize,
    slot: Mutex<Slot>,
    state_tx: watch::Sender<SearchState<B::Item>>,
    requests: AtomicU64,
    failures: AtomicU64,
}

struct Slot {
    generation: u64,
    token: CancellationToken,
}

impl<B: SearchBackend> DebouncedSearch<B> {
    pub fn new(backend: B, config: &SearchConfig) -> Self {
        Self::with_timing(backend, config.debounce(), config.min_query_chars)
    }

    pub fn with_timing(backend: B, debounce: Duration, min_query_chars: usize) -> Self {
        let (state_tx, _) = watch::channel(SearchState::Idle);
        Self {
            inner: Arc::new(Inner {
                backend,
                debounce,
                min_query_chars,
                slot: Mutex::new(Slot {
                    generation: 0,
                    token: CancellationToken::new(),
                }),
                state_tx,
                requests: AtomicU64::new(0),
                failures: AtomicU64::new(0),
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState<B::Item>> {
        self.inner.state_tx.subscribe()
    }

    pub fn state(&self) -> SearchState<B::Item> {
        self.inner.state_tx.borrow().clone()
    }

    /// Feed the current contents of the search field. Must be called from
    /// within a Tokio runtime.
    pub fn input(&self, text: &str) {
        let query = text.trim().to_string();
        let mut slot = self.inner.lock_slot();
        let token = supersede(&mut slot);

        if query.chars().count() < self.inner.min_query_chars {
            self.inner.state_tx.send_replace(SearchState::Idle);
            return;
        }

        let generation = slot.generation;
        self.inner
            .state_tx
            .send_replace(SearchState::PendingDebounce(query.clone()));
        drop(slot);

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            inner.run(generation, query, token).await;
        });
    }

    /// Drop whatever is pending or in flight and clear the results.
    pub fn cancel(&self) {
        let mut slot = self.inner.lock_slot();
        supersede(&mut slot);
        self.inner.state_tx.send_replace(SearchState::Idle);
    }

    /// Requests that actually reached the backend.
    pub fn requests_issued(&self) -> u64 {
        self.inner.requests.load(Ordering::Relaxed)
    }

    /// Backend failures that were shown as empty results.
    pub fn failure_count(&self) -> u64 {
        self.inner.failures.load(Ordering::Relaxed)
    }
}

impl<B: SearchBackend> Drop for DebouncedSearch<B> {
    fn drop(&mut self) {
        self.inner.lock_slot().token.cancel();
    }
}

fn supersede(slot: &mut Slot) -> CancellationToken {
    slot.generation += 1;
    slot.token.cancel();
    slot.token = CancellationToken::new();
    slot.token.clone()
}

impl<B: SearchBackend> Inner<B> {
    async fn run(&self, generation: u64, query: String, token: CancellationToken) {
        if sleep(self.debounce).or_cancel(&token).await.is_err() {
            debug!(%query, "search superseded during debounce");
            return;
        }
        if !self.publish_if_current(generation, || SearchState::InFlight(query.clone())) {
            return;
        }

        self.requests.fetch_add(1, Ordering::Relaxed);
        let outcome = match self.backend.search(&query).or_cancel(&token).await {
            Ok(outcome) => outcome,
            Err(_) => {
                debug!(%query, "search superseded in flight");
                return;
            }
        };
        let results = match outcome {
            Ok(results) => results,
            Err(err) => {
                warn!(%query, "search failed, showing no results: {err}");
                self.failures.fetch_add(1, Ordering::Relaxed);
                Vec::new()
            }
        };
        let count = results.len();
        if self.publish_if_current(generation, || SearchState::Settled {
            query: query.clone(),
            results,
        }) {
            debug!(%query, "search settled with {count} results");
        } else {
            debug!(%query, "discarding stale search results");
        }
    }

    fn publish_if_current<F>(&self, generation: u64, state: F) -> bool
    where
        F: FnOnce() -> SearchState<B::Item>,
    {
        let slot = self.lock_slot();
        if slot.generation != generation || slot.token.is_cancelled() {
            return false;
        }
        self.state_tx.send_replace(state());
        true
    }

    fn lock_slot(&self) -> MutexGuard<'_, Slot> {
        match self.slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
