//! Data synchronization for remote collections.
//!
//! A [`DataSync`] keeps one remote collection in step with its inputs (the
//! session token and a source-specific query). While mounted, any change
//! to an input triggers a full refetch; there is no caching across input
//! changes.
//!
//! Every fetch is stamped with a sequence number. A response is applied
//! only if its sequence is still the latest issued, so a slow response for
//! superseded inputs can never overwrite the state of a newer request.

use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    api::Transport,
    error::ClientResult,
    models::Listing,
};

/// Describes one remote collection
pub trait SyncSource: Send + Sync {
    type Item: DeserializeOwned + Clone + Send + Sync;
    type Query: Clone + PartialEq + Default + Send + Sync;

    /// Name used in logs
    fn name(&self) -> &'static str;

    fn path(&self, query: &Self::Query) -> String;

    /// Token-gated sources do not fetch without a session
    fn requires_token(&self) -> bool;

    /// Page-level message shown when a fetch fails
    fn error_message(&self) -> &'static str;
}

/// Observable state of a synchronized collection
#[derive(Debug, Clone, PartialEq)]
pub struct SyncState<T> {
    pub data: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for SyncState<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

/// Handle for one issued fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

struct Inner<T, Q> {
    state: SyncState<T>,
    token: Option<String>,
    query: Q,
    mounted: bool,
    latest: u64,
    fetches: u64,
}

pub struct DataSync<S: SyncSource> {
    source: S,
    transport: Arc<dyn Transport>,
    inner: Mutex<Inner<S::Item, S::Query>>,
}

impl<S: SyncSource> DataSync<S> {
    pub fn new(source: S, transport: Arc<dyn Transport>) -> Self {
        Self {
            source,
            transport,
            inner: Mutex::new(Inner {
                state: SyncState::default(),
                token: None,
                query: S::Query::default(),
                mounted: false,
                latest: 0,
                fetches: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<S::Item, S::Query>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn snapshot(&self) -> SyncState<S::Item> {
        self.lock().state.clone()
    }

    /// Borrow the current collection without cloning it
    pub fn with_data<R>(&self, f: impl FnOnce(&[S::Item]) -> R) -> R {
        f(&self.lock().state.data)
    }

    pub fn query(&self) -> S::Query {
        self.lock().query.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.lock().mounted
    }

    /// Number of requests issued so far
    pub fn fetch_count(&self) -> u64 {
        self.lock().fetches
    }

    /// Start following inputs and perform the initial fetch
    pub async fn mount(&self) {
        self.lock().mounted = true;
        self.refresh().await;
    }

    /// Stop following inputs. State is dropped and in-flight responses
    /// are discarded.
    pub fn unmount(&self) {
        let mut inner = self.lock();
        inner.mounted = false;
        inner.latest += 1;
        inner.state = SyncState::default();
    }

    /// Update the session token; refetches when it changed
    pub async fn set_token(&self, token: Option<String>) {
        let changed = {
            let mut inner = self.lock();
            let changed = inner.token != token;
            inner.token = token;
            changed && inner.mounted
        };
        if changed {
            self.refresh().await;
        }
    }

    /// Update the query; refetches when it changed
    pub async fn set_query(&self, query: S::Query) {
        let changed = {
            let mut inner = self.lock();
            let changed = inner.query != query;
            inner.query = query;
            changed && inner.mounted
        };
        if changed {
            self.refresh().await;
        }
    }

    /// Refetch with the current inputs
    pub async fn refresh(&self) {
        let Some((ticket, path, token)) = self.begin() else {
            return;
        };

        let result = self.fetch(&path, token).await;
        self.complete(ticket, result);
    }

    async fn fetch(&self, path: &str, token: Option<String>) -> ClientResult<Vec<S::Item>> {
        let body = self.transport.get(path, token).await?;
        Ok(Listing::from_value(body)?.into_items())
    }

    /// Issue a new fetch: bumps the sequence and flags loading.
    /// Returns `None` when a token-gated source has no session.
    fn begin(&self) -> Option<(FetchTicket, String, Option<String>)> {
        let mut inner = self.lock();

        if self.source.requires_token() && inner.token.is_none() {
            tracing::debug!("{}: no session, skipping fetch", self.source.name());
            inner.latest += 1;
            inner.state = SyncState::default();
            return None;
        }

        inner.latest += 1;
        inner.fetches += 1;
        inner.state.loading = true;
        inner.state.error = None;

        let path = self.source.path(&inner.query);
        tracing::debug!("{}: fetch #{} {}", self.source.name(), inner.latest, path);
        Some((FetchTicket(inner.latest), path, inner.token.clone()))
    }

    /// Apply the outcome of a fetch. Returns `false` if the fetch was
    /// superseded and its outcome dropped.
    fn complete(&self, ticket: FetchTicket, result: ClientResult<Vec<S::Item>>) -> bool {
        let mut inner = self.lock();

        if ticket.0 != inner.latest {
            tracing::debug!(
                "{}: dropping stale response #{} (latest #{})",
                self.source.name(),
                ticket.0,
                inner.latest
            );
            return false;
        }

        match result {
            Ok(items) => {
                inner.state.data = items;
            }
            Err(e) => {
                tracing::warn!("{}: fetch failed: {}", self.source.name(), e);
                inner.state.data.clear();
                inner.state.error = Some(self.source.error_message().to_string());
            }
        }
        inner.state.loading = false;
        true
    }
}
