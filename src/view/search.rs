use crate::models::PropertySummary;
use crate::search::SearchBackend;
use crate::view::token::LatestRequest;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// What the search box shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<PropertySummary>,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Results became the visible state
    Applied(Vec<PropertySummary>),
    /// A newer query arrived first; nothing was applied
    Superseded,
}

/// Debounced search box.
///
/// Every keystroke calls `input`. A call waits out the debounce window and gives up if
/// another keystroke arrived meanwhile; a response is applied only if no newer query
/// was issued while it was in flight.
pub struct SearchSession {
    backend: Arc<dyn SearchBackend>,
    debounce: Duration,
    latest: LatestRequest,
    state: watch::Sender<SearchState>,
}

impl SearchSession {
    pub fn new(backend: Arc<dyn SearchBackend>, debounce: Duration) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            backend,
            debounce,
            latest: LatestRequest::new(),
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub async fn input(&self, query: &str) -> SearchOutcome {
        let token = self.latest.begin();

        if query.trim().is_empty() {
            self.state.send_replace(SearchState::default());
            return SearchOutcome::Applied(Vec::new());
        }

        self.state.send_modify(|s| {
            s.query = query.to_string();
            s.loading = true;
        });

        tokio::time::sleep(self.debounce).await;
        if !self.latest.is_current(token) {
            debug!(query, "Search debounced away");
            return SearchOutcome::Superseded;
        }

        let results = self.backend.search(query).await;
        if !self.latest.is_current(token) {
            debug!(query, "Discarding stale search response");
            return SearchOutcome::Superseded;
        }

        self.state.send_replace(SearchState {
            query: query.to_string(),
            results: results.clone(),
            loading: false,
        });
        SearchOutcome::Applied(results)
    }

    /// Drop any pending search, e.g. when the box is closed
    pub fn cancel(&self) {
        self.latest.invalidate();
        self.state.send_modify(|s| s.loading = false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed;
    use crate::search::Matcher;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn matcher() -> Arc<Matcher> {
        let summaries = seed::demo_data().properties.into_iter().map(|p| p.summary).collect();
        Arc::new(Matcher::new(summaries))
    }

    /// Backend whose latency depends on the query, counting calls
    struct SlowBackend {
        inner: Arc<Matcher>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SearchBackend for SlowBackend {
        async fn search(&self, query: &str) -> Vec<PropertySummary> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // shorter queries answer slower
            let delay = 1_000u64.saturating_sub(query.len() as u64 * 100);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            self.inner.search(query)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_keystrokes_inside_window_are_debounced() {
        let session = Arc::new(SearchSession::new(matcher(), DEFAULT_DEBOUNCE));

        let first = tokio::spawn({
            let session = session.clone();
            async move { session.input("shi").await }
        });
        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = session.input("shields").await;

        assert_eq!(first.await.unwrap(), SearchOutcome::Superseded);
        match second {
            SearchOutcome::Applied(results) => assert_eq!(results[0].id, "VC-9552-CQ"),
            other => panic!("expected results, got {other:?}"),
        }
        assert_eq!(session.current().query, "shields");
        assert!(!session.current().loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_earlier_response_is_ignored() {
        let backend = Arc::new(SlowBackend {
            inner: matcher(),
            calls: AtomicUsize::new(0),
        });
        let session = Arc::new(SearchSession::new(backend.clone(), Duration::from_millis(50)));

        let early = tokio::spawn({
            let session = session.clone();
            async move { session.input("re").await }
        });
        // past the debounce window so "re" reaches the backend
        tokio::time::sleep(Duration::from_millis(100)).await;
        let late = session.input("redcliffe").await;

        assert_eq!(early.await.unwrap(), SearchOutcome::Superseded);
        assert!(matches!(late, SearchOutcome::Applied(_)));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
        assert_eq!(session.current().query, "redcliffe");
        assert!(session
            .current()
            .results
            .iter()
            .all(|c| crate::search::is_match(c, "redcliffe")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_query_skips_backend() {
        let backend = Arc::new(SlowBackend {
            inner: matcher(),
            calls: AtomicUsize::new(0),
        });
        let session = SearchSession::new(backend.clone(), DEFAULT_DEBOUNCE);

        assert_eq!(session.input("   ").await, SearchOutcome::Applied(vec![]));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert_eq!(session.current(), SearchState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_discards_pending() {
        let session = Arc::new(SearchSession::new(matcher(), DEFAULT_DEBOUNCE));
        let pending = tokio::spawn({
            let session = session.clone();
            async move { session.input("gc").await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        session.cancel();
        assert_eq!(pending.await.unwrap(), SearchOutcome::Superseded);
        assert!(session.current().results.is_empty());
    }
}
