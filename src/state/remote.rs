// Generic remote-state cells shared by every entity container.
//
// Each fetch takes a ticket from a monotonically increasing sequence. Only
// the holder of the latest ticket may write its result back, so a slow older
// response can never overwrite a newer one.

use crate::services::ServiceResponse;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Point-in-time copy of a cell
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T: Default> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            data: T::default(),
            loading: false,
            error: None,
        }
    }
}

/// How a fetch ended from the container's point of view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Failed(String),
    /// A newer fetch or a `clear()` happened first; the response was dropped
    Superseded,
}

impl FetchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, FetchOutcome::Applied)
    }
}

struct Cell<T> {
    snapshot: RwLock<Snapshot<T>>,
    sequence: AtomicU64,
}

/// Shared, cloneable cell holding one remote value
pub(crate) struct Remote<T> {
    cell: Arc<Cell<T>>,
    name: &'static str,
}

impl<T> Clone for Remote<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
            name: self.name,
        }
    }
}

impl<T: Clone + Default> Remote<T> {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            cell: Arc::new(Cell {
                snapshot: RwLock::new(Snapshot::default()),
                sequence: AtomicU64::new(0),
            }),
            name,
        }
    }

    pub(crate) async fn snapshot(&self) -> Snapshot<T> {
        self.cell.snapshot.read().await.clone()
    }

    /// Run `fetch` and store its result if no newer fetch was dispatched
    /// meanwhile. Failures keep the cached value.
    pub(crate) async fn load<F>(&self, fetch: F, fallback_error: &str) -> FetchOutcome
    where
        F: Future<Output = ServiceResponse<T>>,
    {
        let ticket = self.begin().await;
        let response = fetch.await;
        self.finish(ticket, response, fallback_error).await
    }

    async fn begin(&self) -> u64 {
        let mut snapshot = self.cell.snapshot.write().await;
        let ticket = self.cell.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        snapshot.loading = true;
        snapshot.error = None;
        tracing::debug!(store = self.name, ticket, "Fetch started");
        ticket
    }

    async fn finish(
        &self,
        ticket: u64,
        response: ServiceResponse<T>,
        fallback_error: &str,
    ) -> FetchOutcome {
        let mut snapshot = self.cell.snapshot.write().await;
        let latest = self.cell.sequence.load(Ordering::SeqCst);
        if ticket != latest {
            tracing::debug!(store = self.name, ticket, latest, "Discarding superseded response");
            return FetchOutcome::Superseded;
        }

        snapshot.loading = false;
        match response {
            ServiceResponse::Success(data) => {
                snapshot.data = data;
                snapshot.error = None;
                tracing::debug!(store = self.name, ticket, "Fetch applied");
                FetchOutcome::Applied
            }
            ServiceResponse::Failure(message) => {
                let message = if message.trim().is_empty() {
                    fallback_error.to_string()
                } else {
                    message
                };
                tracing::debug!(store = self.name, ticket, error = %message, "Fetch failed, keeping cached value");
                snapshot.error = Some(message.clone());
                FetchOutcome::Failed(message)
            }
        }
    }

    /// Reset to the empty state and orphan any in-flight fetch
    pub(crate) async fn clear(&self) {
        let mut snapshot = self.cell.snapshot.write().await;
        self.cell.sequence.fetch_add(1, Ordering::SeqCst);
        *snapshot = Snapshot::default();
        tracing::debug!(store = self.name, "Cleared");
    }
}

// ============================================================================
// Public cell flavours
// ============================================================================

/// A cached list: `{items, loading, error}`
pub struct RemoteCollection<T> {
    remote: Remote<Vec<T>>,
}

impl<T> Clone for RemoteCollection<T> {
    fn clone(&self) -> Self {
        Self {
            remote: self.remote.clone(),
        }
    }
}

impl<T: Clone> RemoteCollection<T> {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            remote: Remote::new(name),
        }
    }

    pub async fn snapshot(&self) -> Snapshot<Vec<T>> {
        self.remote.snapshot().await
    }

    pub async fn items(&self) -> Vec<T> {
        self.remote.cell.snapshot.read().await.data.clone()
    }

    pub async fn loading(&self) -> bool {
        self.remote.cell.snapshot.read().await.loading
    }

    pub async fn error(&self) -> Option<String> {
        self.remote.cell.snapshot.read().await.error.clone()
    }

    pub(crate) async fn load<F>(&self, fetch: F, fallback_error: &str) -> FetchOutcome
    where
        F: Future<Output = ServiceResponse<Vec<T>>>,
    {
        self.remote.load(fetch, fallback_error).await
    }
}

/// A cached single record: `{value, loading, error}`
pub struct RemoteEntity<T> {
    remote: Remote<Option<T>>,
}

impl<T> Clone for RemoteEntity<T> {
    fn clone(&self) -> Self {
        Self {
            remote: self.remote.clone(),
        }
    }
}

impl<T: Clone> RemoteEntity<T> {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            remote: Remote::new(name),
        }
    }

    pub async fn snapshot(&self) -> Snapshot<Option<T>> {
        self.remote.snapshot().await
    }

    pub async fn value(&self) -> Option<T> {
        self.remote.cell.snapshot.read().await.data.clone()
    }

    pub async fn loading(&self) -> bool {
        self.remote.cell.snapshot.read().await.loading
    }

    pub async fn error(&self) -> Option<String> {
        self.remote.cell.snapshot.read().await.error.clone()
    }

    pub async fn clear(&self) {
        self.remote.clear().await
    }

    pub(crate) async fn load<F>(&self, fetch: F, fallback_error: &str) -> FetchOutcome
    where
        F: Future<Output = ServiceResponse<T>>,
    {
        self.remote
            .load(async { fetch.await.map(Some) }, fallback_error)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_success_then_failure_keeps_items() {
        let cell: RemoteCollection<u32> = RemoteCollection::new("numbers");

        let outcome = cell
            .load(async { ServiceResponse::Success(vec![1, 2]) }, "Erro")
            .await;
        assert!(outcome.is_applied());

        let outcome = cell
            .load(async { ServiceResponse::Failure("boom".to_string()) }, "Erro")
            .await;
        assert_eq!(outcome, FetchOutcome::Failed("boom".to_string()));

        let snapshot = cell.snapshot().await;
        assert_eq!(snapshot.data, vec![1, 2]);
        assert_eq!(snapshot.error.as_deref(), Some("boom"));
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_blank_failure_uses_fallback() {
        let cell: RemoteEntity<u32> = RemoteEntity::new("number");
        cell.load(async { ServiceResponse::Failure("  ".to_string()) }, "Erro ao carregar")
            .await;
        assert_eq!(cell.error().await.as_deref(), Some("Erro ao carregar"));
        assert_eq!(cell.value().await, None);
    }

    #[tokio::test]
    async fn test_older_response_does_not_overwrite_newer() {
        let cell: RemoteEntity<&'static str> = RemoteEntity::new("word");
        let (slow_tx, slow_rx) = oneshot::channel();
        let (fast_tx, fast_rx) = oneshot::channel();

        let slow = {
            let cell = cell.clone();
            tokio::spawn(async move {
                cell.load(async { slow_rx.await.unwrap() }, "Erro").await
            })
        };
        tokio::task::yield_now().await;
        while !cell.loading().await {
            tokio::task::yield_now().await;
        }

        let fast = {
            let cell = cell.clone();
            tokio::spawn(async move {
                cell.load(async { fast_rx.await.unwrap() }, "Erro").await
            })
        };
        // Let the second fetch take its ticket before anything resolves
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        fast_tx.send(ServiceResponse::Success("new")).unwrap();
        assert_eq!(fast.await.unwrap(), FetchOutcome::Applied);
        assert!(!cell.loading().await);

        slow_tx.send(ServiceResponse::Success("old")).unwrap();
        assert_eq!(slow.await.unwrap(), FetchOutcome::Superseded);

        assert_eq!(cell.value().await, Some("new"));
    }

    #[tokio::test]
    async fn test_loading_stays_until_latest_settles() {
        let cell: RemoteCollection<u8> = RemoteCollection::new("bytes");
        let (first_tx, first_rx) = oneshot::channel();
        let (second_tx, second_rx) = oneshot::channel();

        let first = {
            let cell = cell.clone();
            tokio::spawn(async move { cell.load(async { first_rx.await.unwrap() }, "Erro").await })
        };
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        let second = {
            let cell = cell.clone();
            tokio::spawn(async move { cell.load(async { second_rx.await.unwrap() }, "Erro").await })
        };
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        first_tx.send(ServiceResponse::Success(vec![1])).unwrap();
        assert_eq!(first.await.unwrap(), FetchOutcome::Superseded);
        assert!(cell.loading().await);

        second_tx.send(ServiceResponse::Success(vec![2])).unwrap();
        assert_eq!(second.await.unwrap(), FetchOutcome::Applied);
        assert!(!cell.loading().await);
        assert_eq!(cell.items().await, vec![2]);
    }

    #[tokio::test]
    async fn test_clear_orphans_in_flight_fetch() {
        let cell: RemoteEntity<u32> = RemoteEntity::new("number");
        let (tx, rx) = oneshot::channel();

        let pending = {
            let cell = cell.clone();
            tokio::spawn(async move { cell.load(async { rx.await.unwrap() }, "Erro").await })
        };
        while !cell.loading().await {
            tokio::task::yield_now().await;
        }

        cell.clear().await;
        tx.send(ServiceResponse::Success(9)).unwrap();

        assert_eq!(pending.await.unwrap(), FetchOutcome::Superseded);
        assert_eq!(cell.snapshot().await, Snapshot::default());
    }
}
