//! Live subscription over the remote entry collection.
//!
//! The remote API has no push channel; live queries are produced by polling
//! the per-owner collection and handing the full ordered snapshot to the
//! subscriber whenever it changes. The first snapshot is delivered
//! immediately on subscribe.

use async_trait::async_trait;
use dreamlog_core::Result;
use dreamlog_core::config::RemoteStoreConfig;
use dreamlog_core::entry::{EntryRepository, JournalEntry};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::client::RemoteEntryClient;

/// Callback receiving full ordered snapshots of the subscribed collection.
pub type SnapshotHandler = Arc<dyn Fn(Vec<JournalEntry>) + Send + Sync>;

/// Source of per-owner collection snapshots.
///
/// Exists so the subscription loop can be exercised against an in-memory
/// source; the production implementation is [`RemoteEntryClient`].
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn snapshot(&self, owner_id: &str) -> Result<Vec<JournalEntry>>;
}

#[async_trait]
impl SnapshotSource for RemoteEntryClient {
    async fn snapshot(&self, owner_id: &str) -> Result<Vec<JournalEntry>> {
        self.fetch_by_owner(owner_id).await
    }
}

/// An active live query; aborts its poll task when released.
struct Subscription {
    owner_id: String,
    task: JoinHandle<()>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Manages the live subscription on top of a snapshot source.
///
/// At most one subscription is active per store instance. Subscribing again
/// (e.g. after an account switch) first releases the previous live query, so
/// stale snapshots for the old owner stop flowing before the new ones start.
pub struct RemoteEntryStore {
    source: Arc<dyn SnapshotSource>,
    poll_interval: Duration,
    active: Mutex<Option<Subscription>>,
}

impl RemoteEntryStore {
    pub fn new(source: Arc<dyn SnapshotSource>, poll_interval: Duration) -> Self {
        Self {
            source,
            poll_interval,
            active: Mutex::new(None),
        }
    }

    /// Creates a store polling at the interval from an endpoint configuration.
    pub fn from_config(source: Arc<dyn SnapshotSource>, config: &RemoteStoreConfig) -> Self {
        Self::new(source, Duration::from_secs(config.poll_interval_secs))
    }

    /// Opens a live query for `owner_id`.
    ///
    /// `handler` is invoked with the full ordered list once immediately and
    /// again after every observed change (adds, edits, and deletes made by
    /// this or any other client sharing the account).
    pub async fn subscribe(&self, owner_id: &str, handler: SnapshotHandler) {
        let mut active = self.active.lock().await;
        // Release the previous subscription before the new one starts.
        active.take();

        let source = Arc::clone(&self.source);
        let owner = owner_id.to_string();
        let poll_interval = self.poll_interval;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            let mut last: Option<Vec<JournalEntry>> = None;

            loop {
                ticker.tick().await;

                match source.snapshot(&owner).await {
                    Ok(entries) => {
                        if last.as_ref() != Some(&entries) {
                            handler(entries.clone());
                            last = Some(entries);
                        }
                    }
                    Err(e) => {
                        tracing::warn!("live query poll failed for owner {}: {}", owner, e);
                    }
                }
            }
        });

        *active = Some(Subscription {
            owner_id: owner_id.to_string(),
            task,
        });
    }

    /// Releases the live query. Must be called when the owning view is torn
    /// down or the user changes; the drop guard on the handle is only a
    /// backstop.
    pub async fn unsubscribe(&self) {
        self.active.lock().await.take();
    }

    /// Owner id of the active subscription, if any.
    pub async fn subscribed_owner(&self) -> Option<String> {
        self.active
            .lock()
            .await
            .as_ref()
            .map(|s| s.owner_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    /// In-memory snapshot source whose contents tests mutate between polls.
    struct MemorySource {
        entries: StdMutex<Vec<JournalEntry>>,
    }

    impl MemorySource {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                entries: StdMutex::new(Vec::new()),
            })
        }

        fn push(&self, entry: JournalEntry) {
            self.entries.lock().unwrap().push(entry);
        }
    }

    #[async_trait]
    impl SnapshotSource for MemorySource {
        async fn snapshot(&self, owner_id: &str) -> Result<Vec<JournalEntry>> {
            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.owner_id == owner_id)
                .cloned()
                .collect())
        }
    }

    fn collecting_handler() -> (SnapshotHandler, Arc<StdMutex<Vec<Vec<JournalEntry>>>>) {
        let seen: Arc<StdMutex<Vec<Vec<JournalEntry>>>> = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let handler: SnapshotHandler = Arc::new(move |snapshot| {
            sink.lock().unwrap().push(snapshot);
        });
        (handler, seen)
    }

    #[tokio::test]
    async fn test_first_snapshot_arrives_immediately() {
        let source = MemorySource::new();
        source.push(JournalEntry::new("alice", "t", "b"));
        let store = RemoteEntryStore::new(source.clone(), Duration::from_millis(20));
        let (handler, seen) = collecting_handler();

        store.subscribe("alice", handler).await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        let snapshots = seen.lock().unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].len(), 1);
    }

    #[tokio::test]
    async fn test_changes_produce_new_snapshots_and_steady_state_does_not() {
        let source = MemorySource::new();
        let store = RemoteEntryStore::new(source.clone(), Duration::from_millis(10));
        let (handler, seen) = collecting_handler();

        store.subscribe("alice", handler).await;
        tokio::time::sleep(Duration::from_millis(35)).await;

        // Initial empty snapshot only, no repeats while nothing changes.
        assert_eq!(seen.lock().unwrap().len(), 1);

        source.push(JournalEntry::new("alice", "t", "new dream"));
        tokio::time::sleep(Duration::from_millis(35)).await;

        let snapshots = seen.lock().unwrap();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[1][0].body, "new dream");
    }

    #[tokio::test]
    async fn test_resubscribe_releases_previous_owner() {
        let source = MemorySource::new();
        let store = RemoteEntryStore::new(source.clone(), Duration::from_millis(10));
        let (alice_handler, alice_seen) = collecting_handler();
        let (bob_handler, bob_seen) = collecting_handler();

        store.subscribe("alice", alice_handler).await;
        tokio::time::sleep(Duration::from_millis(25)).await;
        store.subscribe("bob", bob_handler).await;
        tokio::time::sleep(Duration::from_millis(25)).await;

        assert_eq!(store.subscribed_owner().await.as_deref(), Some("bob"));
        let alice_count = alice_seen.lock().unwrap().len();

        // Alice's feed is dead: new entries no longer reach her handler.
        source.push(JournalEntry::new("alice", "t", "late entry"));
        tokio::time::sleep(Duration::from_millis(35)).await;

        assert_eq!(alice_seen.lock().unwrap().len(), alice_count);
        assert!(!bob_seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_delivery() {
        let source = MemorySource::new();
        let store = RemoteEntryStore::new(source.clone(), Duration::from_millis(10));
        let (handler, seen) = collecting_handler();

        store.subscribe("alice", handler).await;
        tokio::time::sleep(Duration::from_millis(25)).await;
        store.unsubscribe().await;
        assert!(store.subscribed_owner().await.is_none());

        let count = seen.lock().unwrap().len();
        source.push(JournalEntry::new("alice", "t", "after unsubscribe"));
        tokio::time::sleep(Duration::from_millis(35)).await;

        assert_eq!(seen.lock().unwrap().len(), count);
    }
}
