//! The cache table itself.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use metrics::counter;
use tokio::sync::mpsc;
use tracing::debug;

use crate::domain::posts::Post;

use super::keys::QueryKey;

/// A cached query result. Collections are shared behind `Arc` so dependent
/// views can memoize against the collection reference.
#[derive(Debug, Clone)]
pub enum CachedQuery {
    Posts(Arc<Vec<Post>>),
    Post(Arc<Post>),
}

#[derive(Debug, Clone)]
enum QueryEntry {
    Fresh(CachedQuery),
    Stale,
}

/// Explicit cache table plus the refetch queue fed by invalidation.
pub struct QueryStore {
    entries: RwLock<HashMap<QueryKey, QueryEntry>>,
    refetch_tx: mpsc::UnboundedSender<QueryKey>,
}

impl QueryStore {
    /// Build the store together with the receiving end of its refetch queue.
    /// The receiver is handed to a [`super::RefetchWorker`].
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<QueryKey>) {
        let (refetch_tx, refetch_rx) = mpsc::unbounded_channel();
        let store = Arc::new(Self {
            entries: RwLock::new(HashMap::new()),
            refetch_tx,
        });
        (store, refetch_rx)
    }

    /// Fresh value for `key`, or `None` when the entry is absent or stale.
    pub fn get(&self, key: &QueryKey) -> Option<CachedQuery> {
        let entries = self.entries.read().ok()?;
        match entries.get(key) {
            Some(QueryEntry::Fresh(value)) => {
                counter!("bacheca_query_cache_hit_total").increment(1);
                Some(value.clone())
            }
            Some(QueryEntry::Stale) | None => {
                counter!("bacheca_query_cache_miss_total").increment(1);
                None
            }
        }
    }

    pub fn put(&self, key: QueryKey, value: CachedQuery) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key, QueryEntry::Fresh(value));
        }
    }

    pub fn remove(&self, key: &QueryKey) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }

    /// Mark `key` stale and schedule a re-fetch.
    ///
    /// Idempotent: invalidating an absent or already-stale entry changes
    /// nothing and schedules nothing, so concurrent mutation handlers never
    /// need to coordinate.
    pub fn invalidate(&self, key: &QueryKey) {
        let mut entries = match self.entries.write() {
            Ok(entries) => entries,
            Err(_) => return,
        };
        match entries.get_mut(key) {
            Some(entry @ QueryEntry::Fresh(_)) => {
                *entry = QueryEntry::Stale;
                counter!("bacheca_query_cache_invalidated_total").increment(1);
                debug!(operation = key.operation(), "query invalidated");
                // The worker treats a dropped receiver as shutdown.
                let _ = self.refetch_tx.send(key.clone());
            }
            Some(QueryEntry::Stale) | None => {}
        }
    }

    /// Whether the table currently holds a stale entry for `key`.
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.entries
            .read()
            .map(|entries| matches!(entries.get(key), Some(QueryEntry::Stale)))
            .unwrap_or(false)
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries
            .read()
            .map(|entries| entries.contains_key(key))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::posts::PostId;

    fn post(id: &str) -> Post {
        Post {
            id: PostId::new(id),
            title: "Hello World".to_string(),
            content: "This is my first post content.".to_string(),
            author_id: "alice".to_string(),
        }
    }

    #[tokio::test]
    async fn fresh_entries_are_returned_until_invalidated() {
        let (store, mut rx) = QueryStore::new();
        let posts = Arc::new(vec![post("1")]);
        store.put(QueryKey::PostsAll, CachedQuery::Posts(posts.clone()));

        match store.get(&QueryKey::PostsAll) {
            Some(CachedQuery::Posts(cached)) => assert!(Arc::ptr_eq(&cached, &posts)),
            other => panic!("expected cached posts, got {other:?}"),
        }

        store.invalidate(&QueryKey::PostsAll);
        assert!(store.get(&QueryKey::PostsAll).is_none());
        assert!(store.is_stale(&QueryKey::PostsAll));
        assert_eq!(rx.recv().await, Some(QueryKey::PostsAll));
    }

    #[tokio::test]
    async fn invalidation_is_idempotent() {
        let (store, mut rx) = QueryStore::new();
        store.put(
            QueryKey::PostsAll,
            CachedQuery::Posts(Arc::new(vec![post("1")])),
        );

        store.invalidate(&QueryKey::PostsAll);
        store.invalidate(&QueryKey::PostsAll);
        // Absent entry: no-op, nothing scheduled.
        store.invalidate(&QueryKey::PostById(PostId::new("missing")));

        assert_eq!(rx.try_recv().ok(), Some(QueryKey::PostsAll));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let (store, _rx) = QueryStore::new();
        store.put(
            QueryKey::PostById(PostId::new("1")),
            CachedQuery::Post(Arc::new(post("1"))),
        );
        store.put(
            QueryKey::PostById(PostId::new("2")),
            CachedQuery::Post(Arc::new(post("2"))),
        );

        store.invalidate(&QueryKey::PostById(PostId::new("1")));
        assert!(store.get(&QueryKey::PostById(PostId::new("1"))).is_none());
        assert!(store.get(&QueryKey::PostById(PostId::new("2"))).is_some());
    }
}
