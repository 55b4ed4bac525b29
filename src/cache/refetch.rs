//! Scheduled re-fetch of invalidated queries.

use std::sync::Arc;

use metrics::counter;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::rpc::{PostClient, RpcCode};

use super::keys::QueryKey;
use super::store::{CachedQuery, QueryStore};

/// Drains the refetch queue and repopulates the store.
///
/// Running as a single task serializes re-fetches per key: a key can be
/// queued at most once per invalidation, and fetches never overlap.
pub struct RefetchWorker {
    store: Arc<QueryStore>,
    client: Arc<dyn PostClient>,
}

impl RefetchWorker {
    pub fn new(store: Arc<QueryStore>, client: Arc<dyn PostClient>) -> Self {
        Self { store, client }
    }

    /// Consume the queue until the store (and its sender) is dropped.
    pub async fn run(self, mut refetch_rx: mpsc::UnboundedReceiver<QueryKey>) {
        while let Some(key) = refetch_rx.recv().await {
            self.refetch(&key).await;
        }
        debug!("refetch queue closed, worker exiting");
    }

    /// Drain whatever is queued right now, then return. Test seam.
    pub async fn drain(&self, refetch_rx: &mut mpsc::UnboundedReceiver<QueryKey>) {
        while let Ok(key) = refetch_rx.try_recv() {
            self.refetch(&key).await;
        }
    }

    async fn refetch(&self, key: &QueryKey) {
        counter!("bacheca_query_refetch_total").increment(1);
        match key {
            QueryKey::PostsAll => match self.client.all().await {
                Ok(posts) => {
                    self.store
                        .put(key.clone(), CachedQuery::Posts(Arc::new(posts)));
                }
                Err(err) => {
                    warn!(error = %err, "re-fetch of post collection failed, entry stays stale");
                }
            },
            QueryKey::PostById(id) => match self.client.by_id(id).await {
                Ok(post) => {
                    self.store.put(key.clone(), CachedQuery::Post(Arc::new(post)));
                }
                Err(err) if err.code() == Some(RpcCode::NotFound) => {
                    // The post is gone; keeping a stale entry would only
                    // schedule more failing fetches.
                    self.store.remove(key);
                }
                Err(err) => {
                    warn!(error = %err, %id, "re-fetch of post failed, entry stays stale");
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::posts::{Post, PostDraft, PostId};
    use crate::rpc::memory::MemoryPostClient;

    fn draft(title: &str) -> PostDraft {
        PostDraft {
            title: title.to_string(),
            content: "Long enough content body.".to_string(),
            author_id: "alice".to_string(),
        }
    }

    #[tokio::test]
    async fn invalidated_collection_is_refetched() {
        let client = Arc::new(MemoryPostClient::new());
        let (store, mut rx) = QueryStore::new();
        let worker = RefetchWorker::new(store.clone(), client.clone());

        let first: Post = client.create(draft("First post")).await.unwrap();
        store.put(
            QueryKey::PostsAll,
            CachedQuery::Posts(Arc::new(vec![first.clone()])),
        );

        client.create(draft("Second post")).await.unwrap();
        store.invalidate(&QueryKey::PostsAll);
        worker.drain(&mut rx).await;

        match store.get(&QueryKey::PostsAll) {
            Some(CachedQuery::Posts(posts)) => {
                assert_eq!(posts.len(), 2);
                assert_eq!(posts[0].id, first.id);
            }
            other => panic!("expected refreshed posts, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn vanished_post_entry_is_dropped() {
        let client = Arc::new(MemoryPostClient::new());
        let (store, mut rx) = QueryStore::new();
        let worker = RefetchWorker::new(store.clone(), client.clone());

        let post = client.create(draft("Hello World")).await.unwrap();
        let key = QueryKey::PostById(post.id.clone());
        store.put(key.clone(), CachedQuery::Post(Arc::new(post.clone())));

        client.delete(&post.id).await.unwrap();
        store.invalidate(&key);
        worker.drain(&mut rx).await;

        assert!(!store.contains(&key));
    }

    struct UnreachableClient;

    #[async_trait::async_trait]
    impl PostClient for UnreachableClient {
        async fn all(&self) -> Result<Vec<Post>, crate::rpc::RpcError> {
            Err(crate::rpc::RpcError::other(
                crate::rpc::OP_POST_ALL,
                "connection refused",
            ))
        }

        async fn by_id(&self, _id: &PostId) -> Result<Post, crate::rpc::RpcError> {
            Err(crate::rpc::RpcError::other(
                crate::rpc::OP_POST_BY_ID,
                "connection refused",
            ))
        }

        async fn create(&self, _draft: PostDraft) -> Result<Post, crate::rpc::RpcError> {
            Err(crate::rpc::RpcError::other(
                crate::rpc::OP_POST_CREATE,
                "connection refused",
            ))
        }

        async fn delete(&self, _id: &PostId) -> Result<(), crate::rpc::RpcError> {
            Err(crate::rpc::RpcError::other(
                crate::rpc::OP_POST_DELETE,
                "connection refused",
            ))
        }
    }

    #[tokio::test]
    async fn failed_refetch_leaves_entry_stale() {
        let (store, mut rx) = QueryStore::new();
        let worker = RefetchWorker::new(store.clone(), Arc::new(UnreachableClient));

        store.put(
            QueryKey::PostsAll,
            CachedQuery::Posts(Arc::new(Vec::new())),
        );
        store.invalidate(&QueryKey::PostsAll);
        worker.drain(&mut rx).await;

        assert!(store.is_stale(&QueryKey::PostsAll));
        assert!(store.get(&QueryKey::PostsAll).is_none());
    }
}
