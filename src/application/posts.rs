//! Post orchestration: read-through queries and mutations with cache
//! invalidation on success.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::cache::{CachedQuery, QueryKey, QueryStore};
use crate::domain::posts::{FieldError, Post, PostDraft, PostId};
use crate::rpc::{PostClient, RpcCode, RpcError};

/// Result of a create submission.
#[derive(Debug)]
pub enum CreateOutcome {
    Created(Post),
    /// Client-side validation refused the draft; nothing was submitted.
    Rejected(Vec<FieldError>),
    Unauthorized,
    Failed(RpcError),
}

/// Result of a confirmed delete. Three failure shapes are distinguished so
/// the UI can phrase each one differently; none of them is retried.
#[derive(Debug)]
pub enum DeleteOutcome {
    Deleted,
    Unauthorized,
    NotFound,
    Failed(RpcError),
}

#[derive(Clone)]
pub struct PostService {
    client: Arc<dyn PostClient>,
    cache: Arc<QueryStore>,
}

impl PostService {
    pub fn new(client: Arc<dyn PostClient>, cache: Arc<QueryStore>) -> Self {
        Self { client, cache }
    }

    pub fn cache(&self) -> &Arc<QueryStore> {
        &self.cache
    }

    /// Cached view of `post.all`, or `None` while no fresh fetch exists.
    pub fn cached_posts(&self) -> Option<Arc<Vec<Post>>> {
        match self.cache.get(&QueryKey::PostsAll) {
            Some(CachedQuery::Posts(posts)) => Some(posts),
            _ => None,
        }
    }

    /// Read-through fetch of the full collection.
    #[instrument(skip(self))]
    pub async fn list_posts(&self) -> Result<Arc<Vec<Post>>, RpcError> {
        if let Some(posts) = self.cached_posts() {
            return Ok(posts);
        }
        let posts = Arc::new(self.client.all().await?);
        self.cache
            .put(QueryKey::PostsAll, CachedQuery::Posts(posts.clone()));
        Ok(posts)
    }

    /// Read-through fetch of a single post.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn post_by_id(&self, id: &PostId) -> Result<Arc<Post>, RpcError> {
        let key = QueryKey::PostById(id.clone());
        if let Some(CachedQuery::Post(post)) = self.cache.get(&key) {
            return Ok(post);
        }
        let post = Arc::new(self.client.by_id(id).await?);
        self.cache.put(key, CachedQuery::Post(post.clone()));
        Ok(post)
    }

    /// Validate and submit a draft. Invalid drafts are never sent to the
    /// remote service; a successful create invalidates the collection so
    /// dependent views re-fetch (no optimistic insert).
    #[instrument(skip(self, draft))]
    pub async fn create_post(&self, draft: PostDraft) -> CreateOutcome {
        if let Err(errors) = draft.validate() {
            return CreateOutcome::Rejected(errors);
        }

        match self.client.create(draft).await {
            Ok(post) => {
                self.cache.invalidate(&QueryKey::PostsAll);
                info!(id = %post.id, "post created");
                CreateOutcome::Created(post)
            }
            Err(err) if err.code() == Some(RpcCode::Unauthorized) => CreateOutcome::Unauthorized,
            Err(err) => CreateOutcome::Failed(err),
        }
    }

    /// Delete by identifier. Success invalidates both the collection entry
    /// and the by-id entry for this post.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_post(&self, id: &PostId) -> DeleteOutcome {
        match self.client.delete(id).await {
            Ok(()) => {
                self.cache.invalidate(&QueryKey::PostsAll);
                self.cache.invalidate(&QueryKey::PostById(id.clone()));
                info!(%id, "post deleted");
                DeleteOutcome::Deleted
            }
            Err(err) => match err.code() {
                Some(RpcCode::Unauthorized) => DeleteOutcome::Unauthorized,
                Some(RpcCode::NotFound) => DeleteOutcome::NotFound,
                None => DeleteOutcome::Failed(err),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::memory::MemoryPostClient;

    type Refetches = tokio::sync::mpsc::UnboundedReceiver<QueryKey>;

    fn service() -> (Arc<MemoryPostClient>, PostService, Refetches) {
        let client = Arc::new(MemoryPostClient::new());
        let (cache, rx) = QueryStore::new();
        // The queue is not drained here; invalidation behavior is asserted
        // directly on the store.
        (client.clone(), PostService::new(client, cache), rx)
    }

    fn draft(title: &str) -> PostDraft {
        PostDraft {
            title: title.to_string(),
            content: "Long enough content body.".to_string(),
            author_id: "alice".to_string(),
        }
    }

    #[tokio::test]
    async fn list_posts_populates_and_reuses_the_cache() {
        let (client, service, _rx) = service();
        client.create(draft("Hello World")).await.unwrap();

        let first = service.list_posts().await.unwrap();
        let second = service.list_posts().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn invalid_draft_is_rejected_without_a_remote_call() {
        let (client, service, _rx) = service();
        let outcome = service.create_post(PostDraft::default()).await;
        assert!(matches!(outcome, CreateOutcome::Rejected(_)));
        assert!(client.is_empty());
    }

    #[tokio::test]
    async fn create_invalidates_the_collection() {
        let (_client, service, _rx) = service();
        service.list_posts().await.unwrap();

        let outcome = service.create_post(draft("Hello World")).await;
        assert!(matches!(outcome, CreateOutcome::Created(_)));
        assert!(service.cache().is_stale(&QueryKey::PostsAll));
    }

    #[tokio::test]
    async fn delete_invalidates_collection_and_by_id() {
        let (client, service, _rx) = service();
        let post = client.create(draft("Hello World")).await.unwrap();

        service.list_posts().await.unwrap();
        service.post_by_id(&post.id).await.unwrap();

        let outcome = service.delete_post(&post.id).await;
        assert!(matches!(outcome, DeleteOutcome::Deleted));
        assert!(service.cache().is_stale(&QueryKey::PostsAll));
        assert!(
            service
                .cache()
                .is_stale(&QueryKey::PostById(post.id.clone()))
        );
    }

    #[tokio::test]
    async fn delete_failures_are_distinguished() {
        let (client, service, _rx) = service();
        let post = client.create(draft("Hello World")).await.unwrap();

        let outcome = service.delete_post(&PostId::new("ghost")).await;
        assert!(matches!(outcome, DeleteOutcome::NotFound));

        client.set_authorized(false);
        let outcome = service.delete_post(&post.id).await;
        assert!(matches!(outcome, DeleteOutcome::Unauthorized));

        // Failed paths leave the cache untouched.
        assert!(!service.cache().is_stale(&QueryKey::PostsAll));
    }

    #[tokio::test]
    async fn unauthorized_create_is_reported() {
        let (client, service, _rx) = service();
        client.set_authorized(false);
        let outcome = service.create_post(draft("Hello World")).await;
        assert!(matches!(outcome, CreateOutcome::Unauthorized));
    }
}
