//! In-memory implementation of the post service.
//!
//! Backs the standalone binary and the test suite. Insertion order is
//! preserved so `all` returns posts in creation order, and the server-side
//! validation mirrors the client-side bounds the way the real service would.

use std::sync::{
    RwLock,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::posts::{Post, PostDraft, PostId};

use super::{OP_POST_ALL, OP_POST_BY_ID, OP_POST_CREATE, OP_POST_DELETE, PostClient, RpcError};

pub struct MemoryPostClient {
    posts: RwLock<Vec<Post>>,
    authorized: AtomicBool,
}

impl MemoryPostClient {
    pub fn new() -> Self {
        Self::with_posts(Vec::new())
    }

    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: RwLock::new(posts),
            authorized: AtomicBool::new(true),
        }
    }

    /// Simulate a logged-out session: mutations fail with `UNAUTHORIZED`.
    pub fn set_authorized(&self, authorized: bool) {
        self.authorized.store(authorized, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.posts.read().map(|posts| posts.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_authorized(&self) -> bool {
        self.authorized.load(Ordering::SeqCst)
    }
}

impl Default for MemoryPostClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostClient for MemoryPostClient {
    async fn all(&self) -> Result<Vec<Post>, RpcError> {
        let posts = self
            .posts
            .read()
            .map_err(|_| RpcError::other(OP_POST_ALL, "post store poisoned"))?;
        Ok(posts.clone())
    }

    async fn by_id(&self, id: &PostId) -> Result<Post, RpcError> {
        let posts = self
            .posts
            .read()
            .map_err(|_| RpcError::other(OP_POST_BY_ID, "post store poisoned"))?;
        posts
            .iter()
            .find(|post| &post.id == id)
            .cloned()
            .ok_or_else(|| RpcError::not_found(OP_POST_BY_ID))
    }

    async fn create(&self, draft: PostDraft) -> Result<Post, RpcError> {
        if !self.is_authorized() {
            return Err(RpcError::unauthorized(OP_POST_CREATE));
        }

        // The service re-checks the same bounds the form enforces.
        if let Err(errors) = draft.validate() {
            let summary = errors
                .iter()
                .map(|error| error.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(RpcError::other(OP_POST_CREATE, summary));
        }

        let post = Post {
            id: PostId::new(Uuid::new_v4().to_string()),
            title: draft.title,
            content: draft.content,
            author_id: draft.author_id,
        };

        let mut posts = self
            .posts
            .write()
            .map_err(|_| RpcError::other(OP_POST_CREATE, "post store poisoned"))?;
        posts.push(post.clone());
        Ok(post)
    }

    async fn delete(&self, id: &PostId) -> Result<(), RpcError> {
        if !self.is_authorized() {
            return Err(RpcError::unauthorized(OP_POST_DELETE));
        }

        let mut posts = self
            .posts
            .write()
            .map_err(|_| RpcError::other(OP_POST_DELETE, "post store poisoned"))?;
        let before = posts.len();
        posts.retain(|post| &post.id != id);
        if posts.len() == before {
            return Err(RpcError::not_found(OP_POST_DELETE));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::RpcCode;

    fn draft(title: &str) -> PostDraft {
        PostDraft {
            title: title.to_string(),
            content: "Long enough content body.".to_string(),
            author_id: "alice".to_string(),
        }
    }

    #[tokio::test]
    async fn create_then_all_preserves_insertion_order() {
        let client = MemoryPostClient::new();
        client.create(draft("First post")).await.unwrap();
        client.create(draft("Second post")).await.unwrap();

        let posts = client.all().await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "First post");
        assert_eq!(posts[1].title, "Second post");
    }

    #[tokio::test]
    async fn delete_of_missing_post_is_not_found() {
        let client = MemoryPostClient::new();
        let err = client.delete(&PostId::new("ghost")).await.unwrap_err();
        assert_eq!(err.code(), Some(RpcCode::NotFound));
    }

    #[tokio::test]
    async fn logged_out_mutations_are_unauthorized() {
        let client = MemoryPostClient::new();
        client.set_authorized(false);

        let err = client.create(draft("Hello World")).await.unwrap_err();
        assert_eq!(err.code(), Some(RpcCode::Unauthorized));

        let err = client.delete(&PostId::new("any")).await.unwrap_err();
        assert_eq!(err.code(), Some(RpcCode::Unauthorized));
    }

    #[tokio::test]
    async fn server_side_validation_rejects_bad_drafts() {
        let client = MemoryPostClient::new();
        let err = client.create(draft("Hey")).await.unwrap_err();
        assert!(err.code().is_none());
        assert!(err.message.contains("at least 5 characters"));
    }
}
