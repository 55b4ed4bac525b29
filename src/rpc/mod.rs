//! Typed client for the remote post service.
//!
//! The remote procedures are opaque collaborators: this module only defines
//! the contract (`PostClient`) and the error payload shape the UI consumes.
//! [`memory::MemoryPostClient`] is the shipped implementation used by the
//! standalone binary and the test suite.

pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::posts::{Post, PostDraft, PostId};

pub const OP_POST_ALL: &str = "post.all";
pub const OP_POST_BY_ID: &str = "post.byId";
pub const OP_POST_CREATE: &str = "post.create";
pub const OP_POST_DELETE: &str = "post.delete";

/// Machine-readable error code carried in the remote error payload as
/// `data.code`. Codes outside this set are treated as the generic fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RpcCode {
    #[serde(rename = "UNAUTHORIZED")]
    Unauthorized,
    #[serde(rename = "NOT_FOUND")]
    NotFound,
}

impl RpcCode {
    pub fn as_wire(self) -> &'static str {
        match self {
            RpcCode::Unauthorized => "UNAUTHORIZED",
            RpcCode::NotFound => "NOT_FOUND",
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("rpc call `{operation}` failed: {message}")]
pub struct RpcError {
    pub operation: &'static str,
    pub code: Option<RpcCode>,
    pub message: String,
}

impl RpcError {
    pub fn unauthorized(operation: &'static str) -> Self {
        Self {
            operation,
            code: Some(RpcCode::Unauthorized),
            message: "caller is not logged in".to_string(),
        }
    }

    pub fn not_found(operation: &'static str) -> Self {
        Self {
            operation,
            code: Some(RpcCode::NotFound),
            message: "post does not exist".to_string(),
        }
    }

    pub fn other(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            code: None,
            message: message.into(),
        }
    }

    pub fn code(&self) -> Option<RpcCode> {
        self.code
    }
}

/// Contract of the remote post service.
///
/// - `all` returns the full collection in server order.
/// - `by_id` returns a single post or a `NOT_FOUND` error.
/// - `create` returns the created post or an `UNAUTHORIZED` error.
/// - `delete` returns unit, or an `UNAUTHORIZED` / `NOT_FOUND` error.
#[async_trait]
pub trait PostClient: Send + Sync {
    async fn all(&self) -> Result<Vec<Post>, RpcError>;
    async fn by_id(&self, id: &PostId) -> Result<Post, RpcError>;
    async fn create(&self, draft: PostDraft) -> Result<Post, RpcError>;
    async fn delete(&self, id: &PostId) -> Result<(), RpcError>;
}
