//! Application layer: orchestration over the RPC client and the query cache.

pub mod error;
pub mod posts;
pub mod stream;
