//! Query cache for remote reads.
//!
//! The cache is an explicit table keyed by operation name + argument tuple
//! ([`QueryKey`]). Mutations never touch cached values in place: they call
//! [`QueryStore::invalidate`], which marks the entry stale and enqueues the
//! key on a refetch queue drained by [`RefetchWorker`]. Invalidation is
//! idempotent, and the single consumer serializes re-fetches per key.

mod keys;
mod refetch;
mod store;

pub use keys::QueryKey;
pub use refetch::RefetchWorker;
pub use store::{CachedQuery, QueryStore};
