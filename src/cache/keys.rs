//! Cache key definitions.

use crate::domain::posts::PostId;
use crate::rpc::{OP_POST_ALL, OP_POST_BY_ID};

/// Identifies one cached query: the operation name plus its argument tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// `post.all` — the full, ordered post collection.
    PostsAll,
    /// `post.byId` — a single post looked up by identifier.
    PostById(PostId),
}

impl QueryKey {
    pub fn operation(&self) -> &'static str {
        match self {
            QueryKey::PostsAll => OP_POST_ALL,
            QueryKey::PostById(_) => OP_POST_BY_ID,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_with_equal_arguments_are_equal() {
        assert_eq!(
            QueryKey::PostById(PostId::new("1")),
            QueryKey::PostById(PostId::new("1"))
        );
        assert_ne!(
            QueryKey::PostById(PostId::new("1")),
            QueryKey::PostById(PostId::new("2"))
        );
        assert_ne!(QueryKey::PostsAll, QueryKey::PostById(PostId::new("1")));
    }

    #[test]
    fn keys_name_their_operation() {
        assert_eq!(QueryKey::PostsAll.operation(), "post.all");
        assert_eq!(
            QueryKey::PostById(PostId::new("1")).operation(),
            "post.byId"
        );
    }
}
