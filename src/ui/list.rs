//! List view state and the memoized card projection.

use std::sync::Arc;

use crate::domain::posts::Post;

use super::card::CardState;

/// Number of skeleton placeholders shown while the collection fetch is in
/// flight, regardless of how many posts previously existed.
pub const LOADING_SKELETON_COUNT: usize = 3;

/// What the list renders, derived from the cached `post.all` entry.
#[derive(Debug, Clone)]
pub enum ListView {
    /// Fetch in flight: skeletons fully replace any prior content.
    Loading { skeletons: usize },
    Empty,
    /// One card per post, in server-returned order.
    Loaded(Arc<Vec<Post>>),
}

impl ListView {
    /// `None` means no fresh fetch result exists yet (pending or stale).
    pub fn from_fetch(posts: Option<Arc<Vec<Post>>>) -> Self {
        match posts {
            None => ListView::Loading {
                skeletons: LOADING_SKELETON_COUNT,
            },
            Some(posts) if posts.is_empty() => ListView::Empty,
            Some(posts) => ListView::Loaded(posts),
        }
    }
}

/// One rendered card: the post data plus its card-local state.
#[derive(Debug, Clone)]
pub struct Card {
    pub post: Post,
    pub state: CardState,
}

/// Keyed projection of the fetched collection into cards.
///
/// Recomputes only when the underlying collection reference changes; when it
/// does, card state is carried over by post identifier so an unrelated
/// refresh does not reset a card mid-interaction.
#[derive(Debug, Default)]
pub struct MemoizedCards {
    source: Option<Arc<Vec<Post>>>,
    cards: Vec<Card>,
    recomputes: usize,
}

impl MemoizedCards {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project(&mut self, posts: &Arc<Vec<Post>>) -> &[Card] {
        let unchanged = self
            .source
            .as_ref()
            .is_some_and(|source| Arc::ptr_eq(source, posts));
        if !unchanged {
            self.cards = posts
                .iter()
                .map(|post| {
                    let state = self
                        .cards
                        .iter()
                        .find(|card| card.post.id == post.id)
                        .map(|card| card.state.clone())
                        .unwrap_or_else(|| CardState::new(post.id.clone()));
                    Card {
                        post: post.clone(),
                        state,
                    }
                })
                .collect();
            self.source = Some(posts.clone());
            self.recomputes += 1;
        }
        &self.cards
    }

    pub fn recompute_count(&self) -> usize {
        self.recomputes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::posts::PostId;
    use crate::ui::card::DeletePhase;

    fn post(id: &str, title: &str) -> Post {
        Post {
            id: PostId::new(id),
            title: title.to_string(),
            content: "This is my first post content.".to_string(),
            author_id: "alice".to_string(),
        }
    }

    #[test]
    fn pending_fetch_renders_exactly_three_skeletons() {
        match ListView::from_fetch(None) {
            ListView::Loading { skeletons } => assert_eq!(skeletons, 3),
            other => panic!("expected loading state, got {other:?}"),
        }
    }

    #[test]
    fn empty_collection_renders_the_empty_state() {
        assert!(matches!(
            ListView::from_fetch(Some(Arc::new(Vec::new()))),
            ListView::Empty
        ));
    }

    #[test]
    fn loaded_collection_keeps_server_order() {
        let posts = Arc::new(vec![post("2", "Second"), post("1", "First")]);
        match ListView::from_fetch(Some(posts)) {
            ListView::Loaded(posts) => {
                assert_eq!(posts[0].id, PostId::new("2"));
                assert_eq!(posts[1].id, PostId::new("1"));
            }
            other => panic!("expected loaded state, got {other:?}"),
        }
    }

    #[test]
    fn projection_recomputes_only_on_reference_change() {
        let mut memo = MemoizedCards::new();
        let posts = Arc::new(vec![post("1", "Hello World")]);

        memo.project(&posts);
        memo.project(&posts);
        memo.project(&posts.clone());
        assert_eq!(memo.recompute_count(), 1);

        let refreshed = Arc::new(posts.as_ref().clone());
        memo.project(&refreshed);
        assert_eq!(memo.recompute_count(), 2);
    }

    #[test]
    fn card_state_survives_a_refresh_keyed_by_id() {
        let mut memo = MemoizedCards::new();
        let posts = Arc::new(vec![post("1", "Hello World")]);
        memo.project(&posts);

        // Simulate the card entering the confirming state, then a refresh
        // that adds a second post.
        let mut cards = memo.project(&posts).to_vec();
        cards[0].state.request_delete();
        memo.cards = cards;

        let refreshed = Arc::new(vec![post("1", "Hello World"), post("2", "Another one")]);
        let cards = memo.project(&refreshed);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].state.delete_phase, DeletePhase::Confirming);
        assert_eq!(cards[1].state.delete_phase, DeletePhase::Idle);
    }
}
