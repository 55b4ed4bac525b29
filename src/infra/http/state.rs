use std::sync::{Arc, Mutex};

use crate::application::posts::PostService;
use crate::ui::list::MemoizedCards;

#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    /// Keyed card projection shared by the list renderers; recomputed only
    /// when the fetched collection reference changes.
    pub cards: Arc<Mutex<MemoizedCards>>,
    pub board_name: String,
}

impl AppState {
    pub fn new(posts: Arc<PostService>, board_name: String) -> Self {
        Self {
            posts,
            cards: Arc::new(Mutex::new(MemoizedCards::new())),
            board_name,
        }
    }
}
