//! View structs for the post board page and its partials.

use askama::Template;

use crate::domain::posts::Field;
use crate::ui::card::{DeletePhase, TitleMode};
use crate::ui::form::CreatePostForm;
use crate::ui::list::{Card, ListView};

#[derive(Clone)]
pub struct PostCardView {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub confirming: bool,
    pub deleting: bool,
    pub editing: bool,
}

impl PostCardView {
    pub fn from_card(card: &Card) -> Self {
        Self {
            id: card.post.id.to_string(),
            title: card.post.title.clone(),
            content: card.post.content.clone(),
            author_id: card.post.author_id.clone(),
            confirming: card.state.delete_phase == DeletePhase::Confirming,
            deleting: card.state.delete_phase == DeletePhase::Deleting,
            editing: card.state.title_mode == TitleMode::Editing,
        }
    }
}

/// Placeholder mimicking a card's shape while the collection loads.
#[derive(Clone)]
pub struct SkeletonCardView {
    pub pulse: bool,
}

impl Default for SkeletonCardView {
    fn default() -> Self {
        Self { pulse: true }
    }
}

#[derive(Clone, Default)]
pub struct PostListView {
    pub loading: bool,
    pub skeletons: Vec<SkeletonCardView>,
    pub empty: bool,
    pub cards: Vec<PostCardView>,
}

impl PostListView {
    pub fn from_state(view: &ListView, cards: &[Card]) -> Self {
        match view {
            ListView::Loading { skeletons } => Self {
                loading: true,
                skeletons: vec![SkeletonCardView::default(); *skeletons],
                ..Self::default()
            },
            ListView::Empty => Self {
                empty: true,
                ..Self::default()
            },
            ListView::Loaded(_) => Self {
                cards: cards.iter().map(PostCardView::from_card).collect(),
                ..Self::default()
            },
        }
    }
}

#[derive(Clone, Default)]
pub struct PostFormView {
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub title_error: Option<String>,
    pub content_error: Option<String>,
    pub author_error: Option<String>,
}

impl PostFormView {
    pub fn from_form(form: &CreatePostForm) -> Self {
        Self {
            title: form.draft.title.clone(),
            content: form.draft.content.clone(),
            author_id: form.draft.author_id.clone(),
            title_error: form.error_for(Field::Title).map(str::to_string),
            content_error: form.error_for(Field::Content).map(str::to_string),
            author_error: form.error_for(Field::AuthorId).map(str::to_string),
        }
    }
}

#[derive(Template)]
#[template(path = "posts.html")]
pub struct PostsPageTemplate {
    pub board_name: String,
    pub form: PostFormView,
    pub list: PostListView,
}

#[derive(Template)]
#[template(path = "post_list.html")]
pub struct PostListTemplate {
    pub list: PostListView,
}

#[derive(Template)]
#[template(path = "post_form.html")]
pub struct PostFormTemplate {
    pub form: PostFormView,
}

#[derive(Template)]
#[template(path = "post_card.html")]
pub struct PostCardTemplate {
    pub card: PostCardView,
}
