//! HTTP surface: one router serving the board page and its datastar
//! partial-update endpoints.

mod posts;
mod selectors;
mod shared;
mod state;

pub use state::AppState;

use axum::{
    Router,
    routing::{get, post},
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(posts::board_page))
        .route("/posts/panel", post(posts::posts_panel))
        .route("/posts/create", post(posts::post_create))
        .route("/posts/{id}/delete", post(posts::post_delete_request))
        .route("/posts/{id}/delete/cancel", post(posts::post_delete_cancel))
        .route(
            "/posts/{id}/delete/confirm",
            post(posts::post_delete_confirm),
        )
        .route("/posts/{id}/title/edit", post(posts::post_title_edit))
        .route("/posts/{id}/title/save", post(posts::post_title_save))
        .with_state(state)
}
