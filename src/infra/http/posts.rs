//! Handlers for the board page and its datastar interactions.

use askama::Template;
use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use datastar::prelude::ElementPatchMode;
use serde::Deserialize;

use crate::{
    application::{
        error::HttpError,
        posts::{CreateOutcome, DeleteOutcome},
        stream::StreamBuilder,
    },
    domain::posts::{PostDraft, PostId},
    presentation::views::{posts as post_views, render_template_response},
    ui::{
        card::CardState,
        form::CreatePostForm,
        list::{Card, ListView},
    },
};

use super::{
    AppState,
    selectors::{POST_FORM, POSTS_PANEL, card_selector},
    shared::{Toast, datastar_replace, push_toasts, template_render_http_error},
};

const CREATE_SUCCESS: &str = "Post created successfully!";
const CREATE_UNAUTHORIZED: &str = "You must be logged in to create a post";
const CREATE_FAILED: &str = "Failed to create post";
const DELETE_UNAUTHORIZED: &str = "You must be logged in to delete a post";
const DELETE_NOT_FOUND: &str = "Post not found or already deleted";
const DELETE_FAILED: &str = "An unexpected error occurred. Please try again.";
const LIST_FAILED: &str = "Failed to load posts";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct PostFormPayload {
    title: String,
    content: String,
    author_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct TitleSavePayload {
    title: String,
}

/// Full page render. When no fresh collection exists the list region renders
/// skeletons and asks the client to load the panel, so the fetch stays
/// non-blocking.
pub(super) async fn board_page(State(state): State<AppState>) -> Response {
    let view = ListView::from_fetch(state.posts.cached_posts());
    let list = project_list(&state, &view);

    let template = post_views::PostsPageTemplate {
        board_name: state.board_name.clone(),
        form: post_views::PostFormView::default(),
        list,
    };
    render_template_response(template, StatusCode::OK)
}

/// Fetch the collection (through the cache) and patch the list panel.
pub(super) async fn posts_panel(State(state): State<AppState>) -> Response {
    match render_panel_html(&state, "infra::http::posts_panel").await {
        Ok(html) => datastar_replace(POSTS_PANEL, html).into_response(),
        Err(PanelError::Fetch) => toast_only(Toast::error(LIST_FAILED)),
        Err(PanelError::Render(err)) => err.into_response(),
    }
}

pub(super) async fn post_create(
    State(state): State<AppState>,
    Form(payload): Form<PostFormPayload>,
) -> Response {
    let mut form = CreatePostForm::with_input(PostDraft {
        title: payload.title,
        content: payload.content,
        author_id: payload.author_id,
    });

    let draft = match form.submit() {
        Some(draft) => draft,
        // Validation failed: re-render the form with inline messages and
        // never touch the remote service.
        None => return patch_form(&form, "infra::http::post_create"),
    };

    match state.posts.create_post(draft).await {
        CreateOutcome::Created(_) => {
            form.reset();

            let form_html = match render_form_html(&form, "infra::http::post_create") {
                Ok(html) => html,
                Err(err) => return err.into_response(),
            };

            let mut stream = StreamBuilder::new();
            stream.push_patch(
                form_html,
                POST_FORM,
                ElementPatchMode::Replace,
            );

            match render_panel_html(&state, "infra::http::post_create").await {
                Ok(panel_html) => {
                    stream.push_patch(
                        panel_html,
                        POSTS_PANEL,
                        ElementPatchMode::Replace,
                    );
                }
                Err(PanelError::Fetch) => {
                    // The create went through; the list will catch up on the
                    // next panel load.
                }
                Err(PanelError::Render(err)) => return err.into_response(),
            }

            if let Err(err) = push_toasts(&mut stream, &[Toast::success(CREATE_SUCCESS)]) {
                return err.into_response();
            }
            stream.into_response()
        }
        CreateOutcome::Rejected(errors) => {
            form.errors = errors;
            patch_form(&form, "infra::http::post_create")
        }
        CreateOutcome::Unauthorized => toast_only(Toast::error(CREATE_UNAUTHORIZED)),
        CreateOutcome::Failed(_) => toast_only(Toast::error(CREATE_FAILED)),
    }
}

/// Step one of the delete machine: ask for confirmation.
pub(super) async fn post_delete_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id, "infra::http::post_delete_request") {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };

    match state.posts.post_by_id(&id).await {
        Ok(post) => {
            let mut card_state = CardState::new(id.clone());
            card_state.request_delete();
            patch_card(&post, &card_state, "infra::http::post_delete_request")
        }
        // The post vanished under the card: surface it and refresh the list.
        Err(_) => stale_card_response(&state, DELETE_NOT_FOUND).await,
    }
}

/// The user declined: back to idle, no request was issued.
pub(super) async fn post_delete_cancel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id, "infra::http::post_delete_cancel") {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };

    match state.posts.post_by_id(&id).await {
        Ok(post) => {
            let card_state = CardState::new(id.clone());
            patch_card(&post, &card_state, "infra::http::post_delete_cancel")
        }
        Err(_) => stale_card_response(&state, DELETE_NOT_FOUND).await,
    }
}

/// Step two: the user confirmed, issue the delete.
pub(super) async fn post_delete_confirm(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id, "infra::http::post_delete_confirm") {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };

    // The confirming step lives in the rendered card; reconstitute it here
    // and walk the machine to its pending state.
    let mut card_state = CardState::new(id.clone());
    card_state.request_delete();
    if !card_state.begin_delete() {
        return HttpError::new(
            "infra::http::post_delete_confirm",
            StatusCode::CONFLICT,
            "Delete already in progress",
            format!("card `{id}` refused to enter the deleting state"),
        )
        .into_response();
    }

    let outcome = state.posts.delete_post(&id).await;
    // Pending clears regardless of outcome.
    card_state.settle_delete();

    match outcome {
        // Success is a silent re-render of the list.
        DeleteOutcome::Deleted => match render_panel_html(&state, "infra::http::post_delete_confirm").await {
            Ok(html) => datastar_replace(POSTS_PANEL, html).into_response(),
            Err(PanelError::Fetch) => toast_only(Toast::error(LIST_FAILED)),
            Err(PanelError::Render(err)) => err.into_response(),
        },
        DeleteOutcome::Unauthorized => {
            failed_delete_response(&state, &id, &card_state, DELETE_UNAUTHORIZED).await
        }
        DeleteOutcome::NotFound => stale_card_response(&state, DELETE_NOT_FOUND).await,
        DeleteOutcome::Failed(_) => {
            failed_delete_response(&state, &id, &card_state, DELETE_FAILED).await
        }
    }
}

/// Clicking the title enters the editing-enabled state.
pub(super) async fn post_title_edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id, "infra::http::post_title_edit") {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };

    match state.posts.post_by_id(&id).await {
        Ok(post) => {
            let mut card_state = CardState::new(id.clone());
            card_state.edit_title();
            patch_card(&post, &card_state, "infra::http::post_title_edit")
        }
        Err(_) => stale_card_response(&state, DELETE_NOT_FOUND).await,
    }
}

/// Saving only exits editing mode; there is no update procedure to call.
pub(super) async fn post_title_save(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(payload): Form<TitleSavePayload>,
) -> Response {
    let id = match parse_id(&id, "infra::http::post_title_save") {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };

    match state.posts.post_by_id(&id).await {
        Ok(post) => {
            let mut card_state = CardState::new(id.clone());
            card_state.edit_title();
            card_state.save_title(&payload.title);
            // The card re-renders with the stored title, not the edited one.
            patch_card(&post, &card_state, "infra::http::post_title_save")
        }
        Err(_) => stale_card_response(&state, DELETE_NOT_FOUND).await,
    }
}

// ---------------------------------------------------------------------------
// Render helpers
// ---------------------------------------------------------------------------

enum PanelError {
    /// The remote fetch failed; the caller decides how loud to be.
    Fetch,
    Render(HttpError),
}

fn parse_id(raw: &str, source: &'static str) -> Result<PostId, HttpError> {
    PostId::parse(raw)
        .map_err(|err| HttpError::bad_request(source, "Invalid post id", &err))
}

fn project_list(state: &AppState, view: &ListView) -> post_views::PostListView {
    if let ListView::Loaded(posts) = view {
        if let Ok(mut memo) = state.cards.lock() {
            return post_views::PostListView::from_state(view, memo.project(posts));
        }
        // Poisoned memo lock: fall back to an unmemoized projection.
        let cards = posts
            .iter()
            .map(|post| Card {
                post: post.clone(),
                state: CardState::new(post.id.clone()),
            })
            .collect::<Vec<_>>();
        return post_views::PostListView::from_state(view, &cards);
    }
    post_views::PostListView::from_state(view, &[])
}

async fn render_panel_html(state: &AppState, source: &'static str) -> Result<String, PanelError> {
    let posts = state.posts.list_posts().await.map_err(|_| PanelError::Fetch)?;
    let view = ListView::from_fetch(Some(posts));
    let list = project_list(state, &view);
    post_views::PostListTemplate { list }
        .render()
        .map_err(|err| {
            PanelError::Render(template_render_http_error(
                source,
                "Template rendering failed",
                err,
            ))
        })
}

fn render_form_html(form: &CreatePostForm, source: &'static str) -> Result<String, HttpError> {
    post_views::PostFormTemplate {
        form: post_views::PostFormView::from_form(form),
    }
    .render()
    .map_err(|err| template_render_http_error(source, "Template rendering failed", err))
}

fn patch_form(form: &CreatePostForm, source: &'static str) -> Response {
    match render_form_html(form, source) {
        Ok(html) => datastar_replace(POST_FORM, html).into_response(),
        Err(err) => err.into_response(),
    }
}

fn patch_card(
    post: &crate::domain::posts::Post,
    card_state: &CardState,
    source: &'static str,
) -> Response {
    let card = Card {
        post: post.clone(),
        state: card_state.clone(),
    };
    let template = post_views::PostCardTemplate {
        card: post_views::PostCardView::from_card(&card),
    };
    match template.render() {
        Ok(html) => datastar_replace(&card_selector(&post.id.to_string()), html).into_response(),
        Err(err) => {
            template_render_http_error(source, "Template rendering failed", err).into_response()
        }
    }
}

fn toast_only(toast: Toast) -> Response {
    let mut stream = StreamBuilder::new();
    if let Err(err) = push_toasts(&mut stream, &[toast]) {
        return err.into_response();
    }
    stream.into_response()
}

/// A delete failed but the post still exists: restore the card and explain.
async fn failed_delete_response(
    state: &AppState,
    id: &PostId,
    card_state: &CardState,
    message: &str,
) -> Response {
    match state.posts.post_by_id(id).await {
        Ok(post) => {
            let card = Card {
                post: (*post).clone(),
                state: card_state.clone(),
            };
            let template = post_views::PostCardTemplate {
                card: post_views::PostCardView::from_card(&card),
            };
            let html = match template.render() {
                Ok(html) => html,
                Err(err) => {
                    return template_render_http_error(
                        "infra::http::failed_delete_response",
                        "Template rendering failed",
                        err,
                    )
                    .into_response();
                }
            };

            let mut stream = datastar_replace(&card_selector(&post.id.to_string()), html);
            if let Err(err) = push_toasts(&mut stream, &[Toast::error(message)]) {
                return err.into_response();
            }
            stream.into_response()
        }
        Err(_) => toast_only(Toast::error(message)),
    }
}

/// The card's post no longer exists: toast it and refresh the whole panel.
async fn stale_card_response(state: &AppState, message: &str) -> Response {
    let mut stream = StreamBuilder::new();
    if let Ok(html) = render_panel_html(state, "infra::http::stale_card_response").await {
        stream.push_patch(
            html,
            POSTS_PANEL,
            ElementPatchMode::Replace,
        );
    }
    if let Err(err) = push_toasts(&mut stream, &[Toast::error(message)]) {
        return err.into_response();
    }
    stream.into_response()
}
