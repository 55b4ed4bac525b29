//! CSS selectors targeted by datastar element patches.

pub(super) const TOAST_STACK: &str = "#toast-stack";
pub(super) const POSTS_PANEL: &str = "#posts-panel";
pub(super) const POST_FORM: &str = "#post-form";

pub(super) fn card_selector(id: &str) -> String {
    format!("#post-card-{id}")
}
