//! Create-form state: field values plus field-level validation errors.

use crate::domain::posts::{Field, FieldError, PostDraft};

/// Transient state of the create form. Values survive a failed validation
/// pass so the user can correct them; a successful submission resets
/// everything to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatePostForm {
    pub draft: PostDraft,
    pub errors: Vec<FieldError>,
}

impl CreatePostForm {
    pub fn with_input(draft: PostDraft) -> Self {
        Self {
            draft,
            errors: Vec::new(),
        }
    }

    /// Validate the current values. Returns the draft to submit when every
    /// field passes; otherwise records field errors and blocks submission.
    pub fn submit(&mut self) -> Option<PostDraft> {
        match self.draft.validate() {
            Ok(()) => {
                self.errors.clear();
                Some(self.draft.clone())
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }

    /// Restore the defaults (empty fields, no errors).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn error_for(&self, field: Field) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(title: &str, content: &str, author_id: &str) -> CreatePostForm {
        CreatePostForm::with_input(PostDraft {
            title: title.to_string(),
            content: content.to_string(),
            author_id: author_id.to_string(),
        })
    }

    #[test]
    fn invalid_input_blocks_submission_and_keeps_values() {
        let mut form = filled("Hey", "This is my first post content.", "alice");
        assert!(form.submit().is_none());
        assert_eq!(
            form.error_for(Field::Title),
            Some("Title must be at least 5 characters long")
        );
        // Values are kept for correction.
        assert_eq!(form.draft.title, "Hey");
    }

    #[test]
    fn valid_input_submits_the_exact_payload() {
        let mut form = filled("Hello World", "This is my first post content.", "alice");
        let draft = form.submit().expect("valid form submits");
        assert_eq!(draft.title, "Hello World");
        assert_eq!(draft.content, "This is my first post content.");
        assert_eq!(draft.author_id, "alice");
        assert!(form.errors.is_empty());
    }

    #[test]
    fn errors_clear_once_input_becomes_valid() {
        let mut form = filled("Hey", "short", "");
        assert!(form.submit().is_none());
        assert_eq!(form.errors.len(), 3);

        form.draft.title = "Hello World".to_string();
        form.draft.content = "This is my first post content.".to_string();
        form.draft.author_id = "alice".to_string();
        assert!(form.submit().is_some());
        assert!(form.errors.is_empty());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut form = filled("Hello World", "This is my first post content.", "alice");
        form.submit().expect("valid form submits");
        form.reset();
        assert_eq!(form, CreatePostForm::default());
        assert!(form.draft.title.is_empty());
    }
}
