//! The `Post` entity and the validation bounds enforced before submission.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

pub const TITLE_MIN_CHARS: usize = 5;
pub const TITLE_MAX_CHARS: usize = 100;
pub const CONTENT_MIN_CHARS: usize = 10;
pub const CONTENT_MAX_CHARS: usize = 1000;

/// Opaque post identifier minted by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Parse an identifier received from the outside (route segments).
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("post id must not be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub author_id: String,
}

/// Field values for a post that has not been created yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub author_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Content,
    AuthorId,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Content => "content",
            Field::AuthorId => "author_id",
        }
    }
}

/// A single validation failure, attached to the field it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: Field, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl PostDraft {
    /// Check every field against the bounds: title length ∈ [5,100] chars,
    /// content length ∈ [10,1000] chars, author id non-empty.
    ///
    /// All failures are collected so each field can carry its own message.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        let title_chars = self.title.chars().count();
        if title_chars < TITLE_MIN_CHARS {
            errors.push(FieldError::new(
                Field::Title,
                "Title must be at least 5 characters long",
            ));
        } else if title_chars > TITLE_MAX_CHARS {
            errors.push(FieldError::new(
                Field::Title,
                "Title cannot exceed 100 characters",
            ));
        }

        let content_chars = self.content.chars().count();
        if content_chars < CONTENT_MIN_CHARS {
            errors.push(FieldError::new(
                Field::Content,
                "Content must be at least 10 characters long",
            ));
        } else if content_chars > CONTENT_MAX_CHARS {
            errors.push(FieldError::new(
                Field::Content,
                "Content cannot exceed 1000 characters",
            ));
        }

        if self.author_id.trim().is_empty() {
            errors.push(FieldError::new(Field::AuthorId, "Author ID is required"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
