//! Per-card UI state.
//!
//! Delete goes through an explicit two-step machine instead of a blocking
//! confirmation dialog:
//!
//! ```text
//! Idle -> Confirming -> Deleting -> Idle
//!            |  cancel
//!            v
//!          Idle
//! ```
//!
//! Title editing is a local toggle; saving exits the editor without any
//! remote persistence (there is no update procedure yet).

use tracing::debug;

use crate::domain::posts::PostId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletePhase {
    #[default]
    Idle,
    Confirming,
    Deleting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleMode {
    #[default]
    Viewing,
    Editing,
}

/// State owned by one rendered card. Never shared across cards, never
/// persisted; it lives exactly as long as the card does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardState {
    pub id: PostId,
    pub delete_phase: DeletePhase,
    pub title_mode: TitleMode,
}

impl CardState {
    pub fn new(id: PostId) -> Self {
        Self {
            id,
            delete_phase: DeletePhase::default(),
            title_mode: TitleMode::default(),
        }
    }

    /// Delete was requested; ask for confirmation. Only meaningful from
    /// `Idle` — repeated clicks while confirming or deleting are ignored.
    pub fn request_delete(&mut self) {
        if self.delete_phase == DeletePhase::Idle {
            self.delete_phase = DeletePhase::Confirming;
        }
    }

    /// The user declined; nothing was and nothing will be issued.
    pub fn cancel_delete(&mut self) {
        if self.delete_phase == DeletePhase::Confirming {
            self.delete_phase = DeletePhase::Idle;
        }
    }

    /// The user confirmed. Returns `true` when the delete request should
    /// actually be issued (exactly once per confirmation).
    pub fn begin_delete(&mut self) -> bool {
        if self.delete_phase == DeletePhase::Confirming {
            self.delete_phase = DeletePhase::Deleting;
            true
        } else {
            false
        }
    }

    /// The delete call finished, successfully or not.
    pub fn settle_delete(&mut self) {
        if self.delete_phase == DeletePhase::Deleting {
            self.delete_phase = DeletePhase::Idle;
        }
    }

    pub fn is_deleting(&self) -> bool {
        self.delete_phase == DeletePhase::Deleting
    }

    /// Clicking the title enables editing mode.
    pub fn edit_title(&mut self) {
        self.title_mode = TitleMode::Editing;
    }

    /// Exit editing mode. The new title is logged but not persisted; the
    /// remote service has no update procedure yet.
    pub fn save_title(&mut self, new_title: &str) {
        debug!(id = %self.id, %new_title, "title edit saved locally only");
        self.title_mode = TitleMode::Viewing;
    }
}
