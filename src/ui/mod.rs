//! Pure view state machines, independent of any rendering backend.

pub mod card;
pub mod form;
pub mod list;
