//! Presentation layer: askama view structs and render helpers.

pub mod views;
