//! Bacheca: a small self-hosted post board.
//!
//! The crate is layered the usual way:
//!
//! - [`domain`] — the `Post` entity and its validation bounds.
//! - [`rpc`] — the typed client for the remote post service, treated as an
//!   opaque collaborator, plus an in-memory implementation.
//! - [`cache`] — an explicit query-cache table keyed by operation + argument
//!   tuple, with invalidation-driven refetch.
//! - [`application`] — orchestration over the client and the cache.
//! - [`ui`] — pure, testable view state machines (form, card, list).
//! - [`presentation`] — askama view structs and templates.
//! - [`infra`] — HTTP surface, telemetry, and infrastructure errors.
//! - [`config`] — layered settings (file → env → CLI).

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
pub mod rpc;
pub mod ui;
