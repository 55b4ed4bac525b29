//! Infrastructure: HTTP surface, telemetry, and low-level errors.

pub mod error;
pub mod http;
pub mod telemetry;
