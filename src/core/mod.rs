//! Core types shared by every layer of the citation pipeline.
//!
//! - [`CiteError`] - strongly-typed failures of parsing, reading and configuration
//! - [`ErrorContext`] - user-facing wrapper with suggestions and details
//! - [`user_friendly_error`] - turn any `anyhow::Error` into an [`ErrorContext`]
//!
//! Library code returns [`CiteError`]; the CLI layer works with `anyhow` and
//! converts at the very end so the user sees colored, actionable output.

pub mod error;

pub use error::{CiteError, ErrorContext, user_friendly_error};
