//! # API Route Handlers
//!
//! The handlers are split by concern: the page and health check, question
//! generation, and artifact downloads.

pub mod download;
pub mod general;
pub mod generate;

pub use download::*;
pub use general::*;
pub use generate::*;

// Shared items used by multiple handler modules.
use super::{errors::AppError, state::AppState};
