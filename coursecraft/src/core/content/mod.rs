//! Lesson Content Module
//!
//! Content item model, per-type default factories and save-time validation.

mod defaults;
mod models;
mod validation;

pub use defaults::*;
pub use models::*;
pub use validation::*;
