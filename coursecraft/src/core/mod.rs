//! CourseCraft Core Engine
//!
//! Lesson content authoring engine.
//! Handles content items, course structure, themes, editing, reordering and
//! the live preview.

pub mod commands;
pub mod content;
pub mod course;
pub mod editor;
pub mod fs;
pub mod preview;
pub mod reorder;
pub mod settings;
pub mod store;
pub mod theme;

// Re-export common types
mod types;
pub use types::*;

mod error;
pub use error::*;

#[cfg(test)]
mod tests_scenarios;
