//! Lesson Theme System
//!
//! Bundled themes that seed a lesson with default content and drive the
//! preview layout.
//!
//! # Modules
//!
//! - `catalog`: The static theme list and lookups
//! - `applicator`: Template instantiation into a lesson

pub mod applicator;
pub mod catalog;

pub use applicator::{apply_theme, synthesize_items};
pub use catalog::{
    catalog, find_theme, find_theme_by_name, resolve_theme, ContentTemplate, Theme, ThemeLayout,
    ThemeSections, THEME_CATALOG,
};
