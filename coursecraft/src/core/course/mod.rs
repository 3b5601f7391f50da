//! Course Structure Module
//!
//! Sections, lessons, the outline aggregate that owns them and the mutable
//! course state commands operate on.

mod models;
mod outline;
mod state;

pub use models::*;
pub use outline::*;
pub use state::*;
