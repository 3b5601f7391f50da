//! Edit Command System
//!
//! Every change to the course outline is performed through a Command in this
//! module, which makes it undoable.

mod content;
mod executor;
mod lesson;
mod section;
mod theme;
mod traits;

pub use content::*;
pub use executor::*;
pub use lesson::*;
pub use section::*;
pub use theme::*;
pub use traits::*;
