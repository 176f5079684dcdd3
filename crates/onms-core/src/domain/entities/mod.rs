//! Domain entities.

mod event;
mod search_property;

pub use event::*;
pub use search_property::*;
