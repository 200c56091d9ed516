//! Presentation layer
//!
//! Stateless text rendering of list snapshots for the terminal.

pub mod console;

pub use crate::core::session::is_near_end;
pub use console::{ListRow, ListView};
