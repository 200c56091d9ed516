//! Domain types
//!
//! Plain data shared by every layer:
//! - Pages, cursors and page requests
//! - Fetch and list errors
//! - The de-duplicating item collection
//! - Reading-club list items and filters

pub mod collections;
pub mod error;
pub mod page;
pub mod reading;
