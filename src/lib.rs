//! # Readroom - paginated lists for a reading-club client
//!
//! The engine behind the notification, room and group lists: fetch pages
//! from a cursor-based API, merge them into one growing list, and publish
//! consistent snapshots to whatever renders them.
//!
//! ## Architecture Overview
//!
//! The list engine follows the Elm architecture:
//!
//! - **Model** ([`core::state::ListState`]): immutable list snapshot
//! - **Message** ([`core::state::Message`]): what happened to a fetch
//! - **Update** ([`core::state::ListState::update`]): the only transition function
//! - **Store** ([`core::store::ListStore`]): holds the current snapshot and notifies observers
//! - **Controller** ([`core::controller::PaginationController`]): runs fetches and sends messages
//!
//! ## Example Usage
//!
//! ```rust
//! use readroom::{
//!     core::state::{ListState, LoadKind, Message},
//!     domain::page::{Cursor, Page},
//!     test_helpers::TestItem,
//! };
//!
//! let mut state = ListState::new();
//! state.update(Message::Started(LoadKind::Refresh));
//! state.update(Message::PageArrived {
//!     kind: LoadKind::Refresh,
//!     page: Page::new(vec![TestItem::new("a")], Some(Cursor::from("c1")), false),
//! });
//!
//! assert_eq!(state.len(), 1);
//! assert!(state.has_more());
//! ```
//!
//! ## Modules
//!
//! - [`domain`] - Pages, cursors, errors and list items
//! - [`core`] - List state, store, controller and sessions
//! - [`infrastructure`] - Configuration, CLI, fixtures and device identity
//! - [`presentation`] - Text rendering of list snapshots
//! - [`utils`] - Logging, panic handling and paths

#![allow(dead_code)]

pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
// Scripted fetchers and sample items for tests and benches
#[doc(hidden)]
pub mod test_helpers;
pub mod utils;

use color_eyre::eyre;

// Re-exports for convenience
pub use crate::core::{
    controller::PaginationController,
    fetcher::PageFetcher,
    session::{FilteredList, PaginatedList},
    state::{ListState, LoadKind, Message},
    store::{ListStore, Subscription},
};
pub use domain::{
    collections::{Identified, KeyedList},
    error::{FetchError, ListError},
    page::{Cursor, Page, PageRequest, PageSize},
};

/// Result type used throughout the binary and setup code
pub type Result<T> = eyre::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
