//! List engine
//!
//! This module contains the paginated list core:
//! - List state and its transition messages
//! - The observable snapshot store
//! - The pagination controller and its fetcher seam
//! - Presentation-facing sessions bound to a filter

pub mod controller;
pub mod fetcher;
pub mod session;
pub mod state;
pub mod store;
