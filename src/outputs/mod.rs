//! Output generation for search results.
//!
//! # Submodules
//!
//! - [`terminal`]: Renders the [`ViewState`](crate::models::ViewState) as plain text for stdout
//! - [`json`]: Writes the last successful result set to a JSON file

pub mod json;
pub mod terminal;
