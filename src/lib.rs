//! Table render boxes with fixed-point geometry and transactional pagination.
//!
//! The heavy lifting lives in the workspace crates:
//!
//! - [`types`]: micro-unit geometry and ids,
//! - [`style`]: border and table style snapshots,
//! - [`layout`]: the box tree, structure validation and pagination.
//!
//! This crate adds a JSON table document format and a plain-text writer.

pub mod document;
pub mod error;
pub mod text_output;

pub use document::{LoadedTable, TableDocument};
pub use error::TabulaError;
pub use text_output::write_pages;

pub use tabula_layout as layout;
pub use tabula_style as style;
pub use tabula_types as types;
