//! HTML DOM Query Library
//!
//! Parses HTML with `scraper` (html5ever) and mirrors the tree into an
//! index-based arena, then exposes CSS queries and jQuery-style node-set
//! traversal on top of it.
//!
//! ## Core Design
//!
//! ```text
//! HTML → scraper::Html → DomArena (pre-order) → Selection (Vec<NodeId>)
//!                              ↓
//!                       NodeId (u32) == document order
//! ```

pub mod arena;
pub mod document;
pub mod error;
pub mod selection;
pub mod types;
pub mod utils;

pub use arena::DomArena;
pub use document::{compile_selector, Document};
pub use error::{DomError, Result};
pub use selection::Selection;
pub use types::*;
