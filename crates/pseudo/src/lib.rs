//! Pseudo-class selectors over CSS, and a table scraper built on them
//!
//! Selectors mix plain CSS with jQuery-style pseudo calls:
//!
//! ```text
//! "#s-date table:first tbody tr"   rows of the first table
//! "td:eq(1)"                       second cell of a row
//! ".title:closest(section) p"      paragraphs of the enclosing section
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! selector → split_segments → [Css | Pseudo] → resolve (context threaded) → Selection
//!                                                   ↓
//!                              extract: rows → fields per row → Vec<Record>
//! ```
//!
//! Known limitation: pseudo arguments cannot contain whitespace, so
//! `:closest(#main section)` is a syntax error.

pub mod args;
pub mod error;
pub mod extract;
pub mod registry;
pub mod resolve;
pub mod segment;

pub use args::{coerce_arg, parse_args, PseudoArg};
pub use error::{PseudoError, Result, SyntaxError, SyntaxErrorKind};
pub use extract::{extract, extract_document, ExtractConfig, Record};
pub use registry::{PseudoFn, PseudoRegistry, PSEUDOS};
pub use resolve::{resolve, Context, Query};
pub use segment::{split_segments, PseudoCall, Segment};

pub use dom::{Document, NodeId, Selection};
