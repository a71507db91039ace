//! # Inline Kinds
//!
//! Inline constructs that own their syntax.
//!
//! ## Types
//!
//! - **`CodeSpan`**: backtick runs and code span content normalization
//! - **`Autolink`**: `<scheme:...>` and `<user@host>` links
//! - **`HtmlTag`**: raw inline HTML (tags, comments, declarations, CDATA)
//! - **`Entity`**: entity and numeric character references, plus
//!   `unescape_string` for destinations and titles
//!
//! The parser calls into these; it never hardcodes their patterns.

pub mod autolink;
pub mod code_span;
pub mod entity;
mod entity_pairs;
pub mod html_tag;

pub use autolink::Autolink;
pub use code_span::{BacktickRuns, CodeSpan};
pub use entity::{Entity, unescape_string};
pub use html_tag::{HtmlScanner, HtmlTag};
