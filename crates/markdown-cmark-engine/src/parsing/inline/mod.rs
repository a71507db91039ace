//! # Inline Parsing
//!
//! Turns the raw text of paragraphs and headers into inline nodes.
//!
//! ## Architecture
//!
//! Inline parsing runs once the block structure is complete, so every link
//! reference definition in the document is known. The parser walks the
//! content with a byte cursor and appends nodes to the block as it goes.
//! Emphasis and links need lookahead, so `*`/`_` runs and brackets are
//! first emitted as text and recorded on two stacks:
//!
//! - a closing `]` resolves the innermost bracket into a link or image,
//!   running emphasis resolution on the delimiters inside it;
//! - at the end of the block the remaining delimiters are resolved.
//!
//! ## Modules
//!
//! - **`cursor`**: `Cursor` for byte-wise scanning
//! - **`kinds`**: constructs that own their syntax (CodeSpan, Autolink, HtmlTag, Entity)
//! - **`links`**: label, destination and title scanners shared with reference definitions
//! - **`delimiters`**: delimiter and bracket stacks, emphasis resolution
//! - **`parser`**: `parse_inlines()` main entry point
//!
//! ## Raw Zones
//!
//! Code spans, autolinks and raw HTML suppress all other parsing inside them.

pub mod cursor;
pub mod delimiters;
pub mod kinds;
pub mod links;
pub mod parser;

pub use kinds::unescape_string;
pub use links::normalize_label;
pub use parser::parse_inlines;
