//! # Block Parsing
//!
//! Line-at-a-time construction of the block structure.
//!
//! ## Parsing Phases
//!
//! 1. **Continuation** (`containers`): each open block, from the document
//!    down, either accepts the line (consuming its prefix such as `>` or the
//!    item indentation) or stops matching.
//!
//! 2. **Block starts** (`open`): the remainder of the line may open new
//!    containers and at most one leaf, closing unmatched blocks first.
//!
//! 3. **Content**: the rest of the line is appended to the open leaf, or
//!    continues a paragraph lazily, or starts a new paragraph.
//!
//! Blocks are finalized when they stop matching: paragraphs give up their
//! leading link reference definitions, code blocks split off their info
//! string, and lists decide whether they are tight.
//!
//! ## Modules
//!
//! - **`types`**: `Continuation`, `BlockStart` and the per-block `BlockScratch`
//! - **`kinds`**: block-specific marker scanners (BlockQuote, CodeFence, ListItem, ...)
//! - **`classify`**: `LineScanner` with offset, column and indentation of the current line
//! - **`containers`**: continuation rules
//! - **`open`**: block start dispatch in precedence order
//! - **`references`**: link reference definitions and the `RefMap`
//! - **`builder`**: the `BlockBuilder` state machine
//!
//! ## Key Invariants
//!
//! - Only the last child chain from the root is ever open.
//! - Nesting depth is unbounded (lists in blockquotes in lists, etc.)
//! - Code and HTML blocks are raw zones: their content is never inline parsed.

pub mod builder;
pub mod classify;
pub mod containers;
pub mod kinds;
pub mod open;
pub mod references;
pub mod types;

pub use builder::BlockBuilder;
pub use classify::LineScanner;
pub use references::{LinkRef, RefMap, parse_reference};
pub use types::{BlockStart, Continuation};
