//! # Parsing
//!
//! Markdown text to [`Tree`](crate::tree::Tree).
//!
//! ## Modules
//!
//! - **`blocks`**: line-at-a-time block structure
//! - **`inline`**: inline content of paragraphs and headers
//! - **`session`**: the streaming `Parser` session and one-shot `parse_document`
//! - **`snapshot`**: structural snapshots and invariant checks for tests

pub mod blocks;
pub mod inline;
pub mod session;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use session::{Parser, SessionState, lines, parse_document};
