//! # Block Kinds
//!
//! Block-specific types that own their syntax markers. The block starts in
//! `open` and the continuation rules in `containers` call into these; they
//! never hardcode a marker themselves.
//!
//! Each scanner takes the line remainder starting at the first non-space
//! character.

pub mod atx_heading;
pub mod block_quote;
pub mod code_fence;
pub mod html_block;
pub mod indented_code;
pub mod list_item;
pub mod paragraph;
pub mod setext_heading;
pub mod thematic_break;

pub use atx_heading::AtxHeading;
pub use block_quote::BlockQuote;
pub use code_fence::CodeFence;
pub use html_block::HtmlBlock;
pub use indented_code::IndentedCode;
pub use list_item::{ListItem, ListMarker};
pub use paragraph::Paragraph;
pub use setext_heading::SetextHeading;
pub use thematic_break::ThematicBreak;
