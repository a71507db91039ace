//! # Rendering
//!
//! Tree walkers that turn a [`Tree`](crate::tree::Tree) into text. Each
//! renderer takes the node to start from and an [`Options`] set, and never
//! fails: attributes a node kind does not carry are simply not written.
//!
//! ## Modules
//!
//! - **`html`**: HTML as the reference CommonMark renderer writes it
//! - **`xml`**: CommonMark XML, plus `parse_xml` to read it back
//! - **`man`**: groff man page body
//! - **`escape`**: HTML escaping and link destination encoding
//!
//! [`Options`]: crate::options::Options

pub mod escape;
pub mod html;
pub mod man;
pub mod xml;

pub use html::render_html;
pub use man::render_man;
pub use xml::{parse_xml, render_xml};
