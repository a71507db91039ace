//! # markdown-cmark-engine
//!
//! A CommonMark parser with an arena-backed document tree and HTML, XML and
//! man page renderers.
//!
//! ```
//! use markdown_cmark_engine::markdown_to_html;
//!
//! assert_eq!(markdown_to_html("Boo\n==="), "<h1>Boo</h1>\n");
//! ```
//!
//! Documents can be parsed in one go with [`parse_document`] or streamed
//! through a [`Parser`] session, then inspected or edited through [`Tree`]
//! before rendering.

pub mod error;
pub mod options;
pub mod parsing;
pub mod render;
pub mod tree;

// Re-export key types for easier usage
pub use error::{SessionError, TreeError, XmlError};
pub use options::Options;
pub use parsing::{Parser, SessionState, parse_document};
pub use render::{parse_xml, render_html, render_man, render_xml};
pub use tree::{
    DelimType, ListType, Node, NodeCodeBlock, NodeEdge, NodeId, NodeLink, NodeList, NodeType,
    NodeValue, Sourcepos, Tree,
};

/// Parses `md` and renders it as HTML with default options.
pub fn markdown_to_html(md: &str) -> String {
    let tree = parse_document(md, Options::DEFAULT);
    render_html(&tree, tree.root(), Options::DEFAULT)
}

/// Parses `md` and renders it as CommonMark XML with default options.
pub fn markdown_to_xml(md: &str) -> String {
    let tree = parse_document(md, Options::DEFAULT);
    render_xml(&tree, tree.root(), Options::DEFAULT)
}

/// Parses `md` and renders it as a man page body with default options.
pub fn markdown_to_man(md: &str) -> String {
    let tree = parse_document(md, Options::DEFAULT);
    render_man(&tree, tree.root(), Options::DEFAULT)
}
