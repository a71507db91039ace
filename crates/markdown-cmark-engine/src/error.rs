use thiserror::Error;

use crate::tree::NodeType;

/// Failures reported by tree construction and mutation.
///
/// Every mutating operation validates its arguments first and leaves the
/// tree untouched when it returns one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("node handle does not refer to a live node of this tree")]
    StaleNode,

    #[error("node has no parent")]
    NotAttached,

    #[error("a {child} node cannot be a child of a {parent} node")]
    InvalidNesting { parent: NodeType, child: NodeType },

    #[error("a node cannot be attached to itself or below one of its descendants")]
    WouldCycle,

    #[error("the document node is the fixed root of its tree")]
    DocumentRoot,

    #[error("header level {0} is outside 1..=6")]
    InvalidHeaderLevel(u8),

    #[error("{value} is not a valid {kind} code")]
    InvalidEnumValue { kind: &'static str, value: i32 },

    #[error("{node_type} nodes have no {attribute}")]
    WrongNodeType {
        attribute: &'static str,
        node_type: NodeType,
    },
}

impl From<indextree::NodeError> for TreeError {
    fn from(err: indextree::NodeError) -> Self {
        match err {
            indextree::NodeError::Removed => TreeError::StaleNode,
            _ => TreeError::WouldCycle,
        }
    }
}

/// Misuse of a streaming [`Parser`](crate::parsing::Parser) session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("parser session is already finished")]
    Finished,
}

/// Failures while reading the XML rendering back into a tree.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("malformed XML: {0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("invalid escape sequence: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    #[error("unknown element <{0}>")]
    UnknownElement(String),

    #[error("invalid value {value:?} for attribute {name}")]
    InvalidAttribute { name: String, value: String },

    #[error("closing tag </{0}> does not match the open element")]
    UnbalancedTag(String),

    #[error("input does not start with a <document> element")]
    MissingDocument,

    #[error(transparent)]
    Tree(#[from] TreeError),
}
