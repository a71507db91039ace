use std::any::Any;
use std::fmt;

use serde::Serialize;

use crate::error::TreeError;

/// Node kinds with their stable integer codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(i32)]
pub enum NodeType {
    None = 0,
    Document = 1,
    BlockQuote = 2,
    List = 3,
    Item = 4,
    CodeBlock = 5,
    HtmlBlock = 6,
    Paragraph = 7,
    Header = 8,
    ThematicBreak = 9,
    Text = 10,
    SoftBreak = 11,
    LineBreak = 12,
    Code = 13,
    InlineHtml = 14,
    Emphasis = 15,
    Strong = 16,
    Link = 17,
    Image = 18,
}

impl NodeType {
    const ALL: [NodeType; 19] = [
        NodeType::None,
        NodeType::Document,
        NodeType::BlockQuote,
        NodeType::List,
        NodeType::Item,
        NodeType::CodeBlock,
        NodeType::HtmlBlock,
        NodeType::Paragraph,
        NodeType::Header,
        NodeType::ThematicBreak,
        NodeType::Text,
        NodeType::SoftBreak,
        NodeType::LineBreak,
        NodeType::Code,
        NodeType::InlineHtml,
        NodeType::Emphasis,
        NodeType::Strong,
        NodeType::Link,
        NodeType::Image,
    ];

    /// Name used for this kind in the XML rendering.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::None => "none",
            NodeType::Document => "document",
            NodeType::BlockQuote => "block_quote",
            NodeType::List => "list",
            NodeType::Item => "item",
            NodeType::CodeBlock => "code_block",
            NodeType::HtmlBlock => "html",
            NodeType::Paragraph => "paragraph",
            NodeType::Header => "header",
            NodeType::ThematicBreak => "hrule",
            NodeType::Text => "text",
            NodeType::SoftBreak => "softbreak",
            NodeType::LineBreak => "linebreak",
            NodeType::Code => "code",
            NodeType::InlineHtml => "inline_html",
            NodeType::Emphasis => "emph",
            NodeType::Strong => "strong",
            NodeType::Link => "link",
            NodeType::Image => "image",
        }
    }

    /// Inverse of [`NodeType::as_str`]; `"none"` is not accepted.
    pub fn from_type_str(name: &str) -> Option<NodeType> {
        Self::ALL
            .into_iter()
            .skip(1)
            .find(|ty| ty.as_str() == name)
    }

    pub fn is_block(self) -> bool {
        (NodeType::Document as i32..=NodeType::ThematicBreak as i32).contains(&(self as i32))
    }

    pub fn is_inline(self) -> bool {
        (NodeType::Text as i32..=NodeType::Image as i32).contains(&(self as i32))
    }

    /// Whether a node of this kind may directly hold a `child` node.
    pub fn can_contain(self, child: NodeType) -> bool {
        match self {
            NodeType::Document | NodeType::BlockQuote | NodeType::Item => {
                child.is_block() && !matches!(child, NodeType::Document | NodeType::Item)
            }
            NodeType::List => child == NodeType::Item,
            NodeType::Paragraph
            | NodeType::Header
            | NodeType::Emphasis
            | NodeType::Strong
            | NodeType::Link
            | NodeType::Image => child.is_inline(),
            _ => false,
        }
    }
}

impl TryFrom<i32> for NodeType {
    type Error = TreeError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
            .ok_or(TreeError::InvalidEnumValue {
                kind: "node type",
                value,
            })
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[repr(i32)]
pub enum ListType {
    #[default]
    Bullet = 1,
    Ordered = 2,
}

impl TryFrom<i32> for ListType {
    type Error = TreeError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ListType::Bullet),
            2 => Ok(ListType::Ordered),
            _ => Err(TreeError::InvalidEnumValue {
                kind: "list type",
                value,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[repr(i32)]
pub enum DelimType {
    #[default]
    None = 0,
    Period = 1,
    Paren = 2,
}

impl TryFrom<i32> for DelimType {
    type Error = TreeError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DelimType::None),
            1 => Ok(DelimType::Period),
            2 => Ok(DelimType::Paren),
            _ => Err(TreeError::InvalidEnumValue {
                kind: "list delimiter",
                value,
            }),
        }
    }
}

/// Attributes of a `List` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeList {
    pub list_type: ListType,
    pub delimiter: DelimType,
    pub start: usize,
    pub tight: bool,
}

impl Default for NodeList {
    /// A bullet list starting at 1 that renders tight until proven loose.
    fn default() -> Self {
        NodeList {
            list_type: ListType::Bullet,
            delimiter: DelimType::None,
            start: 1,
            tight: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeCodeBlock {
    /// Info string of a fenced block, already unescaped. Empty for indented code.
    pub info: String,
    pub literal: String,
}

/// Destination and title of a link or image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeLink {
    pub url: String,
    pub title: String,
}

/// Payload of a node: the variant carries exactly the attributes its kind has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NodeValue {
    Document,
    BlockQuote,
    List(NodeList),
    Item,
    CodeBlock(NodeCodeBlock),
    HtmlBlock(String),
    Paragraph,
    Header(u8),
    ThematicBreak,
    Text(String),
    SoftBreak,
    LineBreak,
    Code(String),
    InlineHtml(String),
    Emphasis,
    Strong,
    Link(NodeLink),
    Image(NodeLink),
}

impl NodeValue {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeValue::Document => NodeType::Document,
            NodeValue::BlockQuote => NodeType::BlockQuote,
            NodeValue::List(_) => NodeType::List,
            NodeValue::Item => NodeType::Item,
            NodeValue::CodeBlock(_) => NodeType::CodeBlock,
            NodeValue::HtmlBlock(_) => NodeType::HtmlBlock,
            NodeValue::Paragraph => NodeType::Paragraph,
            NodeValue::Header(_) => NodeType::Header,
            NodeValue::ThematicBreak => NodeType::ThematicBreak,
            NodeValue::Text(_) => NodeType::Text,
            NodeValue::SoftBreak => NodeType::SoftBreak,
            NodeValue::LineBreak => NodeType::LineBreak,
            NodeValue::Code(_) => NodeType::Code,
            NodeValue::InlineHtml(_) => NodeType::InlineHtml,
            NodeValue::Emphasis => NodeType::Emphasis,
            NodeValue::Strong => NodeType::Strong,
            NodeValue::Link(_) => NodeType::Link,
            NodeValue::Image(_) => NodeType::Image,
        }
    }

    /// Default payload for a node kind, or `None` for `NodeType::None`.
    pub fn default_for(ty: NodeType) -> Option<NodeValue> {
        let value = match ty {
            NodeType::None => return None,
            NodeType::Document => NodeValue::Document,
            NodeType::BlockQuote => NodeValue::BlockQuote,
            NodeType::List => NodeValue::List(NodeList::default()),
            NodeType::Item => NodeValue::Item,
            NodeType::CodeBlock => NodeValue::CodeBlock(NodeCodeBlock::default()),
            NodeType::HtmlBlock => NodeValue::HtmlBlock(String::new()),
            NodeType::Paragraph => NodeValue::Paragraph,
            NodeType::Header => NodeValue::Header(1),
            NodeType::ThematicBreak => NodeValue::ThematicBreak,
            NodeType::Text => NodeValue::Text(String::new()),
            NodeType::SoftBreak => NodeValue::SoftBreak,
            NodeType::LineBreak => NodeValue::LineBreak,
            NodeType::Code => NodeValue::Code(String::new()),
            NodeType::InlineHtml => NodeValue::InlineHtml(String::new()),
            NodeType::Emphasis => NodeValue::Emphasis,
            NodeType::Strong => NodeValue::Strong,
            NodeType::Link => NodeValue::Link(NodeLink::default()),
            NodeType::Image => NodeValue::Image(NodeLink::default()),
        };
        Some(value)
    }

    /// The literal text of Text, Code, InlineHtml, CodeBlock and HtmlBlock nodes.
    pub fn literal(&self) -> Option<&str> {
        match self {
            NodeValue::Text(s)
            | NodeValue::Code(s)
            | NodeValue::InlineHtml(s)
            | NodeValue::HtmlBlock(s) => Some(s),
            NodeValue::CodeBlock(cb) => Some(&cb.literal),
            _ => None,
        }
    }

    pub(crate) fn literal_mut(&mut self) -> Option<&mut String> {
        match self {
            NodeValue::Text(s)
            | NodeValue::Code(s)
            | NodeValue::InlineHtml(s)
            | NodeValue::HtmlBlock(s) => Some(s),
            NodeValue::CodeBlock(cb) => Some(&mut cb.literal),
            _ => None,
        }
    }
}

/// 1-based source span of a block; columns count bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Sourcepos {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl fmt::Display for Sourcepos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start_line, self.start_column, self.end_line, self.end_column
        )
    }
}

/// A node stored in the tree arena.
pub struct Node {
    pub(crate) value: NodeValue,
    pub sourcepos: Option<Sourcepos>,
    pub(crate) user_data: Option<Box<dyn Any + Send + Sync>>,
}

impl Node {
    pub fn new(value: NodeValue) -> Self {
        Node {
            value,
            sourcepos: None,
            user_data: None,
        }
    }

    /// The payload. Changes go through the checked setters on [`Tree`].
    ///
    /// [`Tree`]: super::Tree
    pub fn value(&self) -> &NodeValue {
        &self.value
    }

    pub fn node_type(&self) -> NodeType {
        self.value.node_type()
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("value", &self.value)
            .field("sourcepos", &self.sourcepos)
            .field("user_data", &self.user_data.is_some())
            .finish()
    }
}
