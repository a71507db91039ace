use std::collections::BTreeMap;

use serde::Serialize;

use crate::tree::{NodeId, NodeValue, Tree};

/// Snapshot of a subtree for testing with `insta` and for structural
/// equality between trees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snap {
    /// Node type string (e.g. "paragraph", "emph").
    pub kind: String,
    /// Semantic attributes (level, list type, url, ...), sorted by name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub literal: Option<String>,
    /// `l:c-l:c`, only when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sourcepos: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Snap>,
}

/// Snapshots the subtree at `id`. Source positions are included only when
/// `with_sourcepos` is set.
pub fn normalize(tree: &Tree, id: NodeId, with_sourcepos: bool) -> Snap {
    let mut attrs = BTreeMap::new();
    let mut literal = None;
    if let Some(node) = tree.get(id) {
        match &node.value {
            NodeValue::List(list) => {
                attrs.insert("type".into(), format!("{:?}", list.list_type));
                attrs.insert("delim".into(), format!("{:?}", list.delimiter));
                attrs.insert("start".into(), list.start.to_string());
                attrs.insert("tight".into(), list.tight.to_string());
            }
            NodeValue::Header(level) => {
                attrs.insert("level".into(), level.to_string());
            }
            NodeValue::CodeBlock(cb) => {
                attrs.insert("info".into(), cb.info.clone());
                literal = Some(cb.literal.clone());
            }
            NodeValue::Link(link) | NodeValue::Image(link) => {
                attrs.insert("url".into(), link.url.clone());
                attrs.insert("title".into(), link.title.clone());
            }
            value => literal = value.literal().map(str::to_string),
        }
    }
    Snap {
        kind: tree.type_string(id).to_string(),
        attrs,
        literal,
        sourcepos: with_sourcepos
            .then(|| tree.sourcepos(id).map(|p| p.to_string()))
            .flatten(),
        children: tree
            .children(id)
            .map(|c| normalize(tree, c, with_sourcepos))
            .collect(),
    }
}
