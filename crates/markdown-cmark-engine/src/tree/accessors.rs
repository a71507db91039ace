//! Typed attribute access.
//!
//! Getters return `None` (or an empty string for literals) when the node does
//! not carry the attribute. Setters validate the node kind and the value and
//! leave the node unchanged on failure.

use std::any::Any;

use super::{DelimType, ListType, NodeId, NodeList, NodeLink, NodeValue, Sourcepos, Tree};
use crate::error::TreeError;

impl Tree {
    pub fn literal(&self, id: NodeId) -> &str {
        self.get(id)
            .and_then(|n| n.value.literal())
            .unwrap_or_default()
    }

    pub fn set_literal(&mut self, id: NodeId, literal: &str) -> Result<(), TreeError> {
        let node = self.live_mut(id)?;
        let node_type = node.node_type();
        let slot = node.value.literal_mut().ok_or(TreeError::WrongNodeType {
            attribute: "literal",
            node_type,
        })?;
        literal.clone_into(slot);
        Ok(())
    }

    pub fn header_level(&self, id: NodeId) -> Option<u8> {
        match self.get(id)?.value {
            NodeValue::Header(level) => Some(level),
            _ => None,
        }
    }

    pub fn set_header_level(&mut self, id: NodeId, level: u8) -> Result<(), TreeError> {
        let node = self.live_mut(id)?;
        let node_type = node.node_type();
        let NodeValue::Header(current) = &mut node.value else {
            return Err(TreeError::WrongNodeType {
                attribute: "header level",
                node_type,
            });
        };
        if !(1..=6).contains(&level) {
            return Err(TreeError::InvalidHeaderLevel(level));
        }
        *current = level;
        Ok(())
    }

    fn list(&self, id: NodeId) -> Option<&NodeList> {
        match &self.get(id)?.value {
            NodeValue::List(list) => Some(list),
            _ => None,
        }
    }

    fn list_mut(&mut self, id: NodeId, attribute: &'static str) -> Result<&mut NodeList, TreeError> {
        let node = self.live_mut(id)?;
        let node_type = node.node_type();
        match &mut node.value {
            NodeValue::List(list) => Ok(list),
            _ => Err(TreeError::WrongNodeType {
                attribute,
                node_type,
            }),
        }
    }

    pub fn list_type(&self, id: NodeId) -> Option<ListType> {
        self.list(id).map(|l| l.list_type)
    }

    pub fn set_list_type(&mut self, id: NodeId, list_type: ListType) -> Result<(), TreeError> {
        self.list_mut(id, "list type")?.list_type = list_type;
        Ok(())
    }

    pub fn list_delim(&self, id: NodeId) -> Option<DelimType> {
        self.list(id).map(|l| l.delimiter)
    }

    pub fn set_list_delim(&mut self, id: NodeId, delimiter: DelimType) -> Result<(), TreeError> {
        self.list_mut(id, "list delimiter")?.delimiter = delimiter;
        Ok(())
    }

    pub fn list_start(&self, id: NodeId) -> Option<usize> {
        self.list(id).map(|l| l.start)
    }

    pub fn set_list_start(&mut self, id: NodeId, start: usize) -> Result<(), TreeError> {
        self.list_mut(id, "list start")?.start = start;
        Ok(())
    }

    pub fn list_tight(&self, id: NodeId) -> Option<bool> {
        self.list(id).map(|l| l.tight)
    }

    pub fn set_list_tight(&mut self, id: NodeId, tight: bool) -> Result<(), TreeError> {
        self.list_mut(id, "list tightness")?.tight = tight;
        Ok(())
    }

    pub fn fence_info(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.value {
            NodeValue::CodeBlock(cb) => Some(&cb.info),
            _ => None,
        }
    }

    pub fn set_fence_info(&mut self, id: NodeId, info: &str) -> Result<(), TreeError> {
        let node = self.live_mut(id)?;
        let node_type = node.node_type();
        match &mut node.value {
            NodeValue::CodeBlock(cb) => {
                info.clone_into(&mut cb.info);
                Ok(())
            }
            _ => Err(TreeError::WrongNodeType {
                attribute: "fence info",
                node_type,
            }),
        }
    }

    fn link(&self, id: NodeId) -> Option<&NodeLink> {
        match &self.get(id)?.value {
            NodeValue::Link(link) | NodeValue::Image(link) => Some(link),
            _ => None,
        }
    }

    fn link_mut(&mut self, id: NodeId, attribute: &'static str) -> Result<&mut NodeLink, TreeError> {
        let node = self.live_mut(id)?;
        let node_type = node.node_type();
        match &mut node.value {
            NodeValue::Link(link) | NodeValue::Image(link) => Ok(link),
            _ => Err(TreeError::WrongNodeType {
                attribute,
                node_type,
            }),
        }
    }

    pub fn url(&self, id: NodeId) -> Option<&str> {
        self.link(id).map(|l| l.url.as_str())
    }

    pub fn set_url(&mut self, id: NodeId, url: &str) -> Result<(), TreeError> {
        url.clone_into(&mut self.link_mut(id, "url")?.url);
        Ok(())
    }

    pub fn title(&self, id: NodeId) -> Option<&str> {
        self.link(id).map(|l| l.title.as_str())
    }

    pub fn set_title(&mut self, id: NodeId, title: &str) -> Result<(), TreeError> {
        title.clone_into(&mut self.link_mut(id, "title")?.title);
        Ok(())
    }

    pub fn sourcepos(&self, id: NodeId) -> Option<Sourcepos> {
        self.get(id)?.sourcepos
    }

    pub fn set_sourcepos(&mut self, id: NodeId, pos: Option<Sourcepos>) -> Result<(), TreeError> {
        self.live_mut(id)?.sourcepos = pos;
        Ok(())
    }

    pub fn start_line(&self, id: NodeId) -> Option<usize> {
        self.sourcepos(id).map(|p| p.start_line)
    }

    pub fn start_column(&self, id: NodeId) -> Option<usize> {
        self.sourcepos(id).map(|p| p.start_column)
    }

    pub fn end_line(&self, id: NodeId) -> Option<usize> {
        self.sourcepos(id).map(|p| p.end_line)
    }

    pub fn end_column(&self, id: NodeId) -> Option<usize> {
        self.sourcepos(id).map(|p| p.end_column)
    }

    /// Attaches a caller-owned payload, replacing any previous one.
    pub fn set_user_data<T: Any + Send + Sync>(
        &mut self,
        id: NodeId,
        data: T,
    ) -> Result<(), TreeError> {
        self.live_mut(id)?.user_data = Some(Box::new(data));
        Ok(())
    }

    /// Borrows the payload if one is set and it has type `T`.
    pub fn user_data<T: Any + Send + Sync>(&self, id: NodeId) -> Option<&T> {
        self.get(id)?.user_data.as_ref()?.downcast_ref::<T>()
    }

    /// Removes and returns the payload if it has type `T`; a payload of
    /// another type is left in place.
    pub fn take_user_data<T: Any + Send + Sync>(&mut self, id: NodeId) -> Option<T> {
        let node = self.get_mut(id)?;
        if !node.user_data.as_ref()?.is::<T>() {
            return None;
        }
        let data = node.user_data.take()?;
        data.downcast::<T>().ok().map(|b| *b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeType;
    use pretty_assertions::assert_eq;

    #[test]
    fn literal_is_empty_where_not_applicable() {
        let mut tree = Tree::new();
        let para = tree.new_node(NodeValue::Paragraph).unwrap();
        assert_eq!(tree.literal(para), "");
        assert_eq!(
            tree.set_literal(para, "x"),
            Err(TreeError::WrongNodeType {
                attribute: "literal",
                node_type: NodeType::Paragraph
            })
        );
    }

    #[test]
    fn literal_round_trips_on_code_block() {
        let mut tree = Tree::new();
        let cb = tree.new_node_of_type(NodeType::CodeBlock).unwrap();
        tree.set_literal(cb, "fn main() {}\n").unwrap();
        tree.set_fence_info(cb, "rust").unwrap();
        assert_eq!(tree.literal(cb), "fn main() {}\n");
        assert_eq!(tree.fence_info(cb), Some("rust"));
    }

    #[test]
    fn header_level_is_validated() {
        let mut tree = Tree::new();
        let h = tree.new_node(NodeValue::Header(2)).unwrap();
        assert_eq!(tree.header_level(h), Some(2));
        assert_eq!(
            tree.set_header_level(h, 7),
            Err(TreeError::InvalidHeaderLevel(7))
        );
        assert_eq!(
            tree.set_header_level(h, 0),
            Err(TreeError::InvalidHeaderLevel(0))
        );
        assert_eq!(tree.header_level(h), Some(2));
        tree.set_header_level(h, 6).unwrap();
        assert_eq!(tree.header_level(h), Some(6));

        let para = tree.new_node(NodeValue::Paragraph).unwrap();
        assert_eq!(tree.header_level(para), None);
        assert!(tree.set_header_level(para, 1).is_err());
    }

    #[test]
    fn list_attributes() {
        let mut tree = Tree::new();
        let list = tree.new_node_of_type(NodeType::List).unwrap();
        assert_eq!(tree.list_tight(list), Some(true));
        assert_eq!(tree.list_start(list), Some(1));

        tree.set_list_type(list, ListType::Ordered).unwrap();
        tree.set_list_delim(list, DelimType::try_from(2).unwrap()).unwrap();
        tree.set_list_start(list, 7).unwrap();
        tree.set_list_tight(list, false).unwrap();
        assert_eq!(tree.list_type(list), Some(ListType::Ordered));
        assert_eq!(tree.list_delim(list), Some(DelimType::Paren));
        assert_eq!(tree.list_start(list), Some(7));
        assert_eq!(tree.list_tight(list), Some(false));

        let item = tree.new_node(NodeValue::Item).unwrap();
        assert_eq!(tree.list_type(item), None);
        assert!(tree.set_list_tight(item, true).is_err());
    }

    #[test]
    fn link_and_image_share_url_and_title() {
        let mut tree = Tree::new();
        for ty in [NodeType::Link, NodeType::Image] {
            let node = tree.new_node_of_type(ty).unwrap();
            tree.set_url(node, "http://x.com").unwrap();
            tree.set_title(node, "t").unwrap();
            assert_eq!(tree.url(node), Some("http://x.com"));
            assert_eq!(tree.title(node), Some("t"));
        }
        let text = tree.new_node(NodeValue::Text("x".into())).unwrap();
        assert_eq!(tree.url(text), None);
        assert!(tree.set_title(text, "t").is_err());
    }

    #[test]
    fn sourcepos_getters() {
        let mut tree = Tree::new();
        let para = tree.new_node(NodeValue::Paragraph).unwrap();
        assert_eq!(tree.start_line(para), None);
        tree.set_sourcepos(
            para,
            Some(Sourcepos {
                start_line: 2,
                start_column: 1,
                end_line: 3,
                end_column: 9,
            }),
        )
        .unwrap();
        assert_eq!(tree.start_line(para), Some(2));
        assert_eq!(tree.start_column(para), Some(1));
        assert_eq!(tree.end_line(para), Some(3));
        assert_eq!(tree.end_column(para), Some(9));
    }

    #[test]
    fn user_data_is_typed() {
        #[derive(Debug, PartialEq)]
        struct Tag(u32);

        let mut tree = Tree::new();
        let root = tree.root();
        assert_eq!(tree.user_data::<Tag>(root), None);
        tree.set_user_data(root, Tag(7)).unwrap();
        assert_eq!(tree.user_data::<Tag>(root), Some(&Tag(7)));
        assert_eq!(tree.user_data::<String>(root), None);
        assert_eq!(tree.take_user_data::<String>(root), None);
        assert_eq!(tree.take_user_data::<Tag>(root), Some(Tag(7)));
        assert_eq!(tree.user_data::<Tag>(root), None);
    }
}
