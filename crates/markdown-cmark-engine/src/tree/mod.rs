//! # Document Tree
//!
//! Arena-backed CommonMark node tree.
//!
//! ## Ownership
//!
//! A [`Tree`] owns an `indextree` arena and the single `Document` node at its
//! root. Nodes are addressed by [`NodeId`] handles. A node that is created
//! with [`Tree::new_node`] or removed with [`Tree::unlink`] is a standalone
//! subtree inside the same arena until it is attached again or released
//! with [`Tree::free`]. Handles to freed nodes are reported as stale by
//! every operation.
//!
//! ## Modules
//!
//! - **`node`**: `NodeValue` payloads, `NodeType` codes, list enums, `Sourcepos`
//! - **`accessors`**: typed getters and setters for node attributes
//! - **`consolidate`**: merging adjacent text runs

pub mod accessors;
pub mod consolidate;
pub mod node;

use indextree::Arena;
pub use indextree::{NodeEdge, NodeId};

pub use node::{
    DelimType, ListType, Node, NodeCodeBlock, NodeLink, NodeList, NodeType, NodeValue, Sourcepos,
};

use crate::error::TreeError;

pub struct Tree {
    arena: Arena<Node>,
    root: NodeId,
}

impl Tree {
    /// Creates a tree holding only its `Document` root.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(Node::new(NodeValue::Document));
        Tree { arena, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Creates a standalone node. A tree has exactly one document, so
    /// `NodeValue::Document` is rejected, as are header levels outside 1..=6.
    pub fn new_node(&mut self, value: NodeValue) -> Result<NodeId, TreeError> {
        match value {
            NodeValue::Document => return Err(TreeError::DocumentRoot),
            NodeValue::Header(level) if !(1..=6).contains(&level) => {
                return Err(TreeError::InvalidHeaderLevel(level));
            }
            _ => {}
        }
        Ok(self.arena.new_node(Node::new(value)))
    }

    /// Creates a standalone node with its default payload.
    pub fn new_node_of_type(&mut self, ty: NodeType) -> Result<NodeId, TreeError> {
        let value = NodeValue::default_for(ty).ok_or(TreeError::InvalidEnumValue {
            kind: "node type",
            value: ty as i32,
        })?;
        self.new_node(value)
    }

    pub(crate) fn alloc(&mut self, value: NodeValue, sourcepos: Option<Sourcepos>) -> NodeId {
        debug_assert!(!matches!(value, NodeValue::Header(level) if !(1..=6).contains(&level)));
        let mut node = Node::new(value);
        node.sourcepos = sourcepos;
        self.arena.new_node(node)
    }

    pub fn is_valid(&self, id: NodeId) -> bool {
        self.arena.get(id).is_some() && !id.is_removed(&self.arena)
    }

    pub(crate) fn live(&self, id: NodeId) -> Result<&Node, TreeError> {
        if !self.is_valid(id) {
            return Err(TreeError::StaleNode);
        }
        self.arena
            .get(id)
            .map(|n| n.get())
            .ok_or(TreeError::StaleNode)
    }

    pub(crate) fn live_mut(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        if !self.is_valid(id) {
            return Err(TreeError::StaleNode);
        }
        self.arena
            .get_mut(id)
            .map(|n| n.get_mut())
            .ok_or(TreeError::StaleNode)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.live(id).ok()
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.live_mut(id).ok()
    }

    /// Kind of the node, `NodeType::None` for a stale handle.
    pub fn node_type(&self, id: NodeId) -> NodeType {
        self.get(id).map_or(NodeType::None, Node::node_type)
    }

    pub fn type_string(&self, id: NodeId) -> &'static str {
        self.node_type(id).as_str()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.relation(id, |n| n.parent())
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.relation(id, |n| n.first_child())
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.relation(id, |n| n.last_child())
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.relation(id, |n| n.next_sibling())
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.relation(id, |n| n.previous_sibling())
    }

    fn relation(
        &self,
        id: NodeId,
        pick: impl Fn(&indextree::Node<Node>) -> Option<NodeId>,
    ) -> Option<NodeId> {
        if !self.is_valid(id) {
            return None;
        }
        self.arena.get(id).and_then(pick)
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.is_valid(id)
            .then(|| id.children(&self.arena))
            .into_iter()
            .flatten()
    }

    /// The node itself followed by all its descendants in document order.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.is_valid(id)
            .then(|| id.descendants(&self.arena))
            .into_iter()
            .flatten()
    }

    /// Enter/exit events for the subtree rooted at `id`. Leaves produce both.
    pub fn traverse(&self, id: NodeId) -> impl Iterator<Item = NodeEdge> + '_ {
        self.is_valid(id)
            .then(|| id.traverse(&self.arena))
            .into_iter()
            .flatten()
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.check_attach(parent, child)?;
        parent.checked_append(child, &mut self.arena)?;
        Ok(())
    }

    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.check_attach(parent, child)?;
        parent.checked_prepend(child, &mut self.arena)?;
        Ok(())
    }

    /// Places `sibling` immediately before `target` under `target`'s parent.
    pub fn insert_before(&mut self, target: NodeId, sibling: NodeId) -> Result<(), TreeError> {
        let parent = self.parent_for_insert(target, sibling)?;
        self.check_attach(parent, sibling)?;
        target.checked_insert_before(sibling, &mut self.arena)?;
        Ok(())
    }

    /// Places `sibling` immediately after `target` under `target`'s parent.
    pub fn insert_after(&mut self, target: NodeId, sibling: NodeId) -> Result<(), TreeError> {
        let parent = self.parent_for_insert(target, sibling)?;
        self.check_attach(parent, sibling)?;
        target.checked_insert_after(sibling, &mut self.arena)?;
        Ok(())
    }

    /// Detaches `id` from its parent and siblings. Its children stay with it.
    pub fn unlink(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.live(id)?;
        if id == self.root {
            return Err(TreeError::DocumentRoot);
        }
        id.detach(&mut self.arena);
        Ok(())
    }

    /// Detaches and releases `id` with its whole subtree; handles into it
    /// become stale.
    pub fn free(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.live(id)?;
        if id == self.root {
            return Err(TreeError::DocumentRoot);
        }
        id.remove_subtree(&mut self.arena);
        Ok(())
    }

    // Unchecked structural edits for the parsers, which only build nestings
    // the grammar allows. Failures are logged and leave the tree unchanged.

    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId) {
        if let Err(err) = parent.checked_append(child, &mut self.arena) {
            log::warn!("failed to attach node: {err}");
        }
    }

    pub(crate) fn attach_after(&mut self, target: NodeId, sibling: NodeId) {
        if let Err(err) = target.checked_insert_after(sibling, &mut self.arena) {
            log::warn!("failed to insert node: {err}");
        }
    }

    pub(crate) fn detach(&mut self, id: NodeId) {
        id.detach(&mut self.arena);
    }

    pub(crate) fn release(&mut self, id: NodeId) {
        if id != self.root {
            id.remove_subtree(&mut self.arena);
        }
    }

    fn parent_for_insert(&self, target: NodeId, sibling: NodeId) -> Result<NodeId, TreeError> {
        self.live(target)?;
        if target == sibling {
            return Err(TreeError::WouldCycle);
        }
        self.parent(target).ok_or(TreeError::NotAttached)
    }

    fn check_attach(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let parent_type = self.live(parent)?.node_type();
        let child_type = self.live(child)?.node_type();
        if child == self.root {
            return Err(TreeError::DocumentRoot);
        }
        if !parent_type.can_contain(child_type) {
            return Err(TreeError::InvalidNesting {
                parent: parent_type,
                child: child_type,
            });
        }
        if parent.ancestors(&self.arena).any(|a| a == child) {
            return Err(TreeError::WouldCycle);
        }
        Ok(())
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tree")
            .field("root", &self.root)
            .field("nodes", &self.descendants(self.root).count())
            .finish()
    }
}
