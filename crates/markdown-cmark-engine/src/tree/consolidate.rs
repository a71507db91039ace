use super::{NodeId, NodeValue, Tree};
use crate::error::TreeError;

impl Tree {
    /// Merges every run of adjacent `Text` siblings below `root` into the
    /// first node of the run. Idempotent.
    pub fn consolidate_text_nodes(&mut self, root: NodeId) -> Result<(), TreeError> {
        self.live(root)?;
        let ids: Vec<NodeId> = self.descendants(root).collect();
        for id in ids {
            if !self.is_valid(id) || !matches!(self.arena[id].get().value, NodeValue::Text(_)) {
                continue;
            }
            while let Some(next) = self.arena[id].next_sibling() {
                let merged = match &mut self.arena[next].get_mut().value {
                    NodeValue::Text(s) => std::mem::take(s),
                    _ => break,
                };
                let next_pos = self.arena[next].get().sourcepos;
                let node = self.arena[id].get_mut();
                if let NodeValue::Text(s) = &mut node.value {
                    s.push_str(&merged);
                }
                if let (Some(pos), Some(next_pos)) = (node.sourcepos.as_mut(), next_pos) {
                    pos.end_line = next_pos.end_line;
                    pos.end_column = next_pos.end_column;
                }
                next.remove_subtree(&mut self.arena);
            }
        }
        Ok(())
    }

    /// Releases `Text` nodes with an empty literal below `root`.
    pub(crate) fn drop_empty_text(&mut self, root: NodeId) {
        let empty: Vec<NodeId> = self
            .descendants(root)
            .filter(|&id| matches!(self.get(id).map(|n| &n.value), Some(NodeValue::Text(s)) if s.is_empty()))
            .collect();
        for id in empty {
            id.remove_subtree(&mut self.arena);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn para_with(tree: &mut Tree, parts: &[NodeValue]) -> NodeId {
        let para = tree.new_node(NodeValue::Paragraph).unwrap();
        tree.append_child(tree.root(), para).unwrap();
        for part in parts {
            let id = tree.new_node(part.clone()).unwrap();
            tree.append_child(para, id).unwrap();
        }
        para
    }

    fn literals(tree: &Tree, id: NodeId) -> Vec<String> {
        tree.children(id)
            .map(|c| format!("{}:{}", tree.type_string(c), tree.literal(c)))
            .collect()
    }

    #[test]
    fn merges_adjacent_runs_only() {
        let mut tree = Tree::new();
        let para = para_with(
            &mut tree,
            &[
                NodeValue::Text("a".into()),
                NodeValue::Text("b".into()),
                NodeValue::SoftBreak,
                NodeValue::Text("c".into()),
                NodeValue::Text("d".into()),
                NodeValue::Text("e".into()),
            ],
        );
        tree.consolidate_text_nodes(tree.root()).unwrap();
        assert_eq!(
            literals(&tree, para),
            vec!["text:ab", "softbreak:", "text:cde"]
        );
    }

    #[test]
    fn merges_inside_nested_inlines() {
        let mut tree = Tree::new();
        let para = para_with(&mut tree, &[NodeValue::Emphasis]);
        let emph = tree.first_child(para).unwrap();
        for s in ["x", "y"] {
            let t = tree.new_node(NodeValue::Text(s.into())).unwrap();
            tree.append_child(emph, t).unwrap();
        }
        tree.consolidate_text_nodes(para).unwrap();
        assert_eq!(literals(&tree, emph), vec!["text:xy"]);
    }

    #[test]
    fn consolidation_is_idempotent() {
        let mut tree = Tree::new();
        let para = para_with(
            &mut tree,
            &[
                NodeValue::Text("a".into()),
                NodeValue::Text("b".into()),
                NodeValue::Code("c".into()),
            ],
        );
        tree.consolidate_text_nodes(tree.root()).unwrap();
        let once = literals(&tree, para);
        tree.consolidate_text_nodes(tree.root()).unwrap();
        assert_eq!(literals(&tree, para), once);
    }

    #[test]
    fn stale_root_is_reported() {
        let mut tree = Tree::new();
        let para = para_with(&mut tree, &[]);
        tree.free(para).unwrap();
        assert_eq!(
            tree.consolidate_text_nodes(para),
            Err(TreeError::StaleNode)
        );
    }
}
