use crate::tree::{NodeId, NodeType, Tree};

/// Validates the structure of the subtree at `root`.
///
/// Asserts that:
/// - every child's parent is the node it was reached from
/// - the first child has no previous sibling and the last child no next one
/// - previous/next sibling links are mutual
/// - each child is allowed inside its parent
/// - the document is never a child
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(tree: &Tree, root: NodeId) {
    for id in tree.descendants(root) {
        let children: Vec<NodeId> = tree.children(id).collect();
        assert_eq!(
            tree.first_child(id),
            children.first().copied(),
            "first_child of {id:?} does not match its children"
        );
        assert_eq!(
            tree.last_child(id),
            children.last().copied(),
            "last_child of {id:?} does not match its children"
        );
        if let Some(first) = children.first() {
            assert_eq!(tree.previous_sibling(*first), None, "first child {first:?} has a previous sibling");
        }
        if let Some(last) = children.last() {
            assert_eq!(tree.next_sibling(*last), None, "last child {last:?} has a next sibling");
        }
        for pair in children.windows(2) {
            assert_eq!(tree.next_sibling(pair[0]), Some(pair[1]), "broken next link at {:?}", pair[0]);
            assert_eq!(tree.previous_sibling(pair[1]), Some(pair[0]), "broken previous link at {:?}", pair[1]);
        }
        let parent_type = tree.node_type(id);
        for &child in &children {
            assert_eq!(tree.parent(child), Some(id), "child {child:?} has the wrong parent");
            let child_type = tree.node_type(child);
            assert_ne!(child_type, NodeType::Document, "document nested under {id:?}");
            assert!(
                parent_type.can_contain(child_type),
                "{child_type} inside {parent_type}"
            );
        }
    }
}
