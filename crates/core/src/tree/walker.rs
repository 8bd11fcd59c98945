//! Iterative pre-order traversal.

use tree_sitter::Node;
use treescope_api::NodeId;

/// Structural context of a node as seen from the walk root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkContext {
    /// Number of edges between the walk root and this node.
    pub depth: usize,
    pub field_id: Option<u16>,
    pub field_name: Option<&'static str>,
    pub parent_id: Option<NodeId>,
    pub is_named: bool,
}

/// Visit `root` and every node below it exactly once, in document order.
///
/// Uses a tree cursor with an explicit parent stack instead of recursion, so
/// stack usage does not grow with tree depth. Siblings of `root` are never
/// visited.
pub fn walk<'tree, F>(root: Node<'tree>, mut visitor: F)
where
    F: FnMut(Node<'tree>, &WalkContext),
{
    let root_id = root.id();
    let mut cursor = root.walk();
    let mut parents: Vec<NodeId> = Vec::new();

    loop {
        let node = cursor.node();
        let context = WalkContext {
            depth: parents.len(),
            field_id: cursor.field_id().map(|id| id.get()),
            field_name: cursor.field_name(),
            parent_id: parents.last().copied(),
            is_named: node.is_named(),
        };
        visitor(node, &context);

        if cursor.goto_first_child() {
            parents.push(node.id());
            continue;
        }

        // Leaf: move to the next sibling, climbing until one exists.
        loop {
            if cursor.node().id() == root_id {
                return;
            }
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
            parents.pop();
        }
    }
}

/// Number of nodes `walk` visits below and including `root`.
pub fn count_nodes(root: Node<'_>) -> usize {
    let mut count = 0;
    walk(root, |_, _| count += 1);
    count
}
