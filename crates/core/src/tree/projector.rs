use super::walker::WalkContext;
use crate::parser::edit::from_ts_point;
use tree_sitter::Node;
use treescope_api::{MiniNode, NO_FIELD};

/// Project `node` using the context supplied by the walker.
pub fn project(node: Node<'_>, context: &WalkContext, source: &str) -> MiniNode {
    let mut mini = base(node, source);
    mini.parent_id = context.parent_id;
    mini.level = context.depth;
    mini.field_id = context.field_id.map(i32::from).unwrap_or(NO_FIELD);
    mini.field_name = context.field_name.unwrap_or_default().to_string();
    mini
}

/// Project a node reached outside of a walk (e.g. a query capture).
///
/// Without a walk there is no depth or field role, so `level` is 0 and the
/// field is unset; the parent id is looked up on the tree.
pub fn project_detached(node: Node<'_>, source: &str) -> MiniNode {
    let mut mini = base(node, source);
    mini.parent_id = node.parent().map(|parent| parent.id());
    mini
}

fn base(node: Node<'_>, source: &str) -> MiniNode {
    MiniNode {
        id: node.id(),
        type_id: node.kind_id(),
        grammar_id: node.grammar_id(),
        kind: node.kind().to_string(),
        grammar_type: node.grammar_name().to_string(),
        is_named: node.is_named(),
        is_missing: node.is_missing(),
        is_extra: node.is_extra(),
        has_changes: node.has_changes(),
        has_error: node.has_error(),
        is_error: node.is_error(),
        text: source
            .get(node.start_byte()..node.end_byte())
            .unwrap_or_default()
            .to_string(),
        start_position: from_ts_point(node.start_position()),
        end_position: from_ts_point(node.end_position()),
        start_index: node.start_byte(),
        end_index: node.end_byte(),
        parent_id: None,
        child_count: node.child_count(),
        named_child_count: node.named_child_count(),
        descendant_count: node.descendant_count(),
        level: 0,
        field_id: NO_FIELD,
        field_name: String::new(),
    }
}
