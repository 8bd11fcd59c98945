use serde::{Deserialize, Serialize};

/// Identifier of a node within one tree generation.
pub type NodeId = usize;

/// Sentinel `field_id` for nodes that do not fill a field of their parent.
pub const NO_FIELD: i32 = -1;

/// Zero-based row/column position. Columns are byte offsets within the row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Flattened, self-contained projection of a syntax tree node.
///
/// A `MiniNode` holds no references into the tree it came from: the parent is
/// recorded as a plain id so lists of nodes can be serialized, cached and
/// shipped to a view independently of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniNode {
    pub id: NodeId,
    pub type_id: u16,
    pub grammar_id: u16,
    #[serde(rename = "type")]
    pub kind: String,
    pub grammar_type: String,
    pub is_named: bool,
    pub is_missing: bool,
    pub is_extra: bool,
    pub has_changes: bool,
    pub has_error: bool,
    pub is_error: bool,
    pub text: String,
    pub start_position: Point,
    pub end_position: Point,
    pub start_index: usize,
    pub end_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    pub child_count: usize,
    pub named_child_count: usize,
    pub descendant_count: usize,
    /// Depth below the traversal root, counted on the unfiltered walk.
    pub level: usize,
    pub field_id: i32,
    pub field_name: String,
}

impl Default for MiniNode {
    fn default() -> Self {
        Self {
            id: 0,
            type_id: 0,
            grammar_id: 0,
            kind: String::new(),
            grammar_type: String::new(),
            is_named: false,
            is_missing: false,
            is_extra: false,
            has_changes: false,
            has_error: false,
            is_error: false,
            text: String::new(),
            start_position: Point::default(),
            end_position: Point::default(),
            start_index: 0,
            end_index: 0,
            parent_id: None,
            child_count: 0,
            named_child_count: 0,
            descendant_count: 0,
            level: 0,
            field_id: NO_FIELD,
            field_name: String::new(),
        }
    }
}

impl MiniNode {
    pub fn byte_range(&self) -> std::ops::Range<usize> {
        self.start_index..self.end_index
    }

    pub fn has_field(&self) -> bool {
        self.field_id != NO_FIELD
    }
}
