use super::node::MiniNode;
use serde::{Deserialize, Serialize};

/// One query capture, with the display color assigned to its capture name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    pub pattern: usize,
    pub name: String,
    pub node: MiniNode,
    pub color: String,
}

/// A query failure located in the query text.
///
/// `index` and `length` are byte offsets into the query source, suitable for
/// an inline diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryErrorInfo {
    pub message: String,
    pub index: usize,
    pub length: usize,
}

impl QueryErrorInfo {
    pub fn new(message: impl Into<String>, index: usize, length: usize) -> Self {
        Self {
            message: message.into(),
            index,
            length,
        }
    }
}
