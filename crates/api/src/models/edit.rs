use super::node::Point;
use serde::{Deserialize, Serialize};

/// A raw text change reported by the host editor.
///
/// `range_offset`/`range_length` locate the replaced span in bytes of the text
/// as it was before this change; `range_start`/`range_end` are the same span as
/// row/column positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditEvent {
    pub range_start: Point,
    pub range_end: Point,
    pub range_offset: usize,
    pub range_length: usize,
    pub inserted_text: String,
}

impl EditEvent {
    pub fn new(
        range_start: Point,
        range_end: Point,
        range_offset: usize,
        range_length: usize,
        inserted_text: impl Into<String>,
    ) -> Self {
        Self {
            range_start,
            range_end,
            range_offset,
            range_length,
            inserted_text: inserted_text.into(),
        }
    }

    /// Byte offset just past the inserted text in the new text.
    pub fn new_end_offset(&self) -> usize {
        self.range_offset + self.inserted_text.len()
    }
}
