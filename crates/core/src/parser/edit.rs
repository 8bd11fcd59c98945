//! Translation of host text changes into incremental-parse edits.

use crate::error::{Result, TreescopeError};
use treescope_api::{EditEvent, Point};

/// Line start table for byte offset ↔ row/column conversion.
///
/// Columns are byte offsets within the line, which is what the parser expects.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self {
            line_starts,
            len: text.len(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Position of `offset`, clamped to the end of the text.
    pub fn position_at(&self, offset: usize) -> Point {
        let offset = offset.min(self.len);
        let row = match self.line_starts.binary_search(&offset) {
            Ok(row) => row,
            Err(next) => next - 1,
        };
        Point::new(row, offset - self.line_starts[row])
    }

    /// Byte offset of the end of `row`, before its line break.
    pub fn line_end(&self, row: usize) -> Option<usize> {
        self.line_starts.get(row)?;
        Some(self.line_starts.get(row + 1).map_or(self.len, |next| next - 1))
    }

    /// Byte offset of `point`, or `None` when the row is past the last line.
    /// A column past the end of its line is clamped to that line.
    pub fn offset_at(&self, point: Point) -> Option<usize> {
        let start = *self.line_starts.get(point.row)?;
        let end = self.line_end(point.row)?;
        Some(start.saturating_add(point.column).min(end))
    }
}

/// Edit in the shape the incremental parser consumes.
///
/// `old_end_index - start_index` is the length of the replaced span and
/// `new_end_index - start_index` the length of the inserted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditDescriptor {
    pub start_index: usize,
    pub old_end_index: usize,
    pub new_end_index: usize,
    pub start_position: Point,
    pub old_end_position: Point,
    pub new_end_position: Point,
}

impl EditDescriptor {
    /// Check the descriptor is internally consistent.
    pub fn validate(&self) -> Result<()> {
        if self.old_end_index < self.start_index || self.new_end_index < self.start_index {
            return Err(TreescopeError::EditApplication(format!(
                "edit ends before it starts: start={} old_end={} new_end={}",
                self.start_index, self.old_end_index, self.new_end_index
            )));
        }
        if self.old_end_position < self.start_position
            || self.new_end_position < self.start_position
        {
            return Err(TreescopeError::EditApplication(format!(
                "edit positions out of order: start={:?} old_end={:?} new_end={:?}",
                self.start_position, self.old_end_position, self.new_end_position
            )));
        }
        Ok(())
    }
}

impl From<&EditDescriptor> for tree_sitter::InputEdit {
    fn from(edit: &EditDescriptor) -> Self {
        tree_sitter::InputEdit {
            start_byte: edit.start_index,
            old_end_byte: edit.old_end_index,
            new_end_byte: edit.new_end_index,
            start_position: to_ts_point(edit.start_position),
            old_end_position: to_ts_point(edit.old_end_position),
            new_end_position: to_ts_point(edit.new_end_position),
        }
    }
}

pub fn to_ts_point(point: Point) -> tree_sitter::Point {
    tree_sitter::Point {
        row: point.row,
        column: point.column,
    }
}

pub fn from_ts_point(point: tree_sitter::Point) -> Point {
    Point::new(point.row, point.column)
}

/// Apply `event` to `old_text`.
///
/// Returns the descriptor for the parser together with the new text. The
/// event is rejected, leaving everything untouched, when its span does not
/// fit the text.
pub fn apply_edit_event(old_text: &str, event: &EditEvent) -> Result<(EditDescriptor, String)> {
    let start = event.range_offset;
    let old_end = start.checked_add(event.range_length).ok_or_else(|| {
        TreescopeError::EditApplication(format!(
            "range overflows: offset={} length={}",
            start, event.range_length
        ))
    })?;
    if old_end > old_text.len() {
        return Err(TreescopeError::EditApplication(format!(
            "range {}..{} exceeds text length {}",
            start,
            old_end,
            old_text.len()
        )));
    }
    if !old_text.is_char_boundary(start) || !old_text.is_char_boundary(old_end) {
        return Err(TreescopeError::EditApplication(format!(
            "range {}..{} splits a character",
            start, old_end
        )));
    }

    let mut new_text = String::with_capacity(old_text.len() - event.range_length + event.inserted_text.len());
    new_text.push_str(&old_text[..start]);
    new_text.push_str(&event.inserted_text);
    new_text.push_str(&old_text[old_end..]);

    let new_end = event.new_end_offset();
    let descriptor = EditDescriptor {
        start_index: start,
        old_end_index: old_end,
        new_end_index: new_end,
        start_position: event.range_start,
        old_end_position: event.range_end,
        new_end_position: LineIndex::new(&new_text).position_at(new_end),
    };
    descriptor.validate()?;

    Ok((descriptor, new_text))
}

/// Build the event a host would report for replacing
/// `range_offset..range_offset + range_length` of `text` with `inserted`.
pub fn edit_event_for(
    text: &str,
    range_offset: usize,
    range_length: usize,
    inserted: &str,
) -> EditEvent {
    let index = LineIndex::new(text);
    EditEvent::new(
        index.position_at(range_offset),
        index.position_at(range_offset + range_length),
        range_offset,
        range_length,
        inserted,
    )
}
