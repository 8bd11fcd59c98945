use crate::parser::LineIndex;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;
use treescope_api::Point;

// Anything but whitespace and punctuation counts as part of a word.
static WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[^\s`~!@#$%^&*()\-=+\[{\]}\\|;:'",.<>/?]+"#).unwrap());

/// Byte range of the word touching `point`, if any.
///
/// A cursor placed right after a word still selects it.
pub fn word_range_at(text: &str, lines: &LineIndex, point: Point) -> Option<Range<usize>> {
    let line_start = lines.offset_at(Point::new(point.row, 0))?;
    let line_end = lines.line_end(point.row)?;
    let column = point.column.min(line_end - line_start);

    WORD.find_iter(&text[line_start..line_end])
        .find(|m| m.start() <= column && column <= m.end())
        .map(|m| line_start + m.start()..line_start + m.end())
}

/// Ordered byte range covered by a selection, expanding an empty selection
/// to the word under the cursor.
pub fn selection_range(
    text: &str,
    lines: &LineIndex,
    anchor: Point,
    active: Point,
) -> Option<Range<usize>> {
    if anchor == active {
        return word_range_at(text, lines, anchor);
    }
    let (start, end) = if anchor <= active {
        (anchor, active)
    } else {
        (active, anchor)
    };
    Some(lines.offset_at(start)?..lines.offset_at(end)?)
}
