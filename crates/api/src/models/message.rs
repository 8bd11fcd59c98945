//! Messages exchanged between a tree session, its view and the host editor.

use super::edit::EditEvent;
use super::node::{NodeId, Point};
use super::query::{Capture, QueryErrorInfo};
use super::session::RefreshEvent;
use serde::{Deserialize, Serialize};

/// Requests sent by the tree view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "value", rename_all = "camelCase")]
pub enum ViewRequest {
    ShowAnonymousNodes(bool),
    EnableNodeMapping(bool),
    SelectEditorText(TextSelection),
    EnableQuery(bool),
    QueryNode(String),
    LogOutput(bool),
}

/// A byte range picked in the view. A selection without a range clears the
/// current editor selection highlight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSelection {
    #[serde(default)]
    pub start_index: Option<usize>,
    #[serde(default)]
    pub end_index: Option<usize>,
    #[serde(default)]
    pub is_click: bool,
}

impl TextSelection {
    pub fn range(&self) -> Option<std::ops::Range<usize>> {
        match (self.start_index, self.end_index) {
            (Some(start), Some(end)) if start < end => Some(start..end),
            _ => None,
        }
    }
}

/// How an editor selection change was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionKind {
    Keyboard,
    Mouse,
    Command,
}

/// Events raised by the host editor for the document behind a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum EditorEvent {
    /// One batch of content changes, each relative to the text left by the
    /// previous change in the batch.
    #[serde(rename_all = "camelCase")]
    TextChanged { changes: Vec<EditEvent> },
    #[serde(rename_all = "camelCase")]
    SelectionChanged {
        anchor: Point,
        active: Point,
        kind: SelectionKind,
    },
    #[serde(rename_all = "camelCase")]
    ViewStateChanged { visible: bool, active: bool },
    #[serde(rename_all = "camelCase")]
    VisibleRangeChanged { first_line: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollEvent {
    pub target_line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GotoNodeEvent {
    pub node_id: NodeId,
}

/// Messages produced by a session for its view and for the decoration layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "data", rename_all = "camelCase")]
pub enum ViewEvent {
    Refresh(RefreshEvent),
    QueryDone(Vec<Capture>),
    QueryError(QueryErrorInfo),
    GotoNode(GotoNodeEvent),
    Scroll(ScrollEvent),
    /// Highlight `[start, end)` in the editor and reveal it.
    #[serde(rename_all = "camelCase")]
    SelectRange { start_index: usize, end_index: usize },
    ClearSelection,
    /// Drop every capture highlight in the editor.
    ClearDecorations,
}
