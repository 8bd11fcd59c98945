//! Document sessions: one parsed document, its tree view state and the
//! message handling between view and editor.

pub mod manager;
pub mod publish;
pub mod selection;
pub mod store;

pub use manager::SessionManager;
pub use publish::{Published, RefreshPublisher};
pub use store::{SessionStore, decode_state, encode_state};

use crate::config::ExplorerConfig;
use crate::error::Result;
use crate::grammar::Grammar;
use crate::logging::tracing_parse_sink;
use crate::parser::{IncrementalParser, LineIndex, apply_edit_event, from_ts_point, to_ts_point};
use crate::query::{ColorAssigner, QueryEngine};
use crate::tree::FlatTree;
use std::fmt;
use std::sync::Arc;
use tree_sitter::Tree;
use treescope_api::{
    Capture, EditEvent, EditorEvent, GotoNodeEvent, MiniNode, Point, QueryErrorInfo,
    RefreshEvent, ScrollEvent, SelectionKind, SessionState, TextSelection, ViewEvent, ViewRequest,
};

/// Flatten `tree` into the node list shown by the view.
pub fn refresh_nodes(tree: &Tree, text: &str, include_anonymous: bool) -> Vec<MiniNode> {
    FlatTree::build(tree.root_node(), text, include_anonymous).into_nodes()
}

/// A document open in the explorer.
///
/// Events are handled one at a time; every successful edit produces a new
/// tree with the next generation number.
pub struct Session {
    text: String,
    tree: Tree,
    generation: u64,
    parser: IncrementalParser,
    state: SessionState,
    colors: ColorAssigner,
    queries: QueryEngine,
    captures: Vec<Capture>,
    visible: bool,
    active: bool,
    publisher: RefreshPublisher,
}

impl Session {
    pub fn open(
        uri: impl Into<String>,
        text: impl Into<String>,
        grammar: Arc<Grammar>,
        config: &ExplorerConfig,
    ) -> Result<Self> {
        Self::resume(SessionState::new(uri), text, grammar, config)
    }

    /// Rebuild a session from saved view state. Toggles and query text are
    /// kept; the node list is recomputed from the current text.
    pub fn resume(
        state: SessionState,
        text: impl Into<String>,
        grammar: Arc<Grammar>,
        config: &ExplorerConfig,
    ) -> Result<Self> {
        let text = text.into();
        let mut parser = IncrementalParser::new(grammar)?;
        if state.log_output {
            parser.set_log_sink(Some(tracing_parse_sink(state.doc_uri.clone())));
        }
        let tree = parser.parse(&text)?;

        let mut session = Self {
            text,
            tree,
            generation: 0,
            parser,
            state,
            colors: ColorAssigner::new(),
            queries: QueryEngine::new(config.query_match_limit),
            captures: Vec::new(),
            visible: true,
            active: true,
            publisher: RefreshPublisher::new(),
        };
        session.refresh();
        tracing::info!(
            "Opened {} with {}",
            session.uri(),
            session.grammar().resource()
        );
        Ok(session)
    }

    pub fn uri(&self) -> &str {
        &self.state.doc_uri
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn grammar(&self) -> &Arc<Grammar> {
        self.parser.grammar()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Captures of the last successful query run.
    pub fn captures(&self) -> &[Capture] {
        &self.captures
    }

    pub fn publisher(&self) -> &RefreshPublisher {
        &self.publisher
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_logging(&self) -> bool {
        self.parser.is_logging()
    }

    /// Rebuild the node list from the current tree and publish it.
    pub fn refresh(&mut self) -> RefreshEvent {
        self.state.nodes = refresh_nodes(&self.tree, &self.text, self.state.show_anonymous_nodes);
        tracing::debug!(
            generation = self.generation,
            nodes = self.state.nodes.len(),
            "Refreshed {}",
            self.uri()
        );
        let event = self.state.to_refresh_event();
        self.publisher.publish(self.generation, event.clone());
        event
    }

    /// Apply one batch of editor changes and reparse once.
    ///
    /// Either every change applies or none does; on error the current text
    /// and tree are left untouched.
    pub fn apply_changes(&mut self, changes: &[EditEvent]) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }

        let mut text = self.text.clone();
        let mut edits = Vec::with_capacity(changes.len());
        for change in changes {
            let (edit, next) = apply_edit_event(&text, change)?;
            edits.push(edit);
            text = next;
        }

        let tree = self.parser.edit_batch(&self.tree, &edits, &text)?;
        self.text = text;
        self.tree = tree;
        self.generation += 1;
        Ok(())
    }

    /// Run the active query, replacing any previous highlighting.
    pub fn run_query(&mut self) -> Vec<ViewEvent> {
        let mut events = vec![ViewEvent::ClearDecorations];
        self.captures.clear();

        let Some(query_text) = self.state.active_query() else {
            self.colors.reset();
            events.push(ViewEvent::QueryDone(Vec::new()));
            return events;
        };

        let grammar = Arc::clone(self.parser.grammar());
        match self
            .queries
            .run(&grammar, &self.tree, &self.text, query_text, &mut self.colors)
        {
            Ok(captures) => {
                self.captures = captures.clone();
                events.push(ViewEvent::QueryDone(captures));
            }
            Err(e) => {
                tracing::debug!("Query failed on {}: {}", self.state.doc_uri, e);
                let info = e
                    .query_info()
                    .cloned()
                    .unwrap_or_else(|| QueryErrorInfo::new(e.to_string(), 0, 0));
                events.push(ViewEvent::QueryError(info));
            }
        }
        events
    }

    pub fn handle_view_request(&mut self, request: ViewRequest) -> Vec<ViewEvent> {
        match request {
            ViewRequest::ShowAnonymousNodes(value) => {
                self.state.set_show_anonymous_nodes(value);
                vec![ViewEvent::Refresh(self.refresh())]
            }
            ViewRequest::EnableNodeMapping(value) => {
                self.state.set_enable_node_mapping(value);
                Vec::new()
            }
            ViewRequest::SelectEditorText(selection) => self.select_editor_text(&selection),
            ViewRequest::EnableQuery(value) => {
                self.state.set_enable_query(value);
                self.run_query()
            }
            ViewRequest::QueryNode(text) => {
                self.state.set_query_text(text);
                self.run_query()
            }
            ViewRequest::LogOutput(value) => {
                self.state.set_log_output(value);
                let sink = value.then(|| tracing_parse_sink(self.state.doc_uri.clone()));
                self.parser.set_log_sink(sink);
                Vec::new()
            }
        }
    }

    fn select_editor_text(&self, selection: &TextSelection) -> Vec<ViewEvent> {
        if !(selection.is_click || (self.state.enable_node_mapping && self.active)) {
            return Vec::new();
        }
        match selection.range() {
            Some(range) => vec![ViewEvent::SelectRange {
                start_index: range.start,
                end_index: range.end,
            }],
            None => vec![ViewEvent::ClearSelection],
        }
    }

    pub fn handle_editor_event(&mut self, event: EditorEvent) -> Result<Vec<ViewEvent>> {
        match event {
            EditorEvent::TextChanged { changes } => {
                if changes.is_empty() {
                    return Ok(Vec::new());
                }
                self.apply_changes(&changes)?;
                let mut events = vec![ViewEvent::Refresh(self.refresh())];
                if self.state.active_query().is_some() {
                    events.extend(self.run_query());
                }
                Ok(events)
            }
            EditorEvent::SelectionChanged {
                anchor,
                active,
                kind,
            } => {
                let mut events = Vec::new();
                if kind == SelectionKind::Mouse {
                    events.push(ViewEvent::ClearSelection);
                }
                if self.visible && !self.active {
                    events.extend(self.goto_node(anchor, active));
                }
                Ok(events)
            }
            EditorEvent::ViewStateChanged { visible, active } => {
                let became_visible = !self.visible && visible;
                self.visible = visible;
                self.active = active;
                if became_visible {
                    Ok(vec![ViewEvent::Refresh(self.refresh())])
                } else {
                    Ok(Vec::new())
                }
            }
            EditorEvent::VisibleRangeChanged { first_line } => Ok(vec![ViewEvent::Scroll(
                ScrollEvent {
                    target_line: first_line,
                },
            )]),
        }
    }

    /// Smallest node spanning the editor selection.
    fn goto_node(&self, anchor: Point, active: Point) -> Option<ViewEvent> {
        let lines = LineIndex::new(&self.text);
        let range = selection::selection_range(&self.text, &lines, anchor, active)?;
        let start = to_ts_point(lines.position_at(range.start));
        let end = to_ts_point(lines.position_at(range.end));
        let node = self
            .tree
            .root_node()
            .descendant_for_point_range(start, end)?;
        tracing::trace!(
            "Selection {:?} maps to {} at {:?}",
            range,
            node.kind(),
            from_ts_point(node.start_position())
        );
        Some(ViewEvent::GotoNode(GotoNodeEvent { node_id: node.id() }))
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("uri", &self.state.doc_uri)
            .field("grammar", self.grammar())
            .field("generation", &self.generation)
            .field("visible", &self.visible)
            .field("active", &self.active)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TreescopeError;
    use crate::grammar::builtin_language;
    use crate::parser::edit_event_for;
    use treescope_api::{LanguageId, Point};

    const URI: &str = "file:///work/main.js";

    fn js() -> Arc<Grammar> {
        Arc::new(Grammar::builtin(
            LanguageId::JAVASCRIPT,
            "tree-sitter-javascript".to_string(),
            builtin_language("tree-sitter-javascript").unwrap(),
        ))
    }

    fn open(text: &str) -> Session {
        Session::open(URI, text, js(), &ExplorerConfig::default()).unwrap()
    }

    fn fresh_sexp(text: &str) -> String {
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(js().language()).unwrap();
        parser.parse(text, None).unwrap().root_node().to_sexp()
    }

    fn refreshed(events: &[ViewEvent]) -> &RefreshEvent {
        events
            .iter()
            .find_map(|e| match e {
                ViewEvent::Refresh(refresh) => Some(refresh),
                _ => None,
            })
            .expect("refresh event")
    }

    #[test]
    fn test_open_flattens_named_nodes() {
        let session = open("let x = 1;");
        let nodes = &session.state().nodes;

        assert_eq!(nodes.len(), 5);
        assert_eq!(nodes[0].kind, "program");
        assert_eq!(nodes[1].kind, "lexical_declaration");
        assert_eq!(nodes[1].field_name, "");
        assert_eq!(session.generation(), 0);
        assert_eq!(session.uri(), URI);
    }

    #[test]
    fn test_text_change_updates_identifier() {
        let mut session = open("let x = 1;");
        let change = edit_event_for(session.text(), 4, 1, "y");

        let events = session
            .handle_editor_event(EditorEvent::TextChanged {
                changes: vec![change],
            })
            .unwrap();

        let refresh = refreshed(&events);
        let ident = refresh
            .nodes
            .iter()
            .find(|n| n.kind == "identifier")
            .unwrap();
        assert_eq!(ident.text, "y");
        assert_eq!((ident.start_index, ident.end_index), (4, 5));
        assert_eq!(session.text(), "let y = 1;");
        assert_eq!(session.generation(), 1);
    }

    #[test]
    fn test_batch_matches_fresh_parse() {
        let mut session = open("let x = 1;\nlet y = 2;");
        let first = edit_event_for(session.text(), 8, 1, "42");
        let after_first = "let x = 42;\nlet y = 2;";
        let second = edit_event_for(after_first, 12, 0, "const z = x;\n");

        session.apply_changes(&[first, second]).unwrap();

        assert_eq!(session.text(), "let x = 42;\nconst z = x;\nlet y = 2;");
        assert_eq!(
            session.tree().root_node().to_sexp(),
            fresh_sexp(session.text())
        );
        assert_eq!(session.generation(), 1);
    }

    #[test]
    fn test_bad_change_leaves_session_untouched() {
        let mut session = open("let x = 1;");
        let good = edit_event_for(session.text(), 0, 0, "// hi\n");
        let bad = EditEvent::new(Point::new(0, 40), Point::new(0, 41), 40, 1, "z");

        let err = session
            .handle_editor_event(EditorEvent::TextChanged {
                changes: vec![good, bad],
            })
            .unwrap_err();

        assert!(matches!(err, TreescopeError::EditApplication(_)));
        assert_eq!(session.text(), "let x = 1;");
        assert_eq!(session.generation(), 0);
    }

    #[test]
    fn test_empty_change_batch_is_ignored() {
        let mut session = open("let x = 1;");
        let events = session
            .handle_editor_event(EditorEvent::TextChanged { changes: vec![] })
            .unwrap();
        assert!(events.is_empty());
        assert_eq!(session.generation(), 0);
    }

    #[test]
    fn test_anonymous_toggle_refreshes() {
        let mut session = open("let x = 1;");

        let events = session.handle_view_request(ViewRequest::ShowAnonymousNodes(true));
        assert_eq!(refreshed(&events).nodes.len(), 8);
        assert!(refreshed(&events).show_anonymous_nodes);

        let events = session.handle_view_request(ViewRequest::ShowAnonymousNodes(false));
        assert_eq!(refreshed(&events).nodes.len(), 5);
    }

    #[test]
    fn test_query_runs_only_when_enabled() {
        let mut session = open("let x = 1;");

        let events = session.handle_view_request(ViewRequest::QueryNode("(identifier) @id".into()));
        assert_eq!(
            events,
            vec![ViewEvent::ClearDecorations, ViewEvent::QueryDone(vec![])]
        );
        assert_eq!(session.state().query_text, "(identifier) @id");

        let events = session.handle_view_request(ViewRequest::EnableQuery(true));
        let ViewEvent::QueryDone(captures) = &events[1] else {
            panic!("expected queryDone, got {:?}", events);
        };
        assert_eq!(events[0], ViewEvent::ClearDecorations);
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].node.byte_range(), 4..5);
        assert_eq!(session.captures().len(), 1);

        let events = session.handle_view_request(ViewRequest::EnableQuery(false));
        assert_eq!(
            events,
            vec![ViewEvent::ClearDecorations, ViewEvent::QueryDone(vec![])]
        );
        assert!(session.captures().is_empty());
        assert_eq!(session.state().query_text, "(identifier) @id");
    }

    #[test]
    fn test_query_error_keeps_text_and_tree() {
        let mut session = open("let x = 1;");
        session.handle_view_request(ViewRequest::EnableQuery(true));
        let nodes_before = session.state().nodes.clone();

        let events = session.handle_view_request(ViewRequest::QueryNode("(nope) @n".into()));
        let ViewEvent::QueryError(info) = &events[1] else {
            panic!("expected queryError, got {:?}", events);
        };
        assert_eq!(info.index, 1);
        assert_eq!(info.length, 4);
        assert_eq!(session.state().query_text, "(nope) @n");
        assert_eq!(session.state().nodes, nodes_before);
    }

    #[test]
    fn test_edit_reruns_active_query() {
        let mut session = open("let x = 1;");
        session.handle_view_request(ViewRequest::EnableQuery(true));
        session.handle_view_request(ViewRequest::QueryNode("(identifier) @id".into()));

        let change = edit_event_for(session.text(), 10, 0, " let longer = x;");
        let events = session
            .handle_editor_event(EditorEvent::TextChanged {
                changes: vec![change],
            })
            .unwrap();

        let done = events.iter().find_map(|e| match e {
            ViewEvent::QueryDone(captures) => Some(captures),
            _ => None,
        });
        assert_eq!(done.map(|c| c.len()), Some(3));
    }

    #[test]
    fn test_select_editor_text_rules() {
        let mut session = open("let x = 1;");
        let click = TextSelection {
            start_index: Some(4),
            end_index: Some(5),
            is_click: true,
        };
        let hover = TextSelection {
            is_click: false,
            ..click.clone()
        };

        assert_eq!(
            session.handle_view_request(ViewRequest::SelectEditorText(click)),
            vec![ViewEvent::SelectRange {
                start_index: 4,
                end_index: 5
            }]
        );
        assert!(
            session
                .handle_view_request(ViewRequest::SelectEditorText(hover.clone()))
                .is_empty()
        );

        session.handle_view_request(ViewRequest::EnableNodeMapping(true));
        assert_eq!(
            session.handle_view_request(ViewRequest::SelectEditorText(hover)).len(),
            1
        );
        assert_eq!(
            session.handle_view_request(ViewRequest::SelectEditorText(TextSelection {
                is_click: true,
                ..Default::default()
            })),
            vec![ViewEvent::ClearSelection]
        );
    }

    #[test]
    fn test_selection_goes_to_node_when_view_unfocused() {
        let mut session = open("let x = 1;");
        let caret = EditorEvent::SelectionChanged {
            anchor: Point::new(0, 4),
            active: Point::new(0, 4),
            kind: SelectionKind::Keyboard,
        };

        // Focused view: the editor selection is not mirrored.
        assert!(session.handle_editor_event(caret.clone()).unwrap().is_empty());

        let events = session
            .handle_editor_event(EditorEvent::ViewStateChanged {
                visible: true,
                active: false,
            })
            .unwrap();
        assert!(events.is_empty());

        let expected = session
            .tree()
            .root_node()
            .descendant_for_byte_range(4, 5)
            .unwrap()
            .id();
        assert_eq!(
            session.handle_editor_event(caret).unwrap(),
            vec![ViewEvent::GotoNode(GotoNodeEvent { node_id: expected })]
        );
    }

    #[test]
    fn test_mouse_selection_clears_highlight() {
        let mut session = open("let x = 1;");
        let events = session
            .handle_editor_event(EditorEvent::SelectionChanged {
                anchor: Point::new(0, 0),
                active: Point::new(0, 3),
                kind: SelectionKind::Mouse,
            })
            .unwrap();
        assert_eq!(events, vec![ViewEvent::ClearSelection]);
    }

    #[test]
    fn test_becoming_visible_refreshes() {
        let mut session = open("let x = 1;");
        let hide = EditorEvent::ViewStateChanged {
            visible: false,
            active: false,
        };
        assert!(session.handle_editor_event(hide).unwrap().is_empty());
        assert!(!session.is_visible());

        let events = session
            .handle_editor_event(EditorEvent::ViewStateChanged {
                visible: true,
                active: true,
            })
            .unwrap();
        assert_eq!(refreshed(&events).doc_id, URI);
    }

    #[test]
    fn test_visible_range_scrolls() {
        let mut session = open("let x = 1;");
        let events = session
            .handle_editor_event(EditorEvent::VisibleRangeChanged { first_line: 3 })
            .unwrap();
        assert_eq!(
            events,
            vec![ViewEvent::Scroll(ScrollEvent { target_line: 3 })]
        );
    }

    #[test]
    fn test_log_output_toggle() {
        let mut session = open("let x = 1;");
        assert!(session.handle_view_request(ViewRequest::LogOutput(true)).is_empty());
        assert!(session.is_logging());
        assert!(session.state().log_output);

        session.handle_view_request(ViewRequest::LogOutput(false));
        assert!(!session.is_logging());
    }

    #[test]
    fn test_stale_refresh_not_published_after_edit() {
        let mut session = open("let x = 1;");
        let stale = session.state().to_refresh_event();
        let change = edit_event_for(session.text(), 4, 1, "abc");
        session
            .handle_editor_event(EditorEvent::TextChanged {
                changes: vec![change],
            })
            .unwrap();

        assert_eq!(session.publisher().latest().generation, 1);
        assert!(!session.publisher().publish(0, stale));
        let latest = session.publisher().latest().event.unwrap();
        assert!(latest.nodes.iter().any(|n| n.text == "abc"));
    }

    #[test]
    fn test_resume_keeps_toggles() {
        let mut state = SessionState::new(URI);
        state.set_show_anonymous_nodes(true);
        state.set_enable_query(true);
        state.set_query_text("(number) @n");
        state.set_log_output(true);

        let session = Session::resume(state, "let x = 1;", js(), &ExplorerConfig::default()).unwrap();
        assert_eq!(session.state().nodes.len(), 8);
        assert_eq!(session.state().active_query(), Some("(number) @n"));
        assert!(session.is_logging());
    }
    #[test]
    fn test_debug_names_document() {
        let session = open("let x = 1;");
        let debug = format!("{:?}", session);
        assert!(debug.starts_with("Session"));
        assert!(debug.contains(URI));
        assert!(debug.contains("tree-sitter-javascript"));
    }
}
