//! Incremental parsing of one document with one grammar.

pub mod edit;

pub use edit::{
    EditDescriptor, LineIndex, apply_edit_event, edit_event_for, from_ts_point, to_ts_point,
};

use crate::error::{Result, TreescopeError};
use crate::grammar::Grammar;
use std::sync::Arc;
use tree_sitter::{LogType, Parser, Tree};

/// Kind of a parser trace line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseLogKind {
    Lex,
    Parse,
}

impl From<LogType> for ParseLogKind {
    fn from(kind: LogType) -> Self {
        match kind {
            LogType::Lex => ParseLogKind::Lex,
            LogType::Parse => ParseLogKind::Parse,
        }
    }
}

/// Receiver of parser trace lines.
pub type ParseLogSink = Box<dyn FnMut(ParseLogKind, &str) + Send + 'static>;

/// Parser bound to a single grammar.
///
/// Trees handed out are never modified afterwards: edits are applied to a
/// copy of the previous tree, which then serves as the reuse hint for the
/// reparse.
pub struct IncrementalParser {
    grammar: Arc<Grammar>,
    parser: Parser,
    logging: bool,
}

impl IncrementalParser {
    pub fn new(grammar: Arc<Grammar>) -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(grammar.language())
            .map_err(|e| TreescopeError::grammar_unavailable(grammar.language_id().as_str(), e))?;
        Ok(Self {
            grammar,
            parser,
            logging: false,
        })
    }

    pub fn grammar(&self) -> &Arc<Grammar> {
        &self.grammar
    }

    /// Parse `text` from scratch.
    pub fn parse(&mut self, text: &str) -> Result<Tree> {
        self.reparse(text, None)
    }

    /// Apply one edit to `tree` and reparse `new_text`.
    pub fn edit(&mut self, tree: &Tree, edit: &EditDescriptor, new_text: &str) -> Result<Tree> {
        self.edit_batch(tree, std::slice::from_ref(edit), new_text)
    }

    /// Apply a batch of edits in order, then reparse once.
    ///
    /// Each edit must be expressed against the text left by the previous one.
    /// All edits are validated before any of them touches the tree.
    pub fn edit_batch(
        &mut self,
        tree: &Tree,
        edits: &[EditDescriptor],
        new_text: &str,
    ) -> Result<Tree> {
        for edit in edits {
            edit.validate()?;
        }

        let mut edited = tree.clone();
        for edit in edits {
            edited.edit(&edit.into());
        }

        tracing::debug!(
            edits = edits.len(),
            bytes = new_text.len(),
            "Reparsing {} incrementally",
            self.grammar.resource()
        );
        self.reparse(new_text, Some(&edited))
    }

    fn reparse(&mut self, text: &str, old_tree: Option<&Tree>) -> Result<Tree> {
        self.parser.parse(text, old_tree).ok_or_else(|| {
            TreescopeError::Parsing(format!(
                "{} produced no tree for {} bytes",
                self.grammar.resource(),
                text.len()
            ))
        })
    }

    /// Install or clear the trace sink. Clearing drops lines immediately;
    /// nothing is buffered while no sink is set.
    pub fn set_log_sink(&mut self, sink: Option<ParseLogSink>) {
        self.logging = sink.is_some();
        match sink {
            Some(mut sink) => self.parser.set_logger(Some(Box::new(
                move |kind: LogType, message: &str| sink(kind.into(), message),
            ))),
            None => self.parser.set_logger(None),
        }
    }

    pub fn is_logging(&self) -> bool {
        self.logging
    }
}
