use super::color::ColorAssigner;
use crate::error::{Result, TreescopeError};
use crate::grammar::Grammar;
use crate::tree::project_detached;
use once_cell::sync::Lazy;
use regex::Regex;
use tree_sitter::{Query, QueryCursor, QueryError, QueryErrorKind, StreamingIterator, Tree};
use treescope_api::{Capture, QueryErrorInfo};

// Identifier-like token starting at a query error offset.
static QUERY_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w\-.]*").unwrap());

struct CompiledQuery {
    resource: String,
    text: String,
    query: Query,
}

/// Compiles and evaluates structural queries.
///
/// The last compiled query is kept, so re-running the same text after an
/// edit skips compilation.
pub struct QueryEngine {
    match_limit: u32,
    compiled: Option<CompiledQuery>,
}

impl QueryEngine {
    pub fn new(match_limit: u32) -> Self {
        Self {
            match_limit,
            compiled: None,
        }
    }

    pub fn match_limit(&self) -> u32 {
        self.match_limit
    }

    /// Evaluate `query_text` over `tree`.
    ///
    /// Colors are reset before the run. Captures come in match order, then
    /// capture order within each match. An empty text yields no captures.
    pub fn run(
        &mut self,
        grammar: &Grammar,
        tree: &Tree,
        source: &str,
        query_text: &str,
        colors: &mut ColorAssigner,
    ) -> Result<Vec<Capture>> {
        colors.reset();
        if query_text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let match_limit = self.match_limit;
        let query = self.compile(grammar, query_text)?;
        let names = query.capture_names();

        let mut cursor = QueryCursor::new();
        cursor.set_match_limit(match_limit);

        let mut captures = Vec::new();
        {
            let mut matches = cursor.matches(query, tree.root_node(), source.as_bytes());
            while let Some(m) = matches.next() {
                for capture in m.captures {
                    let name = names[capture.index as usize];
                    captures.push(Capture {
                        pattern: m.pattern_index,
                        name: name.to_string(),
                        node: project_detached(capture.node, source),
                        color: colors.assign(name).to_string(),
                    });
                }
            }
        }

        if cursor.did_exceed_match_limit() {
            colors.reset();
            return Err(TreescopeError::QueryEval(QueryErrorInfo::new(
                format!(
                    "Query exceeded the match limit of {} in-progress matches",
                    match_limit
                ),
                0,
                0,
            )));
        }

        tracing::debug!(
            captures = captures.len(),
            "Query evaluated against {}",
            grammar.resource()
        );
        Ok(captures)
    }

    /// Drop the cached compiled query.
    pub fn clear(&mut self) {
        self.compiled = None;
    }

    fn compile(&mut self, grammar: &Grammar, query_text: &str) -> Result<&Query> {
        let cached = self
            .compiled
            .as_ref()
            .is_some_and(|c| c.resource == grammar.resource() && c.text == query_text);

        if !cached {
            self.compiled = None;
            let query = Query::new(grammar.language(), query_text)
                .map_err(|e| TreescopeError::QueryCompile(compile_error_info(&e, query_text)))?;
            self.compiled = Some(CompiledQuery {
                resource: grammar.resource().to_string(),
                text: query_text.to_string(),
                query,
            });
        }

        self.compiled
            .as_ref()
            .map(|c| &c.query)
            .ok_or_else(|| TreescopeError::Internal("query cache empty after compile".to_string()))
    }
}

/// Locate a compile error in the query text.
///
/// Unknown node types, fields and captures span the offending word; other
/// errors point at a single offset.
pub fn compile_error_info(error: &QueryError, query_text: &str) -> QueryErrorInfo {
    let suffix = query_text.get(error.offset..).unwrap_or_default();
    let word = QUERY_WORD.find(suffix).map(|m| m.as_str()).unwrap_or_default();
    let first_line = suffix.lines().next().unwrap_or_default();

    let (message, length) = match error.kind {
        QueryErrorKind::NodeType => (format!("Bad node name '{}'", word), word.len()),
        QueryErrorKind::Field => (format!("Bad field name '{}'", word), word.len()),
        QueryErrorKind::Capture => (format!("Bad capture name @{}", word), word.len()),
        QueryErrorKind::Structure => (
            format!(
                "Bad pattern structure at offset {}: '{}'...",
                error.offset, first_line
            ),
            0,
        ),
        QueryErrorKind::Syntax => (
            format!("Bad syntax at offset {}: '{}'...", error.offset, first_line),
            0,
        ),
        _ => (error.message.clone(), 0),
    };

    QueryErrorInfo::new(message, error.offset, length)
}
