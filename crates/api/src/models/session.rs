use super::node::MiniNode;
use serde::{Deserialize, Serialize};

/// View state of one document's tree explorer.
///
/// This is the blob a host persists when the view is suspended and hands back
/// on resume. Every field survives a serialization round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub doc_uri: String,
    #[serde(default)]
    pub nodes: Vec<MiniNode>,
    #[serde(default)]
    pub enable_query: bool,
    #[serde(default)]
    pub query_text: String,
    #[serde(default)]
    pub show_anonymous_nodes: bool,
    #[serde(default)]
    pub enable_node_mapping: bool,
    #[serde(default)]
    pub log_output: bool,
}

impl SessionState {
    pub fn new(doc_uri: impl Into<String>) -> Self {
        Self {
            doc_uri: doc_uri.into(),
            ..Default::default()
        }
    }

    pub fn set_show_anonymous_nodes(&mut self, value: bool) {
        self.show_anonymous_nodes = value;
    }

    pub fn set_enable_query(&mut self, value: bool) {
        self.enable_query = value;
    }

    pub fn set_query_text(&mut self, text: impl Into<String>) {
        self.query_text = text.into();
    }

    pub fn set_enable_node_mapping(&mut self, value: bool) {
        self.enable_node_mapping = value;
    }

    pub fn set_log_output(&mut self, value: bool) {
        self.log_output = value;
    }

    /// The query that should currently be evaluated, if any.
    pub fn active_query(&self) -> Option<&str> {
        (self.enable_query && !self.query_text.is_empty()).then_some(self.query_text.as_str())
    }

    pub fn to_refresh_event(&self) -> RefreshEvent {
        RefreshEvent {
            doc_id: self.doc_uri.clone(),
            nodes: self.nodes.clone(),
            show_anonymous_nodes: self.show_anonymous_nodes,
            enable_query: self.enable_query,
            query_text: self.query_text.clone(),
            enable_node_mapping: self.enable_node_mapping,
            log_output: self.log_output,
        }
    }
}

/// Full session state pushed to the view on every refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshEvent {
    pub doc_id: String,
    pub nodes: Vec<MiniNode>,
    pub show_anonymous_nodes: bool,
    pub enable_query: bool,
    pub query_text: String,
    pub enable_node_mapping: bool,
    pub log_output: bool,
}
