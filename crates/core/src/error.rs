use thiserror::Error;
use treescope_api::QueryErrorInfo;

#[derive(Error, Debug)]
pub enum TreescopeError {
    #[error("Grammar unavailable for '{language}': {reason}")]
    GrammarUnavailable { language: String, reason: String },
    #[error("Query compile error at {}: {}", .0.index, .0.message)]
    QueryCompile(QueryErrorInfo),
    #[error("Query evaluation error: {}", .0.message)]
    QueryEval(QueryErrorInfo),
    #[error("Invalid edit: {0}")]
    EditApplication(String),
    #[error("Parsing error: {0}")]
    Parsing(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("State encode error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("State decode error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TreescopeError {
    pub fn grammar_unavailable(language: impl Into<String>, reason: impl ToString) -> Self {
        TreescopeError::GrammarUnavailable {
            language: language.into(),
            reason: reason.to_string(),
        }
    }

    /// Query failures carry a span into the query text and never invalidate
    /// the tree.
    pub fn query_info(&self) -> Option<&QueryErrorInfo> {
        match self {
            TreescopeError::QueryCompile(info) | TreescopeError::QueryEval(info) => Some(info),
            _ => None,
        }
    }
}

impl From<treescope_api::ApiError> for TreescopeError {
    fn from(err: treescope_api::ApiError) -> Self {
        TreescopeError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TreescopeError>;
