use crate::ApiResult;
use crate::models::LanguageId;
use async_trait::async_trait;

/// A document as the host editor currently sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenDocument {
    pub uri: String,
    pub language: LanguageId,
    pub text: String,
}

/// Host-side lookup of documents by identity.
///
/// Used when a suspended session is resumed: the session is only rebuilt if
/// the document it was opened for can still be resolved.
#[async_trait]
pub trait DocumentResolver: Send + Sync {
    async fn open_document(&self, uri: &str) -> ApiResult<OpenDocument>;
}
