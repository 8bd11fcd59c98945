#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Document not found: {0}")]
    DocumentNotFound(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
