pub mod document;
pub mod error;
pub mod models;

pub use document::{DocumentResolver, OpenDocument};
pub use error::{ApiError, ApiResult};
pub use models::*;
