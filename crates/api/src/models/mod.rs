pub mod edit;
pub mod language;
pub mod message;
pub mod node;
pub mod query;
pub mod session;

pub use edit::*;
pub use language::*;
pub use message::*;
pub use node::*;
pub use query::*;
pub use session::*;
