pub mod config;
pub mod error;
pub mod grammar;
pub mod logging;
pub mod parser;
pub mod query;
pub mod session;
pub mod tree;

pub use config::ExplorerConfig;
pub use error::{Result, TreescopeError};
pub use grammar::{Grammar, GrammarRegistry};
pub use session::{Session, SessionManager};
