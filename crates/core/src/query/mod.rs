//! Structural queries over a parsed tree.

pub mod color;
pub mod engine;

pub use color::{ColorAssigner, PALETTE};
pub use engine::{QueryEngine, compile_error_info};
