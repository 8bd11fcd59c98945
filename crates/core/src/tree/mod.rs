//! Tree traversal and projection.
//!
//! * [`walker`]: iterative cursor walk
//! * [`projector`]: node → [`MiniNode`](treescope_api::MiniNode)
//! * [`flat`]: arena of projected nodes for one tree generation

pub mod flat;
pub mod projector;
pub mod walker;

pub use flat::FlatTree;
pub use projector::{project, project_detached};
pub use walker::{WalkContext, count_nodes, walk};
