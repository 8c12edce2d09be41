// Dependency graph: arena model plus the build and filter passes

pub mod builder;
pub mod filter;
pub mod model;

pub use builder::{BuildOutput, GraphBuilder};
pub use filter::{FrameworkFilter, Pattern};
pub use model::{CouplingStrength, DependencyEdge, DependencyGraph, ProjectNode, identity_key};
