/// Reads .sln and .csproj files into normalised [`model::ProjectInfo`]
/// records consumed by the graph builder.
pub mod csproj;
pub mod error;
pub mod loader;
pub mod model;
pub mod sln;

pub use csproj::CsprojReader;
pub use loader::{Workspace, WorkspaceLoader};
pub use model::{ProjectInfo, Reference, ReferenceKind, Solution, SolutionProject};
pub use sln::SolutionReader;
